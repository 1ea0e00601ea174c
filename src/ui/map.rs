use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Stroke, Ui, Vec2};

use crate::color::RateScale;
use crate::data::presentation::RATE_LABEL;
use crate::state::AppState;

use super::plot::NO_DATA;

const GRID_COLS: f32 = 12.0;
const GRID_ROWS: f32 = 8.0;

/// Tile-grid cartogram: (postal code, row, column).
pub const TILES: [(&str, u8, u8); 51] = [
    ("AK", 0, 0),
    ("ME", 0, 11),
    ("VT", 1, 10),
    ("NH", 1, 11),
    ("WA", 2, 1),
    ("ID", 2, 2),
    ("MT", 2, 3),
    ("ND", 2, 4),
    ("MN", 2, 5),
    ("IL", 2, 6),
    ("WI", 2, 7),
    ("MI", 2, 8),
    ("NY", 2, 9),
    ("RI", 2, 10),
    ("MA", 2, 11),
    ("OR", 3, 1),
    ("NV", 3, 2),
    ("WY", 3, 3),
    ("SD", 3, 4),
    ("IA", 3, 5),
    ("IN", 3, 6),
    ("OH", 3, 7),
    ("PA", 3, 8),
    ("NJ", 3, 9),
    ("CT", 3, 10),
    ("CA", 4, 1),
    ("UT", 4, 2),
    ("CO", 4, 3),
    ("NE", 4, 4),
    ("MO", 4, 5),
    ("KY", 4, 6),
    ("WV", 4, 7),
    ("VA", 4, 8),
    ("MD", 4, 9),
    ("DE", 4, 10),
    ("AZ", 5, 2),
    ("NM", 5, 3),
    ("KS", 5, 4),
    ("AR", 5, 5),
    ("TN", 5, 6),
    ("NC", 5, 7),
    ("SC", 5, 8),
    ("DC", 5, 9),
    ("OK", 6, 4),
    ("LA", 6, 5),
    ("MS", 6, 6),
    ("AL", 6, 7),
    ("GA", 6, 8),
    ("HI", 7, 0),
    ("TX", 7, 4),
    ("FL", 7, 9),
];

// ---------------------------------------------------------------------------
// Choropleth (latest month)
// ---------------------------------------------------------------------------

pub fn state_map(ui: &mut Ui, state: &AppState) {
    let title = match state.view.map_month {
        Some(month) => format!("Latest Month by State ({})", month.format("%Y-%m")),
        None => "Latest Month by State".to_string(),
    };
    ui.heading(title);

    let rows = &state.view.map;
    let Some(scale) = RateScale::from_values(rows.iter().map(|r| r.rate)) else {
        ui.label(NO_DATA);
        ui.label(egui::RichText::new("No state-level rows in the current selection.").weak());
        return;
    };

    let tile = (ui.available_width() / GRID_COLS).clamp(18.0, 48.0);
    let (response, painter) =
        ui.allocate_painter(Vec2::new(tile * GRID_COLS, tile * GRID_ROWS), Sense::hover());
    let origin = response.rect.min;
    let hover = response.hover_pos();
    let mut hovered = None;

    for (code, row, col) in TILES {
        let min = origin + Vec2::new(col as f32 * tile, row as f32 * tile);
        let rect = Rect::from_min_size(min, Vec2::splat(tile)).shrink(1.5);
        let value = rows.iter().find(|r| r.state_code == code);

        let fill = value.map_or(Color32::from_gray(70), |r| scale.color_for(r.rate));
        painter.rect_filled(rect, 3.0, fill);
        if hover.is_some_and(|p| rect.contains(p)) {
            painter.rect_stroke(rect, 3.0, Stroke::new(2.0, Color32::WHITE), egui::StrokeKind::Inside);
            hovered = value;
        }
        let text_color = if value.is_some_and(|r| scale.fraction(r.rate) > 0.5) {
            Color32::WHITE
        } else {
            Color32::BLACK
        };
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            code,
            FontId::proportional(tile * 0.32),
            text_color,
        );
    }

    ui.horizontal(|ui| {
        ui.label(format!("{RATE_LABEL}:"));
        ui.colored_label(scale.color_for(scale.min), format!("{:.1}", scale.min));
        ui.label("→");
        ui.colored_label(scale.color_for(scale.max), format!("{:.1}", scale.max));
    });
    match hovered {
        Some(r) => ui.label(format!("{} ({}): {:.2}", r.state, r.state_code, r.rate)),
        None => ui.label(egui::RichText::new("Hover a state for its rate.").weak()),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::presentation::STATE_CODES;
    use std::collections::BTreeSet;

    #[test]
    fn every_state_has_one_tile() {
        let tiles: BTreeSet<&str> = TILES.iter().map(|(c, _, _)| *c).collect();
        let codes: BTreeSet<&str> = STATE_CODES.iter().map(|(_, c)| *c).collect();
        assert_eq!(tiles, codes);
    }

    #[test]
    fn tiles_do_not_overlap() {
        let cells: BTreeSet<(u8, u8)> = TILES.iter().map(|(_, r, c)| (*r, *c)).collect();
        assert_eq!(cells.len(), TILES.len());
        assert!(TILES
            .iter()
            .all(|(_, r, c)| (*r as f32) < GRID_ROWS && (*c as f32) < GRID_COLS));
    }
}
