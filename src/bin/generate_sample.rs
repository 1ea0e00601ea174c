//! Writes a synthetic `data.csv` in the CDC COVID-NET monthly export layout,
//! for running the dashboard offline.

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// COVID-NET surveillance areas plus the network-wide aggregate.
const AREAS: [(&str, f64); 15] = [
    ("COVID-NET", 1.0),
    ("California", 0.9),
    ("Colorado", 0.85),
    ("Connecticut", 1.1),
    ("Georgia", 1.05),
    ("Iowa", 0.8),
    ("Maryland", 1.0),
    ("Michigan", 1.1),
    ("Minnesota", 0.75),
    ("New Mexico", 1.15),
    ("New York", 1.2),
    ("Ohio", 0.95),
    ("Oregon", 0.7),
    ("Tennessee", 1.05),
    ("Utah", 0.65),
];

const AGES: [(&str, f64); 4] = [
    ("All", 1.0),
    ("18-49 Years", 0.45),
    ("50-64 Years", 1.2),
    ("65+ Years", 3.4),
];
const SEXES: [(&str, f64); 3] = [("All", 1.0), ("Female", 0.9), ("Male", 1.1)];
const RACES: [(&str, f64); 4] = [
    ("All", 1.0),
    ("White", 0.85),
    ("Black", 1.6),
    ("Hispanic", 1.3),
];

/// Rough seasonal wave shape: winter peaks, summer troughs.
fn seasonal(year: i32, month: u32) -> f64 {
    let t = (year - 2020) as f64 * 12.0 + month as f64;
    let wave = (2.0 * std::f64::consts::PI * (t - 1.0) / 12.0).cos();
    let decay = (-(t - 12.0).max(0.0) / 36.0).exp();
    (6.0 + 18.0 * (wave + 1.0) / 2.0) * (0.35 + 0.65 * decay)
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "data.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    writer.write_record([
        "State",
        "Season",
        "_YearMonth",
        "AgeCategory_Legend",
        "Sex_Label",
        "Race_Label",
        "Type",
        "MonthlyRate",
    ])?;

    let mut rows = 0usize;
    for year in 2020..=2024 {
        for month in 1..=12u32 {
            if year == 2020 && month < 3 {
                continue;
            }
            let season = if month >= 10 {
                format!("{year}-{:02}", (year + 1) % 100)
            } else {
                format!("{}-{:02}", year - 1, year % 100)
            };
            let base = seasonal(year, month);
            let year_month = format!("{year}{month:02}");

            for (area, area_factor) in AREAS {
                for (age, age_factor) in AGES {
                    for (sex, sex_factor) in SEXES {
                        for (race, race_factor) in RACES {
                            // Only one breakdown at a time, as in the CDC export.
                            let breakdowns =
                                [age, sex, race].iter().filter(|v| **v != "All").count();
                            if breakdowns > 1 {
                                continue;
                            }
                            let noise = 0.85 + 0.3 * rng.next_f64();
                            let rate = base * area_factor * age_factor * sex_factor * race_factor * noise;
                            let rate = format!("{rate:.1}");
                            writer.write_record([
                                area,
                                season.as_str(),
                                year_month.as_str(),
                                age,
                                sex,
                                race,
                                "Crude Rate",
                                rate.as_str(),
                            ])?;
                            rows += 1;
                        }
                    }
                }

                // Age-adjusted headline row alongside the crude one.
                let adjusted = format!("{:.1}", base * area_factor * (0.9 + 0.2 * rng.next_f64()));
                writer.write_record([
                    area,
                    season.as_str(),
                    year_month.as_str(),
                    "All",
                    "All",
                    "All",
                    "Age adjusted rate",
                    adjusted.as_str(),
                ])?;
                rows += 1;
            }
        }
    }

    writer.flush()?;
    println!("Wrote {rows} rows to {output_path}");
    Ok(())
}
