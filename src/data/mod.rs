/// Data layer: loading, cleaning, filtering and aggregation.
///
/// Architecture:
/// ```text
///   CDC endpoint ──┐      local data.csv
///                  ▼            │
///   ┌──────────────────┐        │
///   │      loader       │◄───────┘  fetch (cached) or fall back → RawTable
///   └──────────────────┘
///            │
///            ▼
///   ┌──────────────────┐
///   │    preprocess     │  normalise columns, derive dates → Dataset
///   └──────────────────┘
///            │
///            ▼
///   ┌──────────────────┐
///   │ filter / canonical│  date range + selections, headline slice
///   └──────────────────┘
///            │
///            ▼
///   ┌──────────────────┐
///   │ defaults/aggregate│  state × month means, latest-month map
///   └──────────────────┘
///            │
///            ▼
///   ┌──────────────────┐
///   │   presentation    │  postal codes, table order → DashboardView
///   └──────────────────┘
/// ```

pub mod aggregate;
pub mod canonical;
pub mod defaults;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod preprocess;
pub mod presentation;
