/// Data layer: loading, normalising and reshaping survey sources.
///
/// Architecture:
/// ```text
///   URL / file  (metadata preamble + "Breakdowns" header + rows)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch, strip preamble, parse → SurveyTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  index    │  (breakdown, purpose) → first row
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  views    │  pair / grouped / top-N / trend → ChartData
///   └──────────┘
/// ```

pub mod index;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod views;
