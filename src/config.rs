use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// The four survey sources the dashboard is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    Gender,
    Age,
    Geography,
    Overtime,
}

impl Source {
    pub const ALL: [Source; 4] = [
        Source::Gender,
        Source::Age,
        Source::Geography,
        Source::Overtime,
    ];
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Gender => "gender",
            Source::Age => "age",
            Source::Geography => "geography",
            Source::Overtime => "overtime",
        };
        f.write_str(name)
    }
}

/// File name of each source, resolved against [`DashboardConfig::base`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceFiles {
    pub gender: String,
    pub age: String,
    pub geography: String,
    pub overtime: String,
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            gender: "Gender.csv".into(),
            age: "AGE.csv".into(),
            geography: "Geography.csv".into(),
            overtime: "Overtime.csv".into(),
        }
    }
}

impl SourceFiles {
    pub fn file_for(&self, source: Source) -> &str {
        match source {
            Source::Gender => &self.gender,
            Source::Age => &self.age,
            Source::Geography => &self.geography,
            Source::Overtime => &self.overtime,
        }
    }
}

/// A breakdown value paired with the label its series is shown under.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BreakdownLabel {
    pub breakdown: String,
    pub label: String,
}

impl BreakdownLabel {
    fn new(breakdown: &str, label: &str) -> Self {
        Self {
            breakdown: breakdown.into(),
            label: label.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// DashboardConfig
// ---------------------------------------------------------------------------

pub const DEFAULT_CURATED_PURPOSES: [&str; 7] = [
    "Using e-mail",
    "Making calls (incl. video calls) over the Internet",
    "Participating in social networks",
    "Internet Banking via website or app",
    "Finding information about goods or services",
    "Reading online news sites/ newspapers/ news magazines",
    "Seeking health-related information",
];

pub const DEFAULT_PALETTE: [&str; 10] = [
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f",
    "#edc949", "#af7aa1", "#ff9da7", "#9c755f", "#bab0ab",
];

/// Everything the dashboard needs to know, built once at startup.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// URL prefix or directory the source files live under.
    pub base: String,
    pub sources: SourceFiles,
    /// Text identifying the header line; everything above it is preamble.
    pub header_marker: String,
    /// Year column the single-year views read.
    pub latest_year: String,
    /// Purposes shown, in display order. Also fixes series colours.
    pub curated_purposes: Vec<String>,
    /// Hex colours (`#rrggbb`), cycled.
    pub palette: Vec<String>,
    /// Entries kept per region in the geography doughnuts.
    pub top_n: usize,
    /// Leading curated purposes shown in the age heatmap chart.
    pub heatmap_purposes: usize,
    pub gender_pair: [BreakdownLabel; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base: ".".into(),
            sources: SourceFiles::default(),
            header_marker: "\"Breakdowns\"".into(),
            latest_year: "2024".into(),
            curated_purposes: DEFAULT_CURATED_PURPOSES.iter().map(|p| p.to_string()).collect(),
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            top_n: 3,
            heatmap_purposes: 5,
            gender_pair: [
                BreakdownLabel::new("Males", "Male"),
                BreakdownLabel::new("Females", "Female"),
            ],
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl DashboardConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Curated purposes used by the heatmap chart.
    pub fn heatmap_purposes(&self) -> &[String] {
        let n = self.heatmap_purposes.min(self.curated_purposes.len());
        &self.curated_purposes[..n]
    }
}
