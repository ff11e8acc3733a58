//! Writes four sample survey sources (Gender, AGE, Geography, Overtime) in
//! the publisher's layout: a metadata preamble, a quoted `"Breakdowns"`
//! header, then one row per (breakdown, purpose).
//!
//! Usage: `generate_sample [DIR]` (defaults to `sample_data`).

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::{QuoteStyle, WriterBuilder};

const PURPOSES: [&str; 10] = [
    "Using e-mail",
    "Making calls (incl. video calls) over the Internet",
    "Participating in social networks",
    "Internet Banking via website or app",
    "Finding information about goods or services",
    "Reading online news sites/ newspapers/ news magazines",
    "Seeking health-related information",
    "Watching internet streamed TV or videos",
    "Selling goods or services",
    "Doing an online course",
];

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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// A percentage cell, or the `.` placeholder roughly one time in twenty.
fn cell(rng: &mut SimpleRng, base: f64) -> String {
    if rng.next_f64() < 0.05 {
        return ".".to_string();
    }
    let value = (base + (rng.next_f64() - 0.5) * 8.0).clamp(0.0, 100.0);
    format!("{value:.0}")
}

fn write_source(
    dir: &Path,
    name: &str,
    title: &str,
    breakdowns: &[&str],
    years: &[u16],
    rng: &mut SimpleRng,
) -> Result<usize> {
    let path = dir.join(name);
    let mut file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    writeln!(file, "\"{title}\"")?;
    writeln!(file, "\"Unit: % of individuals aged 16-74\"")?;
    writeln!(file, "\"Source: sample household survey\"")?;
    writeln!(file)?;

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(file);

    let mut header = vec!["Breakdowns".to_string(), "Purposes".to_string()];
    header.extend(years.iter().map(|y| y.to_string()));
    writer.write_record(&header)?;

    let mut rows = 0;
    for (b, breakdown) in breakdowns.iter().enumerate() {
        for (p, purpose) in PURPOSES.iter().enumerate() {
            let base = 90.0 - p as f64 * 7.0 - b as f64 * 3.0;
            let mut record = vec![breakdown.to_string(), purpose.to_string()];
            for (i, _) in years.iter().enumerate() {
                // Older years trend lower.
                let drift = (years.len() - 1 - i) as f64 * 2.5;
                record.push(cell(rng, base - drift));
            }
            writer.write_record(&record)?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn main() -> Result<()> {
    let dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let latest: [u16; 2] = [2023, 2024];
    let trend: Vec<u16> = (2015..=2024).collect();

    let sources: [(&str, &str, &[&str], &[u16]); 4] = [
        ("Gender.csv", "Purpose of internet use by gender", &["Males", "Females"], &latest),
        (
            "AGE.csv",
            "Purpose of internet use by age group",
            &["16-24", "25-34", "35-44", "45-54", "55-64", "65-74"],
            &latest,
        ),
        (
            "Geography.csv",
            "Purpose of internet use by region",
            &[
                "Border (NUTS 3)",
                "West (NUTS 3)",
                "Mid-West (NUTS 3)",
                "South-East (NUTS 3)",
                "Dublin (NUTS 3)",
            ],
            &latest,
        ),
        ("Overtime.csv", "Purpose of internet use over time", &["State"], &trend),
    ];

    for (name, title, breakdowns, years) in sources {
        let rows = write_source(&dir, name, title, breakdowns, years, &mut rng)?;
        println!("Wrote {rows} rows to {}", dir.join(name).display());
    }
    Ok(())
}
