// ---------------------------------------------------------------------------
// Value normalizer: raw cell text → numeric value or "no data"
// ---------------------------------------------------------------------------

/// Placeholder the survey publisher uses for suppressed / unavailable cells.
pub const NO_DATA_PLACEHOLDER: &str = ".";

/// Convert a raw cell into a number, or `None` when the cell carries no data.
///
/// A cell is "no data" when it is absent, empty, the `.` placeholder, or
/// anything that does not parse as a whole `f64`. Partial numbers such as
/// `"42abc"` are rejected rather than truncated. Only finite values come
/// out, so `NaN` and `inf` text are no data too.
pub fn normalize_cell(raw: Option<&str>) -> Option<f64> {
    let text = raw?.trim();
    if text.is_empty() || text == NO_DATA_PLACEHOLDER {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}
