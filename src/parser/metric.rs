//! Locale-aware parsing of metric strings from the export.

/// Parses a locale-formatted metric string into its bare percentage value.
///
/// The export writes numbers with a comma decimal separator and an
/// optional trailing percent sign: `"45,2%"` parses to `45.2` (not
/// `0.452`), `"12.5"` parses to `12.5`.
///
/// Returns `None` for absent, empty, or non-numeric input - downstream
/// consumers treat `None` as "unclassifiable", never as zero. This
/// function is total: no input makes it panic.
pub fn parse_metric(raw: Option<&str>) -> Option<f64> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }
    // First comma is the decimal separator; any further comma is junk
    // and will fail the parse below.
    let fixed = text.replacen(',', ".", 1);
    let bare = fixed.strip_suffix('%').unwrap_or(&fixed).trim_end();
    match bare.parse::<f64>() {
        // A non-finite residue ("NaN", "inf") has no meaningful band;
        // treat it the same as unparsable text.
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}
