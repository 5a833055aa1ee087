//! Small UI helpers: human-readable sizes, truncation, sparkline windows.

use dashtop_engine::Reading;

pub fn human(b: u64) -> String {
    const K: f64 = 1024.0;
    let b = b as f64;
    if b < K { return format!("{b:.0}B"); }
    let kb = b / K;
    if kb < K { return format!("{kb:.1}KB"); }
    let mb = kb / K;
    if mb < K { return format!("{mb:.1}MB"); }
    let gb = mb / K;
    if gb < K { return format!("{gb:.1}GB"); }
    let tb = gb / K;
    format!("{tb:.2}TB")
}

/// Middle-elided copy at most `max` characters long. Counts chars, not
/// bytes; app bundle names are not guaranteed ASCII.
pub fn truncate_middle(s: &str, max: usize) -> String {
    let n = s.chars().count();
    if n <= max { return s.to_string(); }
    if max <= 3 { return "...".into(); }
    let keep = max - 3;
    let left = keep / 2;
    let right = keep - left;
    let head: String = s.chars().take(left).collect();
    let tail: String = s.chars().skip(n - right).collect();
    format!("{head}...{tail}")
}

/// Newest `max_points` of a history, rounded for `Sparkline`.
pub fn spark_window(hist: &[f64], max_points: usize) -> Vec<u64> {
    let start = hist.len().saturating_sub(max_points);
    hist[start..].iter().map(|&v| v.max(0.0).round() as u64).collect()
}

/// "~" when a value was synthesized rather than measured.
pub fn sim_marker(r: Reading) -> &'static str {
    if r.is_simulated() { "~" } else { "" }
}
