use crate::constants::chain::{SOMPI_PER_HTN, TICKER};
use serde::{Deserialize, Deserializer};

const HASHRATE_UNITS: [&str; 7] = ["H/s", "kH/s", "MH/s", "GH/s", "TH/s", "PH/s", "EH/s"];

/// Format an estimated hashrate with the largest fitting unit
/// Examples: "999.00 H/s", "1.50 MH/s", "2.34 EH/s"
///
/// Negative and non-finite values have no meaningful rendering and yield `None`.
pub fn format_hashrate(hashrate: f64) -> Option<String> {
    if !hashrate.is_finite() || hashrate < 0.0 {
        return None;
    }

    let mut value = hashrate;
    let mut index = 0usize;
    while value >= 1000.0 && index < HASHRATE_UNITS.len() - 1 {
        value /= 1000.0;
        index += 1;
    }

    Some(format!("{value:.2} {}", HASHRATE_UNITS[index]))
}

/// Format difficulty in giga units, e.g. "12.345 G"
pub fn format_difficulty(difficulty: f64) -> String {
    format!("{:.3} G", difficulty / 1e9)
}

/// Format a countdown as "{h}h {m}m {s}s"
pub fn format_countdown(total_secs: u64) -> String {
    let (h, m, s) = split_hms(total_secs);
    format!("{h}h {m}m {s}s")
}

/// Split seconds into hours, minutes (< 60) and seconds (< 60)
pub fn split_hms(total_secs: u64) -> (u64, u64, u64) {
    (total_secs / 3600, (total_secs % 3600) / 60, total_secs % 60)
}

/// Group digits with commas: 1234567 -> "1,234,567"
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Convert sompi to HTN as a float
pub fn sompi_to_htn(sompi: i128) -> f64 {
    sompi as f64 / SOMPI_PER_HTN
}

/// Format a sompi amount in HTN without trailing zeros
/// Examples: "0.01 HTN", "5 HTN", "-0.5 HTN"
pub fn format_htn(sompi: i128) -> String {
    let fixed = format!("{:.8}", sompi_to_htn(sompi));
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    let trimmed = if trimmed == "-0" { "0" } else { trimmed };
    format!("{trimmed} {TICKER}")
}

/// Shorten a long hash for narrow layouts: "abcdef…123456"
pub fn truncate_middle(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max || max < 5 {
        return s.to_string();
    }
    let keep = (max - 1) / 2;
    let head: String = s.chars().take(keep).collect();
    let tail: String = s.chars().skip(count - keep).collect();
    format!("{head}…{tail}")
}

// The REST backend encodes most counters as JSON strings, some deployments as numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Num(u64),
    Str(String),
}

pub fn deserialize_u64_lenient<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

pub fn deserialize_option_u64_lenient<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumOrStr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumOrStr::Num(n)) => Ok(Some(n)),
        Some(NumOrStr::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(NumOrStr::Str(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Treat an explicit JSON `null` the same as a missing field
pub fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
