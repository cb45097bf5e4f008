//! Environment parsing helpers shared by the config layers.
//!
//! Every reader takes a lookup function instead of touching the process
//! environment directly, so config parsing stays testable without mutating
//! global state.

/// Parse a value from `lookup(key)`, falling back to `default` when the key is
/// unset or does not parse.
pub fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Parse a boolean flag. Accepts `1/true/yes/on` and `0/false/no/off`
/// (case-insensitive, surrounding whitespace ignored).
pub fn parse_bool<F>(lookup: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Return the value for `key` when it is set and not blank.
pub fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Lookup backed by the real process environment.
pub fn process_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(test)]
#[path = "env_test.rs"]
mod tests;
