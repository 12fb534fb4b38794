//! Shared helpers: source-type validation and member name patterns

use regex::Regex;

/// Source types `ACVTRPGFRE` accepts as conversion input.
pub const SUPPORTED_SOURCE_TYPES: &[&str] = &[
    "RPGLE", "SQLRPGLE", "RPG", "RPG38", "RPT", "RPT38", "SQLRPG",
];

/// Check a member extension against the supported-type allow-list.
pub fn is_supported_source_type(extension: &str) -> bool {
    SUPPORTED_SOURCE_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(extension))
}

/// Render a flag as the `*YES`/`*NO` sentinel the conversion command expects.
pub fn convert_bool(value: bool) -> &'static str {
    if value {
        "*YES"
    } else {
        "*NO"
    }
}

/// Match a member or extension name against a simple filter pattern.
///
/// Patterns are case-insensitive, use `*` as a wildcard and may list
/// comma-separated alternatives (`CALC*,PAY*`). An empty pattern matches
/// everything.
pub fn matches_simple_pattern(name: &str, pattern: &str) -> bool {
    if pattern.trim().is_empty() {
        return true;
    }
    pattern
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .any(|term| {
            let anchored = format!("^{}$", regex::escape(term).replace(r"\*", ".*"));
            match Regex::new(&format!("(?i){anchored}")) {
                Ok(re) => re.is_match(name),
                Err(_) => false,
            }
        })
}

/// Match against a user-supplied regular expression pattern.
///
/// Invalid expressions match nothing rather than failing the listing.
pub fn matches_regex_pattern(name: &str, pattern: &str) -> bool {
    if pattern.trim().is_empty() {
        return true;
    }
    match Regex::new(&format!("(?i){pattern}")) {
        Ok(re) => re.is_match(name),
        Err(_) => false,
    }
}
