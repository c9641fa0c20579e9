use once_cell::sync::Lazy;
use regex::Regex;

// Whitespace plus characters that are unsafe or awkward in file names
static UNSAFE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\s:./\\<>|"?*]+"#).expect("valid unsafe-run regex"));
static UNDERSCORE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_+").expect("valid underscore-run regex"));

/// Maps a display string such as `ISO/IEC 27001:2022` to a filesystem-safe token
/// (`ISO_IEC_27001_2022`).
///
/// Distinct inputs may map to the same token.
pub fn sanitize_filename(name: &str) -> String {
    let replaced = UNSAFE_RUN.replace_all(name, "_");
    let collapsed = UNDERSCORE_RUN.replace_all(&replaced, "_");
    let trimmed = collapsed.strip_prefix('_').unwrap_or(&collapsed);
    let trimmed = trimmed.strip_suffix('_').unwrap_or(trimmed);
    trimmed.to_string()
}

/// Absent input sanitizes to the empty string
pub fn sanitize_optional(name: Option<&str>) -> String {
    name.map(sanitize_filename).unwrap_or_default()
}
