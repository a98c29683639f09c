//! Filename normalization
//!
//! Maps the loose nouns people use for common project files onto real
//! filenames. Anything not in the table is taken literally.

/// Bare nouns with a conventional filename
const ALIASES: &[(&str, &str)] = &[
    ("readme", "README.md"),
    ("package.json", "package.json"),
    ("config", "config.json"),
    ("server", "server.js"),
    ("index", "index.js"),
];

/// Filenames recognized anywhere in a message, in canonical casing
pub const WELL_KNOWN_FILES: &[&str] = &[
    "server.js",
    "index.js",
    "package.json",
    "README.md",
    "config.json",
];

/// Canonicalize a filename token
///
/// ```
/// use cohora_core::normalize::normalize_filename;
///
/// assert_eq!(normalize_filename("readme"), "README.md");
/// assert_eq!(normalize_filename("notes.txt"), "notes.txt");
/// assert_eq!(normalize_filename("main"), "main");
/// ```
#[must_use]
pub fn normalize_filename(token: &str) -> String {
    let token = token.trim();
    let lower = token.to_ascii_lowercase();
    if let Some((_, name)) = ALIASES.iter().find(|(alias, _)| *alias == lower) {
        return (*name).to_string();
    }
    token.to_string()
}

/// Canonical casing of a well-known filename, if `name` is one
#[must_use]
pub fn well_known(name: &str) -> Option<&'static str> {
    WELL_KNOWN_FILES
        .iter()
        .copied()
        .find(|known| known.eq_ignore_ascii_case(name))
}

/// Case-insensitive filename equality
#[inline]
#[must_use]
pub fn same_file(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
