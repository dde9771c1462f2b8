//! URL-bar input handling.

use crate::home::HOME_URL;

/// Turn what the user typed into a URL to load.
///
/// - Input with a space, or with neither an `http` prefix nor a `.`,
///   is a search: `search_url` + query, spaces as `+`.
/// - Anything else without an `http` prefix gets `https://`.
/// - `home://` passes through.
///
/// Returns `None` for blank input.
pub fn normalize_input(input: &str, search_url: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if input == HOME_URL {
        return Some(input.to_string());
    }

    let has_scheme = input.starts_with("http");
    if input.contains(' ') || (!has_scheme && !input.contains('.')) {
        return Some(format!("{search_url}{}", input.replace(' ', "+")));
    }
    if !has_scheme {
        return Some(format!("https://{input}"));
    }
    Some(input.to_string())
}
