//! Player-name substitution in displayed text.

/// Replace every occurrence of `placeholder` in `raw` with `name`.
///
/// An empty placeholder matches nothing.
pub fn substitute(raw: &str, placeholder: &str, name: &str) -> String {
    if placeholder.is_empty() {
        return raw.to_string();
    }
    raw.replace(placeholder, name)
}
