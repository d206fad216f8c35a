/// Lowercases a header cell and collapses runs of whitespace.
pub(crate) fn fold_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// Lowercase header text with whitespace and punctuation removed, so
/// `"E.D.D at Site"` and `"edd at site"` compare equal.
pub(crate) fn compact_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect()
}
