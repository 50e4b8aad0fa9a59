/// Lowercases and collapses whitespace; strips byte-order and zero-width marks.
pub(crate) fn normalize_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_name_removes_marks_whitespace_and_case() {
        assert_eq!(normalize_name("\u{feff}  New   York , NY "), "new york , ny");
        assert_eq!(normalize_name("Saint\u{200b}-Laurent"), "saint-laurent");
    }
}
