/// Canonical form used for keyword matching and cache keys.
pub(crate) fn normalize_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// Trimmed, upper-cased jurisdiction code as echoed back in results.
pub(crate) fn normalize_code(value: &str) -> String {
    value.trim().to_ascii_uppercase()
}

/// Two ASCII letters after normalization.
pub(crate) fn is_state_code(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|byte| byte.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_removes_invisible_characters_and_case() {
        let source = "\u{feff}Two-Story   OFFICE\tbuilding\u{200b}";
        assert_eq!(normalize_text(source), "two-story office building");
    }

    #[test]
    fn normalize_text_of_blank_input_is_empty() {
        assert_eq!(normalize_text("   \n\t"), "");
    }

    #[test]
    fn state_codes_are_two_letters() {
        assert!(is_state_code(&normalize_code(" tx ")));
        assert!(!is_state_code(&normalize_code("T1")));
        assert!(!is_state_code(&normalize_code("Texas")));
        assert!(!is_state_code(""));
    }
}
