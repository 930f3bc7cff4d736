/// Loose international phone check: optional leading '+', 8 to 15 digits,
/// separators (space, dash, dot, parentheses) allowed and ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    let trimmed = phone.trim();
    let rest = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let mut digits = 0usize;
    for ch in rest.chars() {
        match ch {
            '0'..='9' => digits += 1,
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return false,
        }
    }

    (8..=15).contains(&digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_formats() {
        assert!(is_valid_phone("+62 812 3456 7890"));
        assert!(is_valid_phone("081234567890"));
        assert!(is_valid_phone("+1 (555) 123-4567"));
        assert!(is_valid_phone("021-555-0199"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("not a phone"));
        assert!(!is_valid_phone("12345"));               // too short
        assert!(!is_valid_phone("1234567890123456"));    // too long
        assert!(!is_valid_phone("0812x3456789"));
    }
}
