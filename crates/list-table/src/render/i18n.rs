//! Number and count formatting for user-facing strings.

/// Formats an integer with `,` thousands separators.
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `"1 item"` / `"N items"`.
pub fn items_label(n: u64) -> String {
    if n == 1 {
        "1 item".to_string()
    } else {
        format!("{} items", format_number(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn pluralizes_items() {
        assert_eq!(items_label(0), "0 items");
        assert_eq!(items_label(1), "1 item");
        assert_eq!(items_label(47), "47 items");
        assert_eq!(items_label(12000), "12,000 items");
    }
}
