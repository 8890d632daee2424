/// `"$64,250.00"` -> 64250.0, `"1.0842 - 1.0850"` -> 1.0842.
pub fn parse_display_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    leading_number(&cleaned)?
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
}

fn leading_number(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));
    let mut seen_digit = false;
    let mut seen_dot = false;

    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    seen_digit.then(|| &s[..end])
}

pub fn display_decimals(price: f64) -> usize {
    if price > 1000.0 {
        2
    } else if price > 10.0 {
        3
    } else {
        5
    }
}

pub fn format_price(price: f64) -> String {
    format!("{:.*}", display_decimals(price), price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decorated_prices() {
        assert_eq!(parse_display_price("$64,250.00"), Some(64250.0));
        assert_eq!(parse_display_price("1.0842"), Some(1.0842));
        assert_eq!(parse_display_price("approx 2,915.4 USD"), Some(2915.4));
        assert_eq!(parse_display_price("1.0842 - 1.0850"), Some(1.0842));
        assert_eq!(parse_display_price("-3.5"), Some(-3.5));
    }

    #[test]
    fn rejects_text_without_digits() {
        assert_eq!(parse_display_price(""), None);
        assert_eq!(parse_display_price("N/A"), None);
        assert_eq!(parse_display_price("market"), None);
        assert_eq!(parse_display_price("-"), None);
    }

    #[test]
    fn decimals_follow_price_magnitude() {
        assert_eq!(format_price(18_342.5), "18342.50");
        assert_eq!(format_price(78.1234), "78.123");
        assert_eq!(format_price(1.08421), "1.08421");
    }
}
