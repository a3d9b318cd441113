/// Leading decimal integer of `s`, read the way JavaScript's `parseInt(s, 10)`
/// reads it: leading whitespace, an optional sign, then digits up to the first
/// non-digit. `None` when there are no digits or the value overflows.
pub(crate) fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    let value: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_leading_integer() {
        assert_eq!(parse_int_prefix("2"), Some(2));
        assert_eq!(parse_int_prefix("  12"), Some(12));
        assert_eq!(parse_int_prefix("1.5"), Some(1));
        assert_eq!(parse_int_prefix("2abc"), Some(2));
        assert_eq!(parse_int_prefix("-1"), Some(-1));
        assert_eq!(parse_int_prefix("+3"), Some(3));
    }

    #[test]
    fn rejects_values_without_digits() {
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix(".5"), None);
        assert_eq!(parse_int_prefix("99999999999999999999999"), None);
    }
}
