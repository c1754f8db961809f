//! Peso and table formatting helpers.

/// Chilean peso rendering: `$1.234.567`, sign in front.
pub fn clp(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::clp;

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(clp(0), "$0");
        assert_eq!(clp(950), "$950");
        assert_eq!(clp(1_500), "$1.500");
        assert_eq!(clp(1_234_567), "$1.234.567");
        assert_eq!(clp(-89_990), "-$89.990");
    }
}
