//! Number formatting for the CLI tables.

use rust_decimal::{Decimal, RoundingStrategy};

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Signed percentage with two decimals, e.g. `+8.00%` or `-3.50%`.
pub fn percent(value: Decimal) -> String {
    let rounded = round2(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        "+"
    };
    format!("{sign}{:.2}%", rounded.abs())
}

/// Dollar amount with thousands separators, e.g. `$1,234.56` or `-$80.00`.
pub fn currency(value: Decimal) -> String {
    let rounded = round2(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((&text, "00"));
    format!("{sign}${}.{fraction}", group_thousands(whole))
}

/// Win rate with one decimal, e.g. `53.3%`.
pub fn win_rate(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.1}%")
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn percentages_always_carry_a_sign() {
        assert_eq!(percent(dec!(8)), "+8.00%");
        assert_eq!(percent(dec!(-3.5)), "-3.50%");
        assert_eq!(percent(dec!(0)), "+0.00%");
        assert_eq!(percent(dec!(12.345)), "+12.35%");
        assert_eq!(percent(dec!(-0.001)), "+0.00%");
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(currency(dec!(1234.56)), "$1,234.56");
        assert_eq!(currency(dec!(-80)), "-$80.00");
        assert_eq!(currency(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(currency(dec!(999.999)), "$1,000.00");
        assert_eq!(currency(dec!(0)), "$0.00");
    }

    #[test]
    fn win_rates_use_one_decimal() {
        assert_eq!(win_rate(dec!(53.333)), "53.3%");
        assert_eq!(win_rate(dec!(100)), "100.0%");
        assert_eq!(win_rate(dec!(0)), "0.0%");
    }
}
