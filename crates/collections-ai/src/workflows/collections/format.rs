//! Display formatting for operator-facing text (pt-BR conventions).

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Round a monetary amount to cents, half away from zero.
pub fn round_cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Format an amount as Brazilian reais, e.g. `R$ 10.000,00`.
pub fn format_brl(amount: Decimal) -> String {
    let rounded = round_cents(amount);
    let digits = rounded.abs().to_string();
    let (integer, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}R$ {grouped},{cents}")
}

/// Format a timestamp's calendar date as `dd/MM/yyyy`.
pub fn format_date(moment: DateTime<Utc>) -> String {
    moment.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(format_brl(Decimal::new(1_000_000, 2)), "R$ 10.000,00");
        assert_eq!(format_brl(Decimal::new(123_456_789, 2)), "R$ 1.234.567,89");
        assert_eq!(format_brl(Decimal::new(999, 2)), "R$ 9,99");
        assert_eq!(format_brl(Decimal::ZERO), "R$ 0,00");
    }

    #[test]
    fn rounds_to_cents_half_away_from_zero() {
        assert_eq!(round_cents(Decimal::new(10_005, 3)), Decimal::new(1_001, 2));
        assert_eq!(format_brl(Decimal::new(7_500, 0)), "R$ 7.500,00");
    }

    #[test]
    fn formats_day_month_year() {
        let moment = Utc
            .with_ymd_and_hms(2026, 4, 3, 23, 15, 0)
            .single()
            .expect("valid timestamp");
        assert_eq!(format_date(moment), "03/04/2026");
    }
}
