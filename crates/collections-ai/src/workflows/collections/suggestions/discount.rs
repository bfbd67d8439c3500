use rust_decimal::Decimal;

use crate::workflows::collections::format::round_cents;

/// Settlement discount bracket for a number of days overdue.
///
/// Cases 30 days overdue or less get no tier.
pub fn discount_tier(days_overdue: i64) -> Option<u32> {
    match days_overdue {
        days if days > 90 => Some(25),
        days if days > 60 => Some(20),
        days if days > 30 => Some(15),
        _ => None,
    }
}

/// `total_debt * (1 - percent / 100)` rounded to cents. Negative debt is treated as zero and
/// percentages above 100 are capped.
pub fn discounted_amount(total_debt: Decimal, percent: u32) -> Decimal {
    let debt = total_debt.max(Decimal::ZERO);
    let percent = Decimal::from(percent.min(100));
    let factor = Decimal::ONE - percent / Decimal::ONE_HUNDRED;
    round_cents(debt * factor)
}

/// Discount offer computed for a case. The amount stays numeric; formatting happens only
/// when text is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountOffer {
    pub percent: u32,
    pub original: Decimal,
    pub discounted: Decimal,
}

impl DiscountOffer {
    pub fn for_case(total_debt: Decimal, days_overdue: i64) -> Option<Self> {
        let percent = discount_tier(days_overdue)?;
        let original = round_cents(total_debt.max(Decimal::ZERO));
        Some(Self {
            percent,
            original,
            discounted: discounted_amount(original, percent),
        })
    }

    pub fn savings(&self) -> Decimal {
        self.original - self.discounted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_overdue_brackets() {
        assert_eq!(discount_tier(95), Some(25));
        assert_eq!(discount_tier(91), Some(25));
        assert_eq!(discount_tier(90), Some(20));
        assert_eq!(discount_tier(75), Some(20));
        assert_eq!(discount_tier(61), Some(20));
        assert_eq!(discount_tier(60), Some(15));
        assert_eq!(discount_tier(45), Some(15));
        assert_eq!(discount_tier(31), Some(15));
        assert_eq!(discount_tier(30), None);
        assert_eq!(discount_tier(20), None);
        assert_eq!(discount_tier(-5), None);
    }

    #[test]
    fn tiers_are_monotonic() {
        let tier = |days| discount_tier(days).unwrap_or(0);
        assert!(tier(95) > tier(75));
        assert!(tier(75) > tier(45));
    }

    #[test]
    fn discounted_amount_rounds_to_cents() {
        assert_eq!(
            discounted_amount(Decimal::new(1_000_000, 2), 25),
            Decimal::new(750_000, 2)
        );
        assert_eq!(
            discounted_amount(Decimal::new(33_333, 2), 15),
            Decimal::new(28_333, 2)
        );
        assert_eq!(discounted_amount(Decimal::new(-500, 0), 20), Decimal::ZERO);
    }

    #[test]
    fn offer_keeps_numeric_amounts() {
        let offer = DiscountOffer::for_case(Decimal::new(1_000_000, 2), 95).expect("tier applies");
        assert_eq!(offer.percent, 25);
        assert_eq!(offer.discounted, Decimal::new(750_000, 2));
        assert_eq!(offer.savings(), Decimal::new(250_000, 2));
        assert!(DiscountOffer::for_case(Decimal::new(1_000_000, 2), 30).is_none());
    }
}
