use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    #[sea_orm(string_value = "FIXED")]
    Fixed,
    #[sea_orm(string_value = "PERCENTAGE")]
    Percentage,
}

/// The parts of a promo code record that decide whether it can be redeemed.
#[derive(Debug, Clone, Copy)]
pub struct PromoTerms {
    pub is_active: bool,
    pub is_one_time_use: bool,
    pub is_used: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PromoRejection {
    #[error("Promo code is not active")]
    Inactive,
    #[error("Promo code has already been used")]
    AlreadyUsed,
    #[error("Promo code is not valid yet")]
    NotStarted,
    #[error("Promo code has expired")]
    Expired,
}

/// `at` is the moment the discount applies to: the requested delivery time,
/// or now for as-soon-as-possible orders.
pub fn check_promo(terms: &PromoTerms, at: DateTime<Utc>) -> Result<(), PromoRejection> {
    if !terms.is_active {
        return Err(PromoRejection::Inactive);
    }
    if terms.is_one_time_use && terms.is_used {
        return Err(PromoRejection::AlreadyUsed);
    }
    if terms.start_date.is_some_and(|start| at < start) {
        return Err(PromoRejection::NotStarted);
    }
    if terms.expires_at.is_some_and(|end| at > end) {
        return Err(PromoRejection::Expired);
    }
    Ok(())
}

pub fn apply_discount(total: i64, discount_type: DiscountType, value: i64) -> i64 {
    let discount = match discount_type {
        DiscountType::Fixed => value.max(0),
        DiscountType::Percentage => {
            let percent = i128::from(value.clamp(0, 100));
            i64::try_from(i128::from(total) * percent / 100).unwrap_or(i64::MAX)
        }
    };
    total.saturating_sub(discount).max(0)
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn terms() -> PromoTerms {
        PromoTerms {
            is_active: true,
            is_one_time_use: false,
            is_used: false,
            start_date: None,
            expires_at: None,
        }
    }

    #[test]
    fn open_code_is_accepted() {
        assert_eq!(check_promo(&terms(), Utc::now()), Ok(()));
    }

    #[test]
    fn used_one_time_code_is_always_rejected() {
        let now = Utc::now();
        let used = PromoTerms {
            is_one_time_use: true,
            is_used: true,
            start_date: Some(now - Duration::days(30)),
            expires_at: Some(now + Duration::days(30)),
            ..terms()
        };
        for offset in [-10, 0, 10] {
            let at = now + Duration::days(offset);
            assert_eq!(check_promo(&used, at), Err(PromoRejection::AlreadyUsed));
        }
    }

    #[test]
    fn used_flag_ignored_for_reusable_codes() {
        let reusable = PromoTerms {
            is_used: true,
            ..terms()
        };
        assert_eq!(check_promo(&reusable, Utc::now()), Ok(()));
    }

    #[test]
    fn date_window_uses_target_instant() {
        let now = Utc::now();
        let window = PromoTerms {
            start_date: Some(now + Duration::days(1)),
            expires_at: Some(now + Duration::days(2)),
            ..terms()
        };
        assert_eq!(check_promo(&window, now), Err(PromoRejection::NotStarted));
        assert_eq!(
            check_promo(&window, now + Duration::hours(36)),
            Ok(())
        );
        assert_eq!(
            check_promo(&window, now + Duration::days(3)),
            Err(PromoRejection::Expired)
        );
    }

    #[test]
    fn inactive_code_is_rejected() {
        let inactive = PromoTerms {
            is_active: false,
            ..terms()
        };
        assert_eq!(check_promo(&inactive, Utc::now()), Err(PromoRejection::Inactive));
    }

    #[test]
    fn discounts_never_go_below_zero() {
        assert_eq!(apply_discount(4000, DiscountType::Fixed, 500), 3500);
        assert_eq!(apply_discount(400, DiscountType::Fixed, 500), 0);
        assert_eq!(apply_discount(4000, DiscountType::Percentage, 10), 3600);
        assert_eq!(apply_discount(4000, DiscountType::Percentage, 150), 0);
    }

    #[test]
    fn percentage_of_huge_total_does_not_overflow() {
        let total = 9_000_000_000_000_000_000;
        assert_eq!(
            apply_discount(total, DiscountType::Percentage, 10),
            8_100_000_000_000_000_000
        );
        assert_eq!(apply_discount(i64::MAX, DiscountType::Percentage, 100), 0);
        assert_eq!(apply_discount(0, DiscountType::Fixed, i64::MAX), 0);
    }

    #[test]
    fn codes_are_trimmed_and_uppercased() {
        assert_eq!(normalize_code("  summer10 "), "SUMMER10");
    }
}
