use serde::{Deserialize, Serialize};

/// How the company rewards purchases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountPolicy {
    /// Lower the receipt total.
    ApplyDiscount,
    /// Credit cashback points; requires `total == cash + points`.
    ChargeScores,
}

/// Company-wide configuration returned by `GET /settings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub promo_code: Option<String>,
    /// ISO-4217 code.
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub base_discount_policy: Option<DiscountPolicy>,
    #[serde(default)]
    pub loyalty_program_settings: Option<LoyaltyProgramSettings>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub purchase_by_phone: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub write_invoice: bool,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoyaltyProgramSettings {
    pub base_membership_tier: Option<MembershipTier>,
    /// Tiers in the order the company configured them.
    #[serde(deserialize_with = "super::null_as_default")]
    pub membership_tiers: Vec<MembershipTier>,
    /// Cashback percent for referral levels 1, 2 and 3, in that order.
    #[serde(deserialize_with = "super::null_as_default")]
    pub referral_cashback_rates: Vec<f64>,
    pub cashier_award: Option<f64>,
    pub referral_reward: Option<f64>,
    /// Largest receipt accepted through the cashier app.
    pub receipt_limit: Option<f64>,
    pub defer_points_for_days: Option<u32>,
    pub first_purchase_points: Option<f64>,
}

impl LoyaltyProgramSettings {
    /// Cashback rate for a referral level, counted from 1.
    pub fn referral_rate(&self, level: usize) -> Option<f64> {
        level
            .checked_sub(1)
            .and_then(|i| self.referral_cashback_rates.get(i))
            .copied()
    }
}

/// A membership tier and the conditions that promote a customer into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MembershipTier {
    pub uid: Option<String>,
    pub name: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub rate: f64,
    /// Share of a receipt payable with points, in percent.
    pub max_scores_discount: Option<f64>,
    pub conditions: Option<TierConditions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TierConditions {
    /// Cumulative spend that promotes a customer.
    pub total_cash_spent: Option<TierTarget<f64>>,
    /// Number of effective referrals that promotes a customer.
    pub effective_invited_count: Option<TierTarget<u32>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TierTarget<T> {
    pub target: T,
}
