use serde::{Deserialize, Serialize};

/// Monetary breakdown the server computes for a receipt.
///
/// Amounts are in currency units unless noted; `points` and `cash_back` are
/// in loyalty points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PurchaseDetail {
    /// Most points the customer may redeem on this receipt.
    #[serde(deserialize_with = "super::null_as_default")]
    pub max_points: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub total: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub skip_loyalty_total: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub unredeemable_total: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub discount_amount: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub discount_percent: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub points: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub points_percent: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub net_discount: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub net_discount_percent: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub certificate_points: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub cash: f64,
    /// `cash` plus delivery.
    #[serde(deserialize_with = "super::null_as_default")]
    pub cash_total: f64,
    /// Points credited once the operation completes.
    #[serde(deserialize_with = "super::null_as_default")]
    pub cash_back: f64,
    pub extras: Option<PurchaseExtras>,
    /// Share of the receipt payable with points, in percent.
    #[serde(deserialize_with = "super::null_as_default")]
    pub max_scores_discount: f64,
}

/// Charges outside the loyalty program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurchaseExtras {
    #[serde(deserialize_with = "super::null_as_default")]
    pub delivery: f64,
}
