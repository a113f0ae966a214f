use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{Branch, Cashier, CustomerShortInfo};
use super::customer::CustomerSelector;
use super::purchase::PurchaseDetail;

/// Server-side state of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionState {
    Normal,
    Canceled,
    /// Negates an earlier operation referenced by `Operation::origin`.
    Reversal,
}

/// A ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: i64,
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub action: Option<String>,
    pub state: ActionState,
    #[serde(default)]
    pub customer: Option<CustomerShortInfo>,
    #[serde(default)]
    pub cashier: Option<Cashier>,
    #[serde(default)]
    pub branch: Option<Branch>,
    /// Signed points delta: negative debits the customer, positive credits.
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub points: f64,
    #[serde(default)]
    pub receipt_number: Option<String>,
    #[serde(default)]
    pub origin: Option<Origin>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total: f64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub cash: f64,
}

impl Operation {
    /// Id of the operation this one reverses. `None` unless the state is
    /// `REVERSAL`, whatever the payload's `origin` says.
    pub fn reversal_of(&self) -> Option<i64> {
        match self.state {
            ActionState::Reversal => self.origin.as_ref().map(|o| o.id),
            _ => None,
        }
    }

    pub fn is_debit(&self) -> bool {
        self.points < 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    pub id: i64,
}

/// A page of the cursor-paginated operations list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationPage {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub rows: Vec<Operation>,
    /// Opaque token for the next page; pass it back verbatim.
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Cashier identified by the caller's own staff id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashierExternal {
    pub external_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Receipt totals declared when creating an operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub total: f64,
    pub cash: f64,
    /// Points the customer pays with.
    pub points: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_loyalty_total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unredeemable_total: Option<f64>,
}

/// Input of `create_operation`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOperationRequest {
    pub customer: CustomerSelector,
    /// Idempotency token. A random UUID is generated when `None` or empty.
    pub nonce: Option<String>,
    pub cashier: Option<CashierExternal>,
    pub receipt: Receipt,
    /// Company tag ids to assign to the customer; `None` leaves tags as is.
    pub tags: Option<Vec<i64>>,
}

impl CreateOperationRequest {
    pub fn new(customer: CustomerSelector, receipt: Receipt) -> Self {
        Self {
            customer,
            nonce: None,
            cashier: None,
            receipt,
            tags: None,
        }
    }

    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn with_cashier(mut self, cashier: CashierExternal) -> Self {
        self.cashier = Some(cashier);
        self
    }

    pub fn with_tags(mut self, tags: Vec<i64>) -> Self {
        self.tags = Some(tags);
        self
    }
}

/// Receipt of a dry-run calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalcReceipt {
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_loyalty_total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unredeemable_total: Option<f64>,
    /// Points to redeem; the server assumes the maximum when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,
}

/// Input of `calc_operation`.
#[derive(Debug, Clone, PartialEq)]
pub struct CalcOperationRequest {
    pub customer: CustomerSelector,
    pub receipt: CalcReceipt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcOperationResponse {
    pub user: CustomerShortInfo,
    pub purchase: PurchaseDetail,
}

/// Bulk credit (or debit, with negative points) of several customers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardRequest {
    pub points: f64,
    /// Shown to the customers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Company-scoped customer ids.
    pub participants: Vec<i64>,
    /// Suppress the push notification.
    #[serde(default)]
    pub silent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardResponse {
    /// Customers actually credited; blocked participants are skipped.
    pub accepted: u32,
}
