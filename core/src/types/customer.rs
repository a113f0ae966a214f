use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::Tag;
use super::purchase::PurchaseDetail;
use super::settings::MembershipTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    NotSpecified,
}

/// A customer as seen from the company's customer list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Platform-wide identifier, stable across companies.
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub phone: Option<String>,
    /// `YYYY-MM-DD`, as entered by the customer.
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Traffic source the customer joined through.
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default)]
    pub participant: Option<Participant>,
}

/// `Customer` plus the tags assigned to it.
///
/// Tags form a set keyed by id: equality ignores their order and names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetail {
    #[serde(flatten)]
    pub customer: Customer,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub tags: Vec<Tag>,
}

impl CustomerDetail {
    pub fn has_tag(&self, tag_id: i64) -> bool {
        self.tags.iter().any(|t| t.id == tag_id)
    }

    pub fn tag_ids(&self) -> BTreeSet<i64> {
        self.tags.iter().map(|t| t.id).collect()
    }
}

impl PartialEq for CustomerDetail {
    fn eq(&self, other: &Self) -> bool {
        self.customer == other.customer && self.tag_ids() == other.tag_ids()
    }
}

/// The customer's membership in this company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Company-scoped id used by `get_customer` and friends.
    pub id: i64,
    #[serde(default)]
    pub inviter_id: Option<i64>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub points: f64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub discount_rate: f64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub cashback_rate: f64,
    #[serde(default)]
    pub membership_tier: Option<MembershipTier>,
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_transaction_time: Option<DateTime<Utc>>,
}

/// Response of `GET /customers/find`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindCustomerResponse {
    pub user: CustomerDetail,
    /// New long-lived payment code, present when `exchange_code` was requested.
    #[serde(default)]
    pub code: Option<String>,
    /// Pre-computed breakdown, present when receipt hints were supplied.
    #[serde(default)]
    pub purchase: Option<PurchaseDetail>,
}

/// Identifies a customer by exactly one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerSelector {
    /// Short-lived payment code shown in the customer's app.
    Code(String),
    /// Phone number in `+79998887766` form.
    Phone(String),
    Uid(String),
}

impl CustomerSelector {
    pub fn code(code: impl Into<String>) -> Self {
        CustomerSelector::Code(code.into())
    }

    pub fn phone(phone: impl Into<String>) -> Self {
        CustomerSelector::Phone(phone.into())
    }

    pub fn uid(uid: impl Into<String>) -> Self {
        CustomerSelector::Uid(uid.into())
    }

    /// Query parameter used by `GET /customers/find`.
    pub(crate) fn query_pair(&self) -> (&'static str, &str) {
        match self {
            CustomerSelector::Code(code) => ("code", code),
            CustomerSelector::Phone(phone) => ("phone", phone),
            CustomerSelector::Uid(uid) => ("uid", uid),
        }
    }

    /// Body fields used by operation requests: `code` at the top level,
    /// uid and phone nested under `participant`.
    pub(crate) fn fields(&self) -> SelectorFields<'_> {
        match self {
            CustomerSelector::Code(code) => SelectorFields {
                code: Some(code),
                participant: None,
            },
            CustomerSelector::Phone(phone) => SelectorFields {
                code: None,
                participant: Some(ParticipantRef {
                    uid: None,
                    phone: Some(phone),
                }),
            },
            CustomerSelector::Uid(uid) => SelectorFields {
                code: None,
                participant: Some(ParticipantRef {
                    uid: Some(uid),
                    phone: None,
                }),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SelectorFields<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    participant: Option<ParticipantRef<'a>>,
}

#[derive(Debug, Serialize)]
struct ParticipantRef<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    uid: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
}

/// Optional hints for `find_customer`.
///
/// Amounts are sent only when positive; `exchange_code` only when set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindCustomerParams {
    /// Ask the server for a new long-lived payment code.
    pub exchange_code: bool,
    /// Receipt total, in currency units.
    pub total: Option<f64>,
    /// Part of the total that earns no cashback and gets no discount.
    pub skip_loyalty_total: Option<f64>,
    /// Part of the total that cannot be paid with points.
    pub unredeemable_total: Option<f64>,
}

impl FindCustomerParams {
    pub fn with_exchange_code(mut self) -> Self {
        self.exchange_code = true;
        self
    }

    pub fn with_total(mut self, total: f64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn with_skip_loyalty_total(mut self, amount: f64) -> Self {
        self.skip_loyalty_total = Some(amount);
        self
    }

    pub fn with_unredeemable_total(mut self, amount: f64) -> Self {
        self.unredeemable_total = Some(amount);
        self
    }
}
