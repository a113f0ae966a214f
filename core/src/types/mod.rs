//! DTOs mirroring the loyalty API's JSON schema.
//!
//! # Design
//! Response types are immutable value objects; missing or `null` optional
//! fields deserialize to `None`, and missing or `null` amounts, flags and
//! lists to zero, `false` or empty, rather than failing the whole call. Request
//! types serialize absent optional fields by omitting them. The mock server
//! defines its own wire shapes independently, so integration tests catch
//! schema drift.

use serde::{Deserialize, Deserializer};

mod common;
mod customer;
mod goods_order;
mod operation;
mod purchase;
mod settings;

pub use common::{Branch, Cashier, CustomerShortInfo, Page, Tag};
pub use customer::{
    Customer, CustomerDetail, CustomerSelector, FindCustomerParams, FindCustomerResponse, Gender,
    Participant,
};
pub use goods_order::{
    AddOrderItemsRequest, CompleteOrderResponse, Delivery, DeliveryCase, DeliveryType,
    GoodsItemType, GoodsOrder, GoodsOrderItem, GoodsOrderState, Measurement, NewOrderItem,
    OnlinePayment, OrderItemUpdate, PaymentMethod, PaymentMethodType, PaymentProvider,
    TransactionRef, UpdateOrderItemsRequest,
};
pub use operation::{
    ActionState, CalcOperationRequest, CalcOperationResponse, CalcReceipt, CashierExternal,
    CreateOperationRequest, Operation, OperationPage, Origin, Receipt, RewardRequest,
    RewardResponse,
};
pub use purchase::{PurchaseDetail, PurchaseExtras};
pub use settings::{
    DiscountPolicy, LoyaltyProgramSettings, MembershipTier, Settings, TierConditions, TierTarget,
};

pub(crate) use customer::SelectorFields;

/// Decode `null` as `T::default()`. Pair with `#[serde(default)]` to cover a
/// missing field as well.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
