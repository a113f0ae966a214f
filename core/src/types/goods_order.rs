use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{Branch, CustomerShortInfo};
use super::purchase::PurchaseDetail;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoodsOrderState {
    New,
    Completed,
    Deleted,
    WaitingPayment,
}

impl GoodsOrderState {
    /// Whether `complete_order` may still be called.
    pub fn is_open(&self) -> bool {
        matches!(self, GoodsOrderState::New | GoodsOrderState::WaitingPayment)
    }
}

/// A goods order placed through the customer app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodsOrder {
    pub id: i64,
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comment: Option<String>,
    pub state: GoodsOrderState,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub cash: f64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub points: f64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total: f64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub certificate_points: f64,
    #[serde(default)]
    pub customer: Option<CustomerShortInfo>,
    #[serde(default)]
    pub delivery: Option<Delivery>,
    #[serde(default)]
    pub online_payment: Option<OnlinePayment>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// Items in the order the customer added them.
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub items: Vec<GoodsOrderItem>,
    #[serde(default)]
    pub purchase: Option<PurchaseDetail>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryType {
    Pickup,
    Delivery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    #[serde(default)]
    pub receiver_name: Option<String>,
    #[serde(default)]
    pub receiver_phone: Option<String>,
    #[serde(default)]
    pub user_comment: Option<String>,
    #[serde(default)]
    pub branch: Option<Branch>,
    #[serde(rename = "type")]
    pub delivery_type: DeliveryType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentProvider {
    B2p,
    CloudPayments,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlinePayment {
    pub payment_provider: PaymentProvider,
    /// Payment id in the provider's system.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethodType {
    BestToPay,
    CloudPayments,
    Cash,
    Manual,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    #[serde(rename = "type")]
    pub method_type: PaymentMethodType,
    /// Name of a `MANUAL` method.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoodsItemType {
    Item,
    VaryingItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Measurement {
    Piece,
    Centimetre,
    Metre,
    Millilitre,
    Litre,
    Gram,
    Kilogram,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodsOrderItem {
    pub id: i64,
    #[serde(default)]
    pub external_id: Option<String>,
    pub name: String,
    /// Variant label of a `VARYING_ITEM`.
    #[serde(default)]
    pub variant_name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(rename = "type")]
    pub item_type: GoodsItemType,
    pub qty: f64,
    pub price: f64,
    #[serde(default)]
    pub measurement: Option<Measurement>,
}

/// Delivery line attached to an order update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryCase {
    pub name: String,
    pub value: f64,
}

/// Quantity change for an item already in the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemUpdate {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,
    pub qty: f64,
}

/// An item not yet in the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub external_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,
    pub qty: f64,
    pub price: f64,
    /// Exclude the item from the loyalty program.
    #[serde(default)]
    pub skip_loyalty: bool,
}

/// Replaces the order's item list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderItemsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_case: Option<DeliveryCase>,
    pub items: Vec<OrderItemUpdate>,
}

/// Appends items to the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOrderItemsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_case: Option<DeliveryCase>,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRef {
    pub id: i64,
}

/// Response of `POST /goods-orders/{id}/complete`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteOrderResponse {
    /// The operation created for the order.
    pub transaction: TransactionRef,
    pub order: GoodsOrder,
}
