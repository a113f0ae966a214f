//! `/goods-orders` endpoints.
//!
//! Replacing and appending items share `PUT /goods-orders/{id}`; the server
//! tells them apart by the item shape, so each gets its own request type.

use serde::Deserialize;

use crate::client::{UdsClient, UdsCore};
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::Transport;
use crate::types::{AddOrderItemsRequest, CompleteOrderResponse, GoodsOrder, UpdateOrderItemsRequest};

#[derive(Deserialize)]
struct OrderCode {
    code: String,
}

impl UdsCore {
    pub fn build_get_order(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("goods-orders/{id}"))
    }

    pub fn build_update_order_items(
        &self,
        id: i64,
        update: &UpdateOrderItemsRequest,
    ) -> Result<HttpRequest> {
        self.json_request(HttpMethod::Put, &format!("goods-orders/{id}"), update)
    }

    pub fn build_add_order_items(&self, id: i64, add: &AddOrderItemsRequest) -> Result<HttpRequest> {
        self.json_request(HttpMethod::Put, &format!("goods-orders/{id}"), add)
    }

    pub fn build_complete_order(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Post, &format!("goods-orders/{id}/complete"))
    }

    pub fn build_generate_order_code(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Post, &format!("goods-orders/{id}/code"))
    }
}

impl<T: Transport> UdsClient<T> {
    pub fn get_order(&self, id: i64) -> Result<GoodsOrder> {
        self.call(self.core().build_get_order(id))
    }

    /// Replace the order's items with `update.items`.
    pub fn update_order_items(&self, id: i64, update: &UpdateOrderItemsRequest) -> Result<GoodsOrder> {
        self.call(self.core().build_update_order_items(id, update)?)
    }

    /// Append `add.items` to the order.
    pub fn add_order_items(&self, id: i64, add: &AddOrderItemsRequest) -> Result<GoodsOrder> {
        self.call(self.core().build_add_order_items(id, add)?)
    }

    /// Move a `NEW` or `WAITING_PAYMENT` order to `COMPLETED`, creating an
    /// operation for it.
    pub fn complete_order(&self, id: i64) -> Result<CompleteOrderResponse> {
        self.call(self.core().build_complete_order(id))
    }

    /// Short-lived code the customer presents to pick the order up.
    pub fn generate_order_code(&self, id: i64) -> Result<String> {
        let code: OrderCode = self.call(self.core().build_generate_order_code(id))?;
        Ok(code.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::*;
    use crate::types::{
        DeliveryCase, DeliveryType, GoodsItemType, GoodsOrderState, Measurement, NewOrderItem,
        OrderItemUpdate, PaymentMethodType, PaymentProvider,
    };

    const ORDER: &str = r#"{
        "id": 501,
        "dateCreated": "2024-04-02T09:15:00Z",
        "comment": "Ring twice",
        "state": "WAITING_PAYMENT",
        "cash": 1200.0, "points": 0.0, "total": 1200.0, "certificatePoints": 0.0,
        "customer": {"id": 1001, "displayName": "Ivan Petrov", "uid": "c2a3e0a5"},
        "delivery": {
            "receiverName": "Ivan", "receiverPhone": "+79990000001",
            "branch": {"id": 1, "displayName": "Main"}, "type": "PICKUP"
        },
        "onlinePayment": {"paymentProvider": "CLOUD_PAYMENTS", "id": "pay-1", "completed": false},
        "paymentMethod": {"type": "MANUAL", "name": "Card on pickup"},
        "items": [
            {"id": 11, "externalId": "sku-coffee", "name": "Coffee", "sku": "CF-1",
             "type": "ITEM", "qty": 2, "price": 300.0, "measurement": "PIECE"},
            {"id": 12, "externalId": "sku-beans", "name": "Beans", "variantName": "Arabica",
             "type": "VARYING_ITEM", "qty": 0.6, "price": 1000.0, "measurement": "KILOGRAM"}
        ]
    }"#;

    #[test]
    fn order_paths() {
        let c = builder();
        assert_eq!(c.build_get_order(501).path, "http://localhost:3000/goods-orders/501");
        let complete = c.build_complete_order(501);
        assert_eq!(complete.method, HttpMethod::Post);
        assert_eq!(complete.path, "http://localhost:3000/goods-orders/501/complete");
        assert!(complete.body.is_none());
        assert_eq!(
            c.build_generate_order_code(501).path,
            "http://localhost:3000/goods-orders/501/code"
        );
    }

    #[test]
    fn update_and_add_share_put_with_distinct_item_shapes() {
        let update = UpdateOrderItemsRequest {
            delivery_case: Some(DeliveryCase {
                name: "Courier".to_string(),
                value: 150.0,
            }),
            items: vec![OrderItemUpdate {
                id: 11,
                variant_name: None,
                qty: 1.0,
            }],
        };
        let req = builder().build_update_order_items(501, &update).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/goods-orders/501");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "deliveryCase": {"name": "Courier", "value": 150.0},
                "items": [{"id": 11, "qty": 1.0}]
            })
        );

        let add = AddOrderItemsRequest {
            delivery_case: None,
            items: vec![NewOrderItem {
                external_id: "sku-cake".to_string(),
                name: "Cake".to_string(),
                variant_name: None,
                qty: 1.0,
                price: 250.0,
                skip_loyalty: true,
            }],
        };
        let req = builder().build_add_order_items(501, &add).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "items": [{"externalId": "sku-cake", "name": "Cake", "qty": 1.0, "price": 250.0, "skipLoyalty": true}]
            })
        );
    }

    #[test]
    fn get_order_parses_items_in_order() {
        let recorder = Recorder::new(ok(ORDER));
        let order = client(&recorder).get_order(501).unwrap();
        assert_eq!(order.state, GoodsOrderState::WaitingPayment);
        assert!(order.state.is_open());
        assert_eq!(order.delivery.as_ref().unwrap().delivery_type, DeliveryType::Pickup);
        assert_eq!(
            order.online_payment.as_ref().unwrap().payment_provider,
            PaymentProvider::CloudPayments
        );
        assert_eq!(order.payment_method.as_ref().unwrap().method_type, PaymentMethodType::Manual);
        let names: Vec<&str> = order.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Coffee", "Beans"]);
        assert_eq!(order.items[1].item_type, GoodsItemType::VaryingItem);
        assert_eq!(order.items[1].measurement, Some(Measurement::Kilogram));
        assert_eq!(order.items[1].qty, 0.6);
    }

    #[test]
    fn complete_order_returns_transaction() {
        let body = format!(r#"{{"transaction": {{"id": 9010}}, "order": {ORDER}}}"#);
        let recorder = Recorder::new(ok(&body));
        let done = client(&recorder).complete_order(501).unwrap();
        assert_eq!(done.transaction.id, 9010);
        assert_eq!(done.order.id, 501);
    }

    #[test]
    fn generate_order_code_unwraps_code() {
        let recorder = Recorder::new(ok(r#"{"code":"839201"}"#));
        let code = client(&recorder).generate_order_code(501).unwrap();
        assert_eq!(code, "839201");
        assert_eq!(recorder.last().method, HttpMethod::Post);
    }
}
