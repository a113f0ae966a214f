//! In-memory company data and the server-side rules the client relies on.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiFailure;

const CREATED_AT: &str = "2024-03-01T12:00:00Z";
const MAX_PAGE: usize = 50;
const MAX_OFFSET: usize = 10_000;
const DEFAULT_PAGE: usize = 10;
const EPSILON: f64 = 0.005;

#[derive(Debug, Clone)]
pub struct MockCustomer {
    pub id: i64,
    pub uid: String,
    pub code: String,
    pub phone: String,
    pub display_name: String,
    pub points: f64,
    pub cashback_rate: f64,
    pub tags: Vec<i64>,
    pub blocked: bool,
}

#[derive(Debug, Clone)]
pub struct MockOperation {
    pub id: i64,
    pub state: &'static str,
    pub customer_id: i64,
    pub points: f64,
    pub total: f64,
    pub cash: f64,
    pub receipt_number: Option<String>,
    pub origin: Option<i64>,
    pub refunded: f64,
}

#[derive(Debug, Clone)]
pub struct MockOrderItem {
    pub id: i64,
    pub external_id: String,
    pub name: String,
    pub variant_name: Option<String>,
    pub qty: f64,
    pub price: f64,
}

#[derive(Debug, Clone)]
pub struct MockOrder {
    pub id: i64,
    pub customer_id: i64,
    pub state: &'static str,
    pub items: Vec<MockOrderItem>,
    pub delivery: Option<(String, f64)>,
}

impl MockOrder {
    fn is_open(&self) -> bool {
        matches!(self.state, "NEW" | "WAITING_PAYMENT")
    }

    fn total(&self) -> f64 {
        let items: f64 = self.items.iter().map(|i| i.qty * i.price).sum();
        items + self.delivery.as_ref().map_or(0.0, |(_, value)| *value)
    }
}

/// Customer reference inside operation bodies.
#[derive(Debug, Default, Deserialize)]
pub struct ParticipantRef {
    pub uid: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptBody {
    pub total: f64,
    #[serde(default)]
    pub cash: f64,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub skip_loyalty_total: Option<f64>,
    #[serde(default)]
    pub unredeemable_total: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOperationBody {
    pub code: Option<String>,
    pub participant: Option<ParticipantRef>,
    pub nonce: Option<String>,
    pub receipt: ReceiptBody,
    pub tags: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
pub struct CalcOperationBody {
    pub code: Option<String>,
    pub participant: Option<ParticipantRef>,
    pub receipt: ReceiptBody,
}

#[derive(Debug, Deserialize)]
pub struct RewardBody {
    pub points: f64,
    #[serde(default)]
    pub participants: Vec<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderBody {
    pub delivery_case: Option<DeliveryCaseBody>,
    pub items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct DeliveryCaseBody {
    pub name: String,
    pub value: f64,
}

/// Which key resolved a customer; uid and phone may not withdraw points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Via {
    Code,
    Uid,
    Phone,
}

pub struct Store {
    pub customers: Vec<MockCustomer>,
    pub tags: Vec<(i64, String)>,
    pub operations: Vec<MockOperation>,
    pub orders: Vec<MockOrder>,
    pub purchase_by_phone: bool,
    pub max_scores_discount: f64,
    nonces: HashMap<String, i64>,
    next_operation_id: i64,
    next_item_id: i64,
}

impl Default for Store {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Store {
    /// Three customers (one blocked), three tags, one open order.
    pub fn seeded() -> Self {
        let customers = vec![
            MockCustomer {
                id: 1001,
                uid: "c2a3e0a5-7a4f-4d7e-9a51-000000001001".to_string(),
                code: "456123".to_string(),
                phone: "+79990000001".to_string(),
                display_name: "Ivan Petrov".to_string(),
                points: 500.0,
                cashback_rate: 5.0,
                tags: vec![1],
                blocked: false,
            },
            MockCustomer {
                id: 1002,
                uid: "c2a3e0a5-7a4f-4d7e-9a51-000000001002".to_string(),
                code: "654321".to_string(),
                phone: "+79990000002".to_string(),
                display_name: "Anna Smirnova".to_string(),
                points: 40.0,
                cashback_rate: 5.0,
                tags: Vec::new(),
                blocked: false,
            },
            MockCustomer {
                id: 1003,
                uid: "c2a3e0a5-7a4f-4d7e-9a51-000000001003".to_string(),
                code: "000000".to_string(),
                phone: "+79990000003".to_string(),
                display_name: "Blocked Customer".to_string(),
                points: 100.0,
                cashback_rate: 5.0,
                tags: Vec::new(),
                blocked: true,
            },
        ];
        let orders = vec![MockOrder {
            id: 501,
            customer_id: 1001,
            state: "NEW",
            items: vec![
                MockOrderItem {
                    id: 11,
                    external_id: "sku-coffee".to_string(),
                    name: "Coffee".to_string(),
                    variant_name: None,
                    qty: 2.0,
                    price: 300.0,
                },
                MockOrderItem {
                    id: 12,
                    external_id: "sku-beans".to_string(),
                    name: "Beans".to_string(),
                    variant_name: Some("Arabica".to_string()),
                    qty: 1.0,
                    price: 600.0,
                },
            ],
            delivery: None,
        }];
        Self {
            customers,
            tags: vec![
                (1, "VIP".to_string()),
                (2, "Newsletter".to_string()),
                (3, "Wholesale".to_string()),
            ],
            operations: Vec::new(),
            orders,
            purchase_by_phone: true,
            max_scores_discount: 50.0,
            nonces: HashMap::new(),
            next_operation_id: 9001,
            next_item_id: 100,
        }
    }

    // ---------------------------------------------------------------------
    // Customers
    // ---------------------------------------------------------------------

    pub fn list_customers(&self, query: &HashMap<String, String>) -> Result<Value, ApiFailure> {
        let max = parse_usize(query, "max")?.unwrap_or(DEFAULT_PAGE);
        if max == 0 || max > MAX_PAGE {
            return Err(ApiFailure::invalid_field("max", json!(max), "must be between 1 and 50"));
        }
        let offset = parse_usize(query, "offset")?.unwrap_or(0);
        if offset > MAX_OFFSET {
            return Err(ApiFailure::invalid_field(
                "offset",
                json!(offset),
                "must not exceed 10000",
            ));
        }
        let rows: Vec<Value> = self
            .customers
            .iter()
            .skip(offset)
            .take(max)
            .map(|c| self.customer_json(c))
            .collect();
        Ok(json!({"rows": rows, "total": self.customers.len()}))
    }

    pub fn find_customer(&mut self, query: &HashMap<String, String>) -> Result<Value, ApiFailure> {
        let (index, _) = self.resolve(
            query.get("code").map(String::as_str),
            query.get("uid").map(String::as_str),
            query.get("phone").map(String::as_str),
        )?;
        let total = parse_amount(query, "total")?;
        let skip = parse_amount(query, "skipLoyaltyTotal")?.unwrap_or(0.0);
        let unredeemable = parse_amount(query, "unredeemableTotal")?.unwrap_or(0.0);
        let exchange = query.get("exchangeCode").is_some_and(|v| v == "true");

        let mut response = json!({"user": self.customer_detail_json(&self.customers[index])});
        if exchange {
            let code = long_lived_code();
            self.customers[index].code = code.clone();
            response["code"] = json!(code);
        }
        if let Some(total) = total {
            response["purchase"] =
                self.purchase_json(&self.customers[index], total, skip, unredeemable, None);
        }
        Ok(response)
    }

    pub fn get_customer(&self, id: i64) -> Result<Value, ApiFailure> {
        let customer = self.customer(id)?;
        Ok(self.customer_detail_json(customer))
    }

    pub fn customer_tags(&self, id: i64) -> Result<Value, ApiFailure> {
        let customer = self.customer(id)?;
        Ok(self.tag_page(&customer.tags))
    }

    pub fn set_customer_tags(&mut self, id: i64, ids: Vec<i64>) -> Result<Value, ApiFailure> {
        self.check_tags(&ids)?;
        let index = self.customer_index(id)?;
        self.customers[index].tags = ids;
        Ok(self.tag_page(&self.customers[index].tags))
    }

    // ---------------------------------------------------------------------
    // Operations
    // ---------------------------------------------------------------------

    pub fn list_operations(&self, query: &HashMap<String, String>) -> Result<Value, ApiFailure> {
        let max = parse_usize(query, "max")?.unwrap_or(DEFAULT_PAGE);
        if max == 0 || max > MAX_PAGE {
            return Err(ApiFailure::invalid_field("max", json!(max), "must be between 1 and 50"));
        }
        let after = match query.get("cursor") {
            None => i64::MIN,
            Some(cursor) => cursor
                .strip_prefix("op-")
                .and_then(|id| id.parse().ok())
                .ok_or_else(|| ApiFailure::invalid_field("cursor", json!(cursor), "unknown cursor"))?,
        };
        let remaining: Vec<&MockOperation> =
            self.operations.iter().filter(|op| op.id > after).collect();
        let page: Vec<&MockOperation> = remaining.iter().take(max).copied().collect();
        let cursor = match page.last() {
            Some(last) if remaining.len() > page.len() => json!(format!("op-{}", last.id)),
            _ => Value::Null,
        };
        let rows: Vec<Value> = page.iter().map(|op| self.operation_json(op)).collect();
        Ok(json!({"rows": rows, "cursor": cursor}))
    }

    pub fn create_operation(&mut self, body: CreateOperationBody) -> Result<Value, ApiFailure> {
        if let Some(existing) = body.nonce.as_ref().and_then(|n| self.nonces.get(n)) {
            return self.get_operation(*existing);
        }
        let participant = body.participant.unwrap_or_default();
        let (index, via) = self.resolve(
            body.code.as_deref(),
            participant.uid.as_deref(),
            participant.phone.as_deref(),
        )?;
        if via == Via::Phone && !self.purchase_by_phone {
            return Err(ApiFailure::rejected(
                "purchaseByPhoneDisabled",
                "Purchases by phone are disabled",
            ));
        }

        let receipt = body.receipt;
        let points = receipt.points.unwrap_or(0.0);
        let skip = receipt.skip_loyalty_total.unwrap_or(0.0);
        let customer = &self.customers[index];
        if customer.blocked {
            return Err(ApiFailure::rejected("participantIsBlocked", "Customer is blocked"));
        }
        if via != Via::Code && points != 0.0 {
            return Err(ApiFailure::rejected(
                "withdrawNotPermitted",
                "Points can only be withdrawn with a payment code",
            ));
        }
        if (receipt.total - receipt.cash - points).abs() > EPSILON {
            return Err(ApiFailure::rejected(
                "invalidChecksum",
                "total must equal cash + points",
            ));
        }
        if points > customer.points + EPSILON {
            return Err(ApiFailure::rejected("insufficientFunds", "Not enough points"));
        }
        if receipt.total > 0.0 && points / receipt.total * 100.0 > self.max_scores_discount + EPSILON {
            return Err(ApiFailure::rejected(
                "discountLimitExceed",
                "Points exceed the share of the receipt payable with points",
            ));
        }
        if let Some(tags) = &body.tags {
            self.check_tags(tags)?;
        }

        let cash_back = round2((receipt.cash - skip).max(0.0) * customer.cashback_rate / 100.0);
        let delta = cash_back - points;
        let customer_id = customer.id;
        let customer = &mut self.customers[index];
        customer.points = round2(customer.points + delta);
        if let Some(tags) = body.tags {
            customer.tags = tags;
        }

        let id = self.push_operation(MockOperation {
            id: 0,
            state: "NORMAL",
            customer_id,
            points: delta,
            total: receipt.total,
            cash: receipt.cash,
            receipt_number: receipt.number,
            origin: None,
            refunded: 0.0,
        });
        if let Some(nonce) = body.nonce {
            self.nonces.insert(nonce, id);
        }
        self.get_operation(id)
    }

    pub fn get_operation(&self, id: i64) -> Result<Value, ApiFailure> {
        let op = self
            .operations
            .iter()
            .find(|op| op.id == id)
            .ok_or_else(|| ApiFailure::not_found(format!("Operation {id} not found")))?;
        Ok(self.operation_json(op))
    }

    pub fn refund_operation(&mut self, id: i64, partial: Option<f64>) -> Result<Value, ApiFailure> {
        let index = self
            .operations
            .iter()
            .position(|op| op.id == id)
            .ok_or_else(|| ApiFailure::not_found(format!("Operation {id} not found")))?;
        let original = self.operations[index].clone();
        if original.state != "NORMAL" {
            return Err(ApiFailure::rejected(
                "badRequest",
                format!("Operation {id} is {}", original.state),
            ));
        }
        let remaining = original.total - original.refunded;
        let amount = partial.unwrap_or(remaining);
        if amount <= 0.0 || amount > remaining + EPSILON {
            return Err(ApiFailure::invalid_field(
                "partialAmount",
                json!(amount),
                format!("must be between 0 and {remaining}"),
            ));
        }

        let ratio = if original.total > 0.0 { amount / original.total } else { 1.0 };
        let points = round2(-original.points * ratio);
        if let Ok(ci) = self.customer_index(original.customer_id) {
            self.customers[ci].points = round2(self.customers[ci].points + points);
        }
        let refunded = original.refunded + amount;
        let op = &mut self.operations[index];
        op.refunded = refunded;
        if (original.total - refunded).abs() <= EPSILON {
            op.state = "CANCELED";
        }

        let reversal = self.push_operation(MockOperation {
            id: 0,
            state: "REVERSAL",
            customer_id: original.customer_id,
            points,
            total: -amount,
            cash: round2(-original.cash * ratio),
            receipt_number: original.receipt_number,
            origin: Some(id),
            refunded: 0.0,
        });
        self.get_operation(reversal)
    }

    pub fn calc_operation(&self, body: CalcOperationBody) -> Result<Value, ApiFailure> {
        let participant = body.participant.unwrap_or_default();
        let (index, _) = self.resolve(
            body.code.as_deref(),
            participant.uid.as_deref(),
            participant.phone.as_deref(),
        )?;
        let customer = &self.customers[index];
        let receipt = body.receipt;
        Ok(json!({
            "user": self.short_info(customer),
            "purchase": self.purchase_json(
                customer,
                receipt.total,
                receipt.skip_loyalty_total.unwrap_or(0.0),
                receipt.unredeemable_total.unwrap_or(0.0),
                receipt.points,
            ),
        }))
    }

    pub fn reward(&mut self, body: RewardBody) -> Result<Value, ApiFailure> {
        if body.points == 0.0 {
            return Err(ApiFailure::invalid_field("points", json!(0.0), "must not be zero"));
        }
        if body.participants.is_empty() {
            return Err(ApiFailure::invalid_field("participants", json!([]), "must not be empty"));
        }
        let mut accepted = 0;
        for customer in &mut self.customers {
            if body.participants.contains(&customer.id) && !customer.blocked {
                customer.points = round2(customer.points + body.points);
                accepted += 1;
            }
        }
        Ok(json!({"accepted": accepted}))
    }

    // ---------------------------------------------------------------------
    // Goods orders
    // ---------------------------------------------------------------------

    pub fn get_order(&self, id: i64) -> Result<Value, ApiFailure> {
        let order = self
            .orders
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| ApiFailure::not_found(format!("Order {id} not found")))?;
        Ok(self.order_json(order))
    }

    /// Items carrying `externalId` are appended; items carrying only `id`
    /// replace the item list.
    pub fn update_order(&mut self, id: i64, body: UpdateOrderBody) -> Result<Value, ApiFailure> {
        let index = self.order_index(id)?;
        if !self.orders[index].is_open() {
            return Err(ApiFailure::rejected(
                "badRequest",
                format!("Order {id} is {}", self.orders[index].state),
            ));
        }
        let appending = body.items.iter().all(|i| i.get("externalId").is_some());
        let items = if appending {
            let mut items = self.orders[index].items.clone();
            for raw in body.items {
                let item = parse_new_item(raw)?;
                self.next_item_id += 1;
                items.push(MockOrderItem {
                    id: self.next_item_id,
                    ..item
                });
            }
            items
        } else {
            let existing = &self.orders[index].items;
            let mut items = Vec::with_capacity(body.items.len());
            for raw in body.items {
                let update = parse_item_update(raw)?;
                let current = existing.iter().find(|i| i.id == update.0).ok_or_else(|| {
                    ApiFailure::invalid_field("items.id", json!(update.0), "not in this order")
                })?;
                items.push(MockOrderItem {
                    qty: update.1,
                    ..current.clone()
                });
            }
            items
        };

        let order = &mut self.orders[index];
        order.items = items;
        if let Some(case) = body.delivery_case {
            order.delivery = Some((case.name, case.value));
        }
        Ok(self.order_json(&self.orders[index]))
    }

    pub fn complete_order(&mut self, id: i64) -> Result<Value, ApiFailure> {
        let index = self.order_index(id)?;
        let order = &self.orders[index];
        if !order.is_open() {
            return Err(ApiFailure::rejected(
                "badRequest",
                format!("Order {id} is {}", order.state),
            ));
        }
        let total = order.total();
        let customer_id = order.customer_id;
        let cash_back = self
            .customer(customer_id)
            .map(|c| round2(total * c.cashback_rate / 100.0))
            .unwrap_or(0.0);
        if let Ok(ci) = self.customer_index(customer_id) {
            self.customers[ci].points = round2(self.customers[ci].points + cash_back);
        }
        let transaction = self.push_operation(MockOperation {
            id: 0,
            state: "NORMAL",
            customer_id,
            points: cash_back,
            total,
            cash: total,
            receipt_number: Some(format!("order-{id}")),
            origin: None,
            refunded: 0.0,
        });
        self.orders[index].state = "COMPLETED";
        Ok(json!({
            "transaction": {"id": transaction},
            "order": self.order_json(&self.orders[index]),
        }))
    }

    pub fn order_code(&self, id: i64) -> Result<Value, ApiFailure> {
        let order = &self.orders[self.order_index(id)?];
        if !order.is_open() {
            return Err(ApiFailure::rejected(
                "badRequest",
                format!("Order {id} is {}", order.state),
            ));
        }
        Ok(json!({"code": long_lived_code()}))
    }

    // ---------------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------------

    pub fn settings(&self) -> Value {
        json!({
            "id": 549755813888_i64,
            "name": "Coffee House",
            "promoCode": "coffeehouse",
            "currency": "RUB",
            "baseDiscountPolicy": "CHARGE_SCORES",
            "purchaseByPhone": self.purchase_by_phone,
            "writeInvoice": false,
            "slug": "coffee-house",
            "loyaltyProgramSettings": {
                "baseMembershipTier": base_tier(self.max_scores_discount),
                "membershipTiers": [
                    {
                        "uid": "silver", "name": "Silver", "rate": 7.0,
                        "maxScoresDiscount": self.max_scores_discount,
                        "conditions": {"totalCashSpent": {"target": 10000.0}}
                    },
                    {
                        "uid": "gold", "name": "Gold", "rate": 10.0,
                        "maxScoresDiscount": self.max_scores_discount,
                        "conditions": {
                            "totalCashSpent": {"target": 50000.0},
                            "effectiveInvitedCount": {"target": 5}
                        }
                    }
                ],
                "referralCashbackRates": [5.0, 3.0, 1.0],
                "cashierAward": 1.0,
                "referralReward": 100.0,
                "receiptLimit": 100000.0,
                "deferPointsForDays": 14,
                "firstPurchasePoints": 50.0
            }
        })
    }

    // ---------------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------------

    fn resolve(
        &self,
        code: Option<&str>,
        uid: Option<&str>,
        phone: Option<&str>,
    ) -> Result<(usize, Via), ApiFailure> {
        let selectors: Vec<(Via, &str)> = [(Via::Code, code), (Via::Uid, uid), (Via::Phone, phone)]
            .into_iter()
            .filter_map(|(via, value)| value.map(|v| (via, v)))
            .collect();
        let (via, value) = match selectors.as_slice() {
            [single] => *single,
            [] => {
                return Err(ApiFailure::invalid_field(
                    "code",
                    Value::Null,
                    "one of code, uid or phone is required",
                ))
            }
            _ => {
                return Err(selectors.iter().fold(
                    ApiFailure::new(
                        axum::http::StatusCode::BAD_REQUEST,
                        "badRequest",
                        "Exactly one customer selector is allowed",
                    ),
                    |failure, (via, value)| {
                        failure.and_field(via.field(), json!(value), "conflicting selector")
                    },
                ))
            }
        };
        self.customers
            .iter()
            .position(|c| match via {
                Via::Code => c.code == value,
                Via::Uid => c.uid == value,
                Via::Phone => c.phone == value,
            })
            .map(|index| (index, via))
            .ok_or_else(|| ApiFailure::not_found("Customer not found"))
    }

    fn customer(&self, id: i64) -> Result<&MockCustomer, ApiFailure> {
        self.customer_index(id).map(|i| &self.customers[i])
    }

    fn customer_index(&self, id: i64) -> Result<usize, ApiFailure> {
        self.customers
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ApiFailure::not_found(format!("Customer {id} not found")))
    }

    fn order_index(&self, id: i64) -> Result<usize, ApiFailure> {
        self.orders
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| ApiFailure::not_found(format!("Order {id} not found")))
    }

    fn check_tags(&self, ids: &[i64]) -> Result<(), ApiFailure> {
        match ids.iter().find(|id| !self.tags.iter().any(|(t, _)| t == *id)) {
            Some(unknown) => Err(ApiFailure::invalid_field("ids", json!(unknown), "unknown tag")),
            None => Ok(()),
        }
    }

    fn push_operation(&mut self, mut op: MockOperation) -> i64 {
        op.id = self.next_operation_id;
        self.next_operation_id += 1;
        let id = op.id;
        self.operations.push(op);
        id
    }

    fn tag_page(&self, ids: &[i64]) -> Value {
        let rows: Vec<Value> = self
            .tags
            .iter()
            .filter(|(id, _)| ids.contains(id))
            .map(|(id, name)| json!({"id": id, "name": name}))
            .collect();
        json!({"total": rows.len(), "rows": rows})
    }

    fn customer_json(&self, c: &MockCustomer) -> Value {
        json!({
            "uid": c.uid,
            "avatar": null,
            "displayName": c.display_name,
            "gender": "NOT_SPECIFIED",
            "phone": c.phone,
            "birthDate": null,
            "email": null,
            "channelName": "mock",
            "participant": {
                "id": c.id,
                "inviterId": null,
                "points": c.points,
                "discountRate": 0.0,
                "cashbackRate": c.cashback_rate,
                "membershipTier": base_tier(self.max_scores_discount),
                "dateCreated": CREATED_AT,
                "lastTransactionTime": null
            }
        })
    }

    fn customer_detail_json(&self, c: &MockCustomer) -> Value {
        let mut value = self.customer_json(c);
        value["tags"] = self.tag_page(&c.tags)["rows"].clone();
        value
    }

    fn short_info(&self, c: &MockCustomer) -> Value {
        json!({
            "id": c.id,
            "displayName": c.display_name,
            "uid": c.uid,
            "membershipTier": base_tier(self.max_scores_discount),
        })
    }

    fn purchase_json(
        &self,
        c: &MockCustomer,
        total: f64,
        skip: f64,
        unredeemable: f64,
        points: Option<f64>,
    ) -> Value {
        let redeemable = (total - skip - unredeemable).max(0.0);
        let max_points = (redeemable * self.max_scores_discount / 100.0)
            .min(c.points)
            .floor();
        let points = points.unwrap_or(max_points).min(max_points);
        let cash = total - points;
        let cash_back = round2((cash - skip).max(0.0) * c.cashback_rate / 100.0);
        let percent = if total > 0.0 { round2(points / total * 100.0) } else { 0.0 };
        json!({
            "maxPoints": max_points,
            "total": total,
            "skipLoyaltyTotal": skip,
            "unredeemableTotal": unredeemable,
            "discountAmount": 0.0,
            "discountPercent": 0.0,
            "points": points,
            "pointsPercent": percent,
            "netDiscount": points,
            "netDiscountPercent": percent,
            "certificatePoints": 0.0,
            "cash": cash,
            "cashTotal": cash,
            "cashBack": cash_back,
            "extras": {"delivery": 0.0},
            "maxScoresDiscount": self.max_scores_discount
        })
    }

    fn operation_json(&self, op: &MockOperation) -> Value {
        let customer = self
            .customers
            .iter()
            .find(|c| c.id == op.customer_id)
            .map(|c| self.short_info(c));
        json!({
            "id": op.id,
            "dateCreated": CREATED_AT,
            "action": "PURCHASE",
            "state": op.state,
            "customer": customer,
            "cashier": null,
            "branch": {"id": 1, "displayName": "Main"},
            "points": op.points,
            "receiptNumber": op.receipt_number,
            "origin": op.origin.map(|id| json!({"id": id})),
            "total": op.total,
            "cash": op.cash
        })
    }

    fn order_json(&self, order: &MockOrder) -> Value {
        let customer = self
            .customers
            .iter()
            .find(|c| c.id == order.customer_id)
            .map(|c| self.short_info(c));
        let items: Vec<Value> = order
            .items
            .iter()
            .map(|i| {
                json!({
                    "id": i.id,
                    "externalId": i.external_id,
                    "name": i.name,
                    "variantName": i.variant_name,
                    "sku": null,
                    "type": if i.variant_name.is_some() { "VARYING_ITEM" } else { "ITEM" },
                    "qty": i.qty,
                    "price": i.price,
                    "measurement": "PIECE"
                })
            })
            .collect();
        let total = order.total();
        json!({
            "id": order.id,
            "dateCreated": CREATED_AT,
            "comment": null,
            "state": order.state,
            "cash": total,
            "points": 0.0,
            "total": total,
            "certificatePoints": 0.0,
            "customer": customer,
            "delivery": {
                "receiverName": null,
                "receiverPhone": null,
                "userComment": null,
                "branch": {"id": 1, "displayName": "Main"},
                "type": if order.delivery.is_some() { "DELIVERY" } else { "PICKUP" }
            },
            "onlinePayment": null,
            "paymentMethod": {"type": "CASH", "name": null},
            "items": items
        })
    }
}

impl Via {
    fn field(&self) -> &'static str {
        match self {
            Via::Code => "code",
            Via::Uid => "uid",
            Via::Phone => "phone",
        }
    }
}

fn base_tier(max_scores_discount: f64) -> Value {
    json!({"uid": "base", "name": "Base", "rate": 5.0, "maxScoresDiscount": max_scores_discount})
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn long_lived_code() -> String {
    format!("{:06}", Uuid::new_v4().as_u128() % 1_000_000)
}

fn parse_usize(query: &HashMap<String, String>, key: &str) -> Result<Option<usize>, ApiFailure> {
    query
        .get(key)
        .map(|raw| {
            raw.parse()
                .map_err(|_| ApiFailure::invalid_field(key, json!(raw), "must be a non-negative integer"))
        })
        .transpose()
}

fn parse_amount(query: &HashMap<String, String>, key: &str) -> Result<Option<f64>, ApiFailure> {
    query
        .get(key)
        .map(|raw| {
            raw.parse()
                .map_err(|_| ApiFailure::invalid_field(key, json!(raw), "must be a number"))
        })
        .transpose()
}

fn parse_new_item(raw: Value) -> Result<MockOrderItem, ApiFailure> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct NewItem {
        external_id: String,
        name: String,
        variant_name: Option<String>,
        qty: f64,
        price: f64,
    }
    let item: NewItem = serde_json::from_value(raw.clone())
        .map_err(|e| ApiFailure::invalid_field("items", raw, e.to_string()))?;
    Ok(MockOrderItem {
        id: 0,
        external_id: item.external_id,
        name: item.name,
        variant_name: item.variant_name,
        qty: item.qty,
        price: item.price,
    })
}

fn parse_item_update(raw: Value) -> Result<(i64, f64), ApiFailure> {
    #[derive(Deserialize)]
    struct ItemUpdate {
        id: i64,
        qty: f64,
    }
    let update: ItemUpdate = serde_json::from_value(raw.clone())
        .map_err(|e| ApiFailure::invalid_field("items", raw, e.to_string()))?;
    Ok((update.id, update.qty))
}
