use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiFailure;
use crate::store::{CalcOperationBody, CreateOperationBody, RewardBody, UpdateOrderBody};
use crate::Db;

type ApiResult = Result<Json<Value>, ApiFailure>;

#[derive(Deserialize)]
pub struct SetTags {
    pub ids: Vec<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    pub partial_amount: Option<f64>,
}

pub async fn list_customers(
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult {
    db.read().await.list_customers(&query).map(Json)
}

pub async fn find_customer(
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult {
    db.write().await.find_customer(&query).map(Json)
}

pub async fn get_customer(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult {
    db.read().await.get_customer(id).map(Json)
}

pub async fn get_customer_tags(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult {
    db.read().await.customer_tags(id).map(Json)
}

pub async fn set_customer_tags(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<SetTags>,
) -> ApiResult {
    db.write().await.set_customer_tags(id, input.ids).map(Json)
}

pub async fn list_operations(
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult {
    db.read().await.list_operations(&query).map(Json)
}

pub async fn create_operation(
    State(db): State<Db>,
    Json(input): Json<CreateOperationBody>,
) -> ApiResult {
    db.write().await.create_operation(input).map(Json)
}

pub async fn get_operation(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult {
    db.read().await.get_operation(id).map(Json)
}

pub async fn refund_operation(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<Refund>,
) -> ApiResult {
    db.write().await.refund_operation(id, input.partial_amount).map(Json)
}

pub async fn calc_operation(
    State(db): State<Db>,
    Json(input): Json<CalcOperationBody>,
) -> ApiResult {
    db.read().await.calc_operation(input).map(Json)
}

pub async fn reward(State(db): State<Db>, Json(input): Json<RewardBody>) -> ApiResult {
    db.write().await.reward(input).map(Json)
}

pub async fn get_order(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult {
    db.read().await.get_order(id).map(Json)
}

pub async fn update_order(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateOrderBody>,
) -> ApiResult {
    db.write().await.update_order(id, input).map(Json)
}

pub async fn complete_order(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult {
    db.write().await.complete_order(id).map(Json)
}

pub async fn order_code(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult {
    db.read().await.order_code(id).map(Json)
}

pub async fn settings(State(db): State<Db>) -> Json<Value> {
    Json(db.read().await.settings())
}
