//! `/customers` endpoints.

use serde::Serialize;

use crate::client::{push_amount, push_clamped, UdsClient, UdsCore, MAX_OFFSET, MAX_PAGE_SIZE};
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::Transport;
use crate::types::{
    Customer, CustomerDetail, CustomerSelector, FindCustomerParams, FindCustomerResponse, Page,
    Tag,
};

#[derive(Serialize)]
struct SetTagsBody<'a> {
    ids: &'a [i64],
}

impl UdsCore {
    /// `max` is clamped to 1..=50 and `offset` to 1..=10000; zero or `None`
    /// leaves the parameter out.
    pub fn build_list_customers(&self, max: Option<u32>, offset: Option<u32>) -> HttpRequest {
        let mut request = self.request(HttpMethod::Get, "customers");
        push_clamped(&mut request, "max", max, MAX_PAGE_SIZE);
        push_clamped(&mut request, "offset", offset, MAX_OFFSET);
        request
    }

    pub fn build_find_customer(
        &self,
        selector: &CustomerSelector,
        params: Option<&FindCustomerParams>,
    ) -> HttpRequest {
        let mut request = self.request(HttpMethod::Get, "customers/find");
        let (key, value) = selector.query_pair();
        request.query.push((key.to_string(), value.to_string()));

        if let Some(params) = params {
            if params.exchange_code {
                request
                    .query
                    .push(("exchangeCode".to_string(), "true".to_string()));
            }
            push_amount(&mut request, "total", params.total);
            push_amount(&mut request, "skipLoyaltyTotal", params.skip_loyalty_total);
            push_amount(&mut request, "unredeemableTotal", params.unredeemable_total);
        }
        request
    }

    pub fn build_get_customer(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("customers/{id}"))
    }

    pub fn build_get_customer_tags(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("customers/{id}/tags"))
    }

    /// Replaces the customer's whole tag set with `tag_ids`.
    pub fn build_set_customer_tags(&self, id: i64, tag_ids: &[i64]) -> Result<HttpRequest> {
        self.json_request(
            HttpMethod::Post,
            &format!("customers/{id}/tags"),
            &SetTagsBody { ids: tag_ids },
        )
    }
}

impl<T: Transport> UdsClient<T> {
    pub fn list_customers(&self, max: Option<u32>, offset: Option<u32>) -> Result<Page<Customer>> {
        self.call(self.core().build_list_customers(max, offset))
    }

    /// Look a customer up by payment code, phone or uid.
    ///
    /// Fails with `ErrorCode::NotFound` when nothing matches.
    pub fn find_customer(
        &self,
        selector: &CustomerSelector,
        params: Option<&FindCustomerParams>,
    ) -> Result<FindCustomerResponse> {
        self.call(self.core().build_find_customer(selector, params))
    }

    pub fn get_customer(&self, id: i64) -> Result<CustomerDetail> {
        self.call(self.core().build_get_customer(id))
    }

    pub fn get_customer_tags(&self, id: i64) -> Result<Page<Tag>> {
        self.call(self.core().build_get_customer_tags(id))
    }

    pub fn set_customer_tags(&self, id: i64, tag_ids: &[i64]) -> Result<Page<Tag>> {
        self.call(self.core().build_set_customer_tags(id, tag_ids)?)
    }
}
