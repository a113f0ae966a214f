//! `GET /settings`.

use crate::client::{UdsClient, UdsCore};
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::Transport;
use crate::types::Settings;

impl UdsCore {
    pub fn build_get_settings(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "settings")
    }
}

impl<T: Transport> UdsClient<T> {
    pub fn get_settings(&self) -> Result<Settings> {
        self.call(self.core().build_get_settings())
    }
}
