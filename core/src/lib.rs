//! Typed blocking client for the UDS loyalty-program partner API.
//!
//! # Overview
//! Covers customers, operations (purchases, refunds, rewards), goods orders
//! and company settings. Each endpoint is a `build_*` method on `UdsCore`
//! that produces a plain-data `HttpRequest`, plus a method of the same name
//! on `UdsClient` that sends it through a `Transport` and parses the reply.
//!
//! # Design
//! - `UdsCore` never touches the network, so request shapes and response
//!   parsing are tested without a server.
//! - `UreqTransport` is the default transport: basic auth and JSON headers
//!   come from `ClientConfig`, failed round-trips are retried a fixed number
//!   of times with a fixed pause.
//! - API rejections arrive as `Error::Api` carrying an `ErrorCode`;
//!   connectivity failures as `Error::Transport`.
//!
//! ```no_run
//! use uds_core::{ClientConfig, CustomerSelector, UdsClient};
//!
//! let client = UdsClient::new(ClientConfig::new("549755813888", "api-key"));
//! let found = client.find_customer(&CustomerSelector::code("456123"), None)?;
//! println!("{:?}", found.user.customer.display_name);
//! # Ok::<(), uds_core::Error>(())
//! ```

pub mod client;
pub mod config;
pub mod customers;
pub mod error;
pub mod goods_orders;
pub mod http;
pub mod operations;
pub mod settings;
pub mod transport;
pub mod types;

pub use client::{UdsClient, UdsCore};
pub use config::{ClientConfig, RetryPolicy};
pub use error::{ApiError, Error, ErrorCode, FieldError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::*;
