//! Executes `HttpRequest` values against the network.
//!
//! `UreqTransport` is the blocking default. It turns 4xx/5xx responses into
//! data rather than errors so `UdsCore::parse` can map API error bodies, and
//! retries only round-trips that failed to connect or timed out.

use std::thread;

use tracing::{debug, warn};
use ureq::Agent;

use crate::config::{ClientConfig, RetryPolicy};
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one logical HTTP round-trip.
///
/// Implementations may retry internally. Non-2xx statuses must be returned as
/// `Ok(HttpResponse)`; `Err` is reserved for failures that produced no
/// response.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }
}

/// Blocking transport over a shared `ureq::Agent`.
///
/// The agent pools connections and is safe to share across threads.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
    retry: RetryPolicy,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .build()
            .new_agent();
        Self {
            agent,
            retry: config.retry,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    fn send_once(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, ureq::Error> {
        let url = request.path.as_str();
        let mut response = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_parts(self.agent.get(url), request).call()?,
            (HttpMethod::Post, Some(body)) => {
                with_parts(self.agent.post(url), request).send(body.as_bytes())?
            }
            (HttpMethod::Post, None) => with_parts(self.agent.post(url), request).send_empty()?,
            (HttpMethod::Put, Some(body)) => {
                with_parts(self.agent.put(url), request).send(body.as_bytes())?
            }
            (HttpMethod::Put, None) => with_parts(self.agent.put(url), request).send_empty()?,
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut attempt = 0;
        loop {
            match self.send_once(request) {
                Ok(response) => {
                    debug!(
                        method = request.method.as_str(),
                        path = %request.path,
                        status = response.status,
                        "response received"
                    );
                    return Ok(response);
                }
                Err(err) if attempt < self.retry.retries && is_transient(&err) => {
                    attempt += 1;
                    warn!(
                        method = request.method.as_str(),
                        path = %request.path,
                        attempt,
                        error = %err,
                        "request failed, retrying"
                    );
                    thread::sleep(self.retry.wait);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// Connectivity failures that may succeed on another attempt. Malformed
/// URIs, headers or bodies fail the same way every time.
fn is_transient(err: &ureq::Error) -> bool {
    matches!(
        err,
        ureq::Error::Io(_)
            | ureq::Error::Timeout(_)
            | ureq::Error::HostNotFound
            | ureq::Error::ConnectionFailed
    )
}

fn with_parts<B>(
    mut builder: ureq::RequestBuilder<B>,
    request: &HttpRequest,
) -> ureq::RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for (key, value) in &request.query {
        builder = builder.query(key, value);
    }
    builder
}
