//! Rate-limited Wedof API client.
//!
//! [`WedofClient::request`] issues one throttled call and decodes the JSON
//! body. [`WedofClient::drain`] walks one list endpoint page by page until it
//! is exhausted. The named accessors drain the catalog endpoints one at a time
//! and propagate their failure; see [`crate::aggregate`] for the fault-isolating
//! full fetch.

use serde_json::Value;
use url::Url;

use crate::config::{ClientConfig, PAGE_LIMIT};
use crate::endpoints::{self, Endpoint};
use crate::error::{Result, WedofError};
use crate::http::{
    HttpRequest, HttpResponse, Method, ReqwestTransport, Transport, RATE_LIMIT_REMAINING_HEADER,
};
use crate::pagination::{normalize_page, page_params, QueryParams, Record};
use crate::rate_limit::RateLimiter;

/// Client for the Wedof API.
///
/// One instance owns one rate limiter: every request issued through it, on any
/// endpoint, is spaced by the configured minimum interval.
pub struct WedofClient<T = ReqwestTransport> {
    transport: T,
    base_url: Url,
    limiter: RateLimiter,
    low_quota_threshold: u64,
}

impl WedofClient<ReqwestTransport> {
    /// Create a client talking to the network.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> WedofClient<T> {
    /// Create a client over an arbitrary transport.
    pub fn with_transport(config: &ClientConfig, transport: T) -> Result<Self> {
        Ok(Self {
            transport,
            base_url: Url::parse(&config.base_url)?,
            limiter: RateLimiter::new(config.min_request_interval),
            low_quota_threshold: config.low_quota_threshold,
        })
    }

    /// Perform one API call and decode its JSON body.
    ///
    /// Blocks first if the previous call on this client was issued less than
    /// the minimum interval ago. Never retries.
    ///
    /// # Errors
    /// * `WedofError::Transport` if the request could not be completed
    /// * `WedofError::Http` for a non-2xx status
    /// * `WedofError::MalformedResponse` if the body is not JSON
    pub fn request(
        &self,
        method: Method,
        endpoint_path: &str,
        query: &QueryParams,
    ) -> Result<Value> {
        let url = self.base_url.join(endpoint_path)?;

        self.limiter.wait();

        let request = HttpRequest {
            method,
            url,
            query: query.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        };
        let response = self.transport.send(&request)?;

        if !response.is_success() {
            tracing::debug!(
                method = %method,
                endpoint = endpoint_path,
                status = response.status,
                "request failed"
            );
            return Err(WedofError::Http {
                status: response.status,
                body: response.body,
            });
        }

        self.check_quota(&response);

        serde_json::from_str(&response.body).map_err(|e| {
            WedofError::MalformedResponse(format!("invalid JSON from {endpoint_path}: {e}"))
        })
    }

    fn check_quota(&self, response: &HttpResponse) {
        let remaining = response
            .header(RATE_LIMIT_REMAINING_HEADER)
            .and_then(|v| v.trim().parse::<u64>().ok());

        if let Some(remaining) = remaining {
            if remaining < self.low_quota_threshold {
                tracing::warn!(remaining, "rate limit almost exhausted");
            }
        }
    }

    /// Fetch every page of one list endpoint.
    ///
    /// Pages are requested with `page` starting at 1 and `limit` fixed to
    /// [`PAGE_LIMIT`], merged over `base_params`. Stops on an empty page or on
    /// a page shorter than the limit. Records are returned in API order.
    pub fn drain(&self, endpoint_path: &str, base_params: &QueryParams) -> Result<Vec<Record>> {
        let mut all_items = Vec::new();
        let mut page: u32 = 1;

        loop {
            let params = page_params(base_params, page, PAGE_LIMIT);

            tracing::info!(endpoint = endpoint_path, page, "fetching page");
            let response = self.request(Method::Get, endpoint_path, &params)?;
            let items = normalize_page(response)?;

            if items.is_empty() {
                break;
            }

            let count = items.len();
            all_items.extend(items);

            if count < PAGE_LIMIT {
                break;
            }
            page += 1;
        }

        tracing::info!(
            endpoint = endpoint_path,
            total = all_items.len(),
            "endpoint drained"
        );
        Ok(all_items)
    }

    /// Drain a catalog endpoint without extra parameters.
    pub fn drain_endpoint(&self, endpoint: &Endpoint) -> Result<Vec<Record>> {
        self.drain(endpoint.path, &QueryParams::new())
    }

    pub fn get_users(&self) -> Result<Vec<Record>> {
        self.drain_endpoint(&endpoints::USERS)
    }

    pub fn get_trainings(&self) -> Result<Vec<Record>> {
        self.drain_endpoint(&endpoints::TRAININGS)
    }

    pub fn get_sessions(&self) -> Result<Vec<Record>> {
        self.drain_endpoint(&endpoints::SESSIONS)
    }

    pub fn get_attendees(&self) -> Result<Vec<Record>> {
        self.drain_endpoint(&endpoints::ATTENDEES)
    }

    pub fn get_registration_folders(&self) -> Result<Vec<Record>> {
        self.drain_endpoint(&endpoints::REGISTRATION_FOLDERS)
    }

    pub fn get_certification_folders(&self) -> Result<Vec<Record>> {
        self.drain_endpoint(&endpoints::CERTIFICATION_FOLDERS)
    }

    pub fn get_organisms(&self) -> Result<Vec<Record>> {
        self.drain_endpoint(&endpoints::ORGANISMS)
    }

    pub fn get_activities(&self) -> Result<Vec<Record>> {
        self.drain_endpoint(&endpoints::ACTIVITIES)
    }

    pub fn get_evaluations(&self) -> Result<Vec<Record>> {
        self.drain_endpoint(&endpoints::EVALUATIONS)
    }

    pub fn get_invoices(&self) -> Result<Vec<Record>> {
        self.drain_endpoint(&endpoints::INVOICES)
    }

    pub fn get_payments(&self) -> Result<Vec<Record>> {
        self.drain_endpoint(&endpoints::PAYMENTS)
    }
}
