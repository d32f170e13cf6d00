//! Full fetch over the endpoint catalog with per-endpoint fault isolation.
//!
//! This is the only place where fetch errors are contained: a failing
//! endpoint is logged and recorded as an empty collection, and the fetch moves
//! on to the next one.

use std::collections::BTreeMap;

use crate::client::WedofClient;
use crate::endpoints::{Endpoint, WEDOF_ENDPOINTS};
use crate::http::Transport;
use crate::pagination::Record;

/// The drained records of one endpoint.
#[derive(Debug, Clone)]
pub struct Collection {
    pub endpoint: Endpoint,
    /// Empty when the endpoint failed.
    pub records: Vec<Record>,
    /// Failure message when the endpoint could not be drained.
    pub error: Option<String>,
}

impl Collection {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.endpoint.name
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// One collection per endpoint, in fetch order.
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    collections: Vec<Collection>,
}

impl Aggregate {
    #[must_use]
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// Records of the endpoint with the given logical name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[Record]> {
        self.collections
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.records.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.collections.iter().map(Collection::name)
    }

    pub fn failures(&self) -> impl Iterator<Item = &Collection> {
        self.collections.iter().filter(|c| c.is_failed())
    }

    #[must_use]
    pub fn total_records(&self) -> usize {
        self.collections.iter().map(|c| c.records.len()).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Plain name → records mapping, dropping failure details.
    #[must_use]
    pub fn into_map(self) -> BTreeMap<String, Vec<Record>> {
        self.collections
            .into_iter()
            .map(|c| (c.endpoint.name.to_string(), c.records))
            .collect()
    }
}

impl<T: Transport> WedofClient<T> {
    /// Drain every catalog endpoint.
    ///
    /// Never fails: an endpoint that errors maps to an empty collection.
    pub fn fetch_all(&self) -> Aggregate {
        self.fetch_endpoints(&WEDOF_ENDPOINTS)
    }

    /// Drain each endpoint of `endpoints` once, in order.
    pub fn fetch_endpoints(&self, endpoints: &[Endpoint]) -> Aggregate {
        tracing::info!(endpoints = endpoints.len(), "fetching all Wedof data");

        let collections = endpoints
            .iter()
            .map(|endpoint| {
                tracing::info!(endpoint = endpoint.name, "fetching collection");
                match self.drain_endpoint(endpoint) {
                    Ok(records) => {
                        tracing::info!(
                            endpoint = endpoint.name,
                            items = records.len(),
                            "collection fetched"
                        );
                        Collection {
                            endpoint: *endpoint,
                            records,
                            error: None,
                        }
                    }
                    Err(e) => {
                        tracing::error!(
                            endpoint = endpoint.name,
                            error = %e,
                            "failed to fetch collection"
                        );
                        Collection {
                            endpoint: *endpoint,
                            records: Vec::new(),
                            error: Some(e.to_string()),
                        }
                    }
                }
            })
            .collect();

        tracing::info!("fetch finished");
        Aggregate { collections }
    }
}
