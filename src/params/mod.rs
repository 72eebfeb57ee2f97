// src/params/mod.rs

//! Request parameter extraction.
//!
//! Git services all post slightly different webhook payloads. This module
//! turns a raw request (headers + body) into a flat [`ParameterSet`]: the
//! secret the sender presented plus a handful of string fields (`event`,
//! `branch`, `repository`, ...) that step conditions can match on.
//!
//! - [`providers`] knows the header/payload layout of each supported service.
//! - [`signature`] verifies HMAC-signed deliveries.

pub mod providers;
pub mod signature;

use std::collections::BTreeMap;
use std::fmt;

use axum::http::HeaderMap;
use bytes::Bytes;
use subtle::ConstantTimeEq;

pub use providers::{GitServiceExtractor, Provider};

/// Everything the extractor gets to see of an inbound request.
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawRequest {
    pub fn new(headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            headers,
            body: body.into(),
        }
    }
}

/// Credential presented by the sender of a webhook.
#[derive(Clone)]
pub enum WebhookSecret {
    /// Plain shared token, compared for exact equality.
    Token(String),
    /// HMAC-SHA256 of the request body, keyed with the shared secret.
    Signature { digest: Vec<u8>, body: Bytes },
}

impl WebhookSecret {
    /// Whether the sender knows `expected`, the hook's configured secret.
    pub fn verify(&self, expected: &str) -> bool {
        match self {
            WebhookSecret::Token(token) => token.as_bytes().ct_eq(expected.as_bytes()).into(),
            WebhookSecret::Signature { digest, body } => {
                signature::verify_hmac_sha256(expected, digest, body)
            }
        }
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebhookSecret::Token(_) => f.write_str("Token(..)"),
            WebhookSecret::Signature { .. } => f.write_str("Signature(..)"),
        }
    }
}

/// Normalized view of one webhook delivery.
#[derive(Debug, Clone)]
pub struct ParameterSet {
    pub provider: Provider,
    pub secret: WebhookSecret,
    fields: BTreeMap<String, String>,
}

impl ParameterSet {
    /// New set with only the `provider` field filled in.
    pub fn new(provider: Provider, secret: WebhookSecret) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("provider".to_string(), provider.as_str().to_string());
        Self {
            provider,
            secret,
            fields,
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}

/// Turns a raw request into parameters, or `None` if the payload does not
/// come from a supported Git service.
pub trait ParameterExtractor: Send + Sync {
    fn extract(&self, request: &RawRequest) -> Option<ParameterSet>;
}
