// src/params/providers.rs

//! Per-service payload normalization.
//!
//! | Service | Event header     | Secret                                           |
//! |---------|------------------|--------------------------------------------------|
//! | GitLab  | `X-Gitlab-Event` | `X-Gitlab-Token`                                 |
//! | Gitea   | `X-Gitea-Event`  | payload `secret`, else `X-Gitea-Signature` HMAC  |
//! | Gogs    | `X-Gogs-Event`   | payload `secret`, else `X-Gogs-Signature` HMAC   |
//! | GitHub  | `X-GitHub-Event` | `X-Hub-Signature-256` HMAC                       |
//!
//! Gitea also sends `X-Gogs-Event` for compatibility, so it is probed first.

use std::fmt;

use axum::http::HeaderMap;
use serde_json::Value;
use tracing::debug;

use super::signature::decode_signature;
use super::{ParameterExtractor, ParameterSet, RawRequest, WebhookSecret};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    GitLab,
    Gitea,
    Gogs,
    GitHub,
}

const DETECTION_ORDER: [Provider; 4] = [
    Provider::GitLab,
    Provider::Gitea,
    Provider::Gogs,
    Provider::GitHub,
];

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::GitLab => "gitlab",
            Provider::Gitea => "gitea",
            Provider::Gogs => "gogs",
            Provider::GitHub => "github",
        }
    }

    fn event_header(self) -> &'static str {
        match self {
            Provider::GitLab => "x-gitlab-event",
            Provider::Gitea => "x-gitea-event",
            Provider::Gogs => "x-gogs-event",
            Provider::GitHub => "x-github-event",
        }
    }

    /// Identify the sending service and its event name from the headers.
    pub fn detect(headers: &HeaderMap) -> Option<(Provider, String)> {
        DETECTION_ORDER.into_iter().find_map(|provider| {
            header_str(headers, provider.event_header()).map(|event| (provider, event.to_string()))
        })
    }

    fn secret(self, request: &RawRequest, payload: &Value) -> WebhookSecret {
        let headers = &request.headers;
        match self {
            Provider::GitLab => WebhookSecret::Token(
                header_str(headers, "x-gitlab-token")
                    .unwrap_or_default()
                    .to_string(),
            ),
            Provider::Gitea | Provider::Gogs => {
                if let Some(token) = str_at(payload, "/secret") {
                    return WebhookSecret::Token(token.to_string());
                }
                let header = if self == Provider::Gitea {
                    "x-gitea-signature"
                } else {
                    "x-gogs-signature"
                };
                signature_secret(headers, header, request)
            }
            Provider::GitHub => signature_secret(headers, "x-hub-signature-256", request),
        }
    }

    fn collect_fields(self, payload: &Value, params: &mut ParameterSet) {
        if self == Provider::GitLab {
            if let Some(kind) = str_at(payload, "/object_kind") {
                params.insert("event", kind);
            }
        }

        if let Some(git_ref) = str_at(payload, "/ref") {
            params.insert("ref", git_ref);
            if let Some(branch) = git_ref.strip_prefix("refs/heads/") {
                params.insert("branch", branch);
            } else if let Some(tag) = git_ref.strip_prefix("refs/tags/") {
                params.insert("tag", tag);
            }
        }

        let (commit, repository, sender): (&[&str], &[&str], &[&str]) = match self {
            Provider::GitLab => (
                &["/checkout_sha", "/after"],
                &["/project/path_with_namespace"],
                &["/user_username", "/user/username"],
            ),
            Provider::Gitea | Provider::Gogs => (
                &["/after"],
                &["/repository/full_name"],
                &["/pusher/username", "/pusher/login", "/sender/login"],
            ),
            Provider::GitHub => (
                &["/after"],
                &["/repository/full_name"],
                &["/sender/login", "/pusher/name"],
            ),
        };

        for (field, pointers) in [("commit", commit), ("repository", repository), ("sender", sender)] {
            if let Some(value) = pointers.iter().find_map(|p| str_at(payload, p)) {
                params.insert(field, value);
            }
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extractor for the Git services listed in the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitServiceExtractor;

impl ParameterExtractor for GitServiceExtractor {
    fn extract(&self, request: &RawRequest) -> Option<ParameterSet> {
        let Some((provider, event)) = Provider::detect(&request.headers) else {
            debug!("no known Git service event header on request");
            return None;
        };

        let payload: Value = match serde_json::from_slice(&request.body) {
            Ok(value @ Value::Object(_)) => value,
            Ok(_) => {
                debug!(%provider, "payload is not a JSON object");
                return None;
            }
            Err(err) => {
                debug!(%provider, error = %err, "payload is not valid JSON");
                return None;
            }
        };

        let mut params = ParameterSet::new(provider, provider.secret(request, &payload))
            .with_field("event", event);
        provider.collect_fields(&payload, &mut params);

        debug!(%provider, fields = ?params.fields(), "extracted webhook parameters");
        Some(params)
    }
}

/// Signature header, falling back to an empty token so the comparison fails
/// unless the hook secret itself is empty.
fn signature_secret(headers: &HeaderMap, name: &str, request: &RawRequest) -> WebhookSecret {
    match header_str(headers, name).and_then(decode_signature) {
        Some(digest) => WebhookSecret::Signature {
            digest,
            body: request.body.clone(),
        },
        None => WebhookSecret::Token(String::new()),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn str_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(Value::as_str)
}
