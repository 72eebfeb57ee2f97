//! Webhook request fixtures, shaped like real deliveries.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use hookrunner::params::RawRequest;
use hookrunner::params::signature::sign_hex;

/// Push payload in GitLab's format for `refs/heads/<branch>`.
pub fn gitlab_push_body(branch: &str) -> String {
    format!(
        r#"{{
  "object_kind": "push",
  "ref": "refs/heads/{branch}",
  "checkout_sha": "da1560886d4f094c3e6c9ef40349f7d38b5d27d7",
  "user_username": "jsmith",
  "project": {{ "path_with_namespace": "team/site" }}
}}"#
    )
}

/// GitLab push delivery presenting `token`.
pub fn gitlab_push(token: &str, branch: &str) -> RawRequest {
    RawRequest::new(
        headers(&[("X-Gitlab-Event", "Push Hook"), ("X-Gitlab-Token", token)]),
        gitlab_push_body(branch),
    )
}

/// GitHub push delivery signed with `secret`.
pub fn github_push(secret: &str, branch: &str) -> RawRequest {
    let body = format!(
        r#"{{"ref":"refs/heads/{branch}","after":"0d1a26e67d8f5eaf1f6ba5c57fc3c7d91ac0fd1c","repository":{{"full_name":"org/app"}},"sender":{{"login":"octocat"}}}}"#
    );
    let signature = format!("sha256={}", sign_hex(secret, body.as_bytes()));
    RawRequest::new(
        headers(&[("X-GitHub-Event", "push"), ("X-Hub-Signature-256", &signature)]),
        body,
    )
}

/// Build a header map from `(name, value)` pairs; names may be mixed case.
pub fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        map.insert(
            HeaderName::from_bytes(name.as_bytes()).expect("valid header name"),
            HeaderValue::from_str(value).expect("valid header value"),
        );
    }
    map
}
