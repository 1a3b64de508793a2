//! Request classification and the policy dispatch table.

use axum::http::Method;

use super::http::FetchRequest;

/// What kind of traffic an intercepted request is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Addressed to the API path prefix.
    Api,
    /// Anything other than GET; the cache only stores GET exchanges.
    Mutation,
    /// Declares it accepts HTML.
    Navigation,
    /// Images, scripts, styles and everything else.
    Asset,
}

/// How a request is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    NetworkOnly,
    NetworkFirst,
    CacheFirst,
}

/// Classify a request. API traffic is recognised before anything else.
pub fn classify(request: &FetchRequest, api_prefix: &str) -> RequestClass {
    if request.url.path().starts_with(api_prefix) {
        RequestClass::Api
    } else if request.method != Method::GET {
        RequestClass::Mutation
    } else if request.accepts_html() {
        RequestClass::Navigation
    } else {
        RequestClass::Asset
    }
}

pub fn policy_for(class: RequestClass) -> CachePolicy {
    match class {
        RequestClass::Api | RequestClass::Mutation => CachePolicy::NetworkOnly,
        RequestClass::Navigation => CachePolicy::NetworkFirst,
        RequestClass::Asset => CachePolicy::CacheFirst,
    }
}
