// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::session::SessionStore;

pub const LOGIN_ROUTE: &str = "/login";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const AUTHORIZATION: &str = "Authorization";
pub const JSON_MIME: &str = "application/json";

/// Tokens at or below this length are placeholders, not issued credentials.
/// Heuristic tied to the current backend's opaque tokens.
pub const MIN_TOKEN_LEN: usize = 11;

pub type AuthHeaders = BTreeMap<&'static str, String>;

/// Notification shown when the server rejects the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub description: &'static str,
}

pub const SESSION_EXPIRED: Notice = Notice {
    title: "Session Expired",
    description: "Please log in again",
};

pub fn is_valid_token(token: &str) -> bool {
    let trimmed = token.trim();
    !trimmed.is_empty()
        && token != "null"
        && token != "undefined"
        && token.chars().count() >= MIN_TOKEN_LEN
}

pub struct AuthGate<S> {
    store: S,
}

impl<S: SessionStore> AuthGate<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_authenticated(&self) -> bool {
        self.store
            .token()
            .map(|t| is_valid_token(&t))
            .unwrap_or(false)
    }

    /// Headers for an outbound request. The token is attached as-is when
    /// present; validity is not checked here.
    pub fn build_auth_headers(&self) -> AuthHeaders {
        let mut headers = AuthHeaders::new();
        headers.insert(CONTENT_TYPE, JSON_MIME.to_string());
        if let Some(token) = self.store.token() {
            headers.insert(AUTHORIZATION, format!("Bearer {}", token));
        }
        headers
    }

    /// Reaction to a 403: clear, notify, redirect, in that order.
    pub fn handle_unauthorized<N, R>(&self, notify: N, redirect: R)
    where
        N: FnOnce(&Notice),
        R: FnOnce(&str),
    {
        if let Err(err) = self.store.clear_session() {
            warn!(error = %err, "failed to clear session after 403");
        }
        info!("session expired, redirecting to login");
        notify(&SESSION_EXPIRED);
        redirect(LOGIN_ROUTE);
    }

    pub fn logout(&self) -> anyhow::Result<()> {
        self.store.clear_session()
    }
}
