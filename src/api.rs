// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Client for the budget/expense REST API.
//!
//! Every call attaches the gate's headers and classifies the outcome into
//! success, [`ClientError::Unauthorized`] (403), [`ClientError::RequestFailed`]
//! (any other non-2xx), [`ClientError::Connection`] (no HTTP status at all)
//! or [`ClientError::MalformedResponse`] (unexpected body). A 403 is never
//! acted on here; the caller owns the call to
//! [`AuthGate::handle_unauthorized`].

use futures::future::join_all;
use reqwest::{Method, RequestBuilder};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::future::Future;
use tracing::{debug, warn};

use crate::auth::{AuthGate, CONTENT_TYPE, JSON_MIME, MIN_TOKEN_LEN};
use crate::error::ClientError;
use crate::models::{
    BudgetRecord, Credentials, ExpenseRecord, NewExpense, Registration, UserProfile,
};
use crate::session::SessionStore;
use crate::utils::http_client;

pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token received from server";

pub struct ApiClient<S> {
    http: reqwest::Client,
    base_url: String,
    gate: AuthGate<S>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BudgetWire {
    #[serde(default)]
    limit_amount: Option<Decimal>,
    #[serde(default)]
    spent_amount: Option<Decimal>,
}

#[derive(Deserialize)]
struct MessageBody {
    message: Option<String>,
}

/// Result of a scatter/gather over months. Failed months are replaced by a
/// fallback value so `records` always has one entry per requested month.
#[derive(Debug)]
pub struct BatchOutcome<T> {
    pub records: Vec<T>,
    pub degraded: usize,
    pub unauthorized: bool,
}

/// Map an HTTP status and raw body to the client outcome.
pub fn classify(status: u16, body: String) -> Result<String, ClientError> {
    match status {
        200..=299 => Ok(body),
        403 => Err(ClientError::Unauthorized),
        _ => Err(ClientError::RequestFailed {
            status,
            message: error_message(status, &body),
        }),
    }
}

/// Server-provided message: `{"message": ..}` if present, else the raw text.
pub fn error_message(status: u16, body: &str) -> String {
    if let Ok(MessageBody { message: Some(m) }) = serde_json::from_str::<MessageBody>(body) {
        if !m.trim().is_empty() {
            return m;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed.starts_with('{') {
        format!("Request failed with status {}", status)
    } else {
        trimmed.to_string()
    }
}

pub fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::MalformedResponse(e.to_string()))
}

fn is_blank_body(body: &str) -> bool {
    let t = body.trim();
    t.is_empty() || t == "null"
}

/// Parse a budget body for `month`. A blank body means no budget was set.
pub fn parse_budget(month: &str, body: &str) -> Result<BudgetRecord, ClientError> {
    if is_blank_body(body) {
        return Ok(BudgetRecord::zero(month));
    }
    let wire: BudgetWire = parse_json(body)?;
    Ok(BudgetRecord {
        month: month.to_string(),
        limit_amount: wire.limit_amount.unwrap_or(Decimal::ZERO),
        spent_amount: wire.spent_amount.unwrap_or(Decimal::ZERO),
    })
}

pub fn parse_expenses(body: &str) -> Result<Vec<ExpenseRecord>, ClientError> {
    if is_blank_body(body) {
        return Ok(Vec::new());
    }
    parse_json(body)
}

/// Issue one fetch per month concurrently and wait for all of them.
/// Results come back in the order of `months`.
pub async fn gather<T, F, Fut>(months: &[String], fetch: F) -> Vec<(String, Result<T, ClientError>)>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let pending = months.iter().map(|m| {
        let fut = fetch(m.clone());
        let month = m.clone();
        async move { (month, fut.await) }
    });
    join_all(pending).await
}

/// Replace every failure with `fallback(month)`.
pub fn settle<T, F>(results: Vec<(String, Result<T, ClientError>)>, fallback: F) -> BatchOutcome<T>
where
    F: Fn(&str) -> T,
{
    let mut outcome = BatchOutcome {
        records: Vec::with_capacity(results.len()),
        degraded: 0,
        unauthorized: false,
    };
    for (month, res) in results {
        match res {
            Ok(v) => outcome.records.push(v),
            Err(err) => {
                if err.is_unauthorized() {
                    outcome.unauthorized = true;
                }
                warn!(%month, error = %err, "month degraded to placeholder");
                outcome.degraded += 1;
                outcome.records.push(fallback(&month));
            }
        }
    }
    outcome
}

impl<S: SessionStore> ApiClient<S> {
    pub fn new(base_url: impl Into<String>, gate: AuthGate<S>) -> anyhow::Result<Self> {
        Ok(Self {
            http: http_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            gate,
        })
    }

    pub fn gate(&self) -> &AuthGate<S> {
        &self.gate
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    /// Headers are read from the session before the request leaves, so a
    /// concurrent clear never produces a half-authenticated request.
    async fn send(&self, req: RequestBuilder, authed: bool) -> Result<String, ClientError> {
        let mut req = req;
        if authed {
            for (k, v) in self.gate.build_auth_headers() {
                req = req.header(k, v);
            }
        } else {
            req = req.header(CONTENT_TYPE, JSON_MIME);
        }
        let req = req.build()?;
        debug!(method = %req.method(), path = req.url().path(), "api request");

        let resp = self.http.execute(req).await.map_err(|e| {
            warn!(error = %e, "api unreachable");
            ClientError::Connection(e.to_string())
        })?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        debug!(status, "api response");
        classify(status, body)
    }

    /// Calls made without a session have nothing to expire, so a 403 there
    /// is an ordinary rejection carrying `forbidden`.
    async fn send_anonymous(
        &self,
        req: RequestBuilder,
        forbidden: &str,
    ) -> Result<String, ClientError> {
        match self.send(req, false).await {
            Err(ClientError::Unauthorized) => Err(ClientError::RequestFailed {
                status: 403,
                message: forbidden.to_string(),
            }),
            other => other,
        }
    }

    /// Exchange credentials for a token and store the session. The token is
    /// the raw response body.
    pub async fn login(&self, creds: &Credentials) -> Result<String, ClientError> {
        let req = self.request(Method::POST, "/api/auth/login").json(creds);
        let body = self.send_anonymous(req, "Invalid credentials").await?;
        let token = body.trim().to_string();
        if token.chars().count() < MIN_TOKEN_LEN {
            warn!(len = token.len(), "login returned a placeholder token");
            return Err(ClientError::RequestFailed {
                status: 200,
                message: INVALID_TOKEN_MESSAGE.to_string(),
            });
        }
        self.gate
            .store()
            .set_session(&token, &creds.username)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        Ok(token)
    }

    pub async fn register(&self, reg: &Registration) -> Result<(), ClientError> {
        let req = self.request(Method::POST, "/api/auth/register").json(reg);
        self.send_anonymous(req, "Registration was rejected")
            .await
            .map(|_| ())
    }

    /// Budget for one month; a month without a budget reads as zero.
    pub async fn budget(&self, month: &str) -> Result<BudgetRecord, ClientError> {
        let req = self
            .request(Method::GET, "/api/budget/")
            .query(&[("month", month)]);
        match self.send(req, true).await {
            Ok(body) => parse_budget(month, &body),
            Err(ClientError::RequestFailed { status: 404, .. }) => Ok(BudgetRecord::zero(month)),
            Err(e) => Err(e),
        }
    }

    /// Create or replace the limit for `month`.
    pub async fn set_budget(&self, month: &str, limit: Decimal) -> Result<(), ClientError> {
        let req = self
            .request(Method::POST, "/api/budget/")
            .query(&[("month", month.to_string()), ("limitAmount", limit.to_string())]);
        self.send(req, true).await.map(|_| ())
    }

    pub async fn expenses(&self, month: &str) -> Result<Vec<ExpenseRecord>, ClientError> {
        let req = self
            .request(Method::GET, "/api/expenses")
            .query(&[("month", month)]);
        let body = self.send(req, true).await?;
        parse_expenses(&body)
    }

    pub async fn add_expense(&self, expense: &NewExpense) -> Result<(), ClientError> {
        let req = self.request(Method::POST, "/api/expenses").json(expense);
        self.send(req, true).await.map(|_| ())
    }

    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        let req = self.request(Method::GET, "/api/user/me");
        let body = self.send(req, true).await?;
        parse_json(&body)
    }

    pub async fn budgets_for(&self, months: &[String]) -> BatchOutcome<BudgetRecord> {
        let results = gather(months, |m| async move { self.budget(&m).await }).await;
        settle(results, |m| BudgetRecord::zero(m))
    }

    pub async fn expenses_for(
        &self,
        months: &[String],
    ) -> BatchOutcome<(String, Vec<ExpenseRecord>)> {
        let results = gather(months, |m| async move {
            let list = self.expenses(&m).await?;
            Ok::<_, ClientError>((m, list))
        })
        .await;
        settle(results, |m| (m.to_string(), Vec::new()))
    }
}
