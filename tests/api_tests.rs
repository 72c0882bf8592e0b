// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::Cell;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use finally::api::{
    classify, error_message, gather, parse_budget, parse_expenses, settle, ApiClient,
};
use finally::auth::AuthGate;
use finally::error::ClientError;
use finally::models::BudgetRecord;
use finally::session::MemorySessionStore;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn classify_success_forbidden_and_failures() {
    assert_eq!(classify(200, "ok".into()).unwrap(), "ok");
    assert_eq!(classify(201, "".into()).unwrap(), "");
    assert!(matches!(classify(403, "{}".into()), Err(ClientError::Unauthorized)));

    match classify(400, r#"{"message":"Limit must be positive"}"#.into()) {
        Err(ClientError::RequestFailed { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Limit must be positive");
        }
        other => panic!("unexpected {:?}", other),
    }
    match classify(500, "".into()) {
        Err(ClientError::RequestFailed { status: 500, message }) => {
            assert_eq!(message, "Request failed with status 500");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn error_message_prefers_json_message_then_text() {
    assert_eq!(error_message(401, "Bad credentials\n"), "Bad credentials");
    assert_eq!(error_message(409, r#"{"message":"Username taken"}"#), "Username taken");
    assert_eq!(error_message(409, r#"{"error":"x"}"#), "Request failed with status 409");
}

#[test]
fn blank_or_partial_budget_reads_as_zero() {
    assert_eq!(parse_budget("2025-08", "").unwrap(), BudgetRecord::zero("2025-08"));
    assert_eq!(parse_budget("2025-08", "null").unwrap(), BudgetRecord::zero("2025-08"));

    let b = parse_budget("2025-08", r#"{"limitAmount":null,"spentAmount":42.5}"#).unwrap();
    assert_eq!(b.limit_amount, Decimal::ZERO);
    assert_eq!(b.spent_amount, d("42.5"));

    let b = parse_budget("2025-08", r#"{"id":3,"limitAmount":500,"spentAmount":120.25}"#).unwrap();
    assert_eq!(b.month, "2025-08");
    assert_eq!(b.remaining(), d("379.75"));
}

#[test]
fn unexpected_budget_shape_is_malformed() {
    assert!(matches!(
        parse_budget("2025-08", "<html>oops</html>"),
        Err(ClientError::MalformedResponse(_))
    ));
}

#[test]
fn expenses_parse_with_defaults() {
    let body = r#"[
        {"description":"Lunch","amount":12.5,"category":"Food","date":"2025-08-03"},
        {"description":"Misc","amount":3,"date":"2025-08-04"},
        {"amount":7,"category":"","date":"2025-07-31","month":"ignored"}
    ]"#;
    let list = parse_expenses(body).unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list[0].amount, d("12.5"));
    assert_eq!(list[0].month, "2025-08");
    assert_eq!(list[1].category, "Other");
    assert_eq!(list[2].category, "Other");
    assert_eq!(list[2].description, "");
    assert_eq!(list[2].month, "2025-07");
    assert_eq!(list[2].date, NaiveDate::from_ymd_opt(2025, 7, 31).unwrap());

    assert!(parse_expenses("").unwrap().is_empty());
    assert!(parse_expenses("null").unwrap().is_empty());
    assert!(matches!(
        parse_expenses(r#"{"not":"a list"}"#),
        Err(ClientError::MalformedResponse(_))
    ));
}

fn months(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn gather_runs_all_months_and_keeps_order() {
    let in_flight = Cell::new(0usize);
    let peak = Cell::new(0usize);
    let ms = months(&["2025-01", "2025-02", "2025-03"]);

    let results = gather(&ms, |m| {
        let in_flight = &in_flight;
        let peak = &peak;
        async move {
            in_flight.set(in_flight.get() + 1);
            peak.set(peak.get().max(in_flight.get()));
            // later months finish first
            let wait = match m.as_str() {
                "2025-01" => 30,
                "2025-02" => 20,
                _ => 10,
            };
            tokio::time::sleep(Duration::from_millis(wait)).await;
            in_flight.set(in_flight.get() - 1);
            Ok::<_, ClientError>(m.len())
        }
    })
    .await;

    let order: Vec<_> = results.iter().map(|(m, _)| m.clone()).collect();
    assert_eq!(order, ms);
    assert!(results.iter().all(|(_, r)| r.is_ok()));
    assert_eq!(peak.get(), 3, "all requests were in flight together");
}

#[tokio::test]
async fn one_failed_month_does_not_sink_the_batch() {
    let ms = months(&["2025-01", "2025-02", "2025-03"]);
    let results = gather(&ms, |m| async move {
        if m == "2025-02" {
            Err(ClientError::RequestFailed {
                status: 500,
                message: "boom".into(),
            })
        } else {
            Ok(BudgetRecord {
                month: m,
                limit_amount: Decimal::from(100),
                spent_amount: Decimal::from(10),
            })
        }
    })
    .await;

    let batch = settle(results, |m| BudgetRecord::zero(m));
    assert_eq!(batch.records.len(), 3);
    assert_eq!(batch.degraded, 1);
    assert!(!batch.unauthorized);
    assert_eq!(batch.records[1], BudgetRecord::zero("2025-02"));
    assert_eq!(batch.records[0].limit_amount, Decimal::from(100));
    assert_eq!(batch.records[2].month, "2025-03");
}

#[tokio::test]
async fn forbidden_month_flags_the_batch() {
    let ms = months(&["2025-01", "2025-02"]);
    let results = gather(&ms, |m| async move {
        if m == "2025-01" {
            Err(ClientError::Unauthorized)
        } else {
            Ok(Vec::<u8>::new())
        }
    })
    .await;
    let batch = settle(results, |_| Vec::new());
    assert!(batch.unauthorized);
    assert_eq!(batch.degraded, 1);
    assert_eq!(batch.records.len(), 2);
}

#[tokio::test]
async fn unreachable_server_is_a_connection_error() {
    // nothing listens on port 9 of the loopback interface
    let client = ApiClient::new(
        "http://127.0.0.1:9/",
        AuthGate::new(MemorySessionStore::with_token("0123456789abcdef")),
    )
    .unwrap();
    assert_eq!(client.base_url(), "http://127.0.0.1:9");

    let err = client.budget("2025-08").await.unwrap_err();
    assert!(matches!(err, ClientError::Connection(_)));
    assert_eq!(err.user_message(), "Unable to connect to server");
    // a transport failure is not a session expiry
    assert!(client.gate().is_authenticated());

    let batch = client.budgets_for(&months(&["2025-07", "2025-08"])).await;
    assert_eq!(batch.degraded, 2);
    assert!(!batch.unauthorized);
    assert!(batch.records.iter().all(|b| b.limit_amount.is_zero()));
}
