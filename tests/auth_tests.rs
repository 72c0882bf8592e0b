// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::RefCell;

use finally::auth::{
    is_valid_token, AuthGate, AUTHORIZATION, CONTENT_TYPE, LOGIN_ROUTE, SESSION_EXPIRED,
};
use finally::session::{MemorySessionStore, SessionStore};

#[test]
fn token_validity_rules() {
    assert!(!is_valid_token(""));
    assert!(!is_valid_token("            "));
    assert!(!is_valid_token("null"));
    assert!(!is_valid_token("undefined"));
    assert!(!is_valid_token("abcdefghij")); // exactly 10
    assert!(is_valid_token("abcdefghijk")); // 11
    assert!(is_valid_token("eyJhbGciOiJIUzI1NiJ9.payload.sig"));
}

#[test]
fn no_token_means_not_authenticated() {
    let gate = AuthGate::new(MemorySessionStore::new());
    assert!(!gate.is_authenticated());
}

#[test]
fn short_placeholder_token_is_not_authenticated() {
    let store = MemorySessionStore::new();
    store.set_session("abcde", "eve").unwrap();
    let gate = AuthGate::new(store);
    // a token key exists but it is too short to be real
    assert!(gate.store().token().is_some());
    assert!(!gate.is_authenticated());
}

#[test]
fn real_token_is_authenticated() {
    let gate = AuthGate::new(MemorySessionStore::with_token("0123456789abcdef"));
    assert!(gate.is_authenticated());
}

#[test]
fn headers_always_carry_content_type() {
    let gate = AuthGate::new(MemorySessionStore::new());
    let h = gate.build_auth_headers();
    assert_eq!(h.get(CONTENT_TYPE).map(String::as_str), Some("application/json"));
    assert!(!h.contains_key(AUTHORIZATION));
}

#[test]
fn headers_attach_token_without_validating_it() {
    let gate = AuthGate::new(MemorySessionStore::with_token("null"));
    let h = gate.build_auth_headers();
    assert_eq!(h.get(AUTHORIZATION).map(String::as_str), Some("Bearer null"));
    assert_eq!(h.len(), 2);

    let gate = AuthGate::new(MemorySessionStore::with_token("0123456789abcdef"));
    assert_eq!(
        gate.build_auth_headers().get(AUTHORIZATION).map(String::as_str),
        Some("Bearer 0123456789abcdef")
    );
}

#[test]
fn handle_unauthorized_clears_then_notifies_then_redirects() {
    let store = MemorySessionStore::new();
    store.set_session("0123456789abcdef", "frank").unwrap();
    let gate = AuthGate::new(store);

    let events = RefCell::new(Vec::new());
    gate.handle_unauthorized(
        |n| {
            assert!(gate.store().token().is_none(), "cleared before notify");
            events.borrow_mut().push(format!("notify:{}", n.title));
        },
        |route| events.borrow_mut().push(format!("redirect:{}", route)),
    );
    assert_eq!(
        events.into_inner(),
        vec![
            format!("notify:{}", SESSION_EXPIRED.title),
            format!("redirect:{}", LOGIN_ROUTE),
        ]
    );
    assert!(!gate.is_authenticated());
    assert!(gate.store().username().is_none());
}

#[test]
fn handle_unauthorized_is_idempotent() {
    let gate = AuthGate::new(MemorySessionStore::with_token("0123456789abcdef"));
    let mut runs = Vec::new();
    for _ in 0..2 {
        let seen = RefCell::new(Vec::new());
        gate.handle_unauthorized(
            |n| seen.borrow_mut().push(n.description.to_string()),
            |r| seen.borrow_mut().push(r.to_string()),
        );
        assert!(gate.store().token().is_none());
        runs.push(seen.into_inner());
    }
    assert_eq!(runs[0], runs[1]);
    assert_eq!(runs[0], vec!["Please log in again".to_string(), "/login".to_string()]);
}

#[test]
fn logout_returns_to_anonymous() {
    let gate = AuthGate::new(MemorySessionStore::with_token("0123456789abcdef"));
    assert!(gate.is_authenticated());
    gate.logout().unwrap();
    assert!(!gate.is_authenticated());
    assert!(!gate.build_auth_headers().contains_key(AUTHORIZATION));
}
