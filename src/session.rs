// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Session persistence.
//!
//! The store owns the two session values (token, username). It is passed
//! explicitly to the [`AuthGate`](crate::auth::AuthGate); nothing else
//! writes to it.

use anyhow::Result;
use rusqlite::{params, Connection};
use std::sync::Mutex;
use tracing::{info, warn};

use crate::models::Session;
use crate::utils::get_setting;

pub const TOKEN_KEY: &str = "token";
pub const USERNAME_KEY: &str = "username";

pub trait SessionStore {
    /// Persist both values, replacing any prior session.
    fn set_session(&self, token: &str, username: &str) -> Result<()>;
    /// `None` when unset or when the backing storage is unavailable.
    fn token(&self) -> Option<String>;
    fn username(&self) -> Option<String>;
    /// Remove both values. Idempotent.
    fn clear_session(&self) -> Result<()>;

    fn snapshot(&self) -> Session {
        Session {
            token: self.token(),
            username: self.username(),
        }
    }
}

/// Session kept in the `settings` table so it survives across invocations.
pub struct SqliteSessionStore {
    conn: Connection,
}

impl SqliteSessionStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn read(&self, key: &str) -> Option<String> {
        match get_setting(&self.conn, key) {
            Ok(v) => v,
            Err(err) => {
                warn!(key, error = %err, "session read failed");
                None
            }
        }
    }
}

impl SessionStore for SqliteSessionStore {
    fn set_session(&self, token: &str, username: &str) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in [(TOKEN_KEY, token), (USERNAME_KEY, username)] {
            tx.execute(
                "INSERT INTO settings(key, value) VALUES(?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value=excluded.value",
                params![key, value],
            )?;
        }
        tx.commit()?;
        info!(username, "session stored");
        Ok(())
    }

    fn token(&self) -> Option<String> {
        self.read(TOKEN_KEY)
    }

    fn username(&self) -> Option<String> {
        self.read(USERNAME_KEY)
    }

    fn clear_session(&self) -> Result<()> {
        self.conn.execute(
            "DELETE FROM settings WHERE key IN (?1, ?2)",
            params![TOKEN_KEY, USERNAME_KEY],
        )?;
        info!("session cleared");
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            inner: Mutex::new(Session {
                token: Some(token.to_string()),
                username: None,
            }),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn set_session(&self, token: &str, username: &str) -> Result<()> {
        let mut s = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        s.token = Some(token.to_string());
        s.username = Some(username.to_string());
        Ok(())
    }

    fn token(&self) -> Option<String> {
        self.inner.lock().ok().and_then(|s| s.token.clone())
    }

    fn username(&self) -> Option<String> {
        self.inner.lock().ok().and_then(|s| s.username.clone())
    }

    fn clear_session(&self) -> Result<()> {
        let mut s = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        *s = Session::default();
        Ok(())
    }
}
