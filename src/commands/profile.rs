// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing::warn;

use super::require_login;
use crate::api::ApiClient;
use crate::error::ClientError;
use crate::models::UserProfile;
use crate::session::SessionStore;
use crate::utils::{maybe_print_json, pretty_table};

/// Server profile, or the locally stored username when the server cannot
/// provide one. A 403 is still passed up.
pub async fn fetch_profile<S: SessionStore>(
    client: &ApiClient<S>,
) -> Result<UserProfile, ClientError> {
    match client.me().await {
        Ok(p) => Ok(p),
        Err(ClientError::Unauthorized) => Err(ClientError::Unauthorized),
        Err(err) => {
            warn!(error = %err, "profile endpoint unavailable, using stored username");
            Ok(UserProfile {
                username: client
                    .gate()
                    .store()
                    .username()
                    .unwrap_or_else(|| "User".to_string()),
                email: None,
            })
        }
    }
}

pub async fn handle<S: SessionStore>(client: &ApiClient<S>, sub: &clap::ArgMatches) -> Result<()> {
    require_login(client)?;
    let profile = fetch_profile(client).await?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &profile)? {
        let rows = vec![
            vec!["Username".to_string(), profile.username.clone()],
            vec![
                "Email".to_string(),
                profile.email.clone().unwrap_or_else(|| "-".into()),
            ],
        ];
        println!("{}", pretty_table(&["Field", "Value"], rows));
    }
    Ok(())
}
