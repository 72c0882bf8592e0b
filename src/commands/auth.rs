// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use clap::ArgMatches;

use super::value;
use crate::api::ApiClient;
use crate::session::SessionStore;
use crate::validate;

pub async fn login<S: SessionStore>(client: &ApiClient<S>, sub: &ArgMatches) -> Result<()> {
    let creds = validate::credentials(value(sub, "username"), value(sub, "password"))?;
    client.login(&creds).await?;
    println!("Login Successful: Welcome back, {}!", creds.username);
    Ok(())
}

pub fn logout<S: SessionStore>(client: &ApiClient<S>) -> Result<()> {
    client.gate().logout()?;
    println!("Signed out");
    Ok(())
}

pub async fn register<S: SessionStore>(client: &ApiClient<S>, sub: &ArgMatches) -> Result<()> {
    let reg = validate::registration(
        value(sub, "username"),
        value(sub, "email"),
        value(sub, "password"),
    )?;
    client.register(&reg).await?;
    println!("Registration Successful: Your account has been created. Please sign in.");
    Ok(())
}

pub fn status<S: SessionStore>(client: &ApiClient<S>) -> Result<()> {
    let gate = client.gate();
    if gate.is_authenticated() {
        let who = gate.store().username().unwrap_or_else(|| "(unknown)".into());
        println!("Signed in as {} ({})", who, client.base_url());
    } else {
        println!("Not signed in ({})", client.base_url());
    }
    Ok(())
}
