//! Dev sandbox: wires the service against the in-memory store, seeds two
//! users, and walks a deposit → transfer → balance round trip.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};

use finbook_core::Money;
use finbook_ledger::UserDraft;
use finbook_service::{AppConfig, AppContext, telemetry};
use finbook_store::UserStore;

fn main() -> Result<()> {
    telemetry::init();

    let config = AppConfig::from_env();
    let ctx = AppContext::in_memory(&config);

    let alice = ctx
        .store
        .create_user(UserDraft::new("alice", "alice@example.com", "<hashed>"))
        .context("seed alice")?;
    let bob = ctx
        .store
        .create_user(UserDraft::new("bob", "bob@example.com", "<hashed>"))
        .context("seed bob")?;

    let now = Utc::now();
    let alice_token = ctx
        .authenticator
        .mint(alice.id, now, Duration::hours(1))
        .context("mint alice credential")?;
    let bob_token = ctx
        .authenticator
        .mint(bob.id, now, Duration::hours(1))
        .context("mint bob credential")?;

    ctx.service
        .deposit(&alice_token, Money::from_minor_units(10_000), "salary")?;
    ctx.service.transfer(
        &alice_token,
        bob.id,
        Money::from_minor_units(2_500),
        "rent share",
    )?;

    for (name, token) in [("alice", &alice_token), ("bob", &bob_token)] {
        let view = ctx.service.get_balance(token)?;
        println!("{name}: {}", serde_json::to_string_pretty(&view)?);
    }

    Ok(())
}
