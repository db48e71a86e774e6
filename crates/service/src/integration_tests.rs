//! Cross-component scenarios: credential → guard → service → store.

use std::sync::Arc;

use chrono::{Duration, Utc};

use finbook_auth::AuthError;
use finbook_core::{Money, StatementId, UserId};
use finbook_ledger::{Operation, User, UserDraft};
use finbook_store::UserStore;

use crate::context::{AppConfig, AppContext};
use crate::error::ServiceError;

struct Harness {
    ctx: AppContext,
    alice: User,
    bob: User,
    alice_token: String,
    bob_token: String,
}

fn harness() -> Harness {
    let config = AppConfig {
        jwt_secret: "test-secret".to_string(),
    };
    let ctx = AppContext::in_memory(&config);

    let alice = ctx
        .store
        .create_user(UserDraft::new("alice", "alice@test.com", "hash"))
        .unwrap();
    let bob = ctx
        .store
        .create_user(UserDraft::new("bob", "bob@test.com", "hash"))
        .unwrap();

    let now = Utc::now();
    let alice_token = ctx
        .authenticator
        .mint(alice.id, now, Duration::hours(1))
        .unwrap();
    let bob_token = ctx
        .authenticator
        .mint(bob.id, now, Duration::hours(1))
        .unwrap();

    Harness {
        ctx,
        alice,
        bob,
        alice_token,
        bob_token,
    }
}

fn cents(v: i64) -> Money {
    Money::from_minor_units(v)
}

#[test]
fn deposited_statement_is_retrievable_by_its_owner() {
    let h = harness();

    let deposited = h
        .ctx
        .service
        .deposit(&h.alice_token, cents(10_000), "test 1")
        .unwrap();

    let fetched = h
        .ctx
        .service
        .get_statement(&h.alice_token, deposited.id)
        .unwrap();

    assert_eq!(fetched, deposited);
    assert_eq!(fetched.user_id, h.alice.id);
    assert_eq!(fetched.operation, Operation::Deposit);
    assert_eq!(fetched.amount, cents(10_000));
    assert_eq!(fetched.description, "test 1");
}

#[test]
fn deposit_then_withdraw_restores_the_prior_balance() {
    let h = harness();

    h.ctx
        .service
        .deposit(&h.alice_token, cents(5_000), "start")
        .unwrap();
    let before = h.ctx.service.get_balance(&h.alice_token).unwrap().balance;

    h.ctx
        .service
        .deposit(&h.alice_token, cents(1_234), "in")
        .unwrap();
    h.ctx
        .service
        .withdraw(&h.alice_token, cents(1_234), "out")
        .unwrap();

    assert_eq!(
        h.ctx.service.get_balance(&h.alice_token).unwrap().balance,
        before
    );
}

#[test]
fn withdrawing_the_exact_balance_reaches_zero() {
    let h = harness();

    h.ctx
        .service
        .deposit(&h.alice_token, cents(777), "all of it")
        .unwrap();
    h.ctx
        .service
        .withdraw(&h.alice_token, cents(777), "gone")
        .unwrap();

    assert_eq!(
        h.ctx.service.get_balance(&h.alice_token).unwrap().balance,
        Money::ZERO
    );
}

#[test]
fn overdraw_fails_and_writes_nothing() {
    let h = harness();

    h.ctx
        .service
        .deposit(&h.alice_token, cents(100), "small")
        .unwrap();

    let err = h
        .ctx
        .service
        .withdraw(&h.alice_token, cents(101), "too much")
        .unwrap_err();
    assert!(matches!(err, ServiceError::InsufficientFunds));

    let view = h.ctx.service.get_balance(&h.alice_token).unwrap();
    assert_eq!(view.balance, cents(100));
    assert_eq!(view.statements.len(), 1);
}

#[test]
fn non_positive_amounts_are_always_rejected() {
    let h = harness();
    h.ctx
        .service
        .deposit(&h.alice_token, cents(10_000), "funds")
        .unwrap();

    for amount in [cents(0), cents(-500)] {
        assert!(matches!(
            h.ctx.service.deposit(&h.alice_token, amount, "x"),
            Err(ServiceError::InvalidAmount)
        ));
        assert!(matches!(
            h.ctx.service.withdraw(&h.alice_token, amount, "x"),
            Err(ServiceError::InvalidAmount)
        ));
        assert!(matches!(
            h.ctx.service.transfer(&h.alice_token, h.bob.id, amount, "x"),
            Err(ServiceError::InvalidAmount)
        ));
    }

    assert_eq!(
        h.ctx.service.get_balance(&h.alice_token).unwrap().statements.len(),
        1
    );
}

#[test]
fn transfer_moves_the_amount_between_both_ledgers() {
    let h = harness();

    h.ctx
        .service
        .deposit(&h.alice_token, cents(10_000), "seed")
        .unwrap();

    let receipt = h
        .ctx
        .service
        .transfer(&h.alice_token, h.bob.id, cents(2_500), "rent share")
        .unwrap();

    assert_eq!(receipt.sender.user_id, h.alice.id);
    assert_eq!(
        receipt.sender.operation,
        Operation::TransferSent {
            counterpart: h.bob.id
        }
    );
    assert_eq!(receipt.receiver.user_id, h.bob.id);
    assert_eq!(
        receipt.receiver.operation,
        Operation::TransferReceived {
            counterpart: h.alice.id
        }
    );

    let alice_view = h.ctx.service.get_balance(&h.alice_token).unwrap();
    let bob_view = h.ctx.service.get_balance(&h.bob_token).unwrap();
    assert_eq!(alice_view.balance, cents(7_500));
    assert_eq!(bob_view.balance, cents(2_500));
    // Exactly two entries exist for the transfer: one per participant.
    assert_eq!(alice_view.statements.len(), 2);
    assert_eq!(bob_view.statements.len(), 1);
}

#[test]
fn transfer_preconditions_commit_nothing() {
    let h = harness();
    h.ctx
        .service
        .deposit(&h.alice_token, cents(1_000), "seed")
        .unwrap();

    assert!(matches!(
        h.ctx
            .service
            .transfer(&h.alice_token, h.alice.id, cents(100), "to me"),
        Err(ServiceError::SelfTransfer)
    ));
    assert!(matches!(
        h.ctx
            .service
            .transfer(&h.alice_token, UserId::new(), cents(100), "to nobody"),
        Err(ServiceError::UserNotFound)
    ));
    assert!(matches!(
        h.ctx
            .service
            .transfer(&h.alice_token, h.bob.id, cents(1_001), "too much"),
        Err(ServiceError::InsufficientFunds)
    ));

    assert_eq!(
        h.ctx.service.get_balance(&h.alice_token).unwrap().statements.len(),
        1
    );
    assert!(h.ctx.service.get_balance(&h.bob_token).unwrap().statements.is_empty());
}

#[test]
fn another_users_statement_answers_not_found() {
    let h = harness();

    let alices = h
        .ctx
        .service
        .deposit(&h.alice_token, cents(10_000), "private")
        .unwrap();

    // Bob probing Alice's id gets the same answer as probing a random one:
    // not found, never permission denied.
    let err = h
        .ctx
        .service
        .get_statement(&h.bob_token, alices.id)
        .unwrap_err();
    assert!(matches!(err, ServiceError::StatementNotFound));
    assert_eq!(err.to_string(), "Statement not found");

    let err = h
        .ctx
        .service
        .get_statement(&h.bob_token, StatementId::new())
        .unwrap_err();
    assert!(matches!(err, ServiceError::StatementNotFound));
}

#[test]
fn credential_for_a_nonexistent_user_fails_user_not_found() {
    let h = harness();

    let deposited = h
        .ctx
        .service
        .deposit(&h.alice_token, cents(200), "test")
        .unwrap();

    // Structurally valid token, but the subject was never registered.
    let ghost_token = h
        .ctx
        .authenticator
        .mint(UserId::new(), Utc::now(), Duration::hours(1))
        .unwrap();

    let err = h
        .ctx
        .service
        .get_statement(&ghost_token, deposited.id)
        .unwrap_err();
    assert!(matches!(err, ServiceError::UserNotFound));
    assert_eq!(err.to_string(), "User not found");

    assert!(matches!(
        h.ctx.service.get_balance(&ghost_token),
        Err(ServiceError::UserNotFound)
    ));
}

#[test]
fn bad_credentials_never_reach_the_ledger() {
    let h = harness();

    assert!(matches!(
        h.ctx.service.get_balance("not-a-token"),
        Err(ServiceError::InvalidCredential(AuthError::Malformed(_)))
    ));

    let expired = h
        .ctx
        .authenticator
        .mint(h.alice.id, Utc::now() - Duration::hours(2), Duration::hours(1))
        .unwrap();
    assert!(matches!(
        h.ctx.service.deposit(&expired, cents(100), "late"),
        Err(ServiceError::InvalidCredential(AuthError::Expired))
    ));
}

#[test]
fn concurrent_withdrawals_allow_exactly_one_winner() {
    let h = harness();
    let starting = cents(10_000);
    h.ctx
        .service
        .deposit(&h.alice_token, starting, "seed")
        .unwrap();

    let ctx = Arc::new(h.ctx);
    let threads = 8;

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let ctx = ctx.clone();
            let token = h.alice_token.clone();
            std::thread::spawn(move || ctx.service.withdraw(&token, starting, "race"))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|t| t.join().unwrap()).collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for r in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(r, Err(ServiceError::InsufficientFunds)));
    }

    let view = ctx.service.get_balance(&h.alice_token).unwrap();
    assert_eq!(view.balance, Money::ZERO);
    // One deposit, one committed withdrawal; the losers wrote nothing.
    assert_eq!(view.statements.len(), 2);
}

#[test]
fn history_is_returned_in_creation_order() {
    let h = harness();

    for (amount, desc) in [(100, "a"), (200, "b"), (300, "c")] {
        h.ctx
            .service
            .deposit(&h.alice_token, cents(amount), desc)
            .unwrap();
    }
    h.ctx
        .service
        .withdraw(&h.alice_token, cents(50), "d")
        .unwrap();

    let view = h.ctx.service.get_balance(&h.alice_token).unwrap();
    let descriptions: Vec<&str> = view.statements.iter().map(|s| s.description.as_str()).collect();
    assert_eq!(descriptions, vec!["a", "b", "c", "d"]);
    assert_eq!(view.balance, cents(550));
}
