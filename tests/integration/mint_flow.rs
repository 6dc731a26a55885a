//! Mint submission: success, failure, cleanup and non-reentrancy.

use num_bigint::BigUint;

use jetton_minter::domain::{
    amount::HumanAmount,
    mint::{DialogState, GENERIC_FAILURE, MintOutcome, Skipped, TxState},
    notification::Severity,
    token::TokenContext,
};

use super::{Behavior, Harness, MASTER, admin_context};

#[tokio::test]
async fn test_successful_mint() {
    let mut h = Harness::new(admin_context(), Behavior::Succeed);
    h.enter("5");

    h.controller.submit().await.unwrap();

    assert_eq!(
        h.deployer.calls(),
        vec![(MASTER, BigUint::from(5_000_000_000u64))]
    );
    assert_eq!(h.controller.dialog(), DialogState::Closed);
    assert_eq!(h.controller.tx_state(), TxState::Idle);
    assert_eq!(h.store.refreshes(), 1);

    let all = h.notifier.all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].severity, Severity::Success);
    assert_eq!(all[0].content, "Successfully minted 5 ABC");

    // Draft is discarded after a successful mint.
    assert_eq!(h.controller.amount(), None);
}

#[tokio::test]
async fn test_success_message_groups_large_amounts() {
    let mut h = Harness::new(admin_context(), Behavior::Succeed);
    h.enter("1234567.25");

    h.controller.submit().await.unwrap();

    assert_eq!(
        h.deployer.calls()[0].1,
        BigUint::from(1_234_567_250_000_000u64)
    );
    assert_eq!(
        h.notifier.of(Severity::Success)[0].content,
        "Successfully minted 1,234,567.25 ABC"
    );
}

#[tokio::test]
async fn test_failed_mint_keeps_dialog_and_draft() {
    let mut h = Harness::new(
        admin_context(),
        Behavior::Fail("insufficient balance".to_string()),
    );
    h.enter("5");

    h.controller.submit().await.unwrap();

    assert_eq!(h.deployer.calls().len(), 1);
    let all = h.notifier.all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].severity, Severity::Error);
    assert_eq!(all[0].content, "insufficient balance");

    assert_eq!(h.controller.dialog(), DialogState::Open);
    assert!(h.controller.dialog_visible());
    assert_eq!(h.controller.amount(), Some(&HumanAmount::from_units(5)));
    assert_eq!(h.store.refreshes(), 0);
}

#[tokio::test]
async fn test_panicking_deployer_reports_generic_error() {
    let mut h = Harness::new(admin_context(), Behavior::Panic);
    h.enter("5");

    h.controller.submit().await.unwrap();

    let errors = h.notifier.of(Severity::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].content, GENERIC_FAILURE);
    assert_eq!(h.controller.tx_state(), TxState::Idle);
    assert_eq!(h.controller.dialog(), DialogState::Open);
}

#[tokio::test]
async fn test_missing_connection_reports_error() {
    let mut h = Harness::build(admin_context(), Behavior::Succeed, false);
    h.enter("5");

    h.controller.submit().await.unwrap();

    assert!(h.deployer.calls().is_empty());
    let errors = h.notifier.of(Severity::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].content, "Wallet is not connected");
    assert_eq!(h.controller.tx_state(), TxState::Idle);
}

#[tokio::test]
async fn test_every_outcome_settles_once() {
    let behaviors = [
        Behavior::Succeed,
        Behavior::Fail("chain rejected".to_string()),
        Behavior::Panic,
    ];

    for behavior in behaviors {
        let mut h = Harness::new(admin_context(), behavior);
        h.enter("2");

        let job = h.controller.begin_submit().unwrap();
        assert_eq!(h.controller.tx_state(), TxState::Submitting);
        assert!(h.controller.loader_visible());
        assert!(!h.controller.dialog_visible());

        let outcome = job.run().await;
        h.controller.finish_submit(outcome.clone());
        assert_eq!(h.controller.tx_state(), TxState::Idle);
        assert_eq!(h.controller.settled_attempts(), 1);

        // A stray second outcome does not settle again.
        h.controller.finish_submit(outcome);
        assert_eq!(h.controller.settled_attempts(), 1);
        assert_eq!(h.notifier.all().len(), 1);
    }
}

#[tokio::test]
async fn test_second_submit_while_in_flight_is_busy() {
    let mut h = Harness::new(admin_context(), Behavior::Succeed);
    h.enter("3");

    let job = h.controller.begin_submit().unwrap();
    assert!(matches!(h.controller.begin_submit(), Err(Skipped::Busy)));

    // Cancel and open are ignored while submitting.
    h.controller.close();
    assert_eq!(h.controller.dialog(), DialogState::Open);
    assert_eq!(h.controller.amount(), Some(&HumanAmount::from_units(3)));

    let outcome = job.run().await;
    h.controller.finish_submit(outcome);

    assert_eq!(h.deployer.calls().len(), 1);
    assert_eq!(h.notifier.of(Severity::Success).len(), 1);
}

#[tokio::test]
async fn test_spawned_job_reports_back() {
    let mut h = Harness::new(admin_context(), Behavior::Succeed);
    h.enter("7");

    let job = h.controller.begin_submit().unwrap();
    let outcome = tokio::spawn(job.run()).await.unwrap();
    assert_eq!(
        outcome,
        MintOutcome::Minted {
            amount: HumanAmount::from_units(7),
            symbol: "ABC".to_string(),
        }
    );

    h.controller.finish_submit(outcome);
    assert_eq!(h.controller.dialog(), DialogState::Closed);
}

#[tokio::test]
async fn test_retry_after_failure() {
    let mut h = Harness::new(admin_context(), Behavior::Fail("timeout".to_string()));
    h.enter("4");
    h.controller.submit().await.unwrap();
    assert_eq!(h.controller.dialog(), DialogState::Open);

    *h.deployer.behavior.lock().unwrap() = Behavior::Succeed;
    h.controller.submit().await.unwrap();

    assert_eq!(h.deployer.calls().len(), 2);
    assert_eq!(h.controller.settled_attempts(), 2);
    assert_eq!(h.controller.dialog(), DialogState::Closed);
    assert_eq!(h.notifier.of(Severity::Error).len(), 1);
    assert_eq!(h.notifier.of(Severity::Success).len(), 1);
}

#[tokio::test]
async fn test_visibility_rechecked_after_mint() {
    let mut h = Harness::new(admin_context(), Behavior::Succeed);
    h.enter("1");
    h.controller.submit().await.unwrap();

    // Ownership moved away while the refresh landed.
    h.store.set(TokenContext {
        is_admin: false,
        ..admin_context()
    });
    assert!(!h.controller.is_visible());
    h.controller.open();
    assert_eq!(h.controller.dialog(), DialogState::Closed);
}

#[tokio::test]
async fn test_fractional_amount_uses_token_decimals() {
    let mut h = Harness::new(
        TokenContext {
            decimals: Some(2),
            ..admin_context()
        },
        Behavior::Succeed,
    );
    h.enter("0.125");

    h.controller.submit().await.unwrap();

    // 12.5 base units rounds half-up to 13.
    assert_eq!(h.deployer.calls()[0].1, BigUint::from(13u32));
}
