//! Visibility gate, amount validation and dialog lifecycle.

use jetton_minter::domain::{
    amount::HumanAmount,
    mint::{DialogState, Skipped, TxState},
    notification::Severity,
    token::TokenContext,
};

use super::{Behavior, Harness, admin_context};

#[test]
fn test_visible_only_for_admin_owner() {
    for (is_admin, is_my_wallet) in [(false, false), (true, false), (false, true), (true, true)] {
        let ctx = TokenContext {
            is_admin,
            is_my_wallet,
            ..admin_context()
        };
        let mut h = Harness::new(ctx, Behavior::Succeed);
        assert_eq!(h.controller.is_visible(), is_admin && is_my_wallet);

        // A hidden action cannot be opened.
        h.controller.open();
        assert_eq!(
            h.controller.dialog() == DialogState::Open,
            is_admin && is_my_wallet
        );
    }
}

#[test]
fn test_visibility_follows_store_changes() {
    let h = Harness::new(admin_context(), Behavior::Succeed);
    assert!(h.controller.is_visible());

    h.store.set(TokenContext {
        is_my_wallet: false,
        ..admin_context()
    });
    assert!(!h.controller.is_visible());
}

#[tokio::test]
async fn test_hidden_submit_is_skipped_silently() {
    let mut h = Harness::new(
        TokenContext {
            is_admin: false,
            ..admin_context()
        },
        Behavior::Succeed,
    );
    h.controller.set_amount(Some(HumanAmount::from_units(5)));

    assert_eq!(h.controller.submit().await, Err(Skipped::Hidden));
    assert!(h.deployer.calls().is_empty());
    assert!(h.notifier.all().is_empty());
}

#[tokio::test]
async fn test_missing_amount_warns() {
    let mut h = Harness::new(admin_context(), Behavior::Succeed);
    h.controller.open();

    assert_eq!(h.controller.submit().await, Err(Skipped::InvalidAmount));

    assert!(h.deployer.calls().is_empty());
    let warnings = h.notifier.of(Severity::Warning);
    assert_eq!(h.notifier.all().len(), 1);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].content, "Minimum amount of ABC to mint is 1");
    assert_eq!(h.controller.tx_state(), TxState::Idle);
    assert_eq!(h.controller.dialog(), DialogState::Open);
}

#[tokio::test]
async fn test_zero_amount_warns() {
    for zero in ["0", "0.000", "-0"] {
        let mut h = Harness::new(admin_context(), Behavior::Succeed);
        h.enter(zero);

        assert_eq!(h.controller.submit().await, Err(Skipped::InvalidAmount));
        assert!(h.deployer.calls().is_empty());

        let warnings = h.notifier.of(Severity::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].content.contains('1'));
        assert!(warnings[0].content.contains("ABC"));
    }
}

#[tokio::test]
async fn test_negative_amount_warns() {
    let mut h = Harness::new(admin_context(), Behavior::Succeed);
    h.enter("-5");

    assert_eq!(h.controller.submit().await, Err(Skipped::InvalidAmount));
    assert!(h.deployer.calls().is_empty());
    assert_eq!(h.notifier.of(Severity::Warning).len(), 1);
}

#[tokio::test]
async fn test_amount_rounding_to_zero_warns() {
    let mut h = Harness::new(admin_context(), Behavior::Succeed);
    h.enter("0.0000000001");

    assert_eq!(h.controller.submit().await, Err(Skipped::InvalidAmount));
    assert!(h.deployer.calls().is_empty());
    assert_eq!(h.notifier.of(Severity::Warning).len(), 1);
}

#[tokio::test]
async fn test_not_ready_is_skipped() {
    let no_master = TokenContext {
        jetton_master: None,
        ..admin_context()
    };
    let no_decimals = TokenContext {
        decimals: None,
        ..admin_context()
    };

    for ctx in [no_master, no_decimals] {
        let mut h = Harness::new(ctx, Behavior::Succeed);
        h.enter("5");

        assert_eq!(h.controller.submit().await, Err(Skipped::NotReady));
        assert!(h.deployer.calls().is_empty());
        assert!(h.notifier.all().is_empty());
        assert_eq!(h.controller.tx_state(), TxState::Idle);
    }
}

#[test]
fn test_cancel_resets_draft() {
    let mut h = Harness::new(admin_context(), Behavior::Succeed);
    h.enter("12.5");
    assert_eq!(h.controller.dialog(), DialogState::Open);

    h.controller.close();

    assert_eq!(h.controller.dialog(), DialogState::Closed);
    assert_eq!(h.controller.amount(), Some(&HumanAmount::zero()));
    assert!(!h.controller.dialog_visible());
}

#[test]
fn test_reopen_keeps_draft() {
    let mut h = Harness::new(admin_context(), Behavior::Succeed);
    h.controller.close();
    h.controller.open();
    assert_eq!(h.controller.amount(), Some(&HumanAmount::zero()));
    assert!(h.controller.dialog_visible());
}
