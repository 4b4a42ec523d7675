//! Failure modes: guard rejections, transactional rollback on
//! collaborator failure, and reentrancy from a hostile ledger callback.

use assert_matches::assert_matches;
use sluice_e2e_tests::{account, asset, Bench, ReenteringLedger, DEADLINE, START_TIME};
use sluice_engine::{
    AmmEngine, AmmError, AssetTransfer, Clock, EngineConfig, ManualClock,
};
use std::sync::Arc;

#[test]
fn guard_rejections_precede_any_state_change() {
    let bench = Bench::new();
    let lp = account(0xA1);
    bench.fund(lp, asset(1), asset(2), 1_000_000);

    // deadline in the past
    bench.clock.set(START_TIME + 10_000);
    assert_matches!(
        bench
            .engine
            .swap_exact_tokens_for_tokens(lp, 1, 0, &[asset(1), asset(2)], lp, DEADLINE),
        Err(AmmError::Expired { .. })
    );
    bench.clock.set(START_TIME);

    // malformed paths and identities
    assert_matches!(
        bench
            .engine
            .swap_exact_tokens_for_tokens(lp, 1, 0, &[asset(1)], lp, DEADLINE),
        Err(AmmError::InvalidPath { len: 1 })
    );
    assert_matches!(
        bench
            .engine
            .add_liquidity(lp, asset(1), asset(1), 1, 1, 0, 0, lp, DEADLINE),
        Err(AmmError::IdenticalAddresses)
    );
    assert_matches!(
        bench
            .engine
            .add_liquidity(lp, asset(1), asset(2), 1, 1, 0, 0, account(0), DEADLINE),
        Err(AmmError::ZeroAddress)
    );

    // nothing was created, nothing emitted
    assert_eq!(bench.engine.stats().total_pools, 0);
    assert!(bench.drain_events().is_empty());
}

#[test]
fn swap_against_unknown_pool_reports_no_liquidity() {
    let bench = Bench::new();
    let trader = account(0xA2);
    bench.fund(trader, asset(1), asset(2), 1_000);

    assert_matches!(
        bench
            .engine
            .swap_exact_tokens_for_tokens(trader, 100, 0, &[asset(1), asset(2)], trader, DEADLINE),
        Err(AmmError::InsufficientLiquidity)
    );
}

#[test]
fn inbound_transfer_failure_aborts_before_commit() {
    let bench = Bench::new();
    let lp = account(0xA1);
    bench.fund(lp, asset(1), asset(2), 1_000_000);
    bench
        .engine
        .add_liquidity(lp, asset(1), asset(2), 10_000, 10_000, 0, 0, lp, DEADLINE)
        .unwrap();

    let trader = account(0xA2);
    bench.ledger.mint(asset(1), trader, 1_000);
    bench.ledger.set_failing(asset(1), true);

    assert_matches!(
        bench
            .engine
            .swap_exact_tokens_for_tokens(trader, 500, 0, &[asset(1), asset(2)], trader, DEADLINE),
        Err(AmmError::TransferFailed { .. })
    );

    bench.ledger.set_failing(asset(1), false);
    assert_eq!(
        bench.engine.get_pool_info(asset(1), asset(2)).unwrap(),
        (10_000, 10_000, 10_000)
    );
    assert_eq!(bench.ledger.balance_of(asset(1), trader), 1_000);
}

#[test]
fn outbound_transfer_failure_rolls_back_the_burn() {
    let bench = Bench::new();
    let lp = account(0xA1);
    bench.fund(lp, asset(1), asset(2), 1_000_000);
    let (_, _, shares) = bench
        .engine
        .add_liquidity(lp, asset(1), asset(2), 10_000, 10_000, 0, 0, lp, DEADLINE)
        .unwrap();

    // the first outbound leg of the withdrawal refuses to move
    bench.ledger.set_failing(asset(1), true);
    assert_matches!(
        bench
            .engine
            .remove_liquidity(lp, asset(1), asset(2), shares, 0, 0, lp, DEADLINE),
        Err(AmmError::TransferFailed { .. })
    );
    bench.ledger.set_failing(asset(1), false);

    // shares and reserves restored; a retry succeeds in full
    assert_eq!(
        bench.engine.get_share_balance(lp, asset(1), asset(2)).unwrap(),
        shares
    );
    let (out_a, out_b) = bench
        .engine
        .remove_liquidity(lp, asset(1), asset(2), shares, 0, 0, lp, DEADLINE)
        .unwrap();
    assert_eq!((out_a, out_b), (10_000, 10_000));

    // one add + one successful remove
    assert_eq!(bench.drain_events().len(), 2);
}

#[test]
fn callback_reentry_is_rejected_and_outer_swap_completes() {
    let ledger = Arc::new(ReenteringLedger::new());
    let clock = Arc::new(ManualClock::at(START_TIME));
    let engine = Arc::new(AmmEngine::new(
        EngineConfig::default(),
        Arc::clone(&ledger) as Arc<dyn AssetTransfer>,
        Arc::clone(&clock) as Arc<dyn Clock>,
    ));
    ledger.attach_engine(Arc::clone(&engine));

    let lp = account(0xA1);
    let trader = account(0xA2);
    ledger.inner().mint(asset(1), lp, 1_000_000);
    ledger.inner().mint(asset(2), lp, 1_000_000);
    ledger.inner().mint(asset(1), trader, 10_000);

    engine
        .add_liquidity(lp, asset(1), asset(2), 100_000, 100_000, 0, 0, lp, DEADLINE)
        .unwrap();

    // arm the callback on the swap's outbound asset
    ledger.reenter_on(asset(2), vec![asset(1), asset(2)]);
    let (_, out) = engine
        .swap_exact_tokens_for_tokens(trader, 1_000, 0, &[asset(1), asset(2)], trader, DEADLINE)
        .unwrap();
    assert!(out > 0);

    // the nested call fired, saw a committed pool, and was turned away
    let observed = ledger.observed();
    assert_eq!(observed.len(), 1);
    assert_eq!(observed[0], Err(AmmError::Reentrant));

    // outer trade settled exactly once
    assert_eq!(ledger.inner().balance_of(asset(2), trader), out);
}
