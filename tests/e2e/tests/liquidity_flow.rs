//! Liquidity lifecycle: deposits, proportional follow-on mints, partial
//! and full exits, and the pool cycling between active and empty.

use assert_matches::assert_matches;
use sluice_e2e_tests::{account, asset, Bench, DEADLINE};
use sluice_engine::{AmmError, PoolEvent};

#[test]
fn deposit_then_full_exit_round_trip() {
    let bench = Bench::new();
    let lp = account(0xA1);
    bench.fund(lp, asset(1), asset(2), 1_000_000);

    let (a, b, shares) = bench
        .engine
        .add_liquidity(lp, asset(1), asset(2), 10_000, 5, 0, 0, lp, DEADLINE)
        .unwrap();
    assert_eq!((a, b, shares), (10_000, 5, 223));

    let (out_a, out_b) = bench
        .engine
        .remove_liquidity(lp, asset(1), asset(2), shares, 0, 0, lp, DEADLINE)
        .unwrap();

    // never more than deposited, and a full burn empties the pool
    assert!(out_a <= a && out_b <= b);
    assert_eq!(bench.engine.get_pool_info(asset(1), asset(2)).unwrap(), (0, 0, 0));
    assert!(bench.ledger.balance_of(asset(1), lp) <= 1_000_000);
    assert!(bench.ledger.balance_of(asset(2), lp) <= 1_000_000);
}

#[test]
fn second_depositor_mints_proportionally() {
    let bench = Bench::new();
    let first = account(0xA1);
    let second = account(0xA2);
    bench.fund(first, asset(1), asset(2), 1_000_000);
    bench.fund(second, asset(1), asset(2), 1_000_000);

    bench
        .engine
        .add_liquidity(first, asset(1), asset(2), 1_000, 2_000, 0, 0, first, DEADLINE)
        .unwrap();

    // desired B overshoots the ratio; the engine trims it to 400
    let (a, b, shares) = bench
        .engine
        .add_liquidity(second, asset(1), asset(2), 200, 900, 0, 0, second, DEADLINE)
        .unwrap();
    assert_eq!((a, b), (200, 400));
    // 200/1000 of a 1414-share supply
    assert_eq!(shares, 282);

    assert_eq!(
        bench.engine.get_share_balance(second, asset(1), asset(2)).unwrap(),
        282
    );
    assert_eq!(
        bench.engine.get_pool_info(asset(1), asset(2)).unwrap(),
        (1_200, 2_400, 1_696)
    );
}

#[test]
fn pool_cycles_between_active_and_empty() {
    let bench = Bench::new();
    let lp = account(0xA1);
    bench.fund(lp, asset(1), asset(2), 10_000_000);

    for round in 1..=3u128 {
        let amount = 1_000 * round;
        let (_, _, shares) = bench
            .engine
            .add_liquidity(lp, asset(1), asset(2), amount, amount, 0, 0, lp, DEADLINE)
            .unwrap();
        assert_eq!(shares, amount);

        bench
            .engine
            .remove_liquidity(lp, asset(1), asset(2), shares, 0, 0, lp, DEADLINE)
            .unwrap();
        assert_eq!(
            bench.engine.get_pool_info(asset(1), asset(2)).unwrap(),
            (0, 0, 0)
        );
    }

    // still one pool; creation happened once
    assert_eq!(bench.engine.stats().total_pools, 1);
    assert_eq!(bench.engine.stats().total_operations, 6);
}

#[test]
fn liquidity_events_are_emitted_exactly_once() {
    let bench = Bench::new();
    let lp = account(0xA1);
    bench.fund(lp, asset(1), asset(2), 1_000_000);

    bench
        .engine
        .add_liquidity(lp, asset(1), asset(2), 1_000, 2_000, 0, 0, lp, DEADLINE)
        .unwrap();

    // a failing operation emits nothing
    let err = bench
        .engine
        .remove_liquidity(lp, asset(1), asset(2), 9_999, 0, 0, lp, DEADLINE)
        .unwrap_err();
    assert_matches!(err, AmmError::InsufficientLiquidityBalance { .. });

    bench
        .engine
        .remove_liquidity(lp, asset(1), asset(2), 414, 0, 0, lp, DEADLINE)
        .unwrap();

    let events = bench.drain_events();
    assert_eq!(events.len(), 2);
    assert_matches!(
        &events[0],
        PoolEvent::LiquidityAdded { shares_minted: 1_414, amount_a: 1_000, amount_b: 2_000, .. }
    );
    assert_matches!(
        &events[1],
        PoolEvent::LiquidityRemoved { shares_burned: 414, .. }
    );
    assert_eq!(events[0].account(), lp);
}

#[test]
fn deposit_minimums_protect_against_ratio_drift() {
    let bench = Bench::new();
    let lp = account(0xA1);
    bench.fund(lp, asset(1), asset(2), 1_000_000);

    bench
        .engine
        .add_liquidity(lp, asset(1), asset(2), 1_000, 2_000, 0, 0, lp, DEADLINE)
        .unwrap();

    // optimal B for 100 A is 200, below the stated minimum of 300
    let err = bench
        .engine
        .add_liquidity(lp, asset(1), asset(2), 100, 900, 0, 300, lp, DEADLINE)
        .unwrap_err();
    assert_eq!(err, AmmError::InsufficientAmountB { got: 200, min: 300 });

    // nothing moved, no event
    assert_eq!(
        bench.engine.get_pool_info(asset(1), asset(2)).unwrap(),
        (1_000, 2_000, 1_414)
    );
    assert!(bench.drain_events().len() == 1);
}
