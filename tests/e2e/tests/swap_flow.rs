//! Swap execution: curve movement, quoting, fee accrual to liquidity
//! providers, and pairwise pool independence.

use assert_matches::assert_matches;
use sluice_e2e_tests::{account, asset, Bench, DEADLINE};
use sluice_engine::PoolEvent;

#[test]
fn executed_swap_matches_the_quote() {
    let bench = Bench::new();
    let lp = account(0xA1);
    let trader = account(0xA2);
    bench.fund(lp, asset(1), asset(2), 1_000_000);
    bench.fund(trader, asset(1), asset(2), 1_000_000);

    bench
        .engine
        .add_liquidity(lp, asset(1), asset(2), 10_000, 5_000, 0, 0, lp, DEADLINE)
        .unwrap();

    let quoted = bench.engine.get_amount_out(1_000, 10_000, 5_000).unwrap();
    let (_, executed) = bench
        .engine
        .swap_exact_tokens_for_tokens(trader, 1_000, quoted, &[asset(1), asset(2)], trader, DEADLINE)
        .unwrap();

    assert_eq!(executed, quoted);
    assert_eq!(executed, 453);
}

#[test]
fn round_trip_swaps_pay_the_fee_twice() {
    let bench = Bench::new();
    let lp = account(0xA1);
    let trader = account(0xA2);
    bench.fund(lp, asset(1), asset(2), 10_000_000);
    bench.fund(trader, asset(1), asset(2), 10_000_000);

    bench
        .engine
        .add_liquidity(lp, asset(1), asset(2), 1_000_000, 1_000_000, 0, 0, lp, DEADLINE)
        .unwrap();

    let (_, got_b) = bench
        .engine
        .swap_exact_tokens_for_tokens(trader, 10_000, 0, &[asset(1), asset(2)], trader, DEADLINE)
        .unwrap();
    let (_, got_a_back) = bench
        .engine
        .swap_exact_tokens_for_tokens(trader, got_b, 0, &[asset(2), asset(1)], trader, DEADLINE)
        .unwrap();

    // the trader ends strictly below its starting input; the difference
    // stays in the pool for the liquidity providers
    assert!(got_a_back < 10_000);
    let (r_a, r_b, _) = bench.engine.get_pool_info(asset(1), asset(2)).unwrap();
    assert!(r_a > 1_000_000 - (10_000 - got_a_back));
    assert!(r_a + r_b > 2_000_000);
}

#[test]
fn fee_accrual_raises_full_exit_value() {
    let bench = Bench::new();
    let lp = account(0xA1);
    let trader = account(0xA2);
    bench.fund(lp, asset(1), asset(2), 10_000_000);
    bench.fund(trader, asset(1), asset(2), 10_000_000);

    let (_, _, shares) = bench
        .engine
        .add_liquidity(lp, asset(1), asset(2), 1_000_000, 1_000_000, 0, 0, lp, DEADLINE)
        .unwrap();

    for _ in 0..10 {
        bench
            .engine
            .swap_exact_tokens_for_tokens(trader, 50_000, 0, &[asset(1), asset(2)], trader, DEADLINE)
            .unwrap();
        let (_, back) = bench
            .engine
            .swap_exact_tokens_for_tokens(trader, 45_000, 0, &[asset(2), asset(1)], trader, DEADLINE)
            .unwrap();
        assert!(back > 0);
    }

    let (out_a, out_b) = bench
        .engine
        .remove_liquidity(lp, asset(1), asset(2), shares, 0, 0, lp, DEADLINE)
        .unwrap();
    // accumulated fees mean the exit is worth more than the deposit
    assert!(out_a + out_b > 2_000_000);
}

#[test]
fn pools_are_pairwise_independent() {
    let bench = Bench::new();
    let lp = account(0xA1);
    for a in [1u8, 2, 3] {
        bench.ledger.mint(asset(a), lp, 10_000_000);
    }

    bench
        .engine
        .add_liquidity(lp, asset(1), asset(2), 10_000, 10_000, 0, 0, lp, DEADLINE)
        .unwrap();
    bench
        .engine
        .add_liquidity(lp, asset(1), asset(3), 500, 500, 0, 0, lp, DEADLINE)
        .unwrap();

    bench
        .engine
        .swap_exact_tokens_for_tokens(lp, 1_000, 0, &[asset(1), asset(2)], lp, DEADLINE)
        .unwrap();

    // the 1-3 pool never saw the trade
    assert_eq!(bench.engine.get_pool_info(asset(1), asset(3)).unwrap(), (500, 500, 500));
    assert_eq!(bench.engine.stats().total_pools, 2);
}

#[test]
fn swap_events_carry_the_trade() {
    let bench = Bench::new();
    let lp = account(0xA1);
    let trader = account(0xA2);
    let sink = account(0xA3);
    bench.fund(lp, asset(1), asset(2), 1_000_000);
    bench.fund(trader, asset(1), asset(2), 1_000_000);

    bench
        .engine
        .add_liquidity(lp, asset(1), asset(2), 10_000, 5_000, 0, 0, lp, DEADLINE)
        .unwrap();
    bench
        .engine
        .swap_exact_tokens_for_tokens(trader, 1_000, 0, &[asset(1), asset(2)], sink, DEADLINE)
        .unwrap();

    let events = bench.drain_events();
    assert_eq!(events.len(), 2);
    assert_matches!(
        &events[1],
        PoolEvent::Swapped { amount_in: 1_000, amount_out: 453, .. }
    );
    if let PoolEvent::Swapped { account: acting, recipient, asset_in, asset_out, .. } = &events[1] {
        assert_eq!(*acting, trader);
        assert_eq!(*recipient, sink);
        assert_eq!(*asset_in, asset(1));
        assert_eq!(*asset_out, asset(2));
    }

    // the recipient, not the caller, received the output
    assert_eq!(bench.ledger.balance_of(asset(2), sink), 453);
    assert_eq!(bench.ledger.balance_of(asset(2), trader), 1_000_000);
}
