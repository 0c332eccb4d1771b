//! Claim-token deposit, withdrawal and exchange-rate behavior.

mod helpers;

use alloy_primitives::U256;
use helpers::{at, bean, deploy, weth, ALICE, BOB, BORROWER, NOW};
use oni_rs_core::{CallContext, OniError};

#[test]
fn test_mint_burn_round_trip() {
    let mut protocol = deploy();
    let before = protocol.base_balance_of(ALICE).unwrap();

    let claims = protocol.mint(&at(ALICE), bean(1000)).unwrap();
    assert_eq!(claims, bean(1000));
    assert_eq!(protocol.claim_balance_of(ALICE), bean(1000));

    let paid = protocol.burn(&at(ALICE), bean(1000)).unwrap();
    assert_eq!(paid, bean(1000));
    assert_eq!(protocol.base_balance_of(ALICE).unwrap(), before);
    assert_eq!(protocol.claim_balance_of(ALICE), U256::ZERO);
}

#[test]
fn test_rate_follows_donations() {
    let mut protocol = deploy();

    protocol.mint(&at(ALICE), bean(1000)).unwrap();
    assert_eq!(protocol.get_rate().unwrap(), U256::from(1_000_000u64));

    protocol.donate(&at(ALICE), bean(100)).unwrap();
    let rate = protocol.get_rate().unwrap();
    assert_eq!(rate, U256::from(1_100_000u64));

    let expected = bean(1000) * U256::from(1_000_000u64) / rate;
    assert_eq!(protocol.preview_deposit(bean(1000)).unwrap(), expected);
    protocol.mint(&at(BOB), bean(1000)).unwrap();
    assert_eq!(protocol.claim_balance_of(BOB), expected);
    assert_eq!(expected, U256::from(909_090_909u64));
}

#[test]
fn test_cannot_burn_without_claims() {
    let mut protocol = deploy();
    protocol.mint(&at(ALICE), bean(1000)).unwrap();

    let result = protocol.burn(&at(BOB), bean(1000));
    assert_eq!(
        result,
        Err(OniError::InsufficientClaimBalance {
            account: BOB,
            requested: bean(1000),
            balance: U256::ZERO,
        })
    );
    assert_eq!(protocol.reserve().unwrap().total_base_held, bean(1000));
}

#[test]
fn test_mint_requires_allowance() {
    let mut protocol = deploy();
    let addrs = protocol.config().addresses;
    protocol
        .approve(addrs.base_token, ALICE, addrs.ledger, bean(10))
        .unwrap();

    let result = protocol.mint(&at(ALICE), bean(11));
    assert!(matches!(result, Err(OniError::InsufficientAllowance { .. })));
    assert_eq!(protocol.claim_balance_of(ALICE), U256::ZERO);
}

#[test]
fn test_preview_withdraw_after_donation() {
    let mut protocol = deploy();
    protocol.mint(&at(ALICE), bean(1000)).unwrap();
    protocol.donate(&at(BOB), bean(500)).unwrap();

    assert_eq!(protocol.preview_withdraw(bean(100)).unwrap(), bean(150));
    assert_eq!(protocol.burn(&at(ALICE), bean(100)).unwrap(), bean(150));
}

#[test]
fn test_rate_never_decreases_through_pool_activity() {
    let mut protocol = deploy();
    let day = |n: u64| NOW + n * 86_400;

    let mut last_rate = protocol.get_rate().unwrap();
    let mut check = |protocol: &helpers::TestProtocol, step: &str| {
        let rate = protocol.get_rate().unwrap();
        assert!(rate >= last_rate, "{step}: rate fell from {last_rate} to {rate}");
        last_rate = rate;
    };

    protocol.mint(&at(ALICE), bean(2000)).unwrap();
    check(&protocol, "mint");

    protocol.borrow(&at(BOB), BOB, weth(2), bean(1000)).unwrap();
    check(&protocol, "borrow");

    protocol.accrue_interest(&CallContext::new(BORROWER, day(30))).unwrap();
    check(&protocol, "accrue");

    protocol.burn(&CallContext::new(ALICE, day(60)), bean(500)).unwrap();
    check(&protocol, "burn");

    protocol.repay(&CallContext::new(BOB, day(90)), bean(400)).unwrap();
    check(&protocol, "repay");

    protocol.mint(&CallContext::new(BOB, day(120)), bean(300)).unwrap();
    check(&protocol, "mint after interest");

    protocol.accrue_interest(&CallContext::new(BORROWER, day(365))).unwrap();
    check(&protocol, "accrue a year on");

    let debt = protocol.account_debt(BOB);
    protocol.repay(&CallContext::new(BOB, day(365)), debt).unwrap();
    check(&protocol, "full repay");

    assert!(last_rate > U256::from(1_000_000u64));
}
