//! Test helper utilities for core integration tests.
//!
//! `deploy` mirrors a fresh deployment: Alice and Bob each hold one million
//! BEAN and 1000 wrapped WETH with unlimited approvals to the ledger and the
//! pool, the borrower holds only native asset, and WETH is priced at $1300
//! by an 8-decimal feed.

use alloy_primitives::{Address, U256};
use oni_rs_core::{CallContext, FixedPriceOracle, OraclePrice, PoolConfig, Protocol};

pub const NOW: u64 = 1_700_000_000;

pub const ALICE: Address = Address::repeat_byte(0xA1);
pub const BOB: Address = Address::repeat_byte(0xB0);
pub const BORROWER: Address = Address::repeat_byte(0xBB);

pub type TestProtocol = Protocol<FixedPriceOracle>;

/// `amount` whole BEAN (6 decimals)
pub fn bean(amount: u64) -> U256 {
    U256::from(amount) * U256::from(1_000_000u64)
}

/// `amount` whole WETH (18 decimals)
pub fn weth(amount: u64) -> U256 {
    U256::from(amount) * U256::from(10u64).pow(U256::from(18))
}

pub fn at(sender: Address) -> CallContext {
    CallContext::new(sender, NOW)
}

pub fn admin(protocol: &TestProtocol) -> Address {
    protocol.config().admin
}

pub fn treasury(protocol: &TestProtocol) -> Address {
    protocol.config().treasury
}

pub fn deploy() -> TestProtocol {
    deploy_with(PoolConfig::default())
}

pub fn deploy_with(config: PoolConfig) -> TestProtocol {
    let addrs = config.addresses;
    let oracle = FixedPriceOracle::new().with_price(
        addrs.collateral_token,
        OraclePrice::new(U256::from(1300u64) * U256::from(100_000_000u64), 8),
    );
    let mut protocol = Protocol::new(config, oracle, NOW).unwrap();

    for who in [ALICE, BOB] {
        protocol.fund(addrs.base_token, who, bean(1_000_000)).unwrap();
        protocol.fund_native(who, weth(1000));
        protocol.wrap_native(who, weth(1000)).unwrap();

        protocol.approve(addrs.base_token, who, addrs.ledger, U256::MAX).unwrap();
        protocol.approve(addrs.base_token, who, addrs.pool, U256::MAX).unwrap();
        protocol.approve(addrs.collateral_token, who, addrs.pool, U256::MAX).unwrap();
    }
    protocol.fund_native(BORROWER, weth(10));

    protocol
}

/// Grants the administrator pool permission, for driving utilization directly.
pub fn grant_admin_pool_permission(protocol: &mut TestProtocol) {
    let admin = admin(protocol);
    protocol.set_pool_permission(&at(admin), admin, true).unwrap();
}
