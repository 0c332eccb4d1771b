//! In-memory fungible token collaborators.
//!
//! The lending core only needs standard ERC-20 semantics from the base and
//! collateral assets: balances, allowances, `transfer` and `transfer_from`.
//! [`Erc20`] models one token and [`TokenRegistry`] routes calls by token
//! address. The registry also tracks native-asset balances so that a
//! wrapped-native token can be minted by [`TokenRegistry::wrap_native`].

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use crate::error::OniError;

/// A single ERC-20 style token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Erc20 {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
}

impl Erc20 {
    pub fn new(address: Address, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            address,
            symbol: symbol.into(),
            decimals,
            ..Self::default()
        }
    }

    pub fn balance_of(&self, owner: Address) -> U256 {
        self.balances.get(&owner).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn approve(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.insert((owner, spender), amount);
    }

    /// Moves `amount` from `from` to `to`.
    pub fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), OniError> {
        let balance = self.balance_of(from);
        if balance < amount {
            return Err(OniError::TransferFailed {
                token: self.address,
                from,
                amount,
                balance,
            });
        }
        self.balances.insert(from, balance - amount);
        *self.balances.entry(to).or_default() += amount;
        Ok(())
    }

    /// Moves `amount` from `from` to `to` on behalf of `spender`, consuming allowance.
    ///
    /// An allowance of `U256::MAX` is treated as infinite and never decremented.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), OniError> {
        let allowance = self.allowance(from, spender);
        if allowance < amount {
            return Err(OniError::InsufficientAllowance {
                token: self.address,
                owner: from,
                spender,
                allowance,
                needed: amount,
            });
        }
        self.transfer(from, to, amount)?;
        if allowance != U256::MAX {
            self.allowances.insert((from, spender), allowance - amount);
        }
        Ok(())
    }

    pub fn mint(&mut self, to: Address, amount: U256) {
        *self.balances.entry(to).or_default() += amount;
        self.total_supply += amount;
    }

    pub fn burn(&mut self, from: Address, amount: U256) -> Result<(), OniError> {
        let balance = self.balance_of(from);
        if balance < amount {
            return Err(OniError::TransferFailed {
                token: self.address,
                from,
                amount,
                balance,
            });
        }
        self.balances.insert(from, balance - amount);
        self.total_supply -= amount;
        Ok(())
    }
}

/// Token balances for every asset the protocol touches, keyed by token address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenRegistry {
    tokens: HashMap<Address, Erc20>,
    native: HashMap<Address, U256>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token, replacing any token previously stored at the same address
    pub fn register(&mut self, token: Erc20) {
        self.tokens.insert(token.address, token);
    }

    pub fn get(&self, token: Address) -> Result<&Erc20, OniError> {
        self.tokens.get(&token).ok_or(OniError::UnknownToken { token })
    }

    pub fn get_mut(&mut self, token: Address) -> Result<&mut Erc20, OniError> {
        self.tokens
            .get_mut(&token)
            .ok_or(OniError::UnknownToken { token })
    }

    pub fn balance_of(&self, token: Address, owner: Address) -> Result<U256, OniError> {
        Ok(self.get(token)?.balance_of(owner))
    }

    pub fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), OniError> {
        self.get_mut(token)?.transfer(from, to, amount)
    }

    pub fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), OniError> {
        self.get_mut(token)?.transfer_from(spender, from, to, amount)
    }

    pub fn approve(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), OniError> {
        self.get_mut(token)?.approve(owner, spender, amount);
        Ok(())
    }

    pub fn mint(&mut self, token: Address, to: Address, amount: U256) -> Result<(), OniError> {
        self.get_mut(token)?.mint(to, amount);
        Ok(())
    }

    pub fn native_balance(&self, owner: Address) -> U256 {
        self.native.get(&owner).copied().unwrap_or_default()
    }

    /// Credits native asset to an account (genesis funding)
    pub fn fund_native(&mut self, owner: Address, amount: U256) {
        *self.native.entry(owner).or_default() += amount;
    }

    /// Moves native asset between accounts, as a value-carrying call would
    pub fn transfer_native(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), OniError> {
        let balance = self.native_balance(from);
        if balance < amount {
            return Err(OniError::InsufficientNativeBalance {
                account: from,
                requested: amount,
                balance,
            });
        }
        self.native.insert(from, balance - amount);
        *self.native.entry(to).or_default() += amount;
        Ok(())
    }

    /// Converts `owner`'s native asset 1:1 into the wrapped token at `wrapped`
    pub fn wrap_native(
        &mut self,
        wrapped: Address,
        owner: Address,
        amount: U256,
    ) -> Result<(), OniError> {
        let balance = self.native_balance(owner);
        if balance < amount {
            return Err(OniError::InsufficientNativeBalance {
                account: owner,
                requested: amount,
                balance,
            });
        }
        self.get_mut(wrapped)?.mint(owner, amount);
        self.native.insert(owner, balance - amount);
        Ok(())
    }
}
