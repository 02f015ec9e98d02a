//! In-memory host: native ledger plus deployed token contracts.
//!
//! Checkpoints are full clones of the host state. That is cheap at the scale of a
//! development ledger and makes revert trivially exact. The same state encodes
//! to a bincode snapshot so a daemon can carry balances across restarts.

use crate::{AssetError, FungibleAsset, Host, NativeAsset};
use disperse_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

fn credit(balances: &mut HashMap<Address, u128>, account: &Address, amount: u128) -> Result<(), AssetError> {
    let entry = balances.entry(*account).or_insert(0);
    *entry = entry.checked_add(amount).ok_or(AssetError::Overflow)?;
    Ok(())
}

fn debit(balances: &mut HashMap<Address, u128>, account: &Address, amount: u128) -> Result<(), AssetError> {
    let available = balances.get(account).copied().unwrap_or(0);
    if available < amount {
        return Err(AssetError::InsufficientBalance {
            account: *account,
            needed: amount,
            available,
        });
    }
    balances.insert(*account, available - amount);
    Ok(())
}

/// Native coin balances.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryNative {
    balances: HashMap<Address, u128>,
    /// Accounts whose code refuses incoming payments.
    rejecting: HashSet<Address>,
}

impl MemoryNative {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create coins out of thin air (genesis allocation, test faucets).
    pub fn mint(&mut self, account: &Address, amount: u128) -> Result<(), AssetError> {
        credit(&mut self.balances, account, amount)
    }

    /// Make `account` refuse every future incoming payment.
    pub fn reject_payments(&mut self, account: Address) {
        self.rejecting.insert(account);
    }
}

impl NativeAsset for MemoryNative {
    fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn send(&mut self, from: &Address, to: &Address, amount: u128) -> Result<bool, AssetError> {
        if self.rejecting.contains(to) {
            debug!(%to, amount, "native payment refused by recipient");
            return Ok(false);
        }
        debit(&mut self.balances, from, amount)?;
        credit(&mut self.balances, to, amount)?;
        Ok(true)
    }
}

/// How a deliberately non-compliant token misbehaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenFault {
    #[default]
    None,
    /// `transfer` returns `false` without moving funds.
    PushReturnsFalse,
    /// `transfer_from` returns `false` without moving funds.
    PullReturnsFalse,
    /// `transfer` reverts.
    PushReverts,
    /// `transfer_from` reverts.
    PullReverts,
}

/// An ERC20-style token contract.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryToken {
    pub symbol: String,
    balances: HashMap<Address, u128>,
    allowances: HashMap<(Address, Address), u128>,
    total_supply: u128,
    fault: TokenFault,
}

impl MemoryToken {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    pub fn with_fault(mut self, fault: TokenFault) -> Self {
        self.fault = fault;
        self
    }

    pub fn set_fault(&mut self, fault: TokenFault) {
        self.fault = fault;
    }

    pub fn mint(&mut self, to: &Address, amount: u128) -> Result<(), AssetError> {
        if to.is_zero() {
            return Err(AssetError::ZeroAddress);
        }
        self.total_supply = self.total_supply.checked_add(amount).ok_or(AssetError::Overflow)?;
        credit(&mut self.balances, to, amount)
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    fn move_balance(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), AssetError> {
        if from.is_zero() || to.is_zero() {
            return Err(AssetError::ZeroAddress);
        }
        debit(&mut self.balances, from, amount)?;
        credit(&mut self.balances, to, amount)
    }
}

impl FungibleAsset for MemoryToken {
    fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    fn approve(&mut self, owner: &Address, spender: &Address, amount: u128) -> Result<bool, AssetError> {
        if owner.is_zero() || spender.is_zero() {
            return Err(AssetError::ZeroAddress);
        }
        self.allowances.insert((*owner, *spender), amount);
        Ok(true)
    }

    fn transfer(&mut self, sender: &Address, recipient: &Address, amount: u128) -> Result<bool, AssetError> {
        match self.fault {
            TokenFault::PushReturnsFalse => return Ok(false),
            TokenFault::PushReverts => return Err(AssetError::Reverted("transfer disabled".into())),
            _ => {}
        }
        self.move_balance(sender, recipient, amount)?;
        Ok(true)
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        recipient: &Address,
        amount: u128,
    ) -> Result<bool, AssetError> {
        match self.fault {
            TokenFault::PullReturnsFalse => return Ok(false),
            TokenFault::PullReverts => return Err(AssetError::Reverted("transferFrom disabled".into())),
            _ => {}
        }
        let allowed = self.allowance(owner, spender);
        if allowed < amount {
            return Err(AssetError::InsufficientAllowance {
                needed: amount,
                available: allowed,
            });
        }
        self.move_balance(owner, recipient, amount)?;
        self.allowances.insert((*owner, *spender), allowed - amount);
        Ok(true)
    }
}

/// Native ledger plus token contracts keyed by their address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryHost {
    native: MemoryNative,
    tokens: BTreeMap<Address, MemoryToken>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a token contract at `address`, replacing any previous one.
    pub fn deploy_token(&mut self, address: Address, token: MemoryToken) {
        self.tokens.insert(address, token);
    }

    pub fn native_ledger(&mut self) -> &mut MemoryNative {
        &mut self.native
    }

    pub fn token_mut(&mut self, address: &Address) -> Option<&mut MemoryToken> {
        self.tokens.get_mut(address)
    }

    /// Encode the whole host (balances, allowances, tokens) as a snapshot.
    pub fn to_snapshot(&self) -> Result<Vec<u8>, AssetError> {
        bincode::serialize(self).map_err(|e| AssetError::Snapshot(e.to_string()))
    }

    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, AssetError> {
        bincode::deserialize(bytes).map_err(|e| AssetError::Snapshot(e.to_string()))
    }
}

impl Host for MemoryHost {
    type Checkpoint = MemoryHost;

    fn native(&self) -> &dyn NativeAsset {
        &self.native
    }

    fn native_mut(&mut self) -> &mut dyn NativeAsset {
        &mut self.native
    }

    fn fungible(&self, asset: &Address) -> Option<&dyn FungibleAsset> {
        self.tokens.get(asset).map(|t| t as &dyn FungibleAsset)
    }

    fn fungible_mut(&mut self, asset: &Address) -> Option<&mut dyn FungibleAsset> {
        self.tokens.get_mut(asset).map(|t| t as &mut dyn FungibleAsset)
    }

    fn checkpoint(&self) -> Self::Checkpoint {
        self.clone()
    }

    fn revert_to(&mut self, checkpoint: Self::Checkpoint) {
        *self = checkpoint;
    }
}
