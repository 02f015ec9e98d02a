//! Deterministic accounts and pre-funded hosts.

use disperse_asset::{FungibleAsset, MemoryHost, MemoryToken, TokenFault};
use disperse_types::Address;

/// A non-zero address whose every byte is `n`. `test_address(0)` is the zero address.
pub fn test_address(n: u8) -> Address {
    Address::new([n; 20])
}

/// Builds a [`MemoryHost`] with seeded native balances, tokens and approvals.
#[derive(Default)]
pub struct HostBuilder {
    host: MemoryHost,
}

impl HostBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn native(mut self, account: Address, amount: u128) -> Self {
        self.host
            .native_ledger()
            .mint(&account, amount)
            .unwrap_or_else(|e| panic!("seeding native balance for {account}: {e}"));
        self
    }

    /// Deploy a token at `asset` with the given holder balances.
    pub fn token(mut self, asset: Address, symbol: &str, holders: &[(Address, u128)]) -> Self {
        let mut token = MemoryToken::new(symbol);
        for (holder, amount) in holders {
            token
                .mint(holder, *amount)
                .unwrap_or_else(|e| panic!("seeding {symbol} balance for {holder}: {e}"));
        }
        self.host.deploy_token(asset, token);
        self
    }

    /// Record `owner` approving `spender` for `amount` of a previously deployed token.
    pub fn approve(mut self, asset: Address, owner: Address, spender: Address, amount: u128) -> Self {
        let token = self
            .host
            .token_mut(&asset)
            .unwrap_or_else(|| panic!("approve on undeployed token {asset}"));
        token
            .approve(&owner, &spender, amount)
            .unwrap_or_else(|e| panic!("approving {spender} on {asset}: {e}"));
        self
    }

    /// Make a previously deployed token misbehave from now on.
    pub fn fault(mut self, asset: Address, fault: TokenFault) -> Self {
        self.host
            .token_mut(&asset)
            .unwrap_or_else(|| panic!("fault on undeployed token {asset}"))
            .set_fault(fault);
        self
    }

    pub fn build(self) -> MemoryHost {
        self.host
    }
}
