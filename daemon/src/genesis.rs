//! Builds the development ledger from the `[genesis]` config section, or
//! restores it from the snapshot saved by a previous run.

use disperse_asset::{MemoryHost, MemoryToken};
use disperse_store::SnapshotStore;
use disperse_types::parse_amount;
use tracing::info;

use crate::config::{Allocation, ConfigError, GenesisConfig};

fn amount_of(entry: &Allocation) -> Result<u128, ConfigError> {
    parse_amount(&entry.amount).map_err(|e| ConfigError::Genesis(format!("{}: {e}", entry.account)))
}

pub fn build_host(genesis: &GenesisConfig) -> Result<MemoryHost, ConfigError> {
    let mut host = MemoryHost::new();

    for entry in &genesis.native {
        host.native_ledger()
            .mint(&entry.account, amount_of(entry)?)
            .map_err(|e| ConfigError::Genesis(format!("native {}: {e}", entry.account)))?;
    }

    for token_genesis in &genesis.tokens {
        if token_genesis.address.is_zero() {
            return Err(ConfigError::Genesis(format!("token {} at the zero address", token_genesis.symbol)));
        }
        let mut token = MemoryToken::new(token_genesis.symbol.clone());
        for entry in &token_genesis.balances {
            token
                .mint(&entry.account, amount_of(entry)?)
                .map_err(|e| ConfigError::Genesis(format!("{} {}: {e}", token_genesis.symbol, entry.account)))?;
        }
        info!(address = %token_genesis.address, symbol = %token_genesis.symbol, supply = token.total_supply(), "deployed genesis token");
        host.deploy_token(token_genesis.address, token);
    }

    Ok(host)
}

/// The host saved by the previous run, or a fresh genesis host that is saved
/// immediately so later restarts never reseed over committed funds.
pub fn load_host<S>(genesis: &GenesisConfig, snapshots: &S) -> Result<MemoryHost, ConfigError>
where
    S: SnapshotStore + ?Sized,
{
    let saved = snapshots
        .load_snapshot()
        .map_err(|e| ConfigError::Snapshot(e.to_string()))?;
    if let Some(bytes) = saved {
        let host = MemoryHost::from_snapshot(&bytes).map_err(|e| ConfigError::Snapshot(e.to_string()))?;
        info!(bytes = bytes.len(), "restored host from snapshot, genesis ignored");
        return Ok(host);
    }

    let host = build_host(genesis)?;
    let bytes = host.to_snapshot().map_err(|e| ConfigError::Snapshot(e.to_string()))?;
    snapshots
        .save_snapshot(&bytes)
        .map_err(|e| ConfigError::Snapshot(e.to_string()))?;
    info!("seeded host from genesis");
    Ok(host)
}
