//! Execution environment abstraction.

use crate::{FungibleAsset, NativeAsset};
use disperse_types::Address;
use serde::{Deserialize, Serialize};

/// Who is calling and how much native value they attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub caller: Address,
    pub value: u128,
}

impl CallContext {
    pub fn new(caller: Address) -> Self {
        Self { caller, value: 0 }
    }

    pub fn with_value(caller: Address, value: u128) -> Self {
        Self { caller, value }
    }
}

/// The state the contract executes against.
///
/// A host owns the native ledger and every deployed token. `checkpoint` and
/// `revert_to` give transaction semantics: restoring a checkpoint undoes every
/// asset movement made since it was taken.
pub trait Host {
    type Checkpoint;

    fn native(&self) -> &dyn NativeAsset;
    fn native_mut(&mut self) -> &mut dyn NativeAsset;

    /// Resolve a token contract by address. `None` if nothing is deployed there.
    fn fungible(&self, asset: &Address) -> Option<&dyn FungibleAsset>;
    fn fungible_mut(&mut self, asset: &Address) -> Option<&mut dyn FungibleAsset>;

    fn checkpoint(&self) -> Self::Checkpoint;
    fn revert_to(&mut self, checkpoint: Self::Checkpoint);
}

/// Run `f` as one transaction: on `Err`, every host mutation made by `f` is undone.
pub fn atomically<H, T, E, F>(host: &mut H, f: F) -> Result<T, E>
where
    H: Host,
    F: FnOnce(&mut H) -> Result<T, E>,
{
    let checkpoint = host.checkpoint();
    match f(host) {
        Ok(value) => Ok(value),
        Err(e) => {
            host.revert_to(checkpoint);
            Err(e)
        }
    }
}
