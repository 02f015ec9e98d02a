//! LMDB implementation of SnapshotStore.
//!
//! The `host_state` database holds a single entry under a fixed key.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use disperse_store::{SnapshotStore, StoreError};

use crate::LmdbError;

const SNAPSHOT_KEY: &[u8] = b"host";

pub struct LmdbSnapshotStore {
    pub(crate) env: Arc<Env>,
    pub(crate) db: Database<Bytes, Bytes>,
}

impl SnapshotStore for LmdbSnapshotStore {
    fn load_snapshot(&self) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bytes = self.db.get(&rtxn, SNAPSHOT_KEY).map_err(LmdbError::from)?;
        Ok(bytes.map(<[u8]>::to_vec))
    }

    fn save_snapshot(&self, bytes: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db.put(&mut wtxn, SNAPSHOT_KEY, bytes).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::DEFAULT_MAP_SIZE;
    use crate::LmdbEnvironment;

    #[test]
    fn empty_environment_has_no_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        assert_eq!(env.snapshot_store().load_snapshot().unwrap(), None);
    }

    #[test]
    fn snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
            let slots = env.snapshot_store();
            slots.save_snapshot(&[1, 2, 3]).unwrap();
            slots.save_snapshot(&[4, 5]).unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        assert_eq!(env.snapshot_store().load_snapshot().unwrap(), Some(vec![4, 5]));
    }
}
