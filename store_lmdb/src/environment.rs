//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use tracing::info;

use crate::{LmdbCommitStore, LmdbError, LmdbSnapshotStore};

/// Default map size: 1 GiB.
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

const NATIVE_COMMITS: &str = "native_commits";
const TOKEN_COMMITS: &str = "token_commits";
const HOST_STATE: &str = "host_state";

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    native_db: Database<Bytes, Bytes>,
    token_db: Database<Bytes, Bytes>,
    host_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given directory.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path).map_err(|e| LmdbError::Heed(e.to_string()))?;

        // SAFETY: the environment is opened once per process and never
        // concurrently from another handle on the same path.
        let env = unsafe { EnvOpenOptions::new().map_size(map_size).max_dbs(3).open(path)? };

        let mut wtxn = env.write_txn()?;
        let native_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(NATIVE_COMMITS))?;
        let token_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(TOKEN_COMMITS))?;
        let host_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(HOST_STATE))?;
        wtxn.commit()?;

        info!(path = %path.display(), map_size, "opened LMDB environment");
        Ok(Self {
            env: Arc::new(env),
            native_db,
            token_db,
            host_db,
        })
    }

    /// A commitment store sharing this environment.
    pub fn commit_store(&self) -> LmdbCommitStore {
        LmdbCommitStore {
            env: Arc::clone(&self.env),
            native_db: self.native_db,
            token_db: self.token_db,
        }
    }

    /// The host snapshot slot sharing this environment.
    pub fn snapshot_store(&self) -> LmdbSnapshotStore {
        LmdbSnapshotStore {
            env: Arc::clone(&self.env),
            db: self.host_db,
        }
    }
}
