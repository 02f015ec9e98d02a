use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupt entry: {0}")]
    Corruption(String),
}

impl From<heed::Error> for LmdbError {
    fn from(e: heed::Error) -> Self {
        LmdbError::Heed(e.to_string())
    }
}

impl From<bincode::Error> for LmdbError {
    fn from(e: bincode::Error) -> Self {
        LmdbError::Serialization(e.to_string())
    }
}

impl From<LmdbError> for disperse_store::StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::Heed(msg) => disperse_store::StoreError::Backend(msg),
            LmdbError::Serialization(msg) => disperse_store::StoreError::Serialization(msg),
            LmdbError::Corruption(msg) => disperse_store::StoreError::Corruption(msg),
        }
    }
}
