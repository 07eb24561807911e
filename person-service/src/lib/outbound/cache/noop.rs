use std::time::Duration;

use async_trait::async_trait;

use crate::domain::person::errors::CacheError;
use crate::domain::person::ports::CacheStore;

/// Cache store that never holds anything; every read is a miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCacheStore;

#[async_trait]
impl CacheStore for NoopCacheStore {
    async fn get(&self, _: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _: &str, _: String, _: Duration) -> Result<(), CacheError> {
        Ok(())
    }
}
