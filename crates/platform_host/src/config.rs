//! Desktop configuration document source contract.

use std::{future::Future, pin::Pin};

/// Object-safe boxed future used by [`ConfigSource`].
pub type ConfigSourceFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service that fetches the raw desktop configuration document.
pub trait ConfigSource {
    /// Loads the raw JSON document. `Ok(None)` means the host has no document.
    fn load_raw(&self) -> ConfigSourceFuture<'_, Result<Option<String>, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Config source for hosts without a configuration document.
pub struct NoopConfigSource;

impl ConfigSource for NoopConfigSource {
    fn load_raw(&self) -> ConfigSourceFuture<'_, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }
}

#[derive(Debug, Clone, Default)]
/// Config source serving a fixed in-memory document.
pub struct MemoryConfigSource {
    raw: Option<String>,
}

impl MemoryConfigSource {
    /// Creates a source returning `raw`.
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
        }
    }
}

impl ConfigSource for MemoryConfigSource {
    fn load_raw(&self) -> ConfigSourceFuture<'_, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.raw.clone()) })
    }
}
