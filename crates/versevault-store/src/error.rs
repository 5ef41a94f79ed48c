//! Mapping backend failures onto `StoreError`.

use std::fmt::Display;

use versevault_core::StoreError;

/// Convert backend errors into [`StoreError::Storage`] wrapped in `anyhow`.
///
/// Used like `anyhow::Context`: `conn.execute(..).storage("insert verse")?`.
pub trait StorageContext<T> {
    fn storage(self, action: &str) -> anyhow::Result<T>;
}

impl<T, E: Display> StorageContext<T> for Result<T, E> {
    fn storage(self, action: &str) -> anyhow::Result<T> {
        self.map_err(|e| StoreError::Storage(format!("{action}: {e}")).into())
    }
}
