//! Storage abstraction for the last observed record.
//!
//! The state store is the sole unit of change-detection memory: one
//! record, read at run start, overwritten at run end.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::AppointmentRecord;

// Re-export for convenience
pub use local::LocalStore;

/// Trait for record persistence backends.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Load the last observed record. `Ok(None)` means a first run, not
    /// an error.
    async fn load(&self) -> Result<Option<AppointmentRecord>>;

    /// Overwrite the stored record.
    async fn save(&self, record: &AppointmentRecord) -> Result<()>;
}
