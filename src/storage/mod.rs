// Storage module: SQLite persistence and the repository seam used by the report generator.

pub mod sqlite;

pub use sqlite::SqliteStorage;

use crate::model::{MonthlyRow, Parcel, PeriodRange, StorageError};
use tokio::sync::Mutex;

/// Data-access contract consumed by the report generator.
#[async_trait::async_trait]
pub trait ParcelRepository: Send + Sync {
    async fn find_active_parcel(&self, id: i64) -> Result<Option<Parcel>, StorageError>;

    /// Rows inside `range`, in ascending chronological order.
    async fn monthly_rows(&self, parcel_id: i64, range: &PeriodRange) -> Result<Vec<MonthlyRow>, StorageError>;
}

#[async_trait::async_trait]
impl ParcelRepository for Mutex<SqliteStorage> {
    async fn find_active_parcel(&self, id: i64) -> Result<Option<Parcel>, StorageError> {
        self.lock().await.find_active_parcel(id)
    }

    async fn monthly_rows(&self, parcel_id: i64, range: &PeriodRange) -> Result<Vec<MonthlyRow>, StorageError> {
        self.lock().await.monthly_indices(parcel_id, range)
    }
}
