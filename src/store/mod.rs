pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::{SqliteSession, SqliteStore};
pub use traits::{MetricStore, MetricWriter, QualityStore, SnapshotStore, StoreFuture};
pub use types::{Metric, Snapshot, TimeWindow};
