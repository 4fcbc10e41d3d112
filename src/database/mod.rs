pub mod manager;
pub mod params;
pub mod partial_update;

pub use manager::{DatabaseError, DatabaseManager, MIGRATOR};
pub use params::SqlParam;
pub use partial_update::{sql_for_partial_update, ColumnMap, FieldUpdates, PartialUpdate};
