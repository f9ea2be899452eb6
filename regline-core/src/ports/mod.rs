// regline-core/src/ports/mod.rs

pub mod lister;
pub mod reader;
pub mod store;

pub use lister::DirectoryLister;
pub use reader::{RowSet, TabularReader};
pub use store::{BulkWriter, ScriptRunner, SqlStore};
