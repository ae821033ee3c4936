//! Territory persistence: the on-disk schema and the JSON file adapter.

mod json_file;
mod records;

pub use json_file::JsonFileTerritoryRepo;
pub use records::{FlagRecord, RecordError, Restored, TerritoryDocument, TerritoryRecord};
