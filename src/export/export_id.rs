//! Main export id policy.

use crate::types::{ClassId, ExportId};

/// Multiplier applied to the class id to derive an asset's main export id.
pub const MAIN_EXPORT_ID_FACTOR: i64 = 100_000;

/// Main export id of the primary object of class `class_id`.
pub fn main_export_id(class_id: ClassId) -> ExportId {
    ExportId(i64::from(class_id.0) * MAIN_EXPORT_ID_FACTOR)
}
