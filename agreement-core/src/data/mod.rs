//! Annotation data: record types and the loaded table.

pub mod record;
pub mod table;

pub use record::{AnnotationRecord, BIAS_VALUES, PROPAGANDA_LABEL, RecordType, Task};
pub use table::AnnotationTable;
