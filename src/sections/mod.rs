//! Named, ordered sections per video: the record, its persistence, the
//! collection and the export/import file format.

mod persist;
mod section;
mod store;
mod transfer;

pub use persist::{SectionPersistence, DEFAULT_STORAGE_PREFIX};
pub use section::{default_section_name, new_section_id, Section};
pub use store::{ImportOutcome, SectionStore, DEFAULT_MERGE_TOLERANCE};
pub use transfer::{
    export_filename, ExportDocument, ImportDocument, ImportError, ImportedSection,
    DEFAULT_EXPORT_PREFIX,
};
