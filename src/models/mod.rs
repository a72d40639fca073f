pub mod enums;
pub mod report;

pub use enums::DocumentType;
pub use report::GeneratedReport;
