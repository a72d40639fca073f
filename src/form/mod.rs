//! Form Assembler: active document type, its field values, and the
//! case narrative rendered from them.

pub mod assembler;
pub mod schema;

pub use assembler::*;
pub use schema::*;

use thiserror::Error;

use crate::models::DocumentType;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown document type: {0}")]
    InvalidDocumentType(String),

    #[error("Field '{field}' is not part of the {document_type} form")]
    UnknownField {
        document_type: DocumentType,
        field: String,
    },
}
