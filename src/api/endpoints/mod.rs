//! Endpoint handlers, one module per resource.

pub mod document_types;
pub mod feedback;
pub mod generate;
pub mod health;
pub mod sessions;
