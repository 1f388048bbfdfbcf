//! CV Ingestion — upload handling, raw text extraction, and the structured
//! candidate profile built from it.

pub mod extract;
pub mod handlers;
pub mod profile;
pub mod store;
