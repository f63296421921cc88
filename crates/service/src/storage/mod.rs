//! Storage abstractions for service layer
//!
//! Contains reusable file-backed stores shared by the document-style adapters.

pub mod json_map_store;
