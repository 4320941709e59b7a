//! Admin license management service.

pub mod service;

pub use service::{BulkGenerateRequest, BulkImportRow, ImportRow, LicenseService};
