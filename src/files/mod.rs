//! Filesystem side of the server
//!
//! Maps request targets into the document root and prepares that root before
//! the first connection is accepted.

pub mod bootstrap;
pub mod resolve;

pub use bootstrap::ensure_document_root;
pub use resolve::{DocumentRoot, ResolveError};
