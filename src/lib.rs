//! docserve - Minimal static file server
//!
//! Answers one GET or HEAD request per connection from a fixed document root.

pub mod config;
pub mod files;
pub mod http;
pub mod server;
