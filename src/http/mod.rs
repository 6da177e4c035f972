//! HTTP protocol implementation.
//!
//! This module implements a deliberately small HTTP/1.1 server: one request
//! per connection, GET and HEAD only, `Content-Length` framing, and the
//! connection is closed after every response.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection state machine
//! - **`parser`**: Parses the request line from the first read
//! - **`request`**: Method and request-line representation
//! - **`response`**: Status codes, ordered headers and response builder
//! - **`writer`**: Serializes the head and streams the body to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← One bounded read
//!        └──────┬──────┘
//!               │ Request line parsed        (nothing read → Closed)
//!               ▼                            (malformed → Writing 400)
//!        ┌──────────────────┐
//!        │   Processing     │ ← Method check, resolve, stat, open
//!        └──────┬───────────┘
//!               │ 200 with file, or 403/404/405/400 error page
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Head, then body chunks
//!        └──────┬───────────┘
//!               │ Done or transfer aborted
//!               ▼
//!            Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use docserve::http::connection::Connection;
//!
//! let (socket, _addr) = listener.accept().await?;
//! Connection::new(socket, &docroot, &cfg.server).run().await;
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
