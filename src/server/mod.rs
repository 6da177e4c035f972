//! Listening socket, accept loop and shutdown signalling.

pub mod listener;
pub mod shutdown;

pub use shutdown::{ShutdownController, ShutdownReceiver};
