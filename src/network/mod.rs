//! Network Module
//!
//! TCP server and client for the text service.
//!
//! ## Architecture
//! - Single acceptor thread (non-blocking accept, polls the shutdown flag)
//! - Fixed worker pool fed through a channel, one session per worker
//! - Requests executed against a shared `TextStore`

mod client;
mod connection;
mod server;

pub use client::Client;
pub use connection::Connection;
pub use server::Server;
