//! Constellation Inetd - Connection adapter for supervisor-launched services
//!
//! A service started by an inetd-style supervisor receives its network peer
//! already wired to standard input and output. This crate presents those two
//! inherited streams as a single connection ([`StdioConnection`]) behind a
//! listener that accepts exactly once ([`OneShotListener`]), so server code
//! written against [`TransportListener`] runs unmodified whether it was handed
//! a socket or a pair of pipes.
//!
//! # Example
//!
//! ```no_run
//! use constellation_inetd::{Connection, OneShotListener, TransportListener};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let listener = OneShotListener::stdio();
//!
//! loop {
//!     let mut conn = match listener.accept().await {
//!         Ok(conn) => conn,
//!         Err(e) if e.is_already_accepted() => break,
//!         Err(e) => return Err(e.into()),
//!     };
//!
//!     let mut buf = [0u8; 1024];
//!     let n = conn.read(&mut buf).await?;
//!     conn.write(&buf[..n]).await?;
//!     conn.close().await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod addr;
pub mod config;
pub mod error;
pub mod transport;

// Re-exports for convenience
pub use addr::PlaceholderAddr;
pub use config::StdioConfig;
pub use error::{Error, Result};
pub use transport::{
    CloseStream, Connection, OneShotListener, StdioConnection, StdioConnectionBuilder,
    TransportListener,
};
