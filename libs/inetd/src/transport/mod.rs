use std::fmt;
use std::io;

use tokio::io::AsyncWriteExt;
use tokio::time::Instant;

use crate::error::Result;

pub mod oneshot;
pub mod stdio;

pub use self::oneshot::OneShotListener;
pub use self::stdio::{StdioConnection, StdioConnectionBuilder};

/// Connection trait for a single bidirectional byte stream
///
/// Mirrors an accepted socket: unframed reads and writes, close, the two
/// endpoint addresses, and deadlines. Deadlines of `None` clear any
/// previously set deadline. Whether deadlines are enforced is up to the
/// implementation.
#[async_trait::async_trait]
pub trait Connection: Send {
    /// Address type reported for both endpoints
    type Addr: fmt::Display + Clone + Send + Sync;

    /// Read up to `buf.len()` bytes, returning 0 at end of stream
    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write bytes from `buf`, returning how many were accepted
    async fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Close both directions of the connection
    async fn close(&mut self) -> io::Result<()>;

    fn local_addr(&self) -> Self::Addr;

    fn remote_addr(&self) -> Self::Addr;

    /// Set both the read and the write deadline
    fn set_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()> {
        self.set_read_deadline(deadline)?;
        self.set_write_deadline(deadline)
    }

    fn set_read_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()>;

    fn set_write_deadline(&mut self, deadline: Option<Instant>) -> io::Result<()>;
}

/// Listener trait handing out connections
#[async_trait::async_trait]
pub trait TransportListener: Send + Sync {
    type Transport: Connection;

    /// Accept the next connection
    async fn accept(&self) -> Result<Self::Transport>;

    /// Stop listening
    async fn close(&mut self) -> Result<()>;

    /// Address the listener is reachable at
    fn addr(&self) -> <Self::Transport as Connection>::Addr;
}

/// One half of a connection that can be closed on its own
///
/// Read-only handles usually have nothing to release beyond dropping them;
/// write handles flush and shut down.
#[async_trait::async_trait]
pub trait CloseStream: Send {
    async fn close(&mut self) -> io::Result<()>;
}

macro_rules! close_noop {
    ($($ty:ty),* $(,)?) => {
        $(
            #[async_trait::async_trait]
            impl CloseStream for $ty {
                async fn close(&mut self) -> io::Result<()> {
                    Ok(())
                }
            }
        )*
    };
}

macro_rules! close_shutdown {
    ($($ty:ty),* $(,)?) => {
        $(
            #[async_trait::async_trait]
            impl CloseStream for $ty {
                async fn close(&mut self) -> io::Result<()> {
                    self.shutdown().await
                }
            }
        )*
    };
}

close_noop!(
    tokio::io::Stdin,
    tokio::io::Empty,
    tokio::io::Sink,
    tokio::process::ChildStdout,
    tokio::process::ChildStderr,
    io::Cursor<Vec<u8>>,
    &'static [u8],
);

close_shutdown!(
    tokio::io::Stdout,
    tokio::io::Stderr,
    tokio::io::DuplexStream,
    tokio::process::ChildStdin,
);

#[async_trait::async_trait]
impl CloseStream for tokio::fs::File {
    async fn close(&mut self) -> io::Result<()> {
        self.flush().await
    }
}

#[async_trait::async_trait]
impl<T: Send> CloseStream for tokio::io::ReadHalf<T> {
    async fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl<T: tokio::io::AsyncWrite + Send> CloseStream for tokio::io::WriteHalf<T> {
    async fn close(&mut self) -> io::Result<()> {
        self.shutdown().await
    }
}
