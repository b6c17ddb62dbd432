use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::transport::{Connection, StdioConnection, TransportListener};

/// Listener that has already accepted its only connection
///
/// The first [`accept`](TransportListener::accept) hands out the wrapped
/// connection; every later call fails with [`Error::AlreadyAccepted`].
/// Concurrent callers race on an internal lock and exactly one of them wins.
///
/// With exclusive access, [`take`](Self::take) performs the same one-shot
/// transition without locking.
pub struct OneShotListener<C: Connection> {
    conn: Mutex<Option<C>>,
    addr: C::Addr,
}

impl OneShotListener<StdioConnection<tokio::io::Stdin, tokio::io::Stdout>> {
    /// Listener over this process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(StdioConnection::stdio())
    }
}

impl<C: Connection> OneShotListener<C> {
    /// Wrap `conn` in a listener that has not yet handed it out
    pub fn new(conn: C) -> Self {
        let addr = conn.local_addr();
        Self {
            conn: Mutex::new(Some(conn)),
            addr,
        }
    }

    /// Take the connection without locking
    pub fn take(&mut self) -> Result<C> {
        self.conn.get_mut().take().ok_or(Error::AlreadyAccepted)
    }

    /// Return the connection if it was never accepted
    pub fn into_inner(self) -> Option<C> {
        self.conn.into_inner()
    }

    /// Whether the connection has been handed out
    pub async fn is_consumed(&self) -> bool {
        self.conn.lock().await.is_none()
    }
}

#[async_trait::async_trait]
impl<C: Connection> TransportListener for OneShotListener<C> {
    type Transport = C;

    async fn accept(&self) -> Result<C> {
        let mut slot = self.conn.lock().await;
        match slot.take() {
            Some(conn) => {
                tracing::debug!(addr = %self.addr, "connection accepted");
                Ok(conn)
            }
            None => {
                tracing::debug!(addr = %self.addr, "accept after connection was handed out");
                Err(Error::AlreadyAccepted)
            }
        }
    }

    /// Nothing to release; the connection is closed through its own handle
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn addr(&self) -> C::Addr {
        self.addr.clone()
    }
}
