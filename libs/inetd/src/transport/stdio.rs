use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, ReadBuf};
use tokio::time::Instant;

use crate::addr::PlaceholderAddr;
use crate::config::StdioConfig;
use crate::transport::{CloseStream, Connection};

/// Read side, optionally buffered
enum Input<R> {
    Direct(R),
    Buffered(BufReader<R>),
}

#[async_trait::async_trait]
impl<R: AsyncRead + CloseStream> CloseStream for Input<R> {
    async fn close(&mut self) -> io::Result<()> {
        match self {
            Self::Direct(reader) => reader.close().await,
            Self::Buffered(reader) => reader.get_mut().close().await,
        }
    }
}

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "stream closed")
}

async fn close_half<S: CloseStream>(half: Option<S>) -> io::Result<()> {
    match half {
        Some(mut stream) => stream.close().await,
        None => Err(closed()),
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for Input<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Direct(reader) => Pin::new(reader).poll_read(cx, buf),
            Self::Buffered(reader) => Pin::new(reader).poll_read(cx, buf),
        }
    }
}

/// Connection backed by two independent streams
///
/// Typically the process's inherited stdin and stdout, handed over by an
/// inetd-style supervisor. Both endpoints report the same
/// [`PlaceholderAddr`] since no socket is visible to the process.
///
/// Deadlines are accepted and ignored: a blocked read or write only returns
/// when the underlying stream does.
///
/// Closing releases both streams. Later reads and writes fail with
/// [`io::ErrorKind::NotConnected`].
pub struct StdioConnection<R, W> {
    input: Option<Input<R>>,
    output: Option<W>,
    local_addr: PlaceholderAddr,
    remote_addr: PlaceholderAddr,
}

impl<R, W> fmt::Debug for StdioConnection<R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdioConnection")
            .field("buffered", &matches!(self.input, Some(Input::Buffered(_))))
            .field("closed", &(self.input.is_none() && self.output.is_none()))
            .field("local_addr", &self.local_addr)
            .field("remote_addr", &self.remote_addr)
            .finish_non_exhaustive()
    }
}

impl StdioConnection<tokio::io::Stdin, tokio::io::Stdout> {
    /// Connection over this process's stdin and stdout with default settings
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }

    /// Create a builder for configuring the connection
    ///
    /// The stream types are picked by [`StdioConnectionBuilder::build`].
    pub fn builder() -> StdioConnectionBuilder {
        StdioConnectionBuilder::new()
    }
}

impl<R, W> StdioConnection<R, W>
where
    R: AsyncRead + CloseStream + Unpin,
    W: AsyncWrite + CloseStream + Unpin,
{
    /// Wrap `input` and `output` with default settings (buffered reads)
    pub fn new(input: R, output: W) -> Self {
        StdioConnectionBuilder::new().build(input, output)
    }

    /// Wrap `input` and `output` using `config`
    pub fn with_config(input: R, output: W, config: &StdioConfig) -> Self {
        StdioConnectionBuilder::new().config(config).build(input, output)
    }

    pub fn is_buffered(&self) -> bool {
        matches!(self.input, Some(Input::Buffered(_)))
    }

    /// Consume the connection and return the underlying streams
    ///
    /// Returns `None` once the connection has been closed. Any bytes still
    /// held in the read buffer are lost.
    pub fn into_inner(self) -> Option<(R, W)> {
        let input = match self.input? {
            Input::Direct(reader) => reader,
            Input::Buffered(reader) => reader.into_inner(),
        };
        Some((input, self.output?))
    }
}

#[async_trait::async_trait]
impl<R, W> Connection for StdioConnection<R, W>
where
    R: AsyncRead + CloseStream + Unpin,
    W: AsyncWrite + CloseStream + Unpin,
{
    type Addr = PlaceholderAddr;

    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let input = self.input.as_mut().ok_or_else(closed)?;
        let n = input.read(buf).await?;
        tracing::trace!(bytes = n, "read from input stream");
        Ok(n)
    }

    /// Hand `buf` to the output stream
    ///
    /// No flush is issued here; closing the connection flushes the output.
    async fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let output = self.output.as_mut().ok_or_else(closed)?;
        let n = output.write(buf).await?;
        tracing::trace!(bytes = n, "wrote to output stream");
        Ok(n)
    }

    /// Close the input and then the output stream
    ///
    /// Both are always attempted and released, even on failure. If both
    /// fail, the input error is returned and the output error is only logged.
    /// Closing an already closed connection fails.
    async fn close(&mut self) -> io::Result<()> {
        let input = close_half(self.input.take()).await;
        let output = close_half(self.output.take()).await;

        match (input, output) {
            (Ok(()), Ok(())) => {
                tracing::debug!(addr = %self.local_addr, "stdio connection closed");
                Ok(())
            }
            (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
            (Err(e), Err(output_err)) => {
                tracing::warn!(
                    error = %output_err,
                    "output stream close failed, reporting input close error"
                );
                Err(e)
            }
        }
    }

    fn local_addr(&self) -> PlaceholderAddr {
        self.local_addr.clone()
    }

    fn remote_addr(&self) -> PlaceholderAddr {
        self.remote_addr.clone()
    }

    fn set_read_deadline(&mut self, _deadline: Option<Instant>) -> io::Result<()> {
        Ok(())
    }

    fn set_write_deadline(&mut self, _deadline: Option<Instant>) -> io::Result<()> {
        Ok(())
    }
}

impl<R, W> AsyncRead for StdioConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: Unpin,
{
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut().input.as_mut() {
            Some(input) => Pin::new(input).poll_read(cx, buf),
            None => Poll::Ready(Err(closed())),
        }
    }
}

impl<R, W> AsyncWrite for StdioConnection<R, W>
where
    R: Unpin,
    W: AsyncWrite + Unpin,
{
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut().output.as_mut() {
            Some(output) => Pin::new(output).poll_write(cx, buf),
            None => Poll::Ready(Err(closed())),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut().output.as_mut() {
            Some(output) => Pin::new(output).poll_flush(cx),
            None => Poll::Ready(Err(closed())),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut().output.as_mut() {
            Some(output) => Pin::new(output).poll_shutdown(cx),
            None => Poll::Ready(Err(closed())),
        }
    }
}

/// Builder for configuring a stdio connection
#[derive(Debug, Clone, Default)]
pub struct StdioConnectionBuilder {
    config: StdioConfig,
}

impl StdioConnectionBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all settings with `config`
    pub fn config(mut self, config: &StdioConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Enable or disable the read buffer
    pub fn buffered(mut self, buffered: bool) -> Self {
        self.config.buffered = buffered;
        self
    }

    /// Set the read buffer capacity
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.buffer_capacity = capacity;
        self
    }

    /// Set the address reported for both endpoints
    pub fn address(mut self, addr: impl Into<String>) -> Self {
        self.config.address = addr.into();
        self
    }

    /// Build the connection over `input` and `output`
    pub fn build<R, W>(self, input: R, output: W) -> StdioConnection<R, W>
    where
        R: AsyncRead + CloseStream + Unpin,
        W: AsyncWrite + CloseStream + Unpin,
    {
        let input = if self.config.buffered {
            Input::Buffered(BufReader::with_capacity(self.config.buffer_capacity, input))
        } else {
            Input::Direct(input)
        };
        let addr = PlaceholderAddr::new(self.config.address);

        tracing::debug!(
            addr = %addr,
            buffered = self.config.buffered,
            "stdio connection created"
        );

        StdioConnection {
            input: Some(input),
            output: Some(output),
            local_addr: addr.clone(),
            remote_addr: addr,
        }
    }
}
