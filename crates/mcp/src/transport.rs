//! MCP transport layer.
//!
//! Defines the `Transport` trait for sending/receiving JSON-RPC message
//! lines, a byte-stream implementation used for stdio, and an in-memory
//! channel pair for tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::McpError;
use crate::framing::LineFramer;

const READ_CHUNK_SIZE: usize = 4096;

/// Trait for MCP message transport.
///
/// Implementations handle the wire format (newline-delimited JSON) over
/// different channels.
#[async_trait]
pub trait Transport: Send {
    /// Read the next message line from the transport.
    /// Returns `None` when the transport is closed.
    async fn receive(&mut self) -> Result<Option<String>, McpError>;

    /// Write one message line to the transport.
    async fn send(&mut self, message: &str) -> Result<(), McpError>;
}

/// Transport over a raw byte stream, framed by [`LineFramer`].
///
/// Reads arrive in arbitrary-sized chunks; lines completed by each chunk
/// queue up and drain one per `receive` call. Each sent message becomes
/// exactly one newline-terminated line, flushed immediately.
pub struct ByteTransport<R, W> {
    reader: R,
    writer: W,
    framer: LineFramer,
    pending: VecDeque<String>,
}

impl<R, W> ByteTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            framer: LineFramer::new(),
            pending: VecDeque::new(),
        }
    }
}

/// Stdio-based transport: the primary deployment, with the server running
/// as a subprocess of its client.
pub type StdioTransport = ByteTransport<tokio::io::Stdin, tokio::io::Stdout>;

impl StdioTransport {
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

#[async_trait]
impl<R, W> Transport for ByteTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn receive(&mut self) -> Result<Option<String>, McpError> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Ok(Some(line));
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let n = self.reader.read(&mut chunk).await?;
            if n == 0 {
                // EOF; an unterminated partial line is never a message.
                if !self.framer.is_empty() {
                    tracing::debug!("discarding unterminated partial line at EOF");
                }
                return Ok(None);
            }
            self.pending.extend(self.framer.push(&chunk[..n]));
        }
    }

    async fn send(&mut self, message: &str) -> Result<(), McpError> {
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// In-memory transport for testing, backed by channel pairs.
pub struct ChannelTransport {
    rx: tokio::sync::mpsc::Receiver<String>,
    tx: tokio::sync::mpsc::Sender<String>,
}

impl ChannelTransport {
    /// Create a pair of connected transports for testing.
    ///
    /// Messages sent on one transport are received by the other.
    pub fn pair() -> (Self, Self) {
        let (tx_a, rx_b) = tokio::sync::mpsc::channel(32);
        let (tx_b, rx_a) = tokio::sync::mpsc::channel(32);
        (
            Self { rx: rx_a, tx: tx_a },
            Self { rx: rx_b, tx: tx_b },
        )
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn receive(&mut self) -> Result<Option<String>, McpError> {
        Ok(self.rx.recv().await)
    }

    async fn send(&mut self, message: &str) -> Result<(), McpError> {
        self.tx.send(message.to_string()).await.map_err(|e| {
            McpError::Transport(std::io::Error::new(std::io::ErrorKind::BrokenPipe, e))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_receive_lines_from_byte_stream() {
        let input = b"{\"id\":1}\n{\"id\":2}\n".to_vec();
        let mut transport = ByteTransport::new(&input[..], Vec::new());

        assert_eq!(transport.receive().await.unwrap().unwrap(), "{\"id\":1}");
        assert_eq!(transport.receive().await.unwrap().unwrap(), "{\"id\":2}");
        assert_eq!(transport.receive().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_eof_on_empty_stream() {
        let mut transport = ByteTransport::new(&b""[..], Vec::new());
        assert_eq!(transport.receive().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_partial_tail_dropped_at_eof() {
        let input = b"{\"id\":1}\n{\"id\":2".to_vec();
        let mut transport = ByteTransport::new(&input[..], Vec::new());

        assert_eq!(transport.receive().await.unwrap().unwrap(), "{\"id\":1}");
        assert_eq!(transport.receive().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_send_appends_newline_per_message() {
        let mut transport = ByteTransport::new(&b""[..], Vec::new());
        transport.send("{\"id\":1}").await.unwrap();
        transport.send("{\"id\":2}").await.unwrap();

        let written = String::from_utf8(transport.writer.clone()).unwrap();
        assert_eq!(written, "{\"id\":1}\n{\"id\":2}\n");
    }

    #[tokio::test]
    async fn test_channel_transport_pair() {
        let (mut a, mut b) = ChannelTransport::pair();

        a.send("hello from a").await.unwrap();
        let msg = b.receive().await.unwrap();
        assert_eq!(msg, Some("hello from a".to_string()));

        b.send("hello from b").await.unwrap();
        let msg = a.receive().await.unwrap();
        assert_eq!(msg, Some("hello from b".to_string()));
    }

    #[tokio::test]
    async fn test_channel_transport_closed() {
        let (mut a, b) = ChannelTransport::pair();
        drop(b);
        let result = a.receive().await.unwrap();
        assert_eq!(result, None);
    }
}
