//! Line-delimited JSON-RPC over a byte stream pair.
//!
//! Each message is one line terminated by `\n`. The binary binds this to
//! stdin/stdout; tests bind it to in-memory buffers.

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, trace};

use crate::domain::dispatcher::CallDispatcher;
use crate::mcp::server::handle_json_rpc_bytes;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to read from input stream: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to write to output stream: {0}")]
    Write(#[source] std::io::Error),
}

pub struct StdioTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Returns `None` on EOF. Blank lines come back empty.
    ///
    /// Lines are kept as raw bytes so a frame that is not valid UTF-8 reaches
    /// the engine and is answered with a parse error.
    pub async fn read_line(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        let mut line = Vec::new();
        let bytes_read = self
            .reader
            .read_until(b'\n', &mut line)
            .await
            .map_err(TransportError::Read)?;

        if bytes_read == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_ascii().to_vec();
        trace!(len = trimmed.len(), "read message");
        Ok(Some(trimmed))
    }

    pub async fn write_line(&mut self, message: &str) -> Result<(), TransportError> {
        trace!(len = message.len(), "writing message");

        self.writer
            .write_all(message.as_bytes())
            .await
            .map_err(TransportError::Write)?;
        self.writer
            .write_all(b"\n")
            .await
            .map_err(TransportError::Write)?;
        self.writer.flush().await.map_err(TransportError::Write)?;

        Ok(())
    }
}

/// Serves MCP until the input stream closes.
pub async fn serve<R, W>(
    dispatcher: &CallDispatcher,
    reader: R,
    writer: W,
) -> Result<(), TransportError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut transport = StdioTransport::new(reader, writer);

    while let Some(line) = transport.read_line().await? {
        if line.is_empty() {
            continue;
        }

        if let Some(response) = handle_json_rpc_bytes(dispatcher, &line).await {
            transport.write_line(&response.to_string()).await?;
        }
    }

    info!("input closed, shutting down");
    Ok(())
}
