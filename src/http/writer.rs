use anyhow::bail;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::{Body, Response, StatusCode};

const HTTP_VERSION: &str = "HTTP/1.1";

/// Serializes the status line and header block, including the blank line.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for (k, v) in resp.headers.iter() {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Writes one response: the header block, then the body.
///
/// File bodies are copied chunk by chunk with no coalescing. Once the head is
/// out there is no way to report a failure to the client, so callers treat any
/// error from `write_to_stream` as "close the connection".
pub struct ResponseWriter {
    status: StatusCode,
    head: Vec<u8>,
    body: Body,
    chunk_size: usize,
    body_sent: u64,
}

impl ResponseWriter {
    pub fn new(response: Response, chunk_size: usize) -> Self {
        let head = serialize_head(&response);
        Self {
            status: response.status,
            head,
            body: response.body,
            chunk_size: chunk_size.max(1),
            body_sent: 0,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Body bytes delivered so far.
    pub fn body_sent(&self) -> u64 {
        self.body_sent
    }

    pub async fn write_to_stream<S>(&mut self, stream: &mut S) -> anyhow::Result<()>
    where
        S: AsyncWrite + Unpin,
    {
        write_fully(stream, &self.head).await?;

        match &mut self.body {
            Body::Empty => {}
            Body::Bytes(bytes) => {
                write_fully(stream, bytes).await?;
                self.body_sent = bytes.len() as u64;
            }
            Body::File { file, len } => {
                let expected = *len;
                copy_chunks(file, stream, expected, self.chunk_size, &mut self.body_sent).await?;
            }
        }

        stream.flush().await?;
        Ok(())
    }
}

/// Copies `expected` bytes from `src` to `dst`, one chunk per read.
///
/// Stops without retrying on a read error, an early end of file or a failed
/// write.
async fn copy_chunks<R, W>(
    src: &mut R,
    dst: &mut W,
    expected: u64,
    chunk_size: usize,
    sent: &mut u64,
) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut chunk = vec![0u8; chunk_size];

    while *sent < expected {
        let remaining = usize::try_from(expected - *sent).unwrap_or(usize::MAX);
        let want = chunk.len().min(remaining);
        let n = src.read(&mut chunk[..want]).await?;
        if n == 0 {
            bail!("file ended after {} of {} bytes", sent, expected);
        }

        write_fully(dst, &chunk[..n]).await?;
        *sent += n as u64;
    }

    Ok(())
}

async fn write_fully<W>(stream: &mut W, buf: &[u8]) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;

    while written < buf.len() {
        let n = stream.write(&buf[written..]).await?;

        if n == 0 {
            bail!("connection closed while writing");
        }

        written += n;
    }

    Ok(())
}
