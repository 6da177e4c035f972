use bytes::BytesMut;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::files::DocumentRoot;
use crate::http::mime;
use crate::http::parser::{parse_request_line, ParseError};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// One accepted connection, serviced for exactly one request.
///
/// `run` consumes the connection, so the stream is shut down and dropped
/// exactly once whichever way the exchange ends.
pub struct Connection<'a, S> {
    stream: S,
    buffer: BytesMut,
    docroot: &'a DocumentRoot,
    chunk_size: usize,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, Option<Request>),
    Closed,
}

impl<'a, S> Connection<'a, S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, docroot: &'a DocumentRoot, cfg: &ServerConfig) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(cfg.request_buffer_size.max(1)),
            docroot,
            chunk_size: cfg.chunk_size,
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(mut self) {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await {
                        None => ConnectionState::Closed,
                        Some(Ok(req)) => ConnectionState::Processing(req),
                        Some(Err(e)) => {
                            debug!(error = %e, "Malformed request line");
                            self.writing(Response::bad_request(), None)
                        }
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = self.respond(&req).await;
                    self.state = self.writing(response, Some(req));
                }

                ConnectionState::Writing(mut writer, req) => {
                    let result = writer.write_to_stream(&mut self.stream).await;
                    log_exchange(req.as_ref(), &writer, result);
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        if let Err(e) = self.stream.shutdown().await {
            debug!(error = %e, "Shutdown after response failed");
        }
    }

    /// One bounded read. `None` means the peer sent nothing and gets no
    /// response.
    async fn read_request(&mut self) -> Option<Result<Request, ParseError>> {
        let n = match self.stream.read_buf(&mut self.buffer).await {
            Ok(n) => n,
            Err(e) => {
                debug!(error = %e, "Read failed before a request arrived");
                return None;
            }
        };

        if n == 0 {
            // Client closed connection
            return None;
        }

        Some(parse_request_line(&self.buffer[..n]))
    }

    fn writing(&self, response: Response, req: Option<Request>) -> ConnectionState {
        ConnectionState::Writing(ResponseWriter::new(response, self.chunk_size), req)
    }

    /// Method check, resolution, stat and open, in that order. The first
    /// step that fails decides the error status.
    async fn respond(&self, req: &Request) -> Response {
        if !req.method.is_supported() {
            return Response::method_not_allowed();
        }

        let path = match self.docroot.resolve(&req.target) {
            Ok(path) => path,
            Err(e) => {
                debug!(uri = %req.target, error = %e, "Rejected request target");
                return Response::bad_request();
            }
        };

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => {
                debug!(path = %path.display(), "Not a regular file");
                return Response::not_found();
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Stat failed");
                return Response::not_found();
            }
        };

        if self.docroot.confines_symlinks() {
            match self.docroot.contains(&path).await {
                Ok(true) => {}
                Ok(false) => {
                    warn!(path = %path.display(), "Resolved path leaves the document root");
                    return Response::not_found();
                }
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Canonicalization failed");
                    return Response::not_found();
                }
            }
        }

        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Open failed");
                return Response::forbidden();
            }
        };

        Response::file(file, metadata.len(), mime::content_type(&path), req.is_head())
    }
}

fn log_exchange(req: Option<&Request>, writer: &ResponseWriter, result: anyhow::Result<()>) {
    let method = req.map(|r| r.method.as_str()).unwrap_or("-");
    let uri = req.map(|r| r.target.as_str()).unwrap_or("-");

    match result {
        Ok(()) => info!(
            method,
            uri,
            status = writer.status().as_u16(),
            bytes = writer.body_sent(),
            "Request served"
        ),
        Err(e) => warn!(
            method,
            uri,
            status = writer.status().as_u16(),
            bytes = writer.body_sent(),
            error = %e,
            "Transfer aborted"
        ),
    }
}
