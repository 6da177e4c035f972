use crate::http::request::{Method, Request};
use std::fmt;

/// Longest accepted method token.
pub const MAX_METHOD_LEN: usize = 7;
/// Longest accepted request target.
pub const MAX_TARGET_LEN: usize = 2047;
/// Longest accepted version token.
pub const MAX_VERSION_LEN: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No CRLF anywhere in the buffered input
    MissingLineTerminator,
    /// Request line is not valid UTF-8
    InvalidEncoding,
    /// Request line does not hold exactly three tokens
    WrongTokenCount(usize),
    MethodTooLong,
    TargetTooLong,
    VersionTooLong,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingLineTerminator => write!(f, "request line is not terminated by CRLF"),
            ParseError::InvalidEncoding => write!(f, "request line is not valid UTF-8"),
            ParseError::WrongTokenCount(n) => {
                write!(f, "request line has {} tokens, expected 3", n)
            }
            ParseError::MethodTooLong => write!(f, "method exceeds {} bytes", MAX_METHOD_LEN),
            ParseError::TargetTooLong => write!(f, "target exceeds {} bytes", MAX_TARGET_LEN),
            ParseError::VersionTooLong => write!(f, "version exceeds {} bytes", MAX_VERSION_LEN),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses the request line at the start of `buf`.
///
/// Everything after the first CRLF (headers, body) is ignored.
pub fn parse_request_line(buf: &[u8]) -> Result<Request, ParseError> {
    let line_end = find_line_end(buf).ok_or(ParseError::MissingLineTerminator)?;

    let line = std::str::from_utf8(&buf[..line_end])
        .map_err(|_| ParseError::InvalidEncoding)?;

    let tokens: Vec<&str> = line.split_ascii_whitespace().collect();
    let &[method, target, version] = tokens.as_slice() else {
        return Err(ParseError::WrongTokenCount(tokens.len()));
    };

    if method.len() > MAX_METHOD_LEN {
        return Err(ParseError::MethodTooLong);
    }
    if target.len() > MAX_TARGET_LEN {
        return Err(ParseError::TargetTooLong);
    }
    if version.len() > MAX_VERSION_LEN {
        return Err(ParseError::VersionTooLong);
    }

    Ok(Request {
        method: Method::from_token(method),
        target: target.to_string(),
        version: version.to_string(),
    })
}

fn find_line_end(buf: &[u8]) -> Option<usize> {
    buf.windows(2)
        .position(|w| w == b"\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let parsed = parse_request_line(req).unwrap();

        assert_eq!(parsed.method, Method::GET);
        assert_eq!(parsed.target, "/");
        assert_eq!(parsed.version, "HTTP/1.1");
    }

    #[test]
    fn headers_are_not_inspected() {
        let req = b"HEAD /a.txt HTTP/1.0\r\nthis is : not ; a header\r\n\x00\xff";

        let parsed = parse_request_line(req).unwrap();

        assert_eq!(parsed.method, Method::HEAD);
        assert_eq!(parsed.target, "/a.txt");
    }

    #[test]
    fn bounds_are_inclusive() {
        let target = format!("/{}", "a".repeat(MAX_TARGET_LEN - 1));
        let line = format!("OPTIONS {} HTTP/1.12345678\r\n", target);

        let parsed = parse_request_line(line.as_bytes()).unwrap();

        assert_eq!(parsed.target.len(), MAX_TARGET_LEN);
        assert_eq!(parsed.version.len(), MAX_VERSION_LEN);
    }
}
