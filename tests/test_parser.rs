use docserve::http::parser::{parse_request_line, ParseError, MAX_METHOD_LEN, MAX_TARGET_LEN};
use docserve::http::request::Method;

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let parsed = parse_request_line(req).unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.target, "/");
    assert_eq!(parsed.version, "HTTP/1.1");
}

#[test]
fn test_parse_head_request() {
    let req = b"HEAD /existing.txt HTTP/1.0\r\n\r\n";
    let parsed = parse_request_line(req).unwrap();

    assert_eq!(parsed.method, Method::HEAD);
    assert_eq!(parsed.target, "/existing.txt");
    assert_eq!(parsed.version, "HTTP/1.0");
}

#[test]
fn test_parse_request_with_path_and_query_string() {
    let req = b"GET /search?q=rust%20lang HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let parsed = parse_request_line(req).unwrap();

    // Target is kept exactly as sent
    assert_eq!(parsed.target, "/search?q=rust%20lang");
}

#[test]
fn test_parse_request_line_only() {
    // Headers are optional, a single CRLF is enough
    let parsed = parse_request_line(b"GET /a HTTP/1.1\r\n").unwrap();
    assert_eq!(parsed.target, "/a");
}

#[test]
fn test_parse_missing_crlf() {
    let result = parse_request_line(b"GET / HTTP/1.1");
    assert_eq!(result, Err(ParseError::MissingLineTerminator));

    // A bare LF does not terminate the line
    let result = parse_request_line(b"GET / HTTP/1.1\n\n");
    assert_eq!(result, Err(ParseError::MissingLineTerminator));
}

#[test]
fn test_parse_wrong_token_count() {
    assert_eq!(
        parse_request_line(b"GET\r\n\r\n"),
        Err(ParseError::WrongTokenCount(1))
    );
    assert_eq!(
        parse_request_line(b"GET /\r\n\r\n"),
        Err(ParseError::WrongTokenCount(2))
    );
    assert_eq!(
        parse_request_line(b"GET / HTTP/1.1 extra\r\n\r\n"),
        Err(ParseError::WrongTokenCount(4))
    );
    assert_eq!(
        parse_request_line(b"\r\n\r\n"),
        Err(ParseError::WrongTokenCount(0))
    );
}

#[test]
fn test_parse_extra_whitespace_between_tokens() {
    let parsed = parse_request_line(b"GET   /x\tHTTP/1.1\r\n").unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.target, "/x");
}

#[test]
fn test_parse_method_too_long() {
    let method = "A".repeat(MAX_METHOD_LEN + 1);
    let line = format!("{} / HTTP/1.1\r\n", method);

    assert_eq!(
        parse_request_line(line.as_bytes()),
        Err(ParseError::MethodTooLong)
    );
}

#[test]
fn test_parse_target_too_long() {
    let target = format!("/{}", "a".repeat(MAX_TARGET_LEN));
    let line = format!("GET {} HTTP/1.1\r\n", target);

    assert_eq!(
        parse_request_line(line.as_bytes()),
        Err(ParseError::TargetTooLong)
    );
}

#[test]
fn test_parse_version_too_long() {
    let line = b"GET / HTTP/1.1-with-a-long-suffix\r\n";
    assert_eq!(parse_request_line(line), Err(ParseError::VersionTooLong));
}

#[test]
fn test_parse_invalid_utf8_request_line() {
    let line = b"GET /\xff\xfe HTTP/1.1\r\n";
    assert_eq!(parse_request_line(line), Err(ParseError::InvalidEncoding));
}

#[test]
fn test_parse_unsupported_methods_still_parse() {
    let methods = vec![
        ("POST", Method::POST),
        ("PUT", Method::PUT),
        ("DELETE", Method::DELETE),
        ("OPTIONS", Method::OPTIONS),
        ("PATCH", Method::PATCH),
        ("BREW", Method::Other("BREW".to_string())),
    ];

    for (method_str, expected_method) in methods {
        let req = format!("{} / HTTP/1.1\r\n\r\n", method_str);
        let parsed = parse_request_line(req.as_bytes()).unwrap();
        assert_eq!(parsed.method, expected_method);
        assert!(!parsed.method.is_supported());
    }
}
