use docserve::http::request::{Method, Request};

#[test]
fn test_request_method_equality() {
    assert_eq!(Method::GET, Method::GET);
    assert_ne!(Method::GET, Method::HEAD);
}

#[test]
fn test_request_method_from_token() {
    assert_eq!(Method::from_token("GET"), Method::GET);
    assert_eq!(Method::from_token("HEAD"), Method::HEAD);
    assert_eq!(Method::from_token("POST"), Method::POST);
    // Case-sensitive
    assert_eq!(Method::from_token("get"), Method::Other("get".to_string()));
}

#[test]
fn test_request_method_display_round_trips_token() {
    for token in ["GET", "HEAD", "PUT", "TRACE"] {
        assert_eq!(Method::from_token(token).to_string(), token);
    }
}

#[test]
fn test_only_get_and_head_are_supported() {
    assert!(Method::GET.is_supported());
    assert!(Method::HEAD.is_supported());
    assert!(!Method::POST.is_supported());
    assert!(!Method::OPTIONS.is_supported());
    assert!(!Method::Other("get".to_string()).is_supported());
}

#[test]
fn test_request_is_head() {
    let head = Request {
        method: Method::HEAD,
        target: "/".to_string(),
        version: "HTTP/1.1".to_string(),
    };
    let get = Request {
        method: Method::GET,
        ..head.clone()
    };

    assert!(head.is_head());
    assert!(!get.is_head());
}
