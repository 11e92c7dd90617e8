use relay::http::response::{Response, ResponseBuilder, StatusCode};
use relay::http::writer::serialize_response;

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::BadGateway.as_u16(), 502);
    assert_eq!(StatusCode::Other(200).as_u16(), 200);
    assert_eq!(StatusCode::Other(418).as_u16(), 418);
}

#[test]
fn test_status_code_from_u16() {
    assert_eq!(StatusCode::from_u16(400), Some(StatusCode::BadRequest));
    assert_eq!(StatusCode::from_u16(502), Some(StatusCode::BadGateway));
    assert_eq!(StatusCode::from_u16(200), Some(StatusCode::Other(200)));
    assert_eq!(StatusCode::from_u16(301), Some(StatusCode::Other(301)));
    assert_eq!(StatusCode::from_u16(99), None);
    assert_eq!(StatusCode::from_u16(1000), None);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::BadGateway.reason_phrase(), "Bad Gateway");
    assert_eq!(StatusCode::Other(200).reason_phrase(), "");
}

#[test]
fn test_status_code_body_rules() {
    assert!(StatusCode::Other(100).forbids_body());
    assert!(StatusCode::Other(204).forbids_body());
    assert!(StatusCode::Other(304).forbids_body());
    assert!(!StatusCode::Other(200).forbids_body());
    assert!(!StatusCode::BadGateway.forbids_body());
}

#[test]
fn test_response_builder_basic() {
    let response = ResponseBuilder::new(StatusCode::BadGateway)
        .body(b"upstream down".to_vec())
        .build();

    assert_eq!(response.status, StatusCode::BadGateway);
    assert_eq!(response.reason, b"Bad Gateway".to_vec());
    assert_eq!(response.version, "HTTP/1.1");
    assert_eq!(response.body, b"upstream down".to_vec());
    assert_eq!(response.header("Content-Length"), Some("13"));
}

#[test]
fn test_response_builder_header_replaces() {
    let response = ResponseBuilder::new(StatusCode::BadRequest)
        .header("Content-Type", "text/plain")
        .header("content-type", "text/html")
        .build();

    let content_types: Vec<_> = response
        .headers
        .iter()
        .filter(|(k, _)| k.eq_ignore_ascii_case("Content-Type"))
        .collect();
    assert_eq!(content_types.len(), 1);
    assert_eq!(response.header("Content-Type"), Some("text/html"));
}

#[test]
fn test_response_builder_keeps_explicit_content_length() {
    let response = ResponseBuilder::new(StatusCode::BadRequest)
        .header("Content-Length", "0")
        .body(b"ignored".to_vec())
        .build();

    assert_eq!(response.header("Content-Length"), Some("0"));
}

#[test]
fn test_local_error_responses_close() {
    let bad_gateway = Response::bad_gateway();
    assert_eq!(bad_gateway.status, StatusCode::BadGateway);
    assert_eq!(bad_gateway.body, b"502 Bad Gateway".to_vec());
    assert!(!bad_gateway.allows_keep_alive());

    let bad_request = Response::bad_request();
    assert_eq!(bad_request.status, StatusCode::BadRequest);
    assert!(!bad_request.allows_keep_alive());
}

fn downstream_response(status: u16) -> Response {
    Response {
        version: "HTTP/1.1".to_string(),
        status: StatusCode::from_u16(status).unwrap(),
        reason: Vec::new(),
        headers: vec![("Content-Length".to_string(), b"0".to_vec())],
        body: Vec::new(),
        close_delimited: false,
    }
}

#[test]
fn test_length_framed_response_allows_keep_alive() {
    assert!(downstream_response(200).allows_keep_alive());
}

#[test]
fn test_close_delimited_response_forbids_keep_alive() {
    let mut response = downstream_response(200);
    response.close_delimited = true;
    assert!(!response.allows_keep_alive());
}

#[test]
fn test_switching_protocols_forbids_keep_alive() {
    assert!(!downstream_response(101).allows_keep_alive());
}

#[test]
fn test_serialize_response_is_verbatim() {
    let response = Response {
        version: "HTTP/1.0".to_string(),
        status: StatusCode::Other(299),
        reason: b"Custom R\xe9ason".to_vec(),
        headers: vec![
            ("x-lower".to_string(), b"1".to_vec()),
            ("Set-Cookie".to_string(), b"a=1".to_vec()),
            ("Set-Cookie".to_string(), b"b=2".to_vec()),
            ("Content-Disposition".to_string(), b"attachment; filename=\"caf\xe9.txt\"".to_vec()),
        ],
        body: b"body".to_vec(),
        close_delimited: true,
    };

    let bytes = serialize_response(&response);
    assert_eq!(
        bytes,
        b"HTTP/1.0 299 Custom R\xe9ason\r\nx-lower: 1\r\nSet-Cookie: a=1\r\nSet-Cookie: b=2\r\n\
          Content-Disposition: attachment; filename=\"caf\xe9.txt\"\r\n\r\nbody"
            .to_vec()
    );
}
