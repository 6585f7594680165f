use super::*;

fn raw_buffer(text: &str) -> ([u8; 512], usize) {
    let mut buf = [0u8; 512];
    buf[..text.len()].copy_from_slice(text.as_bytes());
    (buf, text.len())
}

#[test]
fn parses_worldtime_url() {
    let url = HttpUrl::parse("http://worldtimeapi.org/api/timezone/Etc/UTC").unwrap();
    assert_eq!(url.host, "worldtimeapi.org");
    assert_eq!(url.port, 80);
    assert_eq!(url.authority, "worldtimeapi.org");
    assert_eq!(url.path, "/api/timezone/Etc/UTC");
}

#[test]
fn parses_explicit_port_and_bare_host() {
    let url = HttpUrl::parse("http://10.0.0.2:8080").unwrap();
    assert_eq!(url.host, "10.0.0.2");
    assert_eq!(url.port, 8080);
    assert_eq!(url.authority, "10.0.0.2:8080");
    assert_eq!(url.path, "/");
}

#[test]
fn rejects_https_and_broken_authorities() {
    assert_eq!(
        HttpUrl::parse("https://worldtimeapi.org/api"),
        Err(UrlError::UnsupportedScheme)
    );
    assert_eq!(HttpUrl::parse("http:///api"), Err(UrlError::MissingHost));
    assert_eq!(HttpUrl::parse("http://host:0/"), Err(UrlError::InvalidPort));
    assert_eq!(HttpUrl::parse("http://host:http/"), Err(UrlError::InvalidPort));
}

#[test]
fn request_head_carries_host_and_close() {
    let url = HttpUrl::parse("http://worldtimeapi.org:8080/api/timezone/Etc/UTC").unwrap();
    let mut out = [0u8; 256];
    let len = write_get_request(&url, &mut out).unwrap();
    let text = core::str::from_utf8(&out[..len]).unwrap();
    assert!(text.starts_with("GET /api/timezone/Etc/UTC HTTP/1.0\r\n"));
    assert!(text.contains("\r\nHost: worldtimeapi.org:8080\r\n"));
    assert!(text.contains("Connection: close\r\n"));
    assert!(text.ends_with("\r\n\r\n"));
}

#[test]
fn request_head_rejects_small_buffer() {
    let url = HttpUrl::parse("http://worldtimeapi.org/api/timezone/Etc/UTC").unwrap();
    let mut out = [0u8; 16];
    assert_eq!(write_get_request(&url, &mut out), Err(HttpError::Io));
}

#[test]
fn status_line_requires_http_version_and_code() {
    assert_eq!(parse_status_line("HTTP/1.1 200 OK\r\nA: b"), Some(200));
    assert_eq!(parse_status_line("HTTP/1.0 404 Not Found"), Some(404));
    assert_eq!(parse_status_line("ICY 200 OK"), None);
    assert_eq!(parse_status_line("HTTP/1.1 20 OK"), None);
    assert_eq!(parse_status_line("HTTP/1.1 +20 OK"), None);
    assert_eq!(parse_status_line("HTTP/1.1 2 0 OK"), None);
    assert_eq!(parse_status_line(""), None);
}

#[test]
fn content_length_rejects_duplicates() {
    let header = "HTTP/1.1 200 OK\r\nContent-Length: 4\r\ncontent-length: 4";
    assert_eq!(parse_content_length(header), Err("duplicate content-length"));
    let header = "HTTP/1.1 200 OK\r\nContent-Length: x";
    assert_eq!(parse_content_length(header), Err("invalid content-length"));
}

#[test]
fn split_moves_body_to_front() {
    let text = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 11\r\n\r\n{\"a\":\"bcd\"}";
    let (mut buf, filled) = raw_buffer(text);
    let response = split_response(&mut buf, filled).unwrap();
    assert_eq!(response.status, 200);
    assert!(response.is_ok());
    assert_eq!(&buf[..response.body_len], b"{\"a\":\"bcd\"}");
}

#[test]
fn split_without_length_takes_everything_until_eof() {
    let text = "HTTP/1.0 404 Not Found\r\n\r\nnope";
    let (mut buf, filled) = raw_buffer(text);
    let response = split_response(&mut buf, filled).unwrap();
    assert_eq!(response.status, 404);
    assert!(!response.is_ok());
    assert_eq!(&buf[..response.body_len], b"nope");
}

#[test]
fn split_reports_short_and_truncated_bodies() {
    let text = "HTTP/1.1 200 OK\r\nContent-Length: 40\r\n\r\nshort";
    let (mut buf, filled) = raw_buffer(text);
    assert_eq!(
        split_response(&mut buf, filled),
        Err(HttpError::MalformedResponse)
    );

    let text = "HTTP/1.1 200 OK\r\nContent-Length: 40\r\n\r\nshort";
    let mut small = [0u8; 44];
    small.copy_from_slice(&text.as_bytes()[..44]);
    assert_eq!(split_response(&mut small, 44), Err(HttpError::BodyTooLarge));
}

#[test]
fn split_rejects_missing_header_terminator() {
    let text = "HTTP/1.1 200 OK\r\nContent-Length: 2\r\n";
    let (mut buf, filled) = raw_buffer(text);
    assert_eq!(
        split_response(&mut buf, filled),
        Err(HttpError::MalformedResponse)
    );
}

#[test]
fn split_rejects_signed_status_code() {
    let (mut buf, filled) = raw_buffer("HTTP/1.1 +20 OK\r\nContent-Length: 2\r\n\r\n{}");
    assert_eq!(
        split_response(&mut buf, filled),
        Err(HttpError::MalformedResponse)
    );
}
