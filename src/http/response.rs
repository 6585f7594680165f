use super::{HttpError, HttpResponse};

pub fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|window| window == b"\r\n\r\n")
}

/// `HTTP/1.x <code> <reason>` -> code.
pub fn parse_status_line(header: &str) -> Option<u16> {
    let first_line = header.lines().next()?;
    let mut parts = first_line.split_ascii_whitespace();
    let version = parts.next()?;
    if !version.starts_with("HTTP/1.") {
        return None;
    }
    let code = parts.next()?;
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    code.parse::<u16>().ok()
}

pub fn parse_content_length(header: &str) -> Result<Option<usize>, &'static str> {
    let mut content_length = None;

    for line in header.lines().skip(1) {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };

        if !name.eq_ignore_ascii_case("content-length") {
            continue;
        }

        let parsed = value
            .trim()
            .parse::<usize>()
            .map_err(|_| "invalid content-length")?;

        if content_length.is_some() {
            return Err("duplicate content-length");
        }

        content_length = Some(parsed);
    }

    Ok(content_length)
}

/// Splits a complete response (read until EOF) held in `raw`, moves the body
/// to the front of `raw` and returns the status with the body length.
pub fn split_response(raw: &mut [u8], filled: usize) -> Result<HttpResponse, HttpError> {
    let filled = filled.min(raw.len());
    let header_end = find_header_end(&raw[..filled]).ok_or(HttpError::MalformedResponse)?;
    let header =
        core::str::from_utf8(&raw[..header_end]).map_err(|_| HttpError::MalformedResponse)?;
    let status = parse_status_line(header).ok_or(HttpError::MalformedResponse)?;
    let content_length =
        parse_content_length(header).map_err(|_| HttpError::MalformedResponse)?;

    let body_start = header_end + 4;
    let available = filled.saturating_sub(body_start);
    let body_len = match content_length {
        Some(expected) if expected > available => {
            return Err(if filled == raw.len() {
                HttpError::BodyTooLarge
            } else {
                HttpError::MalformedResponse
            });
        }
        Some(expected) => expected,
        // No length and a full buffer: the body was cut off.
        None if filled == raw.len() => return Err(HttpError::BodyTooLarge),
        None => available,
    };

    raw.copy_within(body_start..body_start + body_len, 0);
    Ok(HttpResponse { status, body_len })
}
