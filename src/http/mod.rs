//! Minimal HTTP/1.0 GET plumbing: URL splitting, response parsing and the
//! client capability the sync scheduler talks to.

mod response;
#[cfg(test)]
mod tests;
mod url;

pub use response::{find_header_end, parse_content_length, parse_status_line, split_response};
pub use url::{HttpUrl, UrlError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpError {
    Url(UrlError),
    Dns,
    Connect,
    Timeout,
    Io,
    MalformedResponse,
    BodyTooLarge,
}

impl HttpError {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Url(err) => err.label(),
            Self::Dns => "dns lookup failed",
            Self::Connect => "connect failed",
            Self::Timeout => "request timeout",
            Self::Io => "socket io",
            Self::MalformedResponse => "malformed response",
            Self::BodyTooLarge => "body too large",
        }
    }
}

impl From<UrlError> for HttpError {
    fn from(err: UrlError) -> Self {
        Self::Url(err)
    }
}

/// Status and body length; the body itself sits at the start of the buffer
/// handed to [`HttpClient::get`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body_len: usize,
}

impl HttpResponse {
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }
}

#[allow(async_fn_in_trait)]
pub trait HttpClient {
    /// One GET, bounded by `connect_timeout_ms` for the connect phase. The
    /// response body is copied into `body`.
    async fn get(
        &mut self,
        url: &HttpUrl<'_>,
        connect_timeout_ms: u32,
        body: &mut [u8],
    ) -> Result<HttpResponse, HttpError>;
}

/// Writes the request head for `url` into `out`, returning the used length.
pub fn write_get_request(url: &HttpUrl<'_>, out: &mut [u8]) -> Result<usize, HttpError> {
    let parts: [&[u8]; 7] = [
        b"GET ",
        url.path.as_bytes(),
        b" HTTP/1.0\r\nHost: ",
        url.authority.as_bytes(),
        b"\r\nUser-Agent: watchy-wta\r\nAccept: application/json\r\n",
        b"Connection: close\r\n",
        b"\r\n",
    ];
    let mut len = 0usize;
    for part in parts {
        let end = len + part.len();
        if end > out.len() {
            return Err(HttpError::Io);
        }
        out[len..end].copy_from_slice(part);
        len = end;
    }
    Ok(len)
}
