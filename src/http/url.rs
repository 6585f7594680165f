#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UrlError {
    UnsupportedScheme,
    MissingHost,
    InvalidPort,
    TooLong,
}

impl UrlError {
    pub const fn label(self) -> &'static str {
        match self {
            Self::UnsupportedScheme => "only http:// urls are supported",
            Self::MissingHost => "url has no host",
            Self::InvalidPort => "invalid url port",
            Self::TooLong => "url too long",
        }
    }
}

/// Borrowed view of an `http://host[:port]/path` URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HttpUrl<'a> {
    pub host: &'a str,
    pub port: u16,
    /// `host[:port]` exactly as written, for the `Host` header.
    pub authority: &'a str,
    pub path: &'a str,
}

impl<'a> HttpUrl<'a> {
    pub fn parse(url: &'a str) -> Result<Self, UrlError> {
        let rest = url
            .strip_prefix("http://")
            .ok_or(UrlError::UnsupportedScheme)?;
        let (authority, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, "/"),
        };
        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| UrlError::InvalidPort)?;
                if port == 0 {
                    return Err(UrlError::InvalidPort);
                }
                (host, port)
            }
            None => (authority, 80),
        };
        if host.is_empty() {
            return Err(UrlError::MissingHost);
        }
        Ok(Self {
            host,
            port,
            authority,
            path,
        })
    }
}
