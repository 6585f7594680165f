use embassy_net::{dns::DnsQueryType, tcp::TcpSocket, IpEndpoint};
use embassy_time::{with_timeout, Duration};
use embedded_io_async::Write;
use watchy_wta::http::{
    split_response, write_get_request, HttpClient, HttpError, HttpResponse, HttpUrl,
};

use super::StackSlot;
use crate::app::config::HTTP_READ_TIMEOUT_MS;

const SOCKET_RX_BYTES: usize = 1024;
const SOCKET_TX_BYTES: usize = 512;
const REQUEST_HEAD_MAX: usize = 256;

/// Plain-HTTP client over whatever stack the link put into the slot.
pub(crate) struct TcpHttpClient<'a> {
    slot: &'a StackSlot,
}

impl<'a> TcpHttpClient<'a> {
    pub(crate) fn new(slot: &'a StackSlot) -> Self {
        Self { slot }
    }
}

impl HttpClient for TcpHttpClient<'_> {
    async fn get(
        &mut self,
        url: &HttpUrl<'_>,
        connect_timeout_ms: u32,
        body: &mut [u8],
    ) -> Result<HttpResponse, HttpError> {
        let stack = self.slot.get().ok_or(HttpError::Connect)?;

        let addresses = stack
            .dns_query(url.host, DnsQueryType::A)
            .await
            .map_err(|err| {
                log::warn!("http: dns host={} err={:?}", url.host, err);
                HttpError::Dns
            })?;
        let address = addresses.first().copied().ok_or(HttpError::Dns)?;

        let mut request = [0u8; REQUEST_HEAD_MAX];
        let request_len = write_get_request(url, &mut request)?;

        let mut rx_buffer = [0u8; SOCKET_RX_BYTES];
        let mut tx_buffer = [0u8; SOCKET_TX_BYTES];
        let mut socket = TcpSocket::new(stack, &mut rx_buffer[..], &mut tx_buffer[..]);
        socket.set_timeout(Some(Duration::from_millis(HTTP_READ_TIMEOUT_MS)));

        let remote = IpEndpoint::new(address, url.port);
        match with_timeout(
            Duration::from_millis(u64::from(connect_timeout_ms)),
            socket.connect(remote),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                log::warn!("http: connect remote={} err={:?}", remote, err);
                return Err(HttpError::Connect);
            }
            Err(_) => return Err(HttpError::Timeout),
        }

        let result = exchange(&mut socket, &request[..request_len], body).await;
        let _ = with_timeout(Duration::from_millis(250), socket.flush()).await;
        socket.close();

        let filled = result?;
        let response = split_response(body, filled)?;
        log::debug!(
            "http: status={} body_len={}",
            response.status,
            response.body_len
        );
        Ok(response)
    }
}

async fn exchange(
    socket: &mut TcpSocket<'_>,
    request: &[u8],
    raw: &mut [u8],
) -> Result<usize, HttpError> {
    socket.write_all(request).await.map_err(|err| {
        log::warn!("http: write err={:?}", err);
        HttpError::Io
    })?;

    let mut filled = 0usize;
    while filled < raw.len() {
        match with_timeout(
            Duration::from_millis(HTTP_READ_TIMEOUT_MS),
            socket.read(&mut raw[filled..]),
        )
        .await
        {
            Ok(Ok(0)) => break,
            Ok(Ok(read)) => filled += read,
            Ok(Err(err)) => {
                log::warn!("http: read err={:?}", err);
                return Err(HttpError::Io);
            }
            Err(_) => return Err(HttpError::Timeout),
        }
    }
    Ok(filled)
}
