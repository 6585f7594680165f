//! Station-mode Wi-Fi and a TCP HTTP client, alive only for one sync attempt.

mod http;
mod wifi;

use core::cell::Cell;

use embassy_net::{Runner, Stack};
use esp_radio::wifi::WifiDevice;

pub(crate) use http::TcpHttpClient;
pub(crate) use wifi::WifiLink;

/// Filled by `WifiLink::connect` once DHCP has produced an address.
pub(crate) type StackSlot = Cell<Option<Stack<'static>>>;

#[embassy_executor::task]
async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await
}
