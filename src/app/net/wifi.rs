use embassy_executor::Spawner;
use embassy_net::{Stack, StackResources};
use embassy_time::{with_timeout, Duration};
use esp_hal::{peripherals::WIFI, rng::Rng};
use esp_radio::wifi::{
    AuthMethod, ClientConfig, Config as WifiRuntimeConfig, ModeConfig, ScanMethod, WifiController,
};
use static_cell::StaticCell;
use watchy_wta::sync::Connectivity;

use super::{net_task, StackSlot};
use crate::app::config::{DHCP_TIMEOUT_MS, WIFI_CONNECT_TIMEOUT_MS};

const WIFI_RX_QUEUE_SIZE: usize = 3;
const WIFI_TX_QUEUE_SIZE: usize = 2;
const WIFI_STATIC_RX_BUF_NUM: u8 = 4;
const WIFI_DYNAMIC_RX_BUF_NUM: u16 = 8;
const WIFI_DYNAMIC_TX_BUF_NUM: u16 = 8;
const WIFI_RX_BA_WIN: u8 = 3;

static RADIO_CTRL: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
static STACK_RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();

fn wifi_credentials() -> Option<(&'static str, &'static str)> {
    let ssid = option_env!("WATCHY_WIFI_SSID").or(option_env!("SSID"))?;
    let password = option_env!("WATCHY_WIFI_PASSWORD")
        .or(option_env!("PASSWORD"))
        .unwrap_or("");
    Some((ssid, password))
}

fn wifi_runtime_config() -> WifiRuntimeConfig {
    WifiRuntimeConfig::default()
        .with_rx_queue_size(WIFI_RX_QUEUE_SIZE)
        .with_tx_queue_size(WIFI_TX_QUEUE_SIZE)
        .with_static_rx_buf_num(WIFI_STATIC_RX_BUF_NUM)
        .with_dynamic_rx_buf_num(WIFI_DYNAMIC_RX_BUF_NUM)
        .with_dynamic_tx_buf_num(WIFI_DYNAMIC_TX_BUF_NUM)
        .with_ampdu_rx_enable(false)
        .with_ampdu_tx_enable(false)
        .with_rx_ba_win(WIFI_RX_BA_WIN)
}

fn mode_config(ssid: &str, password: &str) -> ModeConfig {
    let auth_method = if password.is_empty() {
        AuthMethod::None
    } else {
        AuthMethod::Wpa2Personal
    };
    ModeConfig::Client(
        ClientConfig::default()
            .with_ssid(ssid.into())
            .with_password(password.into())
            .with_auth_method(auth_method)
            .with_scan_method(ScanMethod::AllChannels),
    )
}

/// Brings the radio up on first `connect`. The radio and the network stack
/// live in statics, so a link can be established at most once per boot.
pub(crate) struct WifiLink<'a> {
    spawner: Spawner,
    wifi: Option<WIFI<'static>>,
    controller: Option<WifiController<'static>>,
    slot: &'a StackSlot,
}

impl<'a> WifiLink<'a> {
    pub(crate) fn new(spawner: Spawner, wifi: WIFI<'static>, slot: &'a StackSlot) -> Self {
        Self {
            spawner,
            wifi: Some(wifi),
            controller: None,
            slot,
        }
    }

    fn bring_up(&mut self) -> Result<Stack<'static>, &'static str> {
        let wifi = self.wifi.take().ok_or("wifi: radio already consumed")?;

        let radio_ctrl = esp_radio::init().map_err(|err| {
            log::warn!("wifi: esp_radio::init err={:?}", err);
            "wifi: radio init failed"
        })?;
        let radio_ctrl = RADIO_CTRL.init(radio_ctrl);
        let (controller, ifaces) = esp_radio::wifi::new(radio_ctrl, wifi, wifi_runtime_config())
            .map_err(|err| {
                log::warn!("wifi: driver init err={:?}", err);
                "wifi: driver init failed"
            })?;

        let rng = Rng::new();
        let seed = (rng.random() as u64) << 32 | rng.random() as u64;
        let (stack, runner) = embassy_net::new(
            ifaces.sta,
            embassy_net::Config::dhcpv4(Default::default()),
            STACK_RESOURCES.init(StackResources::<3>::new()),
            seed,
        );
        self.spawner
            .spawn(net_task(runner))
            .map_err(|_| "wifi: net task spawn failed")?;
        self.controller = Some(controller);
        Ok(stack)
    }

    async fn associate(&mut self, stack: Stack<'static>) -> Result<(), &'static str> {
        let (ssid, password) = wifi_credentials().ok_or("wifi: no credentials compiled in")?;
        let controller = self.controller.as_mut().ok_or("wifi: no controller")?;

        controller.set_config(&mode_config(ssid, password)).map_err(|err| {
            log::warn!("wifi: station config err={:?}", err);
            "wifi: station config rejected"
        })?;
        if !matches!(controller.is_started(), Ok(true)) {
            controller.start_async().await.map_err(|err| {
                log::warn!("wifi: start err={:?}", err);
                "wifi: start failed"
            })?;
        }

        match with_timeout(
            Duration::from_millis(WIFI_CONNECT_TIMEOUT_MS),
            controller.connect_async(),
        )
        .await
        {
            Ok(Ok(())) => log::info!("wifi: associated ssid={}", ssid),
            Ok(Err(err)) => {
                log::warn!("wifi: connect err={:?}", err);
                return Err("wifi: connect failed");
            }
            Err(_) => return Err("wifi: connect timeout"),
        }

        with_timeout(Duration::from_millis(DHCP_TIMEOUT_MS), stack.wait_config_up())
            .await
            .map_err(|_| "wifi: dhcp timeout")?;
        if let Some(config) = stack.config_v4() {
            log::info!("wifi: dhcp address={}", config.address);
        }
        Ok(())
    }
}

impl Connectivity for WifiLink<'_> {
    async fn connect(&mut self) -> bool {
        let stack = match self.bring_up() {
            Ok(stack) => stack,
            Err(reason) => {
                log::warn!("{}", reason);
                return false;
            }
        };
        match self.associate(stack).await {
            Ok(()) => {
                self.slot.set(Some(stack));
                true
            }
            Err(reason) => {
                log::warn!("{}", reason);
                false
            }
        }
    }

    async fn disconnect(&mut self) {
        self.slot.set(None);
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        if let Err(err) = controller.disconnect_async().await {
            log::debug!("wifi: disconnect err={:?}", err);
        }
        if matches!(controller.is_started(), Ok(true)) {
            if let Err(err) = controller.stop_async().await {
                log::warn!("wifi: stop err={:?}", err);
            }
        }
        log::info!("wifi: radio off");
    }
}
