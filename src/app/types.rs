use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::{
    delay::Delay,
    gpio::{Input, Output},
    i2c::master::I2c,
    peripherals::{ADC1, GPIO34, LPWR},
    spi::master::Spi,
    Blocking,
};
use watchy_wta::display::Ssd1681;

pub(crate) type PanelSpi = ExclusiveDevice<Spi<'static, Blocking>, Output<'static>, Delay>;
pub(crate) type Panel = Ssd1681<PanelSpi, Output<'static>, Output<'static>, Input<'static>, Delay>;

/// Everything one wake cycle needs, handed from `run` to the wake task.
pub(crate) struct WakeContext {
    pub(crate) panel: Panel,
    pub(crate) i2c: I2c<'static, Blocking>,
    pub(crate) adc1: ADC1<'static>,
    pub(crate) battery_pin: GPIO34<'static>,
    pub(crate) lpwr: LPWR<'static>,
    pub(crate) cold_boot_hint: bool,
    #[cfg(feature = "time-sync")]
    pub(crate) wifi: esp_hal::peripherals::WIFI<'static>,
}
