mod battery;
pub(crate) mod config;
#[cfg(feature = "time-sync")]
mod net;
mod retained;
pub(crate) mod types;
mod wake;

use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::{
    delay::Delay,
    gpio::{Input, InputConfig, Level, Output, OutputConfig},
    i2c::master::{Config as I2cConfig, I2c, SoftwareTimeout},
    rtc_cntl::{reset_reason, wakeup_cause, SocResetReason},
    spi::{
        master::{Config as SpiConfig, Spi},
        Mode as SpiMode,
    },
    system::Cpu,
    time::{Duration as HalDuration, Rate},
    timer::timg::TimerGroup,
};
use static_cell::StaticCell;
use watchy_wta::display::Ssd1681;

use self::{
    config::{DISPLAY_SPI_MHZ, I2C_FREQ_KHZ, I2C_TIMEOUT_MS, LOG_LEVEL},
    types::WakeContext,
};

static EXECUTOR: StaticCell<esp_rtos::embassy::Executor> = StaticCell::new();

pub(crate) fn run() -> ! {
    esp_println::logger::init_logger(LOG_LEVEL);

    let peripherals = esp_hal::init(esp_hal::Config::default());

    let boot_reset_reason = reset_reason(Cpu::ProCpu);
    let woke_from_deep_sleep = boot_reset_reason == Some(SocResetReason::CoreDeepSleep);
    log::info!(
        "boot: reset_reason={:?} wakeup_cause={:?}",
        boot_reset_reason,
        wakeup_cause()
    );

    #[cfg(feature = "time-sync")]
    esp_alloc::heap_allocator!(size: 72 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let spi_cfg = SpiConfig::default()
        .with_frequency(Rate::from_mhz(DISPLAY_SPI_MHZ))
        .with_mode(SpiMode::_0);
    let spi = Spi::new(peripherals.SPI2, spi_cfg)
        .expect("failed to init SPI2 for display")
        .with_sck(peripherals.GPIO18)
        .with_mosi(peripherals.GPIO23);
    let cs = Output::new(peripherals.GPIO5, Level::High, OutputConfig::default());
    let spi = ExclusiveDevice::new(spi, cs, Delay::new()).expect("failed to claim display CS");
    let panel = Ssd1681::new(
        spi,
        Output::new(peripherals.GPIO10, Level::High, OutputConfig::default()),
        Output::new(peripherals.GPIO9, Level::High, OutputConfig::default()),
        Input::new(peripherals.GPIO19, InputConfig::default()),
        Delay::new(),
    );

    let i2c_cfg = I2cConfig::default()
        .with_frequency(Rate::from_khz(I2C_FREQ_KHZ))
        .with_software_timeout(SoftwareTimeout::Transaction(HalDuration::from_millis(
            I2C_TIMEOUT_MS,
        )));
    let i2c = I2c::new(peripherals.I2C0, i2c_cfg)
        .expect("failed to init I2C0")
        .with_sda(peripherals.GPIO21)
        .with_scl(peripherals.GPIO22);

    let context = WakeContext {
        panel,
        i2c,
        adc1: peripherals.ADC1,
        battery_pin: peripherals.GPIO34,
        lpwr: peripherals.LPWR,
        cold_boot_hint: !woke_from_deep_sleep,
        #[cfg(feature = "time-sync")]
        wifi: peripherals.WIFI,
    };

    let executor = EXECUTOR.init(esp_rtos::embassy::Executor::new());
    executor.run(move |spawner| {
        spawner.must_spawn(wake::wake_task(spawner, context));
    });
}
