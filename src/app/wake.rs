use core::cell::RefCell;

use embassy_executor::Spawner;
use embedded_hal_bus::i2c::RefCellDevice;
use esp_hal::{
    delay::Delay,
    peripherals::LPWR,
    rtc_cntl::{sleep::TimerWakeupSource, Rtc},
};
use static_cell::StaticCell;
use watchy_wta::{
    clock::TimeSource,
    display::{next_refresh_mode, FrameBuffer},
    drivers::{Bma423, WatchyRtc},
    faces::{self, WatchFace, WatchInputs},
    retained::RetainedState,
    sensors::StepLedger,
    sync::TimeSyncConfig,
};

use super::{
    battery,
    config::{BMA423_FEATURE_CONFIG, FALLBACK_SLEEP_SECONDS, FULL_REFRESH_EVERY_N_UPDATES},
    retained,
    types::WakeContext,
};

static FRAME: StaticCell<FrameBuffer> = StaticCell::new();

/// One wake cycle: optional clock sync, one rendered minute, deep sleep.
#[embassy_executor::task]
pub(crate) async fn wake_task(spawner: Spawner, context: WakeContext) {
    let WakeContext {
        mut panel,
        i2c,
        adc1,
        battery_pin,
        lpwr,
        cold_boot_hint,
        #[cfg(feature = "time-sync")]
        wifi,
    } = context;

    let sync_config = TimeSyncConfig::from_env();
    let (mut state, record_lost) = match retained::load() {
        Some(state) => (state, false),
        None => {
            log::info!("wake: no retained record, starting fresh");
            (RetainedState::cold_boot(sync_config.initial_countdown), true)
        }
    };
    let cold_boot = cold_boot_hint || record_lost;

    let bus = RefCell::new(i2c);
    let mut rtc = match WatchyRtc::detect(RefCellDevice::new(&bus)) {
        Ok(rtc) => {
            log::info!("wake: rtc model={}", rtc.model());
            Some(rtc)
        }
        Err(_) => {
            log::warn!("wake: no rtc answered on i2c");
            None
        }
    };

    #[cfg(feature = "time-sync")]
    {
        use watchy_wta::sync::{SyncCountdown, TimeSyncScheduler};

        use super::net::{StackSlot, TcpHttpClient, WifiLink};

        let mut scheduler =
            TimeSyncScheduler::new(sync_config, SyncCountdown::new(state.sync_countdown));
        if let Some(clock) = rtc.as_mut() {
            let slot = StackSlot::new(None);
            let mut link = WifiLink::new(spawner, wifi, &slot);
            let mut http = TcpHttpClient::new(&slot);
            let outcome = scheduler.tick(&mut link, &mut http, clock).await;
            log::info!("wake: time_sync outcome={:?}", outcome);
        }
        state.sync_countdown = scheduler.countdown().remaining();
    }
    #[cfg(not(feature = "time-sync"))]
    let _ = spawner;

    let Some(now) = rtc.as_mut().and_then(|clock| clock.now()) else {
        log::warn!("wake: no time available, skipping render");
        retained::store(&state);
        enter_deep_sleep(lpwr, FALLBACK_SLEEP_SECONDS);
    };

    let mut accel = Bma423::new(RefCellDevice::new(&bus));
    if cold_boot {
        if let Err(err) = accel.init(BMA423_FEATURE_CONFIG, &mut Delay::new()) {
            log::warn!("wake: bma423 init err={:?} ({})", err, err.label());
        }
    }
    let steps = StepLedger::new(&mut state).read(&mut accel, now.day);

    let battery_mv = battery::read_millivolts(adc1, battery_pin).unwrap_or_else(|| {
        log::warn!("wake: battery adc unavailable");
        0
    });

    let face = WatchFace::from_env();
    let inputs = WatchInputs {
        time: now,
        steps,
        battery_mv,
    };
    let frame = FRAME.init(FrameBuffer::default());
    let Ok(()) = faces::render(face, &inputs, frame);

    let mode = next_refresh_mode(
        &mut state.partial_refreshes,
        FULL_REFRESH_EVERY_N_UPDATES,
        cold_boot,
    );
    log::info!(
        "wake: render face={} time={} steps={} battery_mv={} mode={:?}",
        face.name(),
        now,
        steps,
        battery_mv,
        mode
    );
    if let Err(err) = panel.show(frame, mode) {
        log::warn!("wake: display err={:?} ({})", err, err.label());
    }
    if let Err(err) = panel.sleep() {
        log::warn!("wake: display sleep err={:?}", err);
    }

    retained::store(&state);

    // Aim for the next minute boundary as the clock sees it after the refresh.
    let seconds = rtc
        .as_mut()
        .and_then(|clock| clock.now())
        .map(|time| u64::from(time.seconds_to_next_minute()))
        .unwrap_or(FALLBACK_SLEEP_SECONDS);
    enter_deep_sleep(lpwr, seconds);
}

fn enter_deep_sleep(lpwr: LPWR<'static>, seconds: u64) -> ! {
    log::info!("sleep: deep sleep seconds={}", seconds);
    let mut rtc = Rtc::new(lpwr);
    let timer = TimerWakeupSource::new(core::time::Duration::from_secs(seconds));
    rtc.sleep_deep(&[&timer])
}
