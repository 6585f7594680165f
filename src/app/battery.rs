use esp_hal::{
    analog::adc::{Adc, AdcConfig, Attenuation},
    peripherals::{ADC1, GPIO34},
};

use super::config::{BATTERY_ADC_FULL_SCALE_MV, BATTERY_ADC_SAMPLES};

/// Averaged battery voltage, or `None` when the ADC never answered.
pub(crate) fn read_millivolts(adc1: ADC1<'_>, pin: GPIO34<'_>) -> Option<u16> {
    let mut config = AdcConfig::new();
    let mut pin = config.enable_pin(pin, Attenuation::_11dB);
    let mut adc = Adc::new(adc1, config);

    let mut sum = 0u32;
    let mut samples = 0u32;
    for _ in 0..BATTERY_ADC_SAMPLES {
        match nb::block!(adc.read_oneshot(&mut pin)) {
            Ok(raw) => {
                sum += u32::from(raw);
                samples += 1;
            }
            Err(err) => log::warn!("battery: adc read err={:?}", err),
        }
    }
    if samples == 0 {
        return None;
    }
    let millivolts = sum / samples * BATTERY_ADC_FULL_SCALE_MV / 4096;
    Some(millivolts.min(u32::from(u16::MAX)) as u16)
}
