//! Battery and step readings as the faces consume them.

use crate::retained::RetainedState;

pub const BATTERY_EMPTY_MV: u16 = 3_800;
pub const BATTERY_FULL_MV: u16 = 4_300;

/// Linear charge estimate between empty and full, clamped to 0..=100.
pub fn battery_percent(millivolts: u16) -> u8 {
    if millivolts <= BATTERY_EMPTY_MV {
        return 0;
    }
    if millivolts >= BATTERY_FULL_MV {
        return 100;
    }
    let span = u32::from(BATTERY_FULL_MV - BATTERY_EMPTY_MV);
    let above = u32::from(millivolts - BATTERY_EMPTY_MV);
    (above * 100 / span) as u8
}

/// Source of a monotonically increasing raw step count.
pub trait StepCounter {
    type Error: core::fmt::Debug;

    fn raw_steps(&mut self) -> Result<u32, Self::Error>;
}

/// Turns the raw counter into steps since midnight. The counter itself is
/// never reset; the ledger re-arms its baseline the first time it sees a new
/// day of month.
pub struct StepLedger<'a> {
    state: &'a mut RetainedState,
}

impl<'a> StepLedger<'a> {
    pub fn new(state: &'a mut RetainedState) -> Self {
        Self { state }
    }

    pub fn steps_today(&mut self, raw: u32, day: u8) -> u32 {
        if self.state.step_baseline_day != day || raw < self.state.step_baseline {
            log::info!(
                "steps: new baseline day={} raw={} previous_day={}",
                day,
                raw,
                self.state.step_baseline_day
            );
            self.state.step_baseline = raw;
            self.state.step_baseline_day = day;
        }
        raw - self.state.step_baseline
    }

    /// Reads the counter; a failed read shows as zero steps for this minute.
    pub fn read<S: StepCounter>(&mut self, counter: &mut S, day: u8) -> u32 {
        match counter.raw_steps() {
            Ok(raw) => self.steps_today(raw, day),
            Err(err) => {
                log::warn!("steps: read err={:?}", err);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedCounter(Result<u32, ()>);

    impl StepCounter for FixedCounter {
        type Error = ();

        fn raw_steps(&mut self) -> Result<u32, ()> {
            self.0
        }
    }

    #[test]
    fn battery_percent_is_linear_and_clamped() {
        assert_eq!(battery_percent(3_000), 0);
        assert_eq!(battery_percent(3_800), 0);
        assert_eq!(battery_percent(4_050), 50);
        assert_eq!(battery_percent(4_300), 100);
        assert_eq!(battery_percent(4_900), 100);
    }

    #[test]
    fn first_reading_of_a_day_becomes_baseline() {
        let mut state = RetainedState::cold_boot(0);
        let mut ledger = StepLedger::new(&mut state);
        assert_eq!(ledger.steps_today(5_000, 15), 0);
        assert_eq!(ledger.steps_today(5_321, 15), 321);
        assert_eq!(state.step_baseline, 5_000);
        assert_eq!(state.step_baseline_day, 15);
    }

    #[test]
    fn day_change_rearms_baseline() {
        let mut state = RetainedState::cold_boot(0);
        let mut ledger = StepLedger::new(&mut state);
        ledger.steps_today(1_000, 15);
        assert_eq!(ledger.steps_today(9_000, 15), 8_000);
        assert_eq!(ledger.steps_today(9_010, 16), 0);
        assert_eq!(ledger.steps_today(9_110, 16), 100);
    }

    #[test]
    fn counter_reset_under_baseline_rearms() {
        let mut state = RetainedState::cold_boot(0);
        let mut ledger = StepLedger::new(&mut state);
        ledger.steps_today(7_000, 3);
        assert_eq!(ledger.steps_today(12, 3), 0);
        assert_eq!(ledger.steps_today(40, 3), 28);
    }

    #[test]
    fn failed_read_shows_zero_and_keeps_baseline() {
        let mut state = RetainedState::cold_boot(0);
        let mut ledger = StepLedger::new(&mut state);
        assert_eq!(ledger.read(&mut FixedCounter(Ok(200)), 9), 0);
        assert_eq!(ledger.read(&mut FixedCounter(Err(())), 9), 0);
        assert_eq!(ledger.read(&mut FixedCounter(Ok(260)), 9), 60);
    }
}
