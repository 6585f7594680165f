//! State that must survive deep sleep but not a power loss. The firmware keeps
//! the encoded record in RTC fast memory; anything that fails validation is a
//! cold boot.

pub const RETAINED_MAGIC: u32 = 0x5954_4157;
pub const RETAINED_VERSION: u8 = 1;
pub const RETAINED_RECORD_LEN: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetainedState {
    pub sync_countdown: u32,
    /// Raw step-counter reading at the start of `step_baseline_day`.
    pub step_baseline: u32,
    /// Day of month the baseline belongs to, 0 when unset.
    pub step_baseline_day: u8,
    pub partial_refreshes: u8,
}

impl RetainedState {
    pub const fn cold_boot(initial_countdown: u32) -> Self {
        Self {
            sync_countdown: initial_countdown,
            step_baseline: 0,
            step_baseline_day: 0,
            partial_refreshes: 0,
        }
    }

    pub fn record_bytes(&self) -> [u8; RETAINED_RECORD_LEN] {
        let mut record = [0u8; RETAINED_RECORD_LEN];
        record[0..4].copy_from_slice(&RETAINED_MAGIC.to_le_bytes());
        record[4] = RETAINED_VERSION;
        record[5..9].copy_from_slice(&self.sync_countdown.to_le_bytes());
        record[9..13].copy_from_slice(&self.step_baseline.to_le_bytes());
        record[13] = self.step_baseline_day;
        record[14] = self.partial_refreshes;
        record[RETAINED_RECORD_LEN - 1] = checksum8(&record[..RETAINED_RECORD_LEN - 1]);
        record
    }

    pub fn from_record(record: &[u8; RETAINED_RECORD_LEN]) -> Option<Self> {
        if u32::from_le_bytes([record[0], record[1], record[2], record[3]]) != RETAINED_MAGIC {
            return None;
        }
        if record[4] != RETAINED_VERSION {
            return None;
        }
        if record[RETAINED_RECORD_LEN - 1] != checksum8(&record[..RETAINED_RECORD_LEN - 1]) {
            return None;
        }
        if record[13] > 31 {
            return None;
        }
        Some(Self {
            sync_countdown: u32::from_le_bytes([record[5], record[6], record[7], record[8]]),
            step_baseline: u32::from_le_bytes([record[9], record[10], record[11], record[12]]),
            step_baseline_day: record[13],
            partial_refreshes: record[14],
        })
    }
}

fn checksum8(bytes: &[u8]) -> u8 {
    let mut acc = 0x5Au8;
    for &byte in bytes {
        acc ^= byte.rotate_left(1);
    }
    acc
}
