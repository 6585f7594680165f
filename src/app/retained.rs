use watchy_wta::retained::{RetainedState, RETAINED_RECORD_LEN};

// Survives deep sleep; contents are arbitrary after power-on.
#[esp_hal::ram(unstable(rtc_fast, persistent))]
static mut RETAINED_RECORD: [u8; RETAINED_RECORD_LEN] = [0; RETAINED_RECORD_LEN];

/// `None` on cold boot or when the record does not validate.
pub(crate) fn load() -> Option<RetainedState> {
    // SAFETY: single core, read once at boot before any task touches it.
    let record = unsafe { core::ptr::addr_of!(RETAINED_RECORD).read() };
    RetainedState::from_record(&record)
}

pub(crate) fn store(state: &RetainedState) {
    // SAFETY: written once right before deep sleep.
    unsafe { core::ptr::addr_of_mut!(RETAINED_RECORD).write(state.record_bytes()) };
}
