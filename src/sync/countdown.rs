/// Wake-cycle ticks left before the next network time sync.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncCountdown(u32);

impl SyncCountdown {
    pub const fn new(ticks: u32) -> Self {
        Self(ticks)
    }

    pub const fn remaining(self) -> u32 {
        self.0
    }

    pub const fn is_due(self) -> bool {
        self.0 == 0
    }

    pub fn decrement(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }

    pub fn reset(&mut self, ticks: u32) {
        self.0 = ticks;
    }
}
