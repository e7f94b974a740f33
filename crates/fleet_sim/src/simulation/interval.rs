use jiff::SignedDuration;

/// Fixed-period timer driven by frame timestamps. Fires at most once per
/// frame; periods missed during a long frame are skipped, not replayed.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period: SignedDuration,
    next_due: SignedDuration,
}

impl IntervalTimer {
    pub fn new(period: SignedDuration, start: SignedDuration) -> Self {
        Self {
            period,
            next_due: start + period,
        }
    }

    pub fn fire(&mut self, now: SignedDuration) -> bool {
        if now < self.next_due {
            return false;
        }

        if self.period.is_zero() || self.period.is_negative() {
            self.next_due = now;
            return true;
        }

        while self.next_due <= now {
            self.next_due += self.period;
        }

        true
    }
}
