use crate::domain::round_one_decimal;

/// Denormalized usage counters of a user.
///
/// `time_sum` is the running sum of all nonzero game durations (minutes) and
/// `timed_count` the number of games contributing to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct UserUsage {
    pub rooms_count: u32,
    pub reviews_count: u32,
    pub time_sum: i64,
    pub timed_count: u32,
}

fn decrement(counter: u32, name: &str) -> u32 {
    counter.checked_sub(1).unwrap_or_else(|| {
        log::warn!("User {} would go negative, clamping at zero", name);
        0
    })
}

impl UserUsage {
    fn add_time(mut self, minutes: u32) -> Self {
        if minutes > 0 {
            self.time_sum += i64::from(minutes);
            self.timed_count += 1;
        }
        self
    }

    fn remove_time(mut self, minutes: u32) -> Self {
        if minutes == 0 {
            return self;
        }
        self.timed_count = decrement(self.timed_count, "timed game count");
        let time_sum = self.time_sum - i64::from(minutes);
        let consistent = if self.timed_count == 0 {
            time_sum == 0
        } else {
            time_sum >= 0
        };
        if !consistent {
            log::warn!(
                "User time sum left at {} with {} timed games, clamping",
                time_sum,
                self.timed_count
            );
        }
        self.time_sum = if self.timed_count == 0 {
            0
        } else {
            time_sum.max(0)
        };
        self
    }

    pub fn game_created(mut self, minutes: u32) -> Self {
        self.rooms_count += 1;
        self.add_time(minutes)
    }

    pub fn game_updated(self, old_minutes: u32, new_minutes: u32) -> Self {
        match (old_minutes, new_minutes) {
            (0, 0) => self,
            (0, new) => self.add_time(new),
            (old, 0) => self.remove_time(old),
            (old, new) => Self {
                time_sum: self.time_sum + i64::from(new) - i64::from(old),
                ..self
            },
        }
    }

    pub fn game_deleted(mut self, minutes: u32) -> Self {
        self.rooms_count = decrement(self.rooms_count, "rooms count");
        self.remove_time(minutes)
    }

    pub fn review_created(mut self) -> Self {
        self.reviews_count += 1;
        self
    }

    pub fn review_deleted(mut self) -> Self {
        self.reviews_count = decrement(self.reviews_count, "reviews count");
        self
    }

    pub fn average_time(&self) -> f64 {
        if self.timed_count == 0 {
            return 0.0;
        }
        self.time_sum as f64 / self.timed_count as f64
    }

    pub fn rounded_average_time(&self) -> f64 {
        round_one_decimal(self.average_time())
    }
}
