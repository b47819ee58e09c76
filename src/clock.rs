use time::{OffsetDateTime, UtcOffset};

/// Wall-clock source for reading timestamps and the day/night decision
pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

/// Current UTC time shifted to a fixed offset.
///
/// The offset comes from configuration rather than the OS because the
/// local offset cannot be queried reliably once the runtime has spawned
/// threads.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    pub fn new(offset: UtcOffset) -> Self {
        SystemClock { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_uses_configured_offset() {
        let offset = UtcOffset::from_hms(3, 0, 0).unwrap();
        let now = SystemClock::new(offset).now();
        assert_eq!(now.offset(), offset);
    }
}
