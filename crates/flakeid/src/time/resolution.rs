/// The length of one tick.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// One tick per millisecond.
    #[default]
    Millisecond,
    /// One tick per second.
    Second,
}

impl Resolution {
    /// Milliseconds per tick.
    pub const fn millis_per_tick(self) -> u64 {
        match self {
            Self::Millisecond => 1,
            Self::Second => 1000,
        }
    }

    /// Converts a UNIX-epoch reading into a tick relative to the origin
    /// described by `offset_secs`.
    ///
    /// The offset is added to the reading, so the default offset of
    /// `-1483228800` moves the origin forward to 2017-01-01. Readings before
    /// the origin produce negative ticks; results saturate at the `i64`
    /// bounds.
    pub fn tick(self, millis: u64, offset_secs: i64) -> i64 {
        let shifted = i128::from(millis) + i128::from(offset_secs) * 1000;
        let tick = shifted.div_euclid(i128::from(self.millis_per_tick()));
        tick.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }

    /// Milliseconds from `millis` until `tick` begins, or zero if it already
    /// has.
    pub fn millis_until(self, tick: u64, millis: u64, offset_secs: i64) -> u64 {
        let start = i128::from(tick) * i128::from(self.millis_per_tick())
            - i128::from(offset_secs) * 1000;
        let wait = start - i128::from(millis);
        wait.clamp(0, i128::from(u64::MAX)) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_TIMESTAMP_OFFSET;

    const ORIGIN_MILLIS: u64 = 1_483_228_800_000;

    #[test]
    fn default_offset_starts_at_2017() {
        let res = Resolution::Millisecond;
        assert_eq!(res.tick(ORIGIN_MILLIS, DEFAULT_TIMESTAMP_OFFSET), 0);
        assert_eq!(res.tick(ORIGIN_MILLIS + 1, DEFAULT_TIMESTAMP_OFFSET), 1);
        assert_eq!(res.tick(ORIGIN_MILLIS - 1, DEFAULT_TIMESTAMP_OFFSET), -1);
        assert_eq!(res.tick(ORIGIN_MILLIS, 0), ORIGIN_MILLIS as i64);
    }

    #[test]
    fn seconds_floor_toward_negative_infinity() {
        let res = Resolution::Second;
        assert_eq!(res.tick(ORIGIN_MILLIS + 2_999, DEFAULT_TIMESTAMP_OFFSET), 2);
        assert_eq!(res.tick(ORIGIN_MILLIS - 1, DEFAULT_TIMESTAMP_OFFSET), -1);
        assert_eq!(res.tick(2_073_867_450_856, 0), 2_073_867_450);
    }

    #[test]
    fn positive_offsets_move_the_origin_back() {
        assert_eq!(Resolution::Millisecond.tick(0, 1), 1000);
        assert_eq!(Resolution::Second.tick(500, 1), 1);
    }

    #[test]
    fn millis_until_next_tick() {
        let res = Resolution::Second;
        let millis = ORIGIN_MILLIS + 2_250;
        assert_eq!(res.millis_until(3, millis, DEFAULT_TIMESTAMP_OFFSET), 750);
        assert_eq!(res.millis_until(2, millis, DEFAULT_TIMESTAMP_OFFSET), 0);
        assert_eq!(Resolution::Millisecond.millis_until(11, 10, 0), 1);
    }

    #[test]
    fn default_is_millisecond() {
        assert_eq!(Resolution::default(), Resolution::Millisecond);
        assert_eq!(Resolution::Second.millis_per_tick(), 1000);
    }
}
