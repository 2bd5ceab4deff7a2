use std::fmt;

use num_rational::Ratio;

/// Span of stream time, stored as an exact rational number of seconds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    dur: Ratio<i64>,
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_sec = self.dur.trunc().to_integer();
        let msec = (self.dur.fract() * Ratio::from_integer(1000)).to_integer();
        let hour = total_sec / 3600;
        let min = (total_sec / 60) % 60;
        let sec = total_sec % 60;
        write!(f, "{hour:02}:{min:02}:{sec:02}.{msec:03}")
    }
}

impl Duration {
    pub fn new(dur: Ratio<i64>) -> Self {
        Self { dur }
    }

    pub fn as_ratio(&self) -> Ratio<i64> {
        self.dur
    }

    pub fn as_msec(&self) -> i64 {
        (self.dur * Ratio::from_integer(1000)).to_integer()
    }
}

/// Position in stream time, measured from the start of the stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    ts: Ratio<i64>,
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_sec = self.ts.trunc().to_integer();
        let msec = (self.ts.fract() * Ratio::from_integer(1000)).to_integer();
        let hour = total_sec / 3600;
        let min = (total_sec / 60) % 60;
        let sec = total_sec % 60;
        write!(f, "{hour:02}:{min:02}:{sec:02}.{msec:03}")
    }
}

impl Timestamp {
    pub fn new(ts: Ratio<i64>) -> Self {
        Self { ts }
    }

    pub fn as_ratio(&self) -> Ratio<i64> {
        self.ts
    }
}

impl std::ops::Sub for Timestamp {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        Duration::new(self.ts - rhs.ts)
    }
}

impl std::ops::Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self::new(self.ts + rhs.dur)
    }
}

/// Frame index paired with the timestamp of the frame's start.
#[derive(Debug, Default, Clone, Copy)]
pub struct FramePosition {
    idx: usize,
    ts: Timestamp,
}

impl fmt::Display for FramePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.ts, self.idx)
    }
}

impl FramePosition {
    pub fn new(idx: usize, ts: Timestamp) -> Self {
        Self { idx, ts }
    }

    pub fn index(&self) -> usize {
        self.idx
    }

    pub fn timestamp(&self) -> Timestamp {
        self.ts
    }

    pub fn next(&self, sec_per_frame: Duration) -> FramePosition {
        Self::new(self.idx + 1, self.ts + sec_per_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        let ts = Timestamp::new(Ratio::new(3_723_500, 1000));
        assert_eq!(ts.to_string(), "01:02:03.500");
        let dur = Duration::new(Ratio::new(1, 4));
        assert_eq!(dur.as_msec(), 250);
    }

    #[test]
    fn position_advances_by_frame_duration() {
        let start = FramePosition::new(0, Timestamp::new(Ratio::ZERO));
        let next = start.next(Duration::new(Ratio::new(1, 30)));
        assert_eq!(next.index(), 1);
        assert_eq!(next.timestamp().as_ratio(), Ratio::new(1, 30));
    }
}
