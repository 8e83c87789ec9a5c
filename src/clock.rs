//! Time keeping module for PineTime
//!
//! The watch has no battery backed RTC. Wall time is a [`TimeReference`]
//! (a known time paired with the uptime it was taken at) plus the uptime
//! elapsed since. The reference comes from the build-time epoch at boot and
//! from the phone's Current Time Service once connected. The phone writes its
//! local time, which [`TimeManager::sync_local`] turns back into UTC.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Timelike, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Current Time Service payload is shorter than 10 bytes
    InvalidLength(usize),
    /// Date or time fields do not form a valid timestamp
    InvalidDateTime,
}

/// Clock time paired with the uptime it was valid at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeReference {
    /// Clock time (UTC)
    time: NaiveDateTime,
    /// Related system time
    uptime_secs: u64,
}

impl Default for TimeReference {
    fn default() -> Self {
        Self {
            time: DateTime::<Utc>::UNIX_EPOCH.naive_utc(),
            uptime_secs: 0,
        }
    }
}

impl TimeReference {
    /// Create new time reference from NaiveDateTime
    pub fn from_datetime(time: NaiveDateTime, uptime_secs: u64) -> Self {
        Self { time, uptime_secs }
    }

    /// Create new time reference from seconds since the Unix epoch
    pub fn from_unix_epoch(epoch_secs: i64, uptime_secs: u64) -> Result<Self, Error> {
        let time = DateTime::from_timestamp(epoch_secs, 0)
            .ok_or(Error::InvalidDateTime)?
            .naive_utc();
        Ok(Self::from_datetime(time, uptime_secs))
    }

    /// Create new time reference from Current Time Service data.
    ///
    /// The value is the phone's local wall time, not UTC. Layout: year (u16 LE), month, day, hours, minutes, seconds,
    /// day of week, fractions of 1/256 s, adjust reason.
    pub fn from_cts_bytes(bytes: &[u8], uptime_secs: u64) -> Result<Self, Error> {
        if bytes.len() < 10 {
            return Err(Error::InvalidLength(bytes.len()));
        }
        let year = u16::from_le_bytes([bytes[0], bytes[1]]) as i32;
        let month = bytes[2] as u32;
        let day = bytes[3] as u32;
        let hour = bytes[4] as u32;
        let min = bytes[5] as u32;
        let sec = bytes[6] as u32;
        // Day of week (bytes[7]) follows from the date
        let milli = bytes[8] as u32 * 1000 / 256;

        let time = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_milli_opt(hour, min, sec, milli))
            .ok_or(Error::InvalidDateTime)?;

        Ok(Self::from_datetime(time, uptime_secs))
    }

    pub fn time(&self) -> NaiveDateTime {
        self.time
    }
}

/// Wall clock built on a [`TimeReference`]
#[derive(Debug, Clone, Copy)]
pub struct TimeManager {
    reference: TimeReference,
    utc_offset: Duration,
}

impl TimeManager {
    /// Initialize time measurement on boot
    pub fn init(reference: TimeReference, utc_offset_secs: i32) -> Self {
        Self {
            reference,
            utc_offset: Duration::seconds(utc_offset_secs as i64),
        }
    }

    /// Current UTC time at the given uptime.
    ///
    /// Uptime before the reference is treated as the reference itself.
    pub fn utc(&self, uptime_secs: u64) -> NaiveDateTime {
        let elapsed = uptime_secs.saturating_sub(self.reference.uptime_secs);
        i64::try_from(elapsed)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|elapsed| self.reference.time.checked_add_signed(elapsed))
            .unwrap_or(NaiveDateTime::MAX)
    }

    /// Current local time at the given uptime
    pub fn local(&self, uptime_secs: u64) -> NaiveDateTime {
        let utc = self.utc(uptime_secs);
        utc.checked_add_signed(self.utc_offset).unwrap_or(utc)
    }

    /// Update time reference (UTC)
    pub fn set_time(&mut self, reference: TimeReference) {
        info!("Clock synchronised");
        self.reference = reference;
    }

    /// Update time reference from a local wall time, such as the phone's
    /// Current Time Service value
    pub fn sync_local(&mut self, local: TimeReference) {
        let utc = local
            .time
            .checked_sub_signed(self.utc_offset)
            .unwrap_or(local.time);
        self.set_time(TimeReference::from_datetime(utc, local.uptime_secs));
    }
}

/// Turns a stream of clock readings into one tick per minute
#[derive(Debug, Clone, Copy)]
pub struct MinuteTicker {
    last: NaiveDateTime,
}

impl MinuteTicker {
    /// Start counting from `now`, the current minute does not tick
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            last: start_of_minute(now),
        }
    }

    /// Returns `now` once the first time a reading falls into a new minute.
    ///
    /// Jumps in either direction (clock synchronisation) tick as well.
    pub fn poll(&mut self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let minute = start_of_minute(now);
        if minute == self.last {
            return None;
        }
        self.last = minute;
        Some(now)
    }
}

fn start_of_minute(time: NaiveDateTime) -> NaiveDateTime {
    time.with_second(0)
        .and_then(|time| time.with_nanosecond(0))
        .unwrap_or(time)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn parses_current_time_service_payload() {
        // 2025-03-05 13:05:30, Wednesday, 128/256 s, manual update
        let bytes = [0xE9, 0x07, 3, 5, 13, 5, 30, 3, 128, 1];
        let reference = TimeReference::from_cts_bytes(&bytes, 42).unwrap();

        let expected = NaiveDate::from_ymd_opt(2025, 3, 5)
            .unwrap()
            .and_hms_milli_opt(13, 5, 30, 500)
            .unwrap();
        assert_eq!(reference.time(), expected);
    }

    #[test]
    fn rejects_short_or_invalid_payload() {
        assert_eq!(
            TimeReference::from_cts_bytes(&[0xE9, 0x07, 3], 0),
            Err(Error::InvalidLength(3))
        );
        let february_30th = [0xE9, 0x07, 2, 30, 0, 0, 0, 0, 0, 0];
        assert_eq!(
            TimeReference::from_cts_bytes(&february_30th, 0),
            Err(Error::InvalidDateTime)
        );
    }

    #[test]
    fn epoch_reference() {
        let reference = TimeReference::from_unix_epoch(1_741_179_900, 0).unwrap();
        assert_eq!(reference.time(), at(13, 5, 0));
    }

    #[test]
    fn time_advances_with_uptime_and_offset() {
        let clock = TimeManager::init(TimeReference::from_datetime(at(12, 0, 0), 100), 3_600);

        assert_eq!(clock.utc(100), at(12, 0, 0));
        assert_eq!(clock.utc(165), at(12, 1, 5));
        assert_eq!(clock.local(165), at(13, 1, 5));
        // Before the reference
        assert_eq!(clock.utc(10), at(12, 0, 0));
    }

    #[test]
    fn set_time_replaces_reference() {
        let mut clock = TimeManager::init(TimeReference::default(), 0);
        clock.set_time(TimeReference::from_datetime(at(8, 30, 0), 50));
        assert_eq!(clock.local(110), at(8, 31, 0));
    }

    #[test]
    fn phone_time_is_shown_as_written() {
        let mut clock = TimeManager::init(TimeReference::default(), 3_600);
        // Phone writes its local 20:45:10 at uptime 0
        let cts = [0xE9, 0x07, 3, 5, 20, 45, 10, 3, 0, 1];
        clock.sync_local(TimeReference::from_cts_bytes(&cts, 0).unwrap());

        assert_eq!(clock.local(0), at(20, 45, 10));
        assert_eq!(clock.utc(0), at(19, 45, 10));
    }

    #[test]
    fn default_reference_is_the_unix_epoch() {
        let clock = TimeManager::init(TimeReference::default(), 0);
        assert_eq!(clock.utc(0).and_utc().timestamp(), 0);
    }

    #[test]
    fn ticks_once_per_minute() {
        let mut ticker = MinuteTicker::new(at(9, 59, 10));

        assert_eq!(ticker.poll(at(9, 59, 11)), None);
        assert_eq!(ticker.poll(at(9, 59, 59)), None);
        assert_eq!(ticker.poll(at(10, 0, 0)), Some(at(10, 0, 0)));
        assert_eq!(ticker.poll(at(10, 0, 1)), None);
        // Missed seconds still give exactly one tick
        assert_eq!(ticker.poll(at(10, 1, 3)), Some(at(10, 1, 3)));
    }

    #[test]
    fn clock_jump_backwards_ticks() {
        let mut ticker = MinuteTicker::new(at(10, 0, 0));
        assert_eq!(ticker.poll(at(9, 30, 0)), Some(at(9, 30, 0)));
    }
}
