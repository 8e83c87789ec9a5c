//! Events that drive the watchface

use chrono::NaiveDateTime;

use crate::messaging::{self, WeatherReport};

/// Everything the controller reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A new wall clock minute started (local time)
    MinuteTick(NaiveDateTime),
    /// Battery charge in percent
    BatteryChanged(u8),
    /// Phone connection state
    BluetoothChanged(bool),
    /// Inbound weather message, possibly incomplete
    WeatherReceived(WeatherReport),
    /// Inbound message could not be delivered or decoded
    InboxDropped(messaging::Error),
    /// Outbound message reached the phone
    OutboxSent,
    /// Outbound message was not delivered
    OutboxFailed(messaging::Error),
}

impl Event {
    /// Decode an inbound message into the matching event
    pub fn from_inbox(bytes: &[u8]) -> Self {
        if bytes.len() > messaging::INBOX_SIZE {
            return Event::InboxDropped(messaging::Error::BufferOverflow);
        }
        match WeatherReport::parse(bytes) {
            Ok(report) => Event::WeatherReceived(report),
            Err(reason) => Event::InboxDropped(reason),
        }
    }

    /// What to deliver instead when this event found the queue full.
    ///
    /// A lost inbound message still has to reach the controller as a
    /// failure, otherwise the weather request it answered stays open.
    pub fn when_dropped(&self) -> Option<Event> {
        match self {
            Event::WeatherReceived(_) | Event::InboxDropped(_) => {
                Some(Event::InboxDropped(messaging::Error::QueueFull))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbox_bytes_become_weather_event() {
        let mut buf = [0u8; messaging::INBOX_SIZE];
        let bytes = WeatherReport::new(Some(55), Some("Rain"))
            .encode(&mut buf)
            .unwrap();

        assert_eq!(
            Event::from_inbox(bytes),
            Event::WeatherReceived(WeatherReport::new(Some(55), Some("Rain")))
        );
    }

    #[test]
    fn garbage_is_dropped() {
        assert_eq!(
            Event::from_inbox(&[1, 0]),
            Event::InboxDropped(messaging::Error::Malformed)
        );
    }

    #[test]
    fn lost_inbound_message_becomes_a_failure() {
        let report = Event::WeatherReceived(WeatherReport::new(Some(55), Some("Rain")));
        assert_eq!(
            report.when_dropped(),
            Some(Event::InboxDropped(messaging::Error::QueueFull))
        );
        assert_eq!(
            Event::InboxDropped(messaging::Error::Malformed).when_dropped(),
            Some(Event::InboxDropped(messaging::Error::QueueFull))
        );
        assert_eq!(Event::BatteryChanged(40).when_dropped(), None);
        assert_eq!(Event::OutboxSent.when_dropped(), None);
    }

    #[test]
    fn oversized_message_is_dropped() {
        let bytes = [0u8; messaging::INBOX_SIZE + 1];
        assert_eq!(
            Event::from_inbox(&bytes),
            Event::InboxDropped(messaging::Error::BufferOverflow)
        );
    }
}
