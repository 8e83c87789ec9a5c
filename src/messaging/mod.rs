//! Messages exchanged with the companion app on the phone
//!
//! Both directions carry a small key/value [`dict::Dictionary`]. The watch
//! sends a weather request whenever a refresh is due and the companion
//! answers, some time later and without correlation, with a weather report.
//! The two directions are independent: [`Outbox::send`] only hands the
//! request to the transport, the answer arrives as a separate event.

pub mod dict;
pub mod weather;

pub use dict::{DictWriter, Dictionary, Tuple, Value};
pub use weather::WeatherReport;

/// Largest inbound message accepted
pub const INBOX_SIZE: usize = 128;
/// Largest outbound message
pub const OUTBOX_SIZE: usize = 128;

/// Why a message was not delivered or not understood
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Message does not fit into the buffer
    BufferOverflow,
    /// Dictionary framing or value encoding is invalid
    Malformed,
    /// No phone connected
    NotConnected,
    /// A previous message is still being transmitted
    Busy,
    /// Phone did not acknowledge in time
    SendTimeout,
    /// Phone refused the message
    SendRejected,
    /// Message arrived while the event queue was full
    QueueFull,
    /// Transport failure with a stack specific code
    Internal(u32),
}

/// Outbound half of the message channel
pub trait Outbox {
    /// Queue an encoded dictionary for transmission.
    ///
    /// Returns as soon as the message is queued. Delivery is reported later
    /// through `Event::OutboxSent` or `Event::OutboxFailed`.
    fn send(&mut self, message: &[u8]) -> Result<(), Error>;
}

impl<T: Outbox + ?Sized> Outbox for &mut T {
    fn send(&mut self, message: &[u8]) -> Result<(), Error> {
        (**self).send(message)
    }
}
