//! Weather request and report messages

use super::{dict::Dictionary, DictWriter, Error};
use crate::text::TextBuffer;

/// Key of the single tuple in a weather request
pub const KEY_REQUEST: u32 = 0;
/// Temperature in °F, integer
pub const KEY_TEMPERATURE: u32 = 0;
/// Conditions summary, C string
pub const KEY_CONDITIONS: u32 = 1;

pub type Conditions = TextBuffer<31>;

/// Weather report as received, fields may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WeatherReport {
    pub temperature: Option<i32>,
    pub conditions: Option<Conditions>,
}

impl WeatherReport {
    pub fn new(temperature: Option<i32>, conditions: Option<&str>) -> Self {
        Self {
            temperature,
            conditions: conditions.map(Conditions::from_str_truncated),
        }
    }

    /// Pick the weather fields out of a dictionary.
    ///
    /// A field with an unexpected type counts as missing.
    pub fn from_dictionary(dict: &Dictionary<'_>) -> Self {
        Self::new(
            dict.find(KEY_TEMPERATURE).and_then(|value| value.as_i32()),
            dict.find(KEY_CONDITIONS).and_then(|value| value.as_str()),
        )
    }

    /// Decode a report straight from the wire
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self::from_dictionary(&Dictionary::parse(bytes)?))
    }

    /// Both temperature and conditions, if the report has them
    pub fn complete(&self) -> Option<(i32, &str)> {
        match (self.temperature, &self.conditions) {
            (Some(temperature), Some(conditions)) => Some((temperature, conditions.as_str())),
            _ => None,
        }
    }

    /// Encode the report, as the companion sends it
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a [u8], Error> {
        let mut writer = DictWriter::new(buf)?;
        if let Some(temperature) = self.temperature {
            writer.write_int(KEY_TEMPERATURE, temperature)?;
        }
        if let Some(conditions) = &self.conditions {
            writer.write_cstring(KEY_CONDITIONS, conditions.as_str())?;
        }
        Ok(writer.finish())
    }
}

/// Encode the refresh trigger: a single `uint8` tuple `{0: 0}`
pub fn encode_request(buf: &mut [u8]) -> Result<&[u8], Error> {
    let mut writer = DictWriter::new(buf)?;
    writer.write_u8(KEY_REQUEST, 0)?;
    Ok(writer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::{Value, INBOX_SIZE, OUTBOX_SIZE};

    #[test]
    fn request_is_a_single_zero_byte_tuple() {
        let mut buf = [0u8; OUTBOX_SIZE];
        let bytes = encode_request(&mut buf).unwrap();

        let dict = Dictionary::parse(bytes).unwrap();
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.find(KEY_REQUEST), Some(Value::UInt(0)));
    }

    #[test]
    fn complete_report() {
        let mut buf = [0u8; INBOX_SIZE];
        let bytes = WeatherReport::new(Some(72), Some("Cloudy"))
            .encode(&mut buf)
            .unwrap();

        let report = WeatherReport::parse(bytes).unwrap();
        assert_eq!(report.complete(), Some((72, "Cloudy")));
    }

    #[test]
    fn missing_conditions_is_incomplete() {
        let mut buf = [0u8; INBOX_SIZE];
        let bytes = WeatherReport::new(Some(72), None).encode(&mut buf).unwrap();

        let report = WeatherReport::parse(bytes).unwrap();
        assert_eq!(report.temperature, Some(72));
        assert_eq!(report.complete(), None);
    }

    #[test]
    fn wrongly_typed_field_counts_as_missing() {
        let mut buf = [0u8; INBOX_SIZE];
        let mut writer = DictWriter::new(&mut buf).unwrap();
        writer.write_cstring(KEY_TEMPERATURE, "72").unwrap();
        writer.write_cstring(KEY_CONDITIONS, "Clear").unwrap();
        let bytes = writer.finish();

        let report = WeatherReport::parse(bytes).unwrap();
        assert_eq!(report.temperature, None);
        assert_eq!(report.conditions.as_ref().map(|c| c.as_str()), Some("Clear"));
    }

    #[test]
    fn overlong_conditions_are_truncated() {
        let long = "Scattered thunderstorms in the late afternoon";
        let report = WeatherReport::new(Some(80), Some(long));
        let conditions = report.conditions.unwrap();
        assert_eq!(conditions.len(), 31);
        assert!(long.starts_with(conditions.as_str()));
    }

    #[test]
    fn malformed_report_is_an_error() {
        assert_eq!(WeatherReport::parse(&[2, 0, 0]), Err(Error::Malformed));
    }
}
