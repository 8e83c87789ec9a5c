//! Text for the time, date and weather labels

use core::fmt::Write;

use chrono::{Datelike, NaiveDateTime, Timelike};

use super::{DateText, TemperatureText, TimeText, WeatherText};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// `13:05` in 24h style, `01:05` in 12h style
pub fn format_time(time: &NaiveDateTime, clock_24h: bool) -> TimeText {
    let hour = if clock_24h {
        time.hour()
    } else {
        time.hour12().1
    };

    let mut text = TimeText::new();
    // Two digit hour and minute always fit
    let _ = text.format(format_args!("{:02}:{:02}", hour, time.minute()));
    text
}

/// Weekday, month and day, e.g. `Wed Mar 5`
pub fn format_date(time: &NaiveDateTime) -> DateText {
    let weekday = WEEKDAYS[time.weekday().num_days_from_monday() as usize];
    let month = MONTHS[time.month0() as usize];

    let mut text = DateText::new();
    let _ = text.format(format_args!("{} {} {}", weekday, month, time.day()));
    text
}

/// `72F, Cloudy`, truncated to the label capacity.
///
/// The temperature part is cut to 7 characters on its own first.
pub fn format_weather(temperature: i32, conditions: &str) -> WeatherText {
    let mut degrees = TemperatureText::new();
    let _ = write!(degrees, "{}F", temperature);

    let mut text = WeatherText::new();
    let _ = write!(text, "{}, {}", degrees, conditions);
    text
}
