//! Integration tests for the host-testable watchface logic.
//!
//! These drive the controller the way the firmware does: clock readings go
//! through the minute ticker, companion messages arrive as raw bytes and the
//! resulting regions are drawn onto an in-memory frame.

use chrono::{NaiveDate, NaiveDateTime};
use embedded_graphics::{
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::RgbColor,
    prelude::DrawTarget,
    primitives::PointsIter,
    Pixel,
};

use pinetime_watchface::{
    battery::BatteryMonitor,
    clock::{MinuteTicker, TimeManager, TimeReference},
    config::{ColorMode, LCD_H, LCD_W},
    haptics::Haptics,
    messaging::{self, weather, Dictionary, Outbox, Value, WeatherReport},
    ui::{DefaultWatchface, Region, Regions, WatchFace},
    Event, Snapshot, WatchfaceConfig, WatchfaceController,
};

#[derive(Default)]
struct Phone {
    inbox: Vec<Vec<u8>>,
    connected: bool,
}

impl Outbox for Phone {
    fn send(&mut self, message: &[u8]) -> Result<(), messaging::Error> {
        if !self.connected {
            return Err(messaging::Error::NotConnected);
        }
        self.inbox.push(message.to_vec());
        Ok(())
    }
}

#[derive(Default)]
struct Motor {
    double_pulses: usize,
}

impl Haptics for Motor {
    fn double_pulse(&mut self) {
        self.double_pulses += 1;
    }
}

struct Frame {
    pixels: Vec<ColorMode>,
}

impl Frame {
    fn new() -> Self {
        Self {
            pixels: vec![ColorMode::BLACK; (LCD_W * LCD_H) as usize],
        }
    }

    fn count(&self, area: &embedded_graphics::primitives::Rectangle, color: ColorMode) -> usize {
        area.points()
            .filter(|p| self.pixels[p.y as usize * LCD_W as usize + p.x as usize] == color)
            .count()
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(LCD_W, LCD_H)
    }
}

impl DrawTarget for Frame {
    type Color = ColorMode;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if (0..LCD_W as i32).contains(&x) && (0..LCD_H as i32).contains(&y) {
                self.pixels[y as usize * LCD_W as usize + x as usize] = color;
            }
        }
        Ok(())
    }
}

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 5)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

fn start(connected: bool) -> WatchfaceController<Phone, Motor> {
    WatchfaceController::start(
        WatchfaceConfig::default(),
        Snapshot {
            now: at(13, 28, 40),
            battery_percent: 64,
            bluetooth_connected: connected,
        },
        Phone {
            connected,
            ..Default::default()
        },
        Motor::default(),
    )
    .unwrap()
}

#[test]
fn half_hour_tick_requests_weather_and_report_updates_text() {
    let mut controller = start(true);
    let mut ticker = MinuteTicker::new(at(13, 28, 40));

    let mut ticks = 0;
    for second in 41..(60 * 3 + 30) {
        let now = at(13, 28, 0) + chrono::Duration::seconds(second);
        if let Some(tick) = ticker.poll(now) {
            controller.handle_event(Event::MinuteTick(tick));
            ticks += 1;
        }
    }
    // 13:29, 13:30, 13:31
    assert_eq!(ticks, 3);
    assert_eq!(controller.state().current_time, "13:31");

    let sent = &controller.outbox().inbox;
    assert_eq!(sent.len(), 1);
    let request = Dictionary::parse(&sent[0]).unwrap();
    assert_eq!(request.find(weather::KEY_REQUEST), Some(Value::UInt(0)));
    assert_eq!(controller.outstanding_requests(), 1);

    let mut buf = [0u8; messaging::INBOX_SIZE];
    let reply = WeatherReport::new(Some(72), Some("Cloudy"))
        .encode(&mut buf)
        .unwrap();
    let regions = controller.handle_event(Event::from_inbox(reply));

    assert_eq!(regions, Regions::only(Region::Weather));
    assert_eq!(controller.state().weather_text, "72F, Cloudy");
    assert_eq!(controller.outstanding_requests(), 0);
}

#[test]
fn incomplete_and_corrupt_replies_keep_previous_weather() {
    let mut controller = start(true);
    controller.handle_event(Event::WeatherReceived(WeatherReport::new(
        Some(72),
        Some("Cloudy"),
    )));

    let mut buf = [0u8; messaging::INBOX_SIZE];
    let partial = WeatherReport::new(Some(90), None).encode(&mut buf).unwrap();
    assert!(controller.handle_event(Event::from_inbox(partial)).is_empty());

    assert!(controller
        .handle_event(Event::from_inbox(&[3, 0, 0, 0]))
        .is_empty());

    assert_eq!(controller.state().weather_text, "72F, Cloudy");
}

#[test]
fn reply_lost_to_a_full_queue_settles_the_request() {
    let mut controller = start(true);
    controller.handle_event(Event::MinuteTick(at(13, 30, 0)));
    assert_eq!(controller.outstanding_requests(), 1);

    let mut buf = [0u8; messaging::INBOX_SIZE];
    let reply = WeatherReport::new(Some(72), Some("Cloudy"))
        .encode(&mut buf)
        .unwrap();
    let failure = Event::from_inbox(reply).when_dropped().unwrap();

    assert!(controller.handle_event(failure).is_empty());
    assert_eq!(controller.outstanding_requests(), 0);
    assert_eq!(controller.state().weather_text, "Loading...");
}

#[test]
fn disconnected_phone_alerts_and_request_fails_quietly() {
    let mut controller = start(false);
    assert_eq!(controller.haptics().double_pulses, 1);

    controller.handle_event(Event::BluetoothChanged(false));
    assert_eq!(controller.haptics().double_pulses, 2);

    let regions = controller.handle_event(Event::MinuteTick(at(14, 0, 0)));
    assert_eq!(regions, Region::Time | Region::Date);
    assert!(controller.outbox().inbox.is_empty());
    assert_eq!(controller.outstanding_requests(), 0);
}

#[test]
fn battery_samples_flow_to_the_bar() {
    let mut controller = start(true);
    let mut monitor = BatteryMonitor::new();
    let face = DefaultWatchface::new(controller.config().layout);
    let mut frame = Frame::new();

    // 2482 ≈ 4.0 V ≈ 80 %
    for sample in [2482, 2482, 2483] {
        if let Some(percent) = monitor.update(sample).unwrap() {
            let regions = controller.handle_event(Event::BatteryChanged(percent));
            face.draw(controller.state(), regions, &mut frame).unwrap();
        }
    }

    let layout = controller.config().layout;
    let track = layout.battery_track;
    let bar = frame.count(&track, layout.battery_bar_color) as u32;
    assert_eq!(bar, 152 * track.size.height);
    assert_eq!(controller.state().battery_percent, 80);
}

#[test]
fn clock_sync_drives_the_displayed_time() {
    let config = WatchfaceConfig::default();
    // Seeded at boot from the build epoch, 2025-03-05 13:05:00 UTC
    let mut clock = TimeManager::init(
        TimeReference::from_unix_epoch(1_741_179_900, 0).unwrap(),
        config.utc_offset_secs,
    );
    assert_eq!(clock.local(0), at(14, 5, 0));

    // Phone writes its local time, 2025-03-05 20:45:10, at uptime 30 s
    let cts = [0xE9, 0x07, 3, 5, 20, 45, 10, 3, 0, 1];
    clock.sync_local(TimeReference::from_cts_bytes(&cts, 30).unwrap());
    assert_eq!(clock.local(30), at(20, 45, 10));

    let mut controller = start(true);
    let mut ticker = MinuteTicker::new(clock.local(30));
    assert_eq!(ticker.poll(clock.local(31)), None);
    let tick = ticker.poll(clock.local(80)).unwrap();
    controller.handle_event(Event::MinuteTick(tick));

    assert_eq!(controller.state().current_time, "20:46");
}

#[test]
fn full_redraw_after_start() {
    let controller = start(false);
    let face = DefaultWatchface::new(controller.config().layout);
    let mut frame = Frame::new();

    face.draw_background(&mut frame).unwrap();
    face.draw(controller.state(), Regions::ALL, &mut frame).unwrap();

    let layout = controller.config().layout;
    assert!(frame.count(&layout.time, layout.text_color) > 0);
    assert!(frame.count(&layout.weather, layout.text_color) > 0);
    assert!(frame.count(&layout.bluetooth_icon, layout.bluetooth_color) > 0);
    assert!(frame.count(&layout.bluetooth_icon, ColorMode::WHITE) == 0);
}
