//! Display state controller
//!
//! Owns the [`DisplayState`] and maps every [`Event`] to a state update plus
//! the set of [`Regions`] that need a redraw. The controller never draws
//! and never waits: outbound weather requests go to the [`Outbox`] and the
//! answer comes back later as a separate event.
//!
//! All handlers run to completion on one task, so the state needs no locking.

use chrono::{NaiveDateTime, Timelike};

use crate::{
    config::{self, WatchfaceConfig},
    event::Event,
    haptics::Haptics,
    messaging::{self, weather, Outbox, WeatherReport},
    ui::{
        format::{format_date, format_time, format_weather},
        DisplayState, Region, Regions,
    },
};

/// Peripheral readings taken once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Local wall time
    pub now: NaiveDateTime,
    pub battery_percent: u8,
    pub bluetooth_connected: bool,
}

pub struct WatchfaceController<O, H> {
    config: WatchfaceConfig,
    state: DisplayState,
    outbox: O,
    haptics: H,
    /// When the unanswered weather request was sent
    outstanding_request: Option<NaiveDateTime>,
}

impl<O, H> WatchfaceController<O, H>
where
    O: Outbox,
    H: Haptics,
{
    /// Build the controller and compute the initial state.
    ///
    /// The bluetooth state goes through the same path as a change event, so
    /// a watch that starts disconnected alerts right away. Everything needs
    /// to be drawn afterwards ([`Regions::ALL`]).
    pub fn start(
        config: WatchfaceConfig,
        snapshot: Snapshot,
        outbox: O,
        haptics: H,
    ) -> Result<Self, config::Error> {
        config.validate()?;

        let mut controller = Self {
            config,
            state: DisplayState::default(),
            outbox,
            haptics,
            outstanding_request: None,
        };
        controller.update_time(&snapshot.now);
        controller.on_battery_changed(snapshot.battery_percent);
        controller.on_bluetooth_changed(snapshot.bluetooth_connected);

        info!("Watchface started");
        Ok(controller)
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn config(&self) -> &WatchfaceConfig {
        &self.config
    }

    pub fn outbox(&self) -> &O {
        &self.outbox
    }

    pub fn haptics(&self) -> &H {
        &self.haptics
    }

    /// Weather requests sent and not yet answered, never more than one
    pub fn outstanding_requests(&self) -> usize {
        self.outstanding_request.iter().count()
    }

    /// Tear down and hand back the collaborators
    pub fn into_parts(self) -> (O, H) {
        (self.outbox, self.haptics)
    }

    /// Dispatch an event to its handler
    pub fn handle_event(&mut self, event: Event) -> Regions {
        match event {
            Event::MinuteTick(now) => self.on_minute_tick(now),
            Event::BatteryChanged(percent) => self.on_battery_changed(percent),
            Event::BluetoothChanged(connected) => self.on_bluetooth_changed(connected),
            Event::WeatherReceived(report) => self.on_weather_report(&report),
            Event::InboxDropped(reason) => self.on_weather_message_failed(reason),
            Event::OutboxSent => self.on_outbox_sent(),
            Event::OutboxFailed(reason) => self.on_outbox_failed(reason),
        }
    }

    /// New minute: refresh time and date, request weather when due
    pub fn on_minute_tick(&mut self, now: NaiveDateTime) -> Regions {
        let regions = self.update_time(&now);

        if now.minute() % self.config.weather_refresh_minutes == 0 {
            self.request_weather(now);
        }

        regions
    }

    /// Inbound weather fields. Anything short of both is ignored.
    pub fn on_weather_message(
        &mut self,
        temperature: Option<i32>,
        conditions: Option<&str>,
    ) -> Regions {
        self.on_weather_report(&WeatherReport::new(temperature, conditions))
    }

    /// Any report answers the outstanding request, only a complete one
    /// replaces the weather text
    pub fn on_weather_report(&mut self, report: &WeatherReport) -> Regions {
        self.outstanding_request = None;

        match report.complete() {
            Some((temperature, conditions)) => {
                self.state.weather_text = format_weather(temperature, conditions);
                debug!("Weather: {=str}", self.state.weather_text.as_str());
                Regions::only(Region::Weather)
            }
            None => Regions::NONE,
        }
    }

    /// Inbound message lost. The next scheduled request is the retry.
    pub fn on_weather_message_failed(&mut self, reason: messaging::Error) -> Regions {
        error!("Message dropped: {:?}", reason);
        self.outstanding_request = None;
        Regions::NONE
    }

    pub fn on_outbox_sent(&mut self) -> Regions {
        info!("Outbox send success");
        Regions::NONE
    }

    pub fn on_outbox_failed(&mut self, reason: messaging::Error) -> Regions {
        error!("Outbox send failed: {:?}", reason);
        self.outstanding_request = None;
        Regions::NONE
    }

    pub fn on_battery_changed(&mut self, percent: u8) -> Regions {
        if percent > 100 {
            warn!("Battery percent {} out of range", percent);
        }
        self.state.battery_percent = percent.min(100);
        Regions::only(Region::Battery)
    }

    /// Every disconnected report buzzes, not only the first one
    pub fn on_bluetooth_changed(&mut self, connected: bool) -> Regions {
        self.state.bluetooth_connected = connected;
        if !connected {
            info!("Phone disconnected");
            self.haptics.double_pulse();
        }
        Regions::only(Region::Bluetooth)
    }

    fn update_time(&mut self, now: &NaiveDateTime) -> Regions {
        self.state.current_time = format_time(now, self.config.clock_24h);
        self.state.current_date = format_date(now);
        Region::Time | Region::Date
    }

    fn request_weather(&mut self, now: NaiveDateTime) {
        let mut buf = [0u8; messaging::OUTBOX_SIZE];
        let sent = weather::encode_request(&mut buf).and_then(|message| self.outbox.send(message));

        match sent {
            Ok(()) => {
                if self.outstanding_request.replace(now).is_some() {
                    warn!("Previous weather request was never answered");
                }
                debug!("Weather requested");
            }
            Err(reason) => error!("Outbox send failed: {:?}", reason),
        }
    }
}
