//! Bluetooth module
//!
//! One GATT server carries everything the phone talks to the watch about:
//! the battery level, a Current Time Service write to set the clock and the
//! weather service with an inbox (phone writes) and an outbox (watch
//! notifies). Connection state and inbound messages become [`Event`]s for
//! the watchface.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_futures::select::{select, Either};
use embassy_sync::{
    blocking_mutex::raw::ThreadModeRawMutex,
    channel::{Channel, TrySendError},
    signal::Signal,
};
use embassy_time::{Instant, Timer};
use heapless::Vec;
use nrf_softdevice::{
    ble::{
        advertisement_builder::{
            Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
            ServiceUuid16,
        },
        gatt_server::{self, NotifyValueError},
        peripheral, Connection,
    },
    Softdevice,
};

use pinetime_watchface::{
    clock::TimeReference,
    messaging::{self, Outbox, INBOX_SIZE, OUTBOX_SIZE},
    Event,
};

use crate::{EVENTS, TIME_SYNC};

/// Encoded dictionary on its way to the phone
pub type OutboundMessage = Vec<u8, OUTBOX_SIZE>;

/// Messages queued by [`GattOutbox`], one at a time
static OUTBOX: Channel<ThreadModeRawMutex, OutboundMessage, 1> = Channel::new();
static CONNECTED: AtomicBool = AtomicBool::new(false);
/// Failure standing in for an inbound message the full event queue refused
static LOST: Signal<ThreadModeRawMutex, Event> = Signal::new();

pub static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .services_16(ServiceList::Incomplete, &[ServiceUuid16::BATTERY])
    .full_name("PineTime")
    .build();

pub static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .services_16(ServiceList::Incomplete, &[ServiceUuid16::BATTERY])
    .build();

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub bas: BatteryService,
    pub cts: CurrentTimeService,
    pub weather: WeatherService,
}

#[nrf_softdevice::gatt_service(uuid = "180f")]
pub struct BatteryService {
    #[characteristic(uuid = "2a19", read, notify)]
    pub battery_level: u8,
}

#[nrf_softdevice::gatt_service(uuid = "1805")]
pub struct CurrentTimeService {
    #[characteristic(uuid = "2a2b", write)]
    pub current_time: Vec<u8, 10>,
}

#[nrf_softdevice::gatt_service(uuid = "6b3a0001-8d1e-4b6f-9c9a-0e5b7a1f2c40")]
pub struct WeatherService {
    /// Dictionaries written by the phone
    #[characteristic(uuid = "6b3a0002-8d1e-4b6f-9c9a-0e5b7a1f2c40", write)]
    pub inbox: Vec<u8, INBOX_SIZE>,
    /// Dictionaries notified to the phone
    #[characteristic(uuid = "6b3a0003-8d1e-4b6f-9c9a-0e5b7a1f2c40", read, notify)]
    pub outbox: Vec<u8, OUTBOX_SIZE>,
}

impl Server {
    fn on_event(&self, event: ServerEvent) {
        match event {
            ServerEvent::Bas(BatteryServiceEvent::BatteryLevelCccdWrite { notifications }) => {
                defmt::debug!("Battery notifications: {}", notifications);
            }
            ServerEvent::Cts(CurrentTimeServiceEvent::CurrentTimeWrite(bytes)) => {
                match TimeReference::from_cts_bytes(&bytes, Instant::now().as_secs()) {
                    Ok(reference) => TIME_SYNC.signal(reference),
                    Err(e) => defmt::warn!("Ignoring time update: {}", e),
                }
            }
            ServerEvent::Weather(WeatherServiceEvent::InboxWrite(message)) => {
                post(Event::from_inbox(&message));
            }
            ServerEvent::Weather(WeatherServiceEvent::OutboxCccdWrite { notifications }) => {
                defmt::debug!("Outbox notifications: {}", notifications);
            }
        }
    }
}

/// Hand an event to the watchface without blocking the SoftDevice callback.
///
/// On a full queue the event is replaced by its failure, which
/// [`forward`] delivers once there is room.
fn post(event: Event) {
    if let Err(TrySendError::Full(event)) = EVENTS.try_send(event) {
        defmt::warn!("Event queue full, dropping inbound message");
        if let Some(failure) = event.when_dropped() {
            LOST.signal(failure);
        }
    }
}

/// Outbound messages go to the phone as outbox notifications
pub struct GattOutbox;

impl Outbox for GattOutbox {
    fn send(&mut self, message: &[u8]) -> Result<(), messaging::Error> {
        if !CONNECTED.load(Ordering::Relaxed) {
            return Err(messaging::Error::NotConnected);
        }
        let message =
            OutboundMessage::from_slice(message).map_err(|_| messaging::Error::BufferOverflow)?;
        OUTBOX
            .try_send(message)
            .map_err(|_| messaging::Error::Busy)
    }
}

/// Notify queued outbox messages and deliver lost message failures until
/// the connection drops
async fn forward(conn: &Connection, server: &Server) {
    loop {
        let message = match select(OUTBOX.receive(), LOST.wait()).await {
            Either::First(message) => message,
            Either::Second(failure) => {
                EVENTS.send(failure).await;
                continue;
            }
        };
        let event = match server.weather.outbox_notify(conn, &message) {
            Ok(()) => Event::OutboxSent,
            Err(NotifyValueError::Disconnected) => {
                EVENTS
                    .send(Event::OutboxFailed(messaging::Error::NotConnected))
                    .await;
                return;
            }
            Err(NotifyValueError::Raw(e)) => {
                defmt::warn!("Outbox notification failed: {}", e);
                Event::OutboxFailed(messaging::Error::SendRejected)
            }
        };
        EVENTS.send(event).await;
    }
}

/// Advertise, serve one phone and report the connection state
pub async fn run(sd: &'static Softdevice, server: &'static Server) -> ! {
    loop {
        let config = peripheral::Config::default();
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };
        let conn = match peripheral::advertise_connectable(sd, adv, &config).await {
            Ok(conn) => conn,
            Err(e) => {
                defmt::error!("Advertising failed: {}", e);
                Timer::after_secs(1).await;
                continue;
            }
        };

        defmt::info!("Phone connected");
        CONNECTED.store(true, Ordering::Relaxed);
        EVENTS.send(Event::BluetoothChanged(true)).await;

        let serve = gatt_server::run(&conn, server, |event| server.on_event(event));
        select(serve, forward(&conn, server)).await;

        defmt::info!("Phone disconnected");
        CONNECTED.store(false, Ordering::Relaxed);
        if let Some(failure) = LOST.try_take() {
            EVENTS.send(failure).await;
        }
        // Whatever was still queued will not reach the phone
        while OUTBOX.try_receive().is_ok() {
            EVENTS
                .send(Event::OutboxFailed(messaging::Error::NotConnected))
                .await;
        }
        EVENTS.send(Event::BluetoothChanged(false)).await;
    }
}
