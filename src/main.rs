#![no_std]
#![no_main]

mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    peripherals::SPI2,
    saadc::{self, ChannelConfig, Resolution, Saadc},
    spim,
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, channel::Channel, signal::Signal};
use embassy_time::{Duration, Instant, Ticker};
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use peripherals::{
    backlight::Backlight,
    battery::Battery,
    display::Display,
    vibration::{SignalHaptics, VibrationMotor},
};
use system::{
    bluetooth::{self, GattOutbox, Server},
    config::{SystemConfig, BACKLIGHT_LEVEL, BATTERY_SAMPLE_SECS},
};

use pinetime_watchface::{
    clock::{MinuteTicker, TimeManager, TimeReference},
    haptics::VibePattern,
    ui::DefaultWatchface,
    Event, Snapshot, WatchfaceConfig, WatchfaceController,
};

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));

type Controller = WatchfaceController<GattOutbox, SignalHaptics>;

// Communication channels
static EVENTS: Channel<ThreadModeRawMutex, Event, 8> = Channel::new();
static HAPTICS: Signal<ThreadModeRawMutex, VibePattern> = Signal::new();
static TIME_SYNC: Signal<ThreadModeRawMutex, TimeReference> = Signal::new();

static SERVER: StaticCell<Server> = StaticCell::new();

fn uptime_secs() -> u64 {
    Instant::now().as_secs()
}

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn bluetooth_task(sd: &'static Softdevice, server: &'static Server) -> ! {
    bluetooth::run(sd, server).await
}

/// Play vibration patterns as they are requested
#[embassy_executor::task(pool_size = 1)]
async fn notify(mut motor: VibrationMotor<'static>) {
    loop {
        let pattern = HAPTICS.wait().await;
        motor.play(pattern).await;
    }
}

/// Sample the battery and report changes
#[embassy_executor::task(pool_size = 1)]
async fn update_battery_status(mut battery: Battery<'static>, server: &'static Server) {
    let mut tick = Ticker::every(Duration::from_secs(BATTERY_SAMPLE_SECS));
    loop {
        tick.next().await;
        match battery.sample().await {
            Ok(Some(percent)) => {
                defmt::info!(
                    "Battery status: {}% ({})",
                    percent,
                    if battery.is_charging() {
                        "charging"
                    } else {
                        "discharging"
                    }
                );
                if server.bas.battery_level_set(&percent).is_err() {
                    defmt::warn!("Could not update battery characteristic");
                }
                EVENTS.send(Event::BatteryChanged(percent)).await;
            }
            Ok(None) => {}
            Err(e) => defmt::warn!("Battery sample rejected: {}", e),
        }
    }
}

/// Keep the wall clock and emit a tick on every new minute
#[embassy_executor::task(pool_size = 1)]
async fn update_time(mut clock: TimeManager) {
    let mut ticker = MinuteTicker::new(clock.local(uptime_secs()));
    let mut tick = Ticker::every(Duration::from_secs(1));
    loop {
        if let Some(reference) = TIME_SYNC.try_take() {
            clock.sync_local(reference);
        }
        if let Some(now) = ticker.poll(clock.local(uptime_secs())) {
            EVENTS.send(Event::MinuteTick(now)).await;
        }

        tick.next().await;
    }
}

/// Own the watchface, apply events and redraw what they changed
#[embassy_executor::task(pool_size = 1)]
async fn update_lcd(mut display: Display<'static, SPI2>, mut controller: Controller) {
    let face = DefaultWatchface::new(controller.config().layout);
    if let Err(e) = display.show(&face, controller.state(), BACKLIGHT_LEVEL) {
        defmt::error!("Initial draw failed: {}", e);
    }

    loop {
        let event = EVENTS.receive().await;
        let regions = controller.handle_event(event);
        if regions.is_empty() {
            continue;
        }
        if let Err(e) = display.render(&face, controller.state(), regions) {
            defmt::error!("Redraw failed: {}", e);
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut p = embassy_nrf::init(SystemConfig::embassy());
    SystemConfig::set_interrupt_priorities();
    defmt::info!("Initializing");

    // Initialize SAADC
    let mut saadc_config = saadc::Config::default();
    // Set resolution to 12bit, necessary for correct battery status calculation
    saadc_config.resolution = Resolution::_12BIT;
    // Pin P0.31: Voltage level
    let channel_config = ChannelConfig::single_ended(&mut p.P0_31);
    let saadc = Saadc::new(p.SAADC, Irqs, saadc_config, [channel_config]);
    saadc.calibrate().await;

    // Initialize Battery
    let mut battery = Battery::init(saadc, Input::new(p.P0_12, Pull::None));
    let battery_percent = match battery.sample().await {
        Ok(percent) => percent.unwrap_or(0),
        Err(e) => {
            defmt::warn!("Battery sample rejected: {}", e);
            0
        }
    };

    // Initialize vibration motor
    let vibration = VibrationMotor::init(Output::new(p.P0_16, Level::High, OutputDrive::Standard));

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let backlight = Backlight::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
    );
    let display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
        backlight,
    ));

    // Initialize Bluetooth
    let sd = Softdevice::enable(&SystemConfig::softdevice());
    let server: &'static Server = SERVER.init(unwrap!(Server::new(sd)));
    let sd: &'static Softdevice = sd;
    unwrap!(spawner.spawn(softdevice_task(sd)));

    // The build time stands in until a phone sets the clock
    let config = WatchfaceConfig::default();
    let clock = TimeManager::init(
        unwrap!(TimeReference::from_unix_epoch(UTC_EPOCH, uptime_secs())),
        config.utc_offset_secs,
    );
    if server.bas.battery_level_set(&battery_percent).is_err() {
        defmt::warn!("Could not update battery characteristic");
    }

    let controller = unwrap!(WatchfaceController::start(
        config,
        Snapshot {
            now: clock.local(uptime_secs()),
            battery_percent,
            bluetooth_connected: false,
        },
        GattOutbox,
        SignalHaptics::new(&HAPTICS),
    ));

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(bluetooth_task(sd, server)));
    unwrap!(spawner.spawn(update_battery_status(battery, server)));
    unwrap!(spawner.spawn(update_lcd(display, controller)));
    unwrap!(spawner.spawn(update_time(clock)));
    unwrap!(spawner.spawn(notify(vibration)));
}
