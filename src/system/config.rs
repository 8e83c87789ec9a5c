//! General system configuration

use core::mem;

use embassy_nrf::{
    config::{Config, Debug, HfclkSource, LfclkSource},
    interrupt::{self, InterruptExt, Priority},
};
use nrf_softdevice::raw;

/// Name shown to phones while advertising
pub const DEVICE_NAME: &[u8] = b"PineTime";

/// Backlight level (0 to 7) after boot
pub const BACKLIGHT_LEVEL: u8 = 2;

/// Interval between battery samples
pub const BATTERY_SAMPLE_SECS: u64 = 10;

pub struct SystemConfig {}

impl SystemConfig {
    /// HAL configuration compatible with the SoftDevice
    pub fn embassy() -> Config {
        // Generate default config, required because Config is set as
        // `non_exhaustive`
        let mut config = Config::default();

        // The SoftDevice owns the clocks once enabled
        config.hfclk_source = HfclkSource::Internal;
        config.lfclk_source = LfclkSource::InternalRC;

        // Enable DC/DC regulator to massively reduce runtime current consumption
        config.dcdc.reg1 = true;

        // Priorities 0, 1 and 4 are reserved for the SoftDevice
        config.gpiote_interrupt_priority = Priority::P2;
        config.time_interrupt_priority = Priority::P2;

        // Allow debugging
        config.debug = Debug::Allowed;

        config
    }

    /// Move the peripheral interrupts in use off the reserved priorities
    pub fn set_interrupt_priorities() {
        interrupt::SAADC.set_priority(Priority::P3);
        interrupt::SPIM2_SPIS2_SPI2.set_priority(Priority::P3);
    }

    /// SoftDevice configuration: a single peripheral link to the phone
    pub fn softdevice() -> nrf_softdevice::Config {
        nrf_softdevice::Config {
            clock: Some(raw::nrf_clock_lf_cfg_t {
                source: raw::NRF_CLOCK_LF_SRC_RC as u8,
                rc_ctiv: 16,
                rc_temp_ctiv: 2,
                accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
            }),
            conn_gap: Some(raw::ble_gap_conn_cfg_t {
                conn_count: 1,
                event_length: 24,
            }),
            conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 256 }),
            gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
                attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
            }),
            gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
                p_value: DEVICE_NAME.as_ptr() as _,
                current_len: DEVICE_NAME.len() as u16,
                max_len: DEVICE_NAME.len() as u16,
                write_perm: unsafe { mem::zeroed() },
                _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                    raw::BLE_GATTS_VLOC_STACK as u8,
                ),
            }),
            ..Default::default()
        }
    }
}
