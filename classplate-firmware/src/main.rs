//! Classplate - LED Matrix Nameplate Firmware
//!
//! Main firmware binary for an RP2040 driving eight cascaded MAX7219
//! 8x8 modules. The left half of the chain shows outdoor temperature and
//! the time of day; the right half scrolls a message delivered by the
//! bridge over UART.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{SPI0, UART0};
use embassy_rp::spi::{Blocking, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use classplate_core::{
    parse_config, BuiltinFont, Display, DisplayConfig, MatrixChain, SharedChain,
    SharedDisplayState,
};
use classplate_hal_rp2040::{rp_spi_config, BusyWait, ChainSpi, SelectPin, SpiConfig};

mod channels;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit classplate.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../classplate.toml");

/// MAX7219 chain on SPI0 with a GPIO chip select
pub type MatrixBus =
    MatrixChain<ChainSpi<Spi<'static, SPI0, Blocking>>, SelectPin<Output<'static>>, BusyWait>;

/// Chain transport shared by the clock, scroll and link tasks
pub type Chain = SharedChain<CriticalSectionRawMutex, MatrixBus>;

/// Scroll message and brightness shared by the link and scroll tasks
pub type DisplayStateCell = SharedDisplayState<CriticalSectionRawMutex>;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// Shared resources referenced by every task
static CHAIN: StaticCell<Chain> = StaticCell::new();
static DISPLAY_STATE: StaticCell<DisplayStateCell> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Classplate firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    info!(
        "Config: cadence={}ms, brightness={}, refresh={}ms",
        config.scroll.cadence_ms, config.display.brightness, config.clock.refresh_ms
    );

    // Matrix chain: SPI0 CLK=GPIO18, MOSI=GPIO19, CS=GPIO17
    let spi = Spi::new_blocking_txonly(
        p.SPI0,
        p.PIN_18,
        p.PIN_19,
        rp_spi_config(&SpiConfig::max7219()),
    );
    let select = SelectPin::new(Output::new(p.PIN_17, Level::High));
    let chain: &'static Chain = CHAIN.init(SharedChain::new(MatrixChain::new(
        ChainSpi::new(spi),
        select,
        BusyWait,
    )));

    let state: &'static DisplayStateCell = DISPLAY_STATE.init(SharedDisplayState::new(
        &config.scroll.default_message,
        config.brightness(),
    ));

    // Configure the chips and show SYNC until the bridge sends the time
    let mut display = Display::new(chain, BuiltinFont, config.brightness());
    if let Err(e) = display.init() {
        error!("Matrix init failed: {:?}", Debug2Format(&e));
    }
    if let Err(e) = display.show_status("SYNC") {
        warn!("Failed to show status: {:?}", Debug2Format(&e));
    }
    info!("Matrix chain initialized");

    // Bridge link on UART0: TX=GPIO0, RX=GPIO1
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = BufferedUart::new(
        p.UART0,
        p.PIN_0,
        p.PIN_1,
        Irqs,
        tx_buf,
        rx_buf,
        UartConfig::default(), // 115200 baud default
    );
    let (tx, rx) = uart.split();
    info!("UART initialized for bridge link");

    // Spawn tasks
    spawner.spawn(tasks::link_rx_task(rx, state, chain)).unwrap();
    spawner
        .spawn(tasks::link_tx_task(tx, state, config.link.heartbeat_interval_s))
        .unwrap();
    spawner
        .spawn(tasks::clock_task(chain, config.brightness(), config.clock))
        .unwrap();
    spawner
        .spawn(tasks::scroll_task(state, chain, config.scroll.settings()))
        .unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse and validate the embedded configuration
///
/// Falls back to built-in defaults when the file is broken; build.rs
/// rejects a broken file, so this only happens if the two disagree.
fn load_config() -> DisplayConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            return DisplayConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Embedded config out of range: {:?}", e);
            error!("Using default configuration");
            DisplayConfig::default()
        }
    }
}
