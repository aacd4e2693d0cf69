//! Desk height sensor firmware
//!
//! Main firmware binary for an RP2040 wired into the serial link between a
//! Flexispot desk controller and its keypad. Decodes the height the keypad
//! shows and polls the controller faster while the desk moves.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

mod channels;
mod config;
mod tasks;
mod transport;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Desk height firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load_config();

    // GPIO0 = TX towards the controller, GPIO1 = RX from the controller
    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(
        p.UART0,
        p.PIN_0,
        p.PIN_1,
        transport::uart_config(&config.serial),
    );
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized at {} baud", config.serial.baudrate);

    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    spawner.spawn(tasks::serial_tx_task(tx)).unwrap();
    spawner.spawn(tasks::sensor_task(config.sensor)).unwrap();
    spawner.spawn(tasks::report_task()).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
