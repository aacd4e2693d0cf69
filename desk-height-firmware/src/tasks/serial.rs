//! Desk bus UART tasks
//!
//! Move bytes between the buffered UART and the static pipes the sensor
//! task reads and writes.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};

use crate::channels::{RX_PIPE, TX_PIPE};

/// Buffer size for UART transfers
const BUF_SIZE: usize = 32;

/// Serial RX task - forwards everything the controller sends
#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx) {
    info!("Serial RX task started");

    let mut buf = [0u8; BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);
                RX_PIPE.write_all(&buf[..n]).await;
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Serial TX task - sends queued query frames
#[embassy_executor::task]
pub async fn serial_tx_task(mut tx: BufferedUartTx) {
    info!("Serial TX task started");

    let mut buf = [0u8; BUF_SIZE];

    loop {
        let n = TX_PIPE.read(&mut buf).await;
        if let Err(e) = tx.write_all(&buf[..n]).await {
            warn!("UART write error: {:?}", e);
        } else {
            trace!("TX: {} bytes", n);
        }
    }
}
