//! Height reporting task
//!
//! Consumes published heights. This is the hook for whatever the board
//! forwards heights to; for now it logs them.

use defmt::*;

use crate::channels::HEIGHT;

/// Report task - logs every new desk height
#[embassy_executor::task]
pub async fn report_task() {
    info!("Report task started");

    loop {
        let height = HEIGHT.wait().await;
        info!("Desk height: {} cm", height);
    }
}
