//! Firmware entry point for the FRDM-RW612.
//!
//! Brings the board up, hands the USB controller to the TinyUSB device stack linked into
//! the image, and runs the board test application next to the stack's device task. Built
//! bare-metal by default, or on the embassy executor with the `rtos` feature.

#![no_std]
#![no_main]

use frdm_rw612::apps::board_test::BoardTestApp;
use frdm_rw612::soc::rw612::Rw612;
use frdm_rw612::{bind_usb_interrupt, ActiveMode, Board, UsbInterruptBridge, FRDM_RW612};

#[cfg(feature = "defmt")]
use defmt::info;

// Import panic handler and defmt RTT for debugging
#[cfg(not(feature = "debug"))]
use panic_halt as _;
#[cfg(feature = "debug")]
use {defmt_rtt as _, panic_probe as _};

/// Entry points of the TinyUSB device stack.
mod tinyusb {
    extern "C" {
        pub fn tusb_int_handler(rhport: u8, in_isr: bool);
        pub fn tud_init(rhport: u8) -> bool;
        pub fn tud_task_ext(timeout_ms: u32, in_isr: bool);
    }
}

fn usb_isr(rhport: u8, in_isr: bool) {
    // SAFETY: TinyUSB's interrupt entry is reentrant-safe for its own controller
    unsafe { tinyusb::tusb_int_handler(rhport, in_isr) }
}

static USB_BRIDGE: UsbInterruptBridge<fn(u8, bool)> = UsbInterruptBridge::new(usb_isr);

bind_usb_interrupt!(FRDM_RW612.usb.irq => USB_BRIDGE);

/// Start the USB device stack on the board's controller.
fn start_usb(board: &mut Board<Rw612, ActiveMode>) {
    // SAFETY: controller clocked, reset and calibrated by bring-up
    let started = unsafe { tinyusb::tud_init(frdm_rw612::peripherals::usb_system::RHPORT) };
    assert!(started, "USB device stack failed to start");
    board.enable_usb_interrupt();

    #[cfg(feature = "defmt")]
    info!("USB device stack running");
}

/// Run one pass of the USB device task without blocking.
fn usb_device_poll() {
    // SAFETY: called from thread mode only
    unsafe { tinyusb::tud_task_ext(0, false) }
}

#[cfg(not(feature = "rtos"))]
mod bare_metal {
    use super::*;

    use cortex_m_rt::{entry, exception};
    use frdm_rw612::peripherals::SYSTEM_TICKS;
    use frdm_rw612::BareMetal;

    #[exception]
    fn SysTick() {
        SYSTEM_TICKS.on_tick();
    }

    #[entry]
    fn main() -> ! {
        #[cfg(feature = "defmt")]
        info!("Starting FRDM-RW612 firmware v{}", env!("CARGO_PKG_VERSION"));

        let soc = Rw612::take().expect("chip already taken");
        let mut board = Board::initialize(soc, &FRDM_RW612, BareMetal::new(&SYSTEM_TICKS));

        let mut app = BoardTestApp::new(board.millis());
        BoardTestApp::print_banner(&mut board);
        start_usb(&mut board);

        loop {
            usb_device_poll();
            app.poll(&mut board);
        }
    }
}

#[cfg(feature = "rtos")]
mod rtos {
    use super::*;

    use embassy_executor::Spawner;
    use embassy_futures::join::join;
    use embassy_futures::yield_now;
    use frdm_rw612::Rtos;

    /// Main application entry point
    ///
    /// Brings the board up, then runs the USB device task and the button mirror side by
    /// side. Neither ever returns.
    #[embassy_executor::main]
    async fn main(_spawner: Spawner) {
        #[cfg(feature = "defmt")]
        info!("Starting FRDM-RW612 firmware v{} (rtos)", env!("CARGO_PKG_VERSION"));

        let soc = Rw612::take().expect("chip already taken");
        let mut board = Board::initialize(soc, &FRDM_RW612, Rtos);

        BoardTestApp::print_banner(&mut board);
        start_usb(&mut board);

        let usb = async {
            loop {
                usb_device_poll();
                yield_now().await;
            }
        };

        // No tick in this mode, so the LED just follows the button
        let buttons = async {
            loop {
                let pressed = board.read_button();
                board.write_led(pressed);
                yield_now().await;
            }
        };

        join(usb, buttons).await;
    }
}
