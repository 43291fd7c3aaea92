//! Board support for the NXP FRDM-RW612.
//!
//! Brings clocks, GPIO, the debug UART and the USB controller/PHY from reset to the point
//! where a USB stack can attach, and exposes the small board API that stack and the
//! applications use afterwards:
//!
//! | Item | Purpose |
//! | ---- | ------- |
//! | [`Board::initialize`] | One-shot bring-up sequence |
//! | [`Board::write_led`] / [`Board::read_button`] | Polarity-normalized GPIO |
//! | [`Board::millis`] | Millisecond tick (bare-metal builds) |
//! | [`UartTransport`] | Blocking debug output |
//! | [`UsbInterruptBridge`] / [`bind_usb_interrupt!`] | USB vector forwarding |
//!
//! Hardware access goes through the [`soc::Soc`] trait, so everything except the RW612
//! backend builds and tests on the host.

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod apps;
pub mod config;
pub mod peripherals;
pub mod soc;

#[cfg(test)]
mod testing;

pub use config::{BoardConfig, FRDM_RW612};
pub use peripherals::{
    ActiveMode, BareMetal, Board, BringupMode, Rtos, UartTransport, UsbInterruptBridge,
};
