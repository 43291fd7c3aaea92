//! Application layer for the FRDM-RW612.
//!
//! Applications only use the board API exposed by [`crate::peripherals`]; the USB stack
//! itself runs outside this crate.
