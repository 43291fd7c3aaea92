//! USB controller bring-up and interrupt forwarding.
//!
//! The USB protocol stack is an external collaborator. This module gets the controller
//! and PHY out of reset, then forwards the controller's single interrupt into the stack's
//! entry point as `(controller index, from ISR)`.

use crate::config::UsbConfig;
use crate::peripherals::usb_phy;
use crate::soc::{IrqNumber, Soc};

/// Index of the only USB controller on this board.
pub const RHPORT: u8 = 0;

/// Bring the USB controller and PHY out of reset.
///
/// Clock, then reset, then PHY. A board without a discrete PHY stops after the reset:
/// the PHY is either part of the controller or brought up by hardware.
pub fn bring_up<S: Soc>(soc: &mut S, usb: &UsbConfig) {
    soc.enable_clock(usb.clock);

    soc.peripheral_reset(usb.reset);

    match &usb.phy {
        Some(phy_config) => {
            if let Some(clock) = phy_config.clock {
                soc.enable_clock(clock);
            }
            let mut phy = soc.usb_phy(phy_config);
            usb_phy::calibrate(&mut phy, phy_config);
            info!("USB controller and PHY initialized");
        }
        None => {
            warn!("No discrete USB PHY, PHY initialization skipped");
        }
    }
}

/// The USB stack's interrupt entry point.
pub trait UsbInterruptHandler {
    fn handle_interrupt(&self, rhport: u8, in_isr: bool);
}

impl<F: Fn(u8, bool)> UsbInterruptHandler for F {
    #[inline]
    fn handle_interrupt(&self, rhport: u8, in_isr: bool) {
        self(rhport, in_isr)
    }
}

/// Forwards the hardware USB interrupt to the stack, unconditionally and synchronously.
///
/// # Example
///
/// ```rust,ignore
/// static USB_BRIDGE: UsbInterruptBridge<fn(u8, bool)> = UsbInterruptBridge::new(usb_isr);
/// bind_usb_interrupt!(FRDM_RW612.usb.irq => USB_BRIDGE);
/// ```
pub struct UsbInterruptBridge<H> {
    handler: H,
}

impl<H: UsbInterruptHandler> UsbInterruptBridge<H> {
    pub const fn new(handler: H) -> Self {
        Self { handler }
    }

    /// Called from the USB vector.
    #[inline]
    pub fn on_interrupt(&self) {
        self.handler.handle_interrupt(RHPORT, true);
    }

    /// Called from a shared vector with the number of the interrupt that fired. Forwards
    /// only when `irqn` is `usb`; any other interrupt is ignored.
    ///
    /// # Returns
    ///
    /// Whether the interrupt was forwarded.
    #[inline]
    pub fn dispatch(&self, irqn: i16, usb: IrqNumber) -> bool {
        if irqn < 0 || irqn as u16 != usb.number() {
            return false;
        }
        self.on_interrupt();
        true
    }
}

/// Bind the USB vector to a [`UsbInterruptBridge`] static.
///
/// Expands to the `DefaultHandler` exception, which receives every device interrupt
/// without its own handler and dispatches the USB one by number. Other device interrupts
/// (enabled by vendor code, for instance) return without doing anything.
#[macro_export]
macro_rules! bind_usb_interrupt {
    ($irq:expr => $bridge:path) => {
        #[cortex_m_rt::exception]
        unsafe fn DefaultHandler(irqn: i16) {
            $bridge.dispatch(irqn, $irq);
        }
    };
}
