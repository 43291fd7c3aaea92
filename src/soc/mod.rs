//! Vendor primitive boundary.
//!
//! Everything the bring-up sequence needs from the chip is expressed through the [`Soc`]
//! trait: clock gates, peripheral resets, pin configuration, the USART driver, the core
//! timer and interrupt controller, and raw USB PHY register access. The sequencer never
//! touches registers itself, so the ordering logic runs unchanged against the RW612
//! backend on the board and against a recording mock on the host.

use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::config::UsbPhyConfig;

pub mod flexcomm;
#[cfg(target_os = "none")]
pub mod mmio;
#[cfg(target_os = "none")]
pub mod rw612;

/// Which clock/reset controller pair a gate or reset line lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlBlock {
    /// CLKCTL0 / RSTCTL0 (compute and system peripherals)
    Block0,
    /// CLKCTL1 / RSTCTL1 (flexcomm, GPIO and timers)
    Block1,
}

/// A peripheral clock gate: bit `bit` of the `PSCCTL<register>` register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockGate {
    pub block: ControlBlock,
    pub register: u8,
    pub bit: u8,
}

impl ClockGate {
    pub const fn new(block: ControlBlock, register: u8, bit: u8) -> Self {
        Self { block, register, bit }
    }
}

/// A peripheral reset line: bit `bit` of the `PRSTCTL<register>` register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeripheralReset {
    pub block: ControlBlock,
    pub register: u8,
    pub bit: u8,
}

impl PeripheralReset {
    pub const fn new(block: ControlBlock, register: u8, bit: u8) -> Self {
        Self { block, register, bit }
    }
}

/// A GPIO line, addressed as port and pin number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId {
    pub port: u8,
    pub pin: u8,
}

impl PinId {
    pub const fn new(port: u8, pin: u8) -> Self {
        Self { port, pin }
    }
}

/// External interrupt number as seen by the NVIC (vector index minus 16).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrqNumber(pub u16);

impl IrqNumber {
    pub const fn number(self) -> u16 {
        self.0
    }
}

// SAFETY: board profiles only carry interrupt numbers taken from the device's vector table.
#[cfg(target_os = "none")]
unsafe impl cortex_m::interrupt::InterruptNumber for IrqNumber {
    #[inline]
    fn number(self) -> u16 {
        self.0
    }
}

/// Flexcomm instance operating as a USART.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsartId {
    pub flexcomm: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

/// USART line settings.
///
/// [`Default`] matches the vendor driver defaults: 115200 8N1 with both directions
/// disabled, so callers have to opt in to TX and RX explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsartConfig {
    pub baud_rate: u32,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub enable_tx: bool,
    pub enable_rx: bool,
}

impl Default for UsartConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            parity: Parity::None,
            stop_bits: StopBits::One,
            enable_tx: false,
            enable_rx: false,
        }
    }
}

/// USB PHY registers touched during calibration.
///
/// Discriminants are byte offsets from the PHY base address. `CtrlSet` is the
/// write-one-to-set alias of `Ctrl`.
#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhyRegister {
    Pwd = 0x000,
    Tx = 0x010,
    Ctrl = 0x030,
    CtrlSet = 0x034,
    TrimOverrideEn = 0x130,
}

impl PhyRegister {
    pub const fn offset(self) -> usize {
        self as usize
    }
}

/// Raw 32-bit access to the discrete USB PHY.
pub trait UsbPhyRegisters {
    fn read(&mut self, reg: PhyRegister) -> u32;
    fn write(&mut self, reg: PhyRegister, value: u32);
}

/// The chip-level primitives the bring-up sequence is built on.
///
/// Implementations are expected to be correct and infallible; a failing primitive is a
/// fatal hardware condition, not something the sequencer recovers from.
pub trait Soc {
    /// Pin driven by [`Soc::output_pin`].
    type Output: OutputPin;
    /// Pin returned by [`Soc::input_pin`].
    type Input: InputPin;
    /// Blocking serial port returned by [`Soc::usart`].
    type Serial: embedded_io::Write;
    /// PHY register block returned by [`Soc::usb_phy`].
    type Phy: UsbPhyRegisters;

    /// Apply the static pin-mux table.
    fn init_pins(&mut self);
    /// Apply the static clock-tree table.
    fn boot_clock_run(&mut self);
    /// Core clock frequency after [`Soc::boot_clock_run`].
    fn core_clock_hz(&self) -> u32;

    /// Program the core tick timer with `ticks` core cycles per period and enable its
    /// interrupt. The interrupt must be the last thing enabled.
    fn start_tick_timer(&mut self, ticks: u32);
    /// Set the logical (unshifted) priority of an interrupt. Smaller is more urgent.
    fn set_irq_priority(&mut self, irq: IrqNumber, priority: u8);
    fn unmask_irq(&mut self, irq: IrqNumber);

    fn enable_clock(&mut self, gate: ClockGate);
    /// Assert then release a peripheral reset.
    fn peripheral_reset(&mut self, reset: PeripheralReset);

    /// Configure `pin` as a digital output already driven to `initial`.
    fn output_pin(&mut self, pin: PinId, initial: PinState) -> Self::Output;
    /// Configure `pin` as a digital input. Pulls come from the pin-mux table.
    fn input_pin(&mut self, pin: PinId) -> Self::Input;

    /// Initialize a USART fed by a `clock_hz` function clock and hand back its blocking
    /// transmit side.
    fn usart(&mut self, device: UsartId, clock_hz: u32, config: &UsartConfig) -> Self::Serial;

    fn usb_phy(&mut self, phy: &UsbPhyConfig) -> Self::Phy;
}
