//! Static board configuration.
//!
//! A [`BoardConfig`] is the whole description of one board variant: which pins the LED
//! and button sit on, which clock gates and reset lines feed them, whether a debug UART
//! and a discrete USB PHY exist, and the calibration profile for that PHY. The bring-up
//! sequence only ever holds a `&'static` reference to it.
//!
//! Optional hardware is modelled as `Option` fields. An absent button, UART or PHY is a
//! valid board, not an error.

use core::fmt;

use crate::peripherals::gpio::ActiveLevel;
use crate::peripherals::usb_phy::PhyCalibrationProfile;
use crate::soc::{ClockGate, ControlBlock, IrqNumber, PeripheralReset, PinId, UsartId};

/// Core timer and interrupt-controller settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoreConfig {
    /// Tick timer rate in bare-metal mode.
    pub tick_hz: u32,
    /// Priority bits implemented by the NVIC.
    pub nvic_priority_bits: u8,
    /// Highest (numerically smallest) logical priority from which the scheduler's
    /// syscalls may be invoked. Only used in RTOS mode.
    pub max_syscall_priority: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedConfig {
    pub clock: ClockGate,
    pub pin: PinId,
    pub active: ActiveLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    pub clock: ClockGate,
    pub pin: PinId,
    pub active: ActiveLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    pub clock: ClockGate,
    pub device: UsartId,
    /// Function clock feeding the flexcomm, from the clock-tree table.
    pub function_clock_hz: u32,
    pub baud_rate: u32,
}

/// Discrete USB PHY description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsbPhyConfig {
    pub base: usize,
    /// Separate PHY clock gate, on targets that have one.
    pub clock: Option<ClockGate>,
    /// Target exposes the CCM analog / ANATOP blocks, which own the PHY trim values.
    /// Without them the IFR trim values are overridden from TRIM_OVERRIDE_EN.
    pub anatop: bool,
    pub calibration: PhyCalibrationProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsbConfig {
    pub clock: ClockGate,
    pub reset: PeripheralReset,
    pub irq: IrqNumber,
    pub phy: Option<UsbPhyConfig>,
}

/// Complete description of one board variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardConfig {
    pub name: &'static str,
    pub core: CoreConfig,
    pub led: LedConfig,
    pub button: Option<ButtonConfig>,
    pub uart: Option<UartConfig>,
    pub usb: UsbConfig,
}

/// Reasons a board profile cannot be brought up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    TickRateZero,
    PriorityBitsOutOfRange(u8),
    SyscallPriorityOutOfRange(u8),
    BaudRateZero,
    BaudRateAboveClock,
    CalibrationFieldOutOfRange,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TickRateZero => f.write_str("tick rate must be non-zero"),
            Self::PriorityBitsOutOfRange(bits) => {
                write!(f, "NVIC priority bits must be 1..=8, got {bits}")
            }
            Self::SyscallPriorityOutOfRange(prio) => {
                write!(f, "syscall priority {prio} does not fit the NVIC priority bits")
            }
            Self::BaudRateZero => f.write_str("UART baud rate must be non-zero"),
            Self::BaudRateAboveClock => f.write_str("UART baud rate exceeds its function clock"),
            Self::CalibrationFieldOutOfRange => {
                f.write_str("PHY calibration field does not fit its 4-bit register field")
            }
        }
    }
}

impl CoreConfig {
    /// The syscall priority as written to the NVIC's 8-bit priority field.
    pub const fn max_syscall_priority_raw(&self) -> u8 {
        self.max_syscall_priority << (8 - self.nvic_priority_bits)
    }
}

impl BoardConfig {
    /// Check the profile for values the hardware cannot represent.
    ///
    /// `const` so a profile can be rejected at compile time.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.core.tick_hz == 0 {
            return Err(ConfigError::TickRateZero);
        }
        let bits = self.core.nvic_priority_bits;
        if bits == 0 || bits > 8 {
            return Err(ConfigError::PriorityBitsOutOfRange(bits));
        }
        if (self.core.max_syscall_priority as u16) >= (1u16 << bits) {
            return Err(ConfigError::SyscallPriorityOutOfRange(self.core.max_syscall_priority));
        }
        if let Some(uart) = &self.uart {
            if uart.baud_rate == 0 {
                return Err(ConfigError::BaudRateZero);
            }
            // USART needs at least 8x oversampling
            if uart.baud_rate > uart.function_clock_hz / 8 {
                return Err(ConfigError::BaudRateAboveClock);
            }
        }
        if let Some(phy) = &self.usb.phy {
            if !phy.calibration.fits_fields() {
                return Err(ConfigError::CalibrationFieldOutOfRange);
            }
        }
        Ok(())
    }

    /// FRDM-RW612 profile.
    ///
    /// Clock gate and reset bit positions follow the `kCLOCK_*` / `k*_RST_SHIFT_RSTn`
    /// encodings of the RW612 device headers; the PHY is calibrated with the MCX N9 values.
    pub const fn frdm_rw612() -> Self {
        Self {
            name: "FRDM-RW612",
            core: CoreConfig {
                tick_hz: 1_000,
                nvic_priority_bits: 3,
                max_syscall_priority: 2,
            },
            led: LedConfig {
                clock: ClockGate::new(ControlBlock::Block1, 1, 0),
                pin: PinId::new(0, 1),
                active: ActiveLevel::Low,
            },
            button: Some(ButtonConfig {
                clock: ClockGate::new(ControlBlock::Block1, 1, 0),
                pin: PinId::new(0, 11),
                active: ActiveLevel::Low,
            }),
            uart: Some(UartConfig {
                clock: ClockGate::new(ControlBlock::Block1, 0, 11),
                device: UsartId { flexcomm: 3 },
                function_clock_hz: 16_000_000,
                baud_rate: 115_200,
            }),
            usb: UsbConfig {
                clock: ClockGate::new(ControlBlock::Block0, 0, 28),
                reset: PeripheralReset::new(ControlBlock::Block0, 0, 28),
                irq: IrqNumber(50),
                phy: Some(UsbPhyConfig {
                    base: 0x4014_6000,
                    clock: None,
                    anatop: false,
                    calibration: PhyCalibrationProfile::MCX_N9,
                }),
            },
        }
    }
}

/// The board this firmware is built for.
pub static FRDM_RW612: BoardConfig = BoardConfig::frdm_rw612();

const _: () = match BoardConfig::frdm_rw612().validate() {
    Ok(()) => {}
    Err(_) => panic!("FRDM-RW612 board profile is invalid"),
};
