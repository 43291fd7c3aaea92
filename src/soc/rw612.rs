//! RW612 implementation of [`Soc`].
//!
//! Pin-mux and clock-tree tables come from the board's generated `BOARD_InitPins` /
//! `BOARD_BootClockRUN` C objects, linked into the firmware image. Everything else is
//! programmed here directly: clock gates and resets through CLKCTL/RSTCTL, GPIO through
//! the byte/direction registers, the debug USART through its Flexcomm, and SysTick/NVIC
//! through `cortex-m`.

use core::convert::Infallible;

use cortex_m::peripheral::scb::SystemHandler;
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::{NVIC, SCB, SYST};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin, PinState};

use super::flexcomm;
use super::mmio::MmioRegion;
use super::{
    ClockGate, ControlBlock, IrqNumber, PeripheralReset, PhyRegister, PinId, Soc, UsartConfig,
    UsartId, UsbPhyRegisters,
};
use crate::config::UsbPhyConfig;

const RSTCTL0_BASE: usize = 0x4000_0000;
const CLKCTL0_BASE: usize = 0x4000_1000;
const RSTCTL1_BASE: usize = 0x4002_0000;
const CLKCTL1_BASE: usize = 0x4002_1000;
const GPIO_BASE: usize = 0x4010_0000;
const FLEXCOMM0_BASE: usize = 0x4010_6000;
const FLEXCOMM_STRIDE: usize = 0x1000;
// FC0..FC3 sit back to back; FC14 lives elsewhere and is not supported
const FLEXCOMM_COUNT: u8 = 4;

// CLKCTL: write-one-to-set gate registers
const PSCCTL_SET: usize = 0x40;

// RSTCTL: status, set and clear registers
const PRSTCTL: usize = 0x10;
const PRSTCTL_SET: usize = 0x40;
const PRSTCTL_CLR: usize = 0x70;

// GPIO: one byte per pin, one direction word per port
const GPIO_PORT_STRIDE: usize = 0x20;
const GPIO_DIR: usize = 0x2000;

/// Implemented NVIC priority bits on the Cortex-M33.
const NVIC_PRIO_BITS: u8 = 3;
/// SysTick reload is a 24-bit field.
const SYST_MAX_RELOAD: u32 = 0x00FF_FFFF;

extern "C" {
    fn BOARD_InitPins();
    fn BOARD_BootClockRUN();
    static SystemCoreClock: u32;
}

/// Shift a logical priority into the implemented high bits of the NVIC byte.
const fn hw_priority(logical: u8) -> u8 {
    logical << (8 - NVIC_PRIO_BITS)
}

fn clkctl(block: ControlBlock) -> MmioRegion {
    let base = match block {
        ControlBlock::Block0 => CLKCTL0_BASE,
        ControlBlock::Block1 => CLKCTL1_BASE,
    };
    // SAFETY: fixed CLKCTL instance address
    unsafe { MmioRegion::new(base) }
}

fn rstctl(block: ControlBlock) -> MmioRegion {
    let base = match block {
        ControlBlock::Block0 => RSTCTL0_BASE,
        ControlBlock::Block1 => RSTCTL1_BASE,
    };
    // SAFETY: fixed RSTCTL instance address
    unsafe { MmioRegion::new(base) }
}

fn gpio() -> MmioRegion {
    // SAFETY: fixed GPIO instance address
    unsafe { MmioRegion::new(GPIO_BASE) }
}

/// The RW612 core peripherals plus the device register blocks used during bring-up.
pub struct Rw612 {
    syst: SYST,
    nvic: NVIC,
    scb: SCB,
}

impl Rw612 {
    /// Take the chip. Returns `None` after the first call.
    pub fn take() -> Option<Self> {
        let cp = cortex_m::Peripherals::take()?;
        Some(Self {
            syst: cp.SYST,
            nvic: cp.NVIC,
            scb: cp.SCB,
        })
    }
}

impl Soc for Rw612 {
    type Output = GpioPin;
    type Input = GpioPin;
    type Serial = Usart;
    type Phy = UsbPhy;

    fn init_pins(&mut self) {
        // SAFETY: generated pin-mux routine, only touches IOPCTL
        unsafe { BOARD_InitPins() }
    }

    fn boot_clock_run(&mut self) {
        // SAFETY: generated clock-tree routine; also updates SystemCoreClock
        unsafe { BOARD_BootClockRUN() }
    }

    fn core_clock_hz(&self) -> u32 {
        // SAFETY: plain u32 written only by BOARD_BootClockRUN, which has returned
        unsafe { core::ptr::read_volatile(core::ptr::addr_of!(SystemCoreClock)) }
    }

    fn start_tick_timer(&mut self, ticks: u32) {
        assert!(
            ticks >= 1 && ticks - 1 <= SYST_MAX_RELOAD,
            "tick period does not fit SysTick"
        );

        // SAFETY: SysTick runs at the lowest priority, it shares nothing with
        // priority-based critical sections
        unsafe {
            self.scb
                .set_priority(SystemHandler::SysTick, hw_priority((1 << NVIC_PRIO_BITS) - 1));
        }
        self.syst.set_clock_source(SystClkSource::Core);
        self.syst.set_reload(ticks - 1);
        self.syst.clear_current();
        self.syst.enable_counter();
        // Interrupt last, so the first tick sees a fully configured timer
        self.syst.enable_interrupt();
        debug!("SysTick reload {}", ticks - 1);
    }

    fn set_irq_priority(&mut self, irq: IrqNumber, priority: u8) {
        // SAFETY: called during bring-up, before the interrupt is unmasked
        unsafe { self.nvic.set_priority(irq, hw_priority(priority)) }
    }

    fn unmask_irq(&mut self, irq: IrqNumber) {
        // SAFETY: the handler is bound through `bind_usb_interrupt!`
        unsafe { NVIC::unmask(irq) }
    }

    fn enable_clock(&mut self, gate: ClockGate) {
        let offset = PSCCTL_SET + 4 * gate.register as usize;
        clkctl(gate.block).write32(offset, 1 << gate.bit);
    }

    fn peripheral_reset(&mut self, reset: PeripheralReset) {
        let regs = rstctl(reset.block);
        let offset = 4 * reset.register as usize;
        let mask = 1 << reset.bit;

        regs.write32(PRSTCTL_SET + offset, mask);
        regs.wait32(PRSTCTL + offset, mask, mask);
        regs.write32(PRSTCTL_CLR + offset, mask);
        regs.wait32(PRSTCTL + offset, mask, 0);
    }

    fn output_pin(&mut self, pin: PinId, initial: PinState) -> GpioPin {
        let mut gpio_pin = GpioPin::new(pin);
        // Level before direction, so the pin never glitches to the wrong state
        gpio_pin.drive(initial);
        gpio().modify32(gpio_pin.dir_offset(), |dir| dir | gpio_pin.mask());
        gpio_pin
    }

    fn input_pin(&mut self, pin: PinId) -> GpioPin {
        let gpio_pin = GpioPin::new(pin);
        gpio().modify32(gpio_pin.dir_offset(), |dir| dir & !gpio_pin.mask());
        gpio_pin
    }

    fn usart(&mut self, device: UsartId, clock_hz: u32, config: &UsartConfig) -> Usart {
        Usart::init(device, clock_hz, config)
    }

    fn usb_phy(&mut self, phy: &UsbPhyConfig) -> UsbPhy {
        UsbPhy {
            // SAFETY: board profiles carry the PHY's register base
            regs: unsafe { MmioRegion::new(phy.base) },
        }
    }
}

/// A GPIO line, usable as either an input or an output depending on how the
/// [`Soc`] configured it.
pub struct GpioPin {
    pin: PinId,
}

impl GpioPin {
    const fn new(pin: PinId) -> Self {
        Self { pin }
    }

    const fn byte_offset(&self) -> usize {
        self.pin.port as usize * GPIO_PORT_STRIDE + self.pin.pin as usize
    }

    const fn dir_offset(&self) -> usize {
        GPIO_DIR + 4 * self.pin.port as usize
    }

    const fn mask(&self) -> u32 {
        1 << self.pin.pin
    }

    fn drive(&mut self, level: PinState) {
        gpio().write8(self.byte_offset(), (level == PinState::High) as u8);
    }
}

impl ErrorType for GpioPin {
    type Error = Infallible;
}

impl OutputPin for GpioPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(PinState::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(PinState::High);
        Ok(())
    }
}

impl InputPin for GpioPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(gpio().read8(self.byte_offset()) != 0)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Blocking transmit side of a Flexcomm USART.
pub struct Usart {
    regs: MmioRegion,
}

impl Usart {
    /// Switch the Flexcomm to USART mode and program line settings.
    ///
    /// # Panics
    ///
    /// If `device` is not a Flexcomm instance, or `config.baud_rate` cannot be derived from
    /// `clock_hz`. [`crate::config::BoardConfig::validate`] rules out the latter.
    fn init(device: UsartId, clock_hz: u32, config: &UsartConfig) -> Self {
        assert!(device.flexcomm < FLEXCOMM_COUNT, "no such flexcomm");
        let base = FLEXCOMM0_BASE + device.flexcomm as usize * FLEXCOMM_STRIDE;
        // SAFETY: base of a Flexcomm instance, checked above
        let regs = unsafe { MmioRegion::new(base) };

        let divider = flexcomm::baud_divider(clock_hz, config.baud_rate)
            .expect("baud rate not reachable from the flexcomm clock");

        regs.write32(flexcomm::PSELID, flexcomm::PSELID_PERSEL_USART);
        regs.write32(flexcomm::CFG, 0);
        regs.write32(flexcomm::FIFOCFG, flexcomm::fifocfg_bits(config));
        regs.write32(flexcomm::OSR, divider.osr);
        regs.write32(flexcomm::BRG, divider.brg);
        regs.write32(flexcomm::CFG, flexcomm::cfg_bits(config));

        debug!(
            "USART{} at {} baud (OSR {}, BRG {})",
            device.flexcomm,
            divider.actual_baud(clock_hz),
            divider.osr,
            divider.brg
        );

        Self { regs }
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        if self.regs.read32(flexcomm::FIFOSTAT) & flexcomm::FIFOSTAT_TXNOTFULL == 0 {
            return Err(nb::Error::WouldBlock);
        }
        self.regs.write32(flexcomm::FIFOWR, byte as u32);
        Ok(())
    }

    fn tx_idle(&mut self) -> nb::Result<(), Infallible> {
        if self.regs.read32(flexcomm::FIFOSTAT) & flexcomm::FIFOSTAT_TXEMPTY == 0 {
            return Err(nb::Error::WouldBlock);
        }
        Ok(())
    }
}

impl embedded_io::ErrorType for Usart {
    type Error = Infallible;
}

impl embedded_io::Write for Usart {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for &byte in buf {
            nb::block!(self.write_byte(byte))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        nb::block!(self.tx_idle())
    }
}

/// Register block of the discrete USB PHY.
pub struct UsbPhy {
    regs: MmioRegion,
}

impl UsbPhyRegisters for UsbPhy {
    fn read(&mut self, reg: PhyRegister) -> u32 {
        self.regs.read32(reg.offset())
    }

    fn write(&mut self, reg: PhyRegister, value: u32) {
        self.regs.write32(reg.offset(), value);
    }
}
