//! Host-side [`Soc`] that records every primitive call.
//!
//! Tests inspect the ordered [`Event`] trace to check bring-up ordering, and read back
//! pin levels, UART output and PHY register contents.

use core::cell::RefCell;
use core::convert::Infallible;
use std::collections::HashMap;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, PinState};

use crate::config::UsbPhyConfig;
use crate::soc::{
    ClockGate, IrqNumber, PeripheralReset, PhyRegister, PinId, Soc, UsartConfig, UsartId,
    UsbPhyRegisters,
};

/// One hardware-visible action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    InitPins,
    BootClockRun,
    StartTickTimer(u32),
    SetPriority(IrqNumber, u8),
    UnmaskIrq(IrqNumber),
    EnableClock(ClockGate),
    PeripheralReset(PeripheralReset),
    ConfigureOutput(PinId, PinState),
    ConfigureInput(PinId),
    WritePin(PinId, PinState),
    ReadPin(PinId),
    UsartInit(UsartId, u32, UsartConfig),
    PhyRead(PhyRegister),
    PhyWrite(PhyRegister, u32),
}

#[derive(Default)]
struct State {
    events: Vec<Event>,
    inputs: HashMap<PinId, PinState>,
    outputs: HashMap<PinId, PinState>,
    uart: Vec<u8>,
    phy: HashMap<PhyRegister, u32>,
}

/// Shared view of the mock's state, kept by the test after the mock is moved into a board.
#[derive(Clone, Default)]
pub struct Trace(Rc<RefCell<State>>);

impl Trace {
    fn record(&self, event: Event) {
        self.0.borrow_mut().events.push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().events.clone()
    }

    /// Level an input pin reads. Unset inputs read high (pulled up).
    pub fn set_input(&self, pin: PinId, level: PinState) {
        self.0.borrow_mut().inputs.insert(pin, level);
    }

    pub fn output_level(&self, pin: PinId) -> Option<PinState> {
        self.0.borrow().outputs.get(&pin).copied()
    }

    pub fn uart_output(&self) -> Vec<u8> {
        self.0.borrow().uart.clone()
    }
}

pub struct MockSoc {
    trace: Trace,
    core_clock_hz: u32,
}

impl MockSoc {
    pub fn new(core_clock_hz: u32) -> Self {
        Self {
            trace: Trace::default(),
            core_clock_hz,
        }
    }

    pub fn trace(&self) -> Trace {
        self.trace.clone()
    }
}

pub struct MockOutput {
    pin: PinId,
    trace: Trace,
}

impl ErrorType for MockOutput {
    type Error = Infallible;
}

impl MockOutput {
    fn drive(&mut self, level: PinState) {
        self.trace.record(Event::WritePin(self.pin, level));
        self.trace.0.borrow_mut().outputs.insert(self.pin, level);
    }
}

impl OutputPin for MockOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(PinState::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(PinState::High);
        Ok(())
    }
}

pub struct MockInput {
    pin: PinId,
    trace: Trace,
}

impl ErrorType for MockInput {
    type Error = Infallible;
}

impl InputPin for MockInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.trace.record(Event::ReadPin(self.pin));
        let level = self.trace.0.borrow().inputs.get(&self.pin).copied();
        Ok(level.unwrap_or(PinState::High) == PinState::High)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub struct MockSerial {
    trace: Trace,
}

impl embedded_io::ErrorType for MockSerial {
    type Error = Infallible;
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.trace.0.borrow_mut().uart.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub struct MockPhy {
    trace: Trace,
}

impl UsbPhyRegisters for MockPhy {
    fn read(&mut self, reg: PhyRegister) -> u32 {
        self.trace.record(Event::PhyRead(reg));
        self.trace.0.borrow().phy.get(&reg).copied().unwrap_or(0)
    }

    fn write(&mut self, reg: PhyRegister, value: u32) {
        self.trace.record(Event::PhyWrite(reg, value));
        self.trace.0.borrow_mut().phy.insert(reg, value);
    }
}

impl Soc for MockSoc {
    type Output = MockOutput;
    type Input = MockInput;
    type Serial = MockSerial;
    type Phy = MockPhy;

    fn init_pins(&mut self) {
        self.trace.record(Event::InitPins);
    }

    fn boot_clock_run(&mut self) {
        self.trace.record(Event::BootClockRun);
    }

    fn core_clock_hz(&self) -> u32 {
        self.core_clock_hz
    }

    fn start_tick_timer(&mut self, ticks: u32) {
        self.trace.record(Event::StartTickTimer(ticks));
    }

    fn set_irq_priority(&mut self, irq: IrqNumber, priority: u8) {
        self.trace.record(Event::SetPriority(irq, priority));
    }

    fn unmask_irq(&mut self, irq: IrqNumber) {
        self.trace.record(Event::UnmaskIrq(irq));
    }

    fn enable_clock(&mut self, gate: ClockGate) {
        self.trace.record(Event::EnableClock(gate));
    }

    fn peripheral_reset(&mut self, reset: PeripheralReset) {
        self.trace.record(Event::PeripheralReset(reset));
    }

    fn output_pin(&mut self, pin: PinId, initial: PinState) -> MockOutput {
        self.trace.record(Event::ConfigureOutput(pin, initial));
        self.trace.0.borrow_mut().outputs.insert(pin, initial);
        MockOutput {
            pin,
            trace: self.trace(),
        }
    }

    fn input_pin(&mut self, pin: PinId) -> MockInput {
        self.trace.record(Event::ConfigureInput(pin));
        MockInput {
            pin,
            trace: self.trace(),
        }
    }

    fn usart(&mut self, device: UsartId, clock_hz: u32, config: &UsartConfig) -> MockSerial {
        self.trace.record(Event::UsartInit(device, clock_hz, *config));
        MockSerial { trace: self.trace() }
    }

    fn usb_phy(&mut self, _phy: &UsbPhyConfig) -> MockPhy {
        MockPhy { trace: self.trace() }
    }
}
