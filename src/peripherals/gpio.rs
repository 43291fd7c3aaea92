//! LED and button wrappers.
//!
//! Both remember the electrical level that means "on"/"pressed" so callers only ever deal
//! in logical booleans.

use embedded_hal::digital::{InputPin, OutputPin, PinState};

/// Whether a line is asserted by driving it high or low on the board wiring.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    High,
    Low,
}

impl ActiveLevel {
    /// Electrical level for a logical state.
    pub const fn pin_state(self, asserted: bool) -> PinState {
        match (self, asserted) {
            (ActiveLevel::High, true) | (ActiveLevel::Low, false) => PinState::High,
            (ActiveLevel::High, false) | (ActiveLevel::Low, true) => PinState::Low,
        }
    }

    /// Logical state for an electrical level.
    pub const fn is_asserted(self, is_high: bool) -> bool {
        match self {
            ActiveLevel::High => is_high,
            ActiveLevel::Low => !is_high,
        }
    }
}

/// LED abstraction that remembers its active level and last known state.
pub struct Led<PIN: OutputPin> {
    pin: PIN,
    active: ActiveLevel,
    is_on: bool,
}

impl<PIN: OutputPin> Led<PIN> {
    /// Create an LED wrapper, initializing it to OFF.
    pub fn new(pin: PIN, active: ActiveLevel) -> Self {
        let mut led = Self {
            pin,
            active,
            is_on: false,
        };
        led.set(false);
        led
    }

    /// Drive the LED logically ON (true) or OFF (false).
    pub fn set(&mut self, on: bool) {
        self.pin.set_state(self.active.pin_state(on)).ok();
        self.is_on = on;
    }

    #[inline]
    pub fn on(&mut self) {
        self.set(true);
    }

    #[inline]
    pub fn off(&mut self) {
        self.set(false);
    }

    pub fn toggle(&mut self) {
        self.set(!self.is_on);
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}

/// Push button read through its active level.
pub struct Button<PIN: InputPin> {
    pin: PIN,
    active: ActiveLevel,
}

impl<PIN: InputPin> Button<PIN> {
    pub fn new(pin: PIN, active: ActiveLevel) -> Self {
        Self { pin, active }
    }

    /// True while the pin sits at the active level. A pin read error reads as released.
    pub fn is_pressed(&mut self) -> bool {
        self.pin
            .is_high()
            .map(|high| self.active.is_asserted(high))
            .unwrap_or(false)
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};

    #[test]
    fn active_low_led_starts_off_high() {
        let pin = PinMock::new(&[PinTransaction::set(State::High)]);
        let led = Led::new(pin, ActiveLevel::Low);
        assert!(!led.is_on());
        led.free().done();
    }

    #[test]
    fn active_low_led_drives_low_for_on() {
        let pin = PinMock::new(&[
            PinTransaction::set(State::High),
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
        ]);
        let mut led = Led::new(pin, ActiveLevel::Low);
        led.set(false);
        led.set(true);
        assert!(led.is_on());
        led.free().done();
    }

    #[test]
    fn active_high_led_toggles() {
        let pin = PinMock::new(&[
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
        ]);
        let mut led = Led::new(pin, ActiveLevel::High);
        led.toggle();
        assert!(led.is_on());
        led.toggle();
        assert!(!led.is_on());
        led.free().done();
    }

    #[test]
    fn active_low_button_wired_low_is_pressed() {
        let pin = PinMock::new(&[
            PinTransaction::get(State::Low),
            PinTransaction::get(State::High),
        ]);
        let mut button = Button::new(pin, ActiveLevel::Low);
        assert!(button.is_pressed());
        assert!(!button.is_pressed());
        button.free().done();
    }

    #[test]
    fn active_high_button_follows_level() {
        let pin = PinMock::new(&[PinTransaction::get(State::High)]);
        let mut button = Button::new(pin, ActiveLevel::High);
        assert!(button.is_pressed());
        button.free().done();
    }

    #[test]
    fn polarity_mapping_round_trips() {
        for active in [ActiveLevel::High, ActiveLevel::Low] {
            for on in [true, false] {
                let high = active.pin_state(on) == PinState::High;
                assert_eq!(active.is_asserted(high), on);
            }
        }
    }
}
