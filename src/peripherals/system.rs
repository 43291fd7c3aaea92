//! Board bring-up sequence for the FRDM-RW612.
//!
//! This module owns the one-shot hardware initialization: pin-mux and clock tree, the
//! mode-specific time base, LED and button GPIO, the optional debug UART, and finally the
//! USB controller and PHY. The resulting [`Board`] is the only handle to the hardware, so
//! nothing can be used before bring-up has run.

use crate::config::BoardConfig;
use crate::peripherals::gpio::{Button, Led};
use crate::peripherals::mode::{BareMetal, BringupMode};
use crate::peripherals::uart::UartTransport;
use crate::peripherals::usb_system;
use crate::soc::{Soc, UsartConfig};

/// An initialized board.
pub struct Board<S: Soc, M: BringupMode> {
    soc: S,
    config: &'static BoardConfig,
    mode: M,
    led: Led<S::Output>,
    button: Option<Button<S::Input>>,
    uart: UartTransport<S::Serial>,
}

impl<S: Soc, M: BringupMode> Board<S, M> {
    /// Bring the board up from reset.
    ///
    /// Runs, in order:
    /// 1. static pin-mux, then static clock tree
    /// 2. the time base for `mode` (SysTick at `tick_hz`, or the USB interrupt priority
    ///    under a scheduler)
    /// 3. LED clock, pin as output, LED off
    /// 4. button clock and pin as input, if the board has a button
    /// 5. UART clock and USART init with TX and RX enabled, if the board has a UART
    /// 6. USB controller clock, USB reset, then the PHY if there is a discrete one
    ///
    /// Taking `soc` by value makes this a one-shot: the hardware handle is only available
    /// once and lives inside the returned board.
    ///
    /// # Panics
    ///
    /// In debug builds, if `config` fails [`BoardConfig::validate`]. In release builds an
    /// invalid profile is not checked: a zero `tick_hz` divides by zero in bare-metal
    /// mode, and other bad values make the underlying primitives fault.
    pub fn initialize(mut soc: S, config: &'static BoardConfig, mode: M) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid board profile");
        info!("Bringing up {} ({} mode)", config.name, M::NAME);

        // Step 1: pin-mux and clock tree
        soc.init_pins();
        soc.boot_clock_run();

        // Step 2: time base
        mode.configure_time_base(&mut soc, config);

        // Step 3: LED, off
        soc.enable_clock(config.led.clock);
        let pin = soc.output_pin(config.led.pin, config.led.active.pin_state(false));
        let led = Led::new(pin, config.led.active);

        // Step 4: button
        let button = config.button.as_ref().map(|button| {
            soc.enable_clock(button.clock);
            Button::new(soc.input_pin(button.pin), button.active)
        });

        // Step 5: debug UART
        let uart = match &config.uart {
            Some(uart) => {
                soc.enable_clock(uart.clock);
                let usart_config = UsartConfig {
                    baud_rate: uart.baud_rate,
                    enable_tx: true,
                    enable_rx: true,
                    ..UsartConfig::default()
                };
                UartTransport::new(soc.usart(uart.device, uart.function_clock_hz, &usart_config))
            }
            None => UartTransport::absent(),
        };

        // Step 6: USB controller and PHY
        usb_system::bring_up(&mut soc, &config.usb);

        info!("Board initialized");

        Self {
            soc,
            config,
            mode,
            led,
            button,
            uart,
        }
    }

    /// Drive the LED to the logical state `on`.
    pub fn write_led(&mut self, on: bool) {
        self.led.set(on);
    }

    /// Whether the button is pressed. Always `false` on a board without one.
    pub fn read_button(&mut self) -> bool {
        match self.button.as_mut() {
            Some(button) => button.is_pressed(),
            None => false,
        }
    }

    pub fn led(&mut self) -> &mut Led<S::Output> {
        &mut self.led
    }

    pub fn uart(&mut self) -> &mut UartTransport<S::Serial> {
        &mut self.uart
    }

    /// Unmask the USB interrupt. Call right before starting the USB stack.
    pub fn enable_usb_interrupt(&mut self) {
        self.soc.unmask_irq(self.config.usb.irq);
    }

    pub fn config(&self) -> &'static BoardConfig {
        self.config
    }

    pub fn mode(&self) -> &M {
        &self.mode
    }
}

impl<S: Soc> Board<S, BareMetal> {
    /// Milliseconds since the tick timer started. Wraps after about 49.7 days.
    #[inline]
    pub fn millis(&self) -> u32 {
        self.mode.ticks().millis()
    }
}
