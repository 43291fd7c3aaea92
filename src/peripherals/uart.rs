//! Debug UART transport.
//!
//! Transmit-only by design: [`UartTransport::read`] never returns data on this board. When
//! the board has no UART the transport is still constructed, and writes are dropped.

use core::fmt;

pub struct UartTransport<W> {
    port: Option<W>,
}

impl<W: embedded_io::Write> UartTransport<W> {
    pub fn new(port: W) -> Self {
        Self { port: Some(port) }
    }

    /// Transport for a board without a UART.
    pub fn absent() -> Self {
        Self { port: None }
    }

    #[inline]
    pub fn is_present(&self) -> bool {
        self.port.is_some()
    }

    /// Blocking write of every byte in `bytes`.
    ///
    /// Returns `bytes.len()`, or 0 without looking at `bytes` if there is no UART. A port
    /// error also reports 0, since how much of `bytes` went out is unknown.
    pub fn write(&mut self, bytes: &[u8]) -> usize {
        let Some(port) = self.port.as_mut() else {
            return 0;
        };
        match port.write_all(bytes).and_then(|()| port.flush()) {
            Ok(()) => bytes.len(),
            Err(_) => 0,
        }
    }

    /// Receive is not wired up on this board. Always 0; `_buf` is left untouched.
    #[inline]
    pub fn read(&mut self, _buf: &mut [u8]) -> usize {
        0
    }

    pub fn free(self) -> Option<W> {
        self.port
    }
}

// Implement `core::fmt::Write` so we can use `write!` / `writeln!` on the transport.
impl<W: embedded_io::Write> fmt::Write for UartTransport<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write(s.as_bytes());
        Ok(())
    }
}
