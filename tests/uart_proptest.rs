//! Property-based tests for the debug UART transport.

use core::convert::Infallible;

use frdm_rw612::UartTransport;

#[derive(Default)]
struct Sink(Vec<u8>);

impl embedded_io::ErrorType for Sink {
    type Error = Infallible;
}

impl embedded_io::Write for Sink {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

proptest::proptest! {
    /// Read never produces data and never touches the buffer.
    #[test]
    fn read_is_always_empty(buf in proptest::collection::vec(proptest::num::u8::ANY, 0..256)) {
        let mut uart = UartTransport::new(Sink::default());
        let mut scratch = buf.clone();
        assert_eq!(uart.read(&mut scratch), 0);
        assert_eq!(scratch, buf);

        let mut absent = UartTransport::<Sink>::absent();
        assert_eq!(absent.read(&mut scratch), 0);
        assert_eq!(scratch, buf);
    }

    /// A present UART sends every byte in order and reports the full length.
    #[test]
    fn write_sends_everything(bytes in proptest::collection::vec(proptest::num::u8::ANY, 0..256)) {
        let mut uart = UartTransport::new(Sink::default());
        assert_eq!(uart.write(&bytes), bytes.len());
        assert_eq!(uart.free().map(|sink| sink.0), Some(bytes));
    }

    /// With no UART, writes are dropped and report zero.
    #[test]
    fn absent_uart_drops_writes(bytes in proptest::collection::vec(proptest::num::u8::ANY, 0..256)) {
        let mut uart = UartTransport::<Sink>::absent();
        assert_eq!(uart.write(&bytes), 0);
        assert!(!uart.is_present());
    }
}
