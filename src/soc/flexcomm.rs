//! Flexcomm USART register layout and baud-rate divider selection.

use super::{Parity, StopBits, UsartConfig};

/// Flexcomm peripheral select, shared with every function the block can take.
pub const PSELID: usize = 0xFF8;
pub const PSELID_PERSEL_USART: u32 = 1;

pub const CFG: usize = 0x000;
pub const CFG_ENABLE: u32 = 1 << 0;
pub const CFG_DATALEN_8: u32 = 1 << 2;
pub const CFG_PARITYSEL_EVEN: u32 = 2 << 4;
pub const CFG_PARITYSEL_ODD: u32 = 3 << 4;
pub const CFG_STOPLEN_2: u32 = 1 << 6;

pub const BRG: usize = 0x020;
pub const OSR: usize = 0x028;

pub const FIFOCFG: usize = 0xE00;
pub const FIFOCFG_ENABLETX: u32 = 1 << 0;
pub const FIFOCFG_ENABLERX: u32 = 1 << 1;
pub const FIFOCFG_EMPTYTX: u32 = 1 << 16;
pub const FIFOCFG_EMPTYRX: u32 = 1 << 17;

pub const FIFOSTAT: usize = 0xE04;
pub const FIFOSTAT_TXEMPTY: u32 = 1 << 3;
pub const FIFOSTAT_TXNOTFULL: u32 = 1 << 4;

pub const FIFOWR: usize = 0xE20;

/// Values for the OSR and BRG registers (both stored minus one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaudDivider {
    pub osr: u32,
    pub brg: u32,
}

impl BaudDivider {
    /// Baud rate this divider actually produces from `clock_hz`.
    pub const fn actual_baud(&self, clock_hz: u32) -> u32 {
        clock_hz / ((self.osr + 1) * (self.brg + 1))
    }
}

/// Pick the oversampling ratio (8x to 16x) and baud generator divider that land closest
/// to `baud`. `None` if no combination can reach it.
pub fn baud_divider(clock_hz: u32, baud: u32) -> Option<BaudDivider> {
    let mut best: Option<(BaudDivider, u32)> = None;

    for osr in 8..=16u32 {
        let step = match osr.checked_mul(baud) {
            Some(0) => return None,
            Some(step) => step,
            // Larger ratios only overflow further
            None => break,
        };
        // Round to nearest rather than truncate
        let brg = clock_hz.saturating_add(step / 2) / step;
        if brg == 0 || brg > 0x1_0000 {
            continue;
        }
        let Some(divisor) = osr.checked_mul(brg) else {
            continue;
        };

        let error = (clock_hz / divisor).abs_diff(baud);
        if best.map_or(true, |(_, best_error)| error < best_error) {
            best = Some((
                BaudDivider {
                    osr: osr - 1,
                    brg: brg - 1,
                },
                error,
            ));
        }
    }

    best.map(|(divider, _)| divider)
}

/// CFG register value for `config`, USART enabled, 8 data bits.
pub const fn cfg_bits(config: &UsartConfig) -> u32 {
    let parity = match config.parity {
        Parity::None => 0,
        Parity::Even => CFG_PARITYSEL_EVEN,
        Parity::Odd => CFG_PARITYSEL_ODD,
    };
    let stop = match config.stop_bits {
        StopBits::One => 0,
        StopBits::Two => CFG_STOPLEN_2,
    };
    CFG_ENABLE | CFG_DATALEN_8 | parity | stop
}

/// FIFOCFG value enabling the requested directions, with both FIFOs flushed.
pub const fn fifocfg_bits(config: &UsartConfig) -> u32 {
    let mut bits = FIFOCFG_EMPTYTX | FIFOCFG_EMPTYRX;
    if config.enable_tx {
        bits |= FIFOCFG_ENABLETX;
    }
    if config.enable_rx {
        bits |= FIFOCFG_ENABLERX;
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_console_rate_within_one_percent() {
        let divider = baud_divider(16_000_000, 115_200).unwrap();
        let actual = divider.actual_baud(16_000_000);
        assert!(actual.abs_diff(115_200) * 100 < 115_200, "got {actual}");
        assert!((7..=15).contains(&divider.osr));
    }

    #[test]
    fn exact_rates_have_no_error() {
        let divider = baud_divider(48_000_000, 1_000_000).unwrap();
        assert_eq!(divider.actual_baud(48_000_000), 1_000_000);
    }

    #[test]
    fn unreachable_rates_are_rejected() {
        assert_eq!(baud_divider(16_000_000, 0), None);
        assert_eq!(baud_divider(1_000, 115_200), None);
    }

    #[test]
    fn extreme_inputs_never_overflow() {
        assert_eq!(baud_divider(u32::MAX, u32::MAX), None);
        assert_eq!(baud_divider(16_000_000, u32::MAX / 8), None);

        let divider = baud_divider(u32::MAX, u32::MAX / 16).unwrap();
        assert_eq!(divider.actual_baud(u32::MAX), u32::MAX / 16);
    }

    #[test]
    fn default_config_is_8n1_with_fifos_flushed() {
        let config = UsartConfig::default();
        assert_eq!(cfg_bits(&config), CFG_ENABLE | CFG_DATALEN_8);
        assert_eq!(fifocfg_bits(&config), FIFOCFG_EMPTYTX | FIFOCFG_EMPTYRX);

        let config = UsartConfig {
            parity: Parity::Odd,
            stop_bits: StopBits::Two,
            enable_tx: true,
            enable_rx: true,
            ..config
        };
        assert_eq!(
            cfg_bits(&config),
            CFG_ENABLE | CFG_DATALEN_8 | CFG_PARITYSEL_ODD | CFG_STOPLEN_2
        );
        assert_eq!(fifocfg_bits(&config) & 0b11, 0b11);
    }
}
