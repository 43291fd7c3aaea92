//! Discrete USB PHY power-up and TX calibration.
//!
//! Order matters. Trim override and UTMI enables go in before the analog blocks are
//! powered, and TX calibration is applied last with every non-calibration bit of the TX
//! register left as the hardware reset it. Skipping or reordering these steps produces a
//! link that enumerates but drops packets or negotiates the wrong speed.

use crate::config::UsbPhyConfig;
use crate::soc::{PhyRegister, UsbPhyRegisters};

/// `CTRL.ENUTMILEVEL2`: low-speed device support.
pub const CTRL_ENUTMILEVEL2: u32 = 1 << 14;
/// `CTRL.ENUTMILEVEL3`: low-speed device behind a full-speed hub.
pub const CTRL_ENUTMILEVEL3: u32 = 1 << 15;

pub const TX_D_CAL_SHIFT: u32 = 0;
pub const TX_D_CAL_MASK: u32 = 0xF << TX_D_CAL_SHIFT;
pub const TX_TXCAL45DM_SHIFT: u32 = 8;
pub const TX_TXCAL45DM_MASK: u32 = 0xF << TX_TXCAL45DM_SHIFT;
pub const TX_TXCAL45DP_SHIFT: u32 = 16;
pub const TX_TXCAL45DP_MASK: u32 = 0xF << TX_TXCAL45DP_SHIFT;

/// Every calibration field of the TX register.
pub const TX_CAL_MASK: u32 = TX_D_CAL_MASK | TX_TXCAL45DM_MASK | TX_TXCAL45DP_MASK;

/// Writing zero to PWD powers every analog block. Any set bit keeps one powered down.
pub const PWD_ALL_POWERED: u32 = 0;

/// Register values applied once during bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhyCalibrationProfile {
    /// Written to TRIM_OVERRIDE_EN on targets without analog trim blocks.
    pub trim_override: u32,
    /// Full-speed / high-speed current reference trim.
    pub d_cal: u8,
    /// DP 45 ohm termination trim.
    pub txcal45dp: u8,
    /// DM 45 ohm termination trim.
    pub txcal45dm: u8,
}

impl PhyCalibrationProfile {
    /// Values validated on the MCX N9 family, which shares this PHY.
    pub const MCX_N9: Self = Self {
        trim_override: 0x001F,
        d_cal: 0x04,
        txcal45dp: 0x07,
        txcal45dm: 0x07,
    };

    /// Every trim fits its 4-bit register field.
    pub const fn fits_fields(&self) -> bool {
        self.d_cal <= 0xF && self.txcal45dp <= 0xF && self.txcal45dm <= 0xF
    }

    /// The calibration bits to OR into a cleared TX register.
    pub const fn tx_bits(&self) -> u32 {
        (((self.d_cal as u32) << TX_D_CAL_SHIFT) & TX_D_CAL_MASK)
            | (((self.txcal45dm as u32) << TX_TXCAL45DM_SHIFT) & TX_TXCAL45DM_MASK)
            | (((self.txcal45dp as u32) << TX_TXCAL45DP_SHIFT) & TX_TXCAL45DP_MASK)
    }

    /// `current` TX register value with only the calibration fields replaced.
    pub const fn apply_to_tx(&self, current: u32) -> u32 {
        (current & !TX_CAL_MASK) | self.tx_bits()
    }
}

/// Power up and calibrate the PHY. The PHY clock, if separate, must already run.
pub fn calibrate<P: UsbPhyRegisters>(phy: &mut P, config: &UsbPhyConfig) {
    let profile = &config.calibration;

    if !config.anatop {
        // Override the IFR trim values
        phy.write(PhyRegister::TrimOverrideEn, profile.trim_override);
    }

    phy.write(PhyRegister::CtrlSet, CTRL_ENUTMILEVEL2 | CTRL_ENUTMILEVEL3);

    phy.write(PhyRegister::Pwd, PWD_ALL_POWERED);

    let tx = phy.read(PhyRegister::Tx);
    let calibrated = profile.apply_to_tx(tx);
    phy.write(PhyRegister::Tx, calibrated);

    debug!("USB PHY TX calibrated: {=u32:#x} -> {=u32:#x}", tx, calibrated);
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::vec::Vec;

    /// Register file that records every access.
    struct RecordingPhy {
        tx: u32,
        writes: Vec<(PhyRegister, u32)>,
    }

    impl UsbPhyRegisters for RecordingPhy {
        fn read(&mut self, reg: PhyRegister) -> u32 {
            match reg {
                PhyRegister::Tx => self.tx,
                _ => 0,
            }
        }

        fn write(&mut self, reg: PhyRegister, value: u32) {
            if reg == PhyRegister::Tx {
                self.tx = value;
            }
            self.writes.push((reg, value));
        }
    }

    fn phy_config(anatop: bool) -> UsbPhyConfig {
        UsbPhyConfig {
            base: 0,
            clock: None,
            anatop,
            calibration: PhyCalibrationProfile::MCX_N9,
        }
    }

    #[test]
    fn mcx_profile_tx_bits() {
        assert_eq!(PhyCalibrationProfile::MCX_N9.tx_bits(), 0x0007_0704);
    }

    #[test]
    fn tx_update_preserves_unrelated_bits() {
        let current = 0xA5A5_A5A5;
        let updated = PhyCalibrationProfile::MCX_N9.apply_to_tx(current);
        assert_eq!(updated & !TX_CAL_MASK, current & !TX_CAL_MASK);
        assert_eq!(updated & TX_CAL_MASK, 0x0007_0704);
    }

    #[test]
    fn full_sequence_without_anatop() {
        let mut phy = RecordingPhy {
            tx: 0x1006_0600,
            writes: Vec::new(),
        };
        calibrate(&mut phy, &phy_config(false));

        assert_eq!(
            phy.writes,
            [
                (PhyRegister::TrimOverrideEn, 0x001F),
                (PhyRegister::CtrlSet, CTRL_ENUTMILEVEL2 | CTRL_ENUTMILEVEL3),
                (PhyRegister::Pwd, 0),
                (PhyRegister::Tx, 0x1007_0704),
            ]
        );
    }

    #[test]
    fn anatop_targets_keep_their_trim() {
        let mut phy = RecordingPhy {
            tx: 0,
            writes: Vec::new(),
        };
        calibrate(&mut phy, &phy_config(true));

        assert!(phy
            .writes
            .iter()
            .all(|(reg, _)| *reg != PhyRegister::TrimOverrideEn));
        assert_eq!(phy.writes.len(), 3);
    }
}
