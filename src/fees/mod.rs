//! Platform fee calculation engine
//!
//! Every value transfer is split deterministically between the post owner
//! and the platform. The split is pure integer arithmetic: no value is
//! ever created or destroyed, and cumulative sums stay exact.

pub mod wei;

use serde::{Deserialize, Serialize};

use crate::types::Wei;

/// Platform fee withheld from every response transfer: 0.5%.
pub const PLATFORM_FEE_BASIS_POINTS: u128 = 50;

/// Basis point denominator (100% == 10_000 bps).
const BASIS_POINT_SCALE: u128 = 10_000;

/// Deterministic split of a gross transfer into platform fee and net payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    /// Full amount paid by the responder
    pub gross: Wei,
    /// Platform share, `floor(gross * fee_rate)`
    pub fee: Wei,
    /// Amount credited to the post owner, `gross - fee`
    pub net: Wei,
}

impl FeeSplit {
    /// Split a gross amount into fee and net payout.
    ///
    /// `fee = floor(gross * PLATFORM_FEE_BASIS_POINTS / 10_000)` and
    /// `net = gross - fee`, so `fee + net == gross` for every input. The
    /// quotient/remainder decomposition keeps the intermediate products in
    /// range for any `u128` gross.
    pub fn compute(gross: Wei) -> FeeSplit {
        let whole = gross / BASIS_POINT_SCALE;
        let remainder = gross % BASIS_POINT_SCALE;
        let fee = whole * PLATFORM_FEE_BASIS_POINTS
            + remainder * PLATFORM_FEE_BASIS_POINTS / BASIS_POINT_SCALE;

        FeeSplit {
            gross,
            fee,
            net: gross - fee,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_split() {
        // 0.5% of 1000 wei is 5 wei
        let split = FeeSplit::compute(1000);
        assert_eq!(split.fee, 5);
        assert_eq!(split.net, 995);
    }

    #[test]
    fn zero_gross_is_a_valid_tip_free_transfer() {
        let split = FeeSplit::compute(0);
        assert_eq!(split, FeeSplit { gross: 0, fee: 0, net: 0 });
    }

    #[test]
    fn fee_rounds_down() {
        // Anything under 200 wei carries a sub-wei fee, which floors to zero
        assert_eq!(FeeSplit::compute(199).fee, 0);
        assert_eq!(FeeSplit::compute(199).net, 199);
        assert_eq!(FeeSplit::compute(200).fee, 1);
        assert_eq!(FeeSplit::compute(200).net, 199);
    }

    #[test]
    fn sum_is_preserved_across_sampled_inputs() {
        let samples: [Wei; 9] = [
            0,
            1,
            199,
            200,
            999,
            1_000_000_000_000_000_000,
            u128::from(u64::MAX),
            u128::MAX / 2,
            u128::MAX,
        ];
        for gross in samples {
            let split = FeeSplit::compute(gross);
            assert_eq!(split.fee + split.net, gross, "gross = {gross}");
            assert_eq!(split.fee, gross / 10_000 * 50 + gross % 10_000 * 50 / 10_000);
        }
    }

    #[test]
    fn maximum_gross_does_not_overflow() {
        let split = FeeSplit::compute(u128::MAX);
        assert_eq!(split.fee + split.net, u128::MAX);
        assert!(split.fee < split.net);
    }
}
