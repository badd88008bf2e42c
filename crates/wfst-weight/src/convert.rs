// Conversions between weight types.
//
// Tropical and log weights share a representation (a negative log), so
// converting between them keeps the value. A signed log weight converts to a
// log weight only when it is not negative.

use crate::float::{FloatValue, LogWeightTpl, SignedLogWeightTpl, TropicalWeightTpl};
use crate::semiring::Weight;

/// Conversion from `Self` into weight type `W`.
///
/// Every weight converts to itself. Non-members convert to non-members.
pub trait ConvertWeight<W: Weight>: Weight {
    fn convert(&self) -> W;
}

impl<W: Weight> ConvertWeight<W> for W {
    fn convert(&self) -> W {
        self.clone()
    }
}

impl<T: FloatValue> ConvertWeight<LogWeightTpl<T>> for TropicalWeightTpl<T> {
    fn convert(&self) -> LogWeightTpl<T> {
        LogWeightTpl::new(self.value())
    }
}

impl<T: FloatValue> ConvertWeight<TropicalWeightTpl<T>> for LogWeightTpl<T> {
    fn convert(&self) -> TropicalWeightTpl<T> {
        TropicalWeightTpl::new(self.value())
    }
}

impl<T: FloatValue> ConvertWeight<SignedLogWeightTpl<T>> for LogWeightTpl<T> {
    fn convert(&self) -> SignedLogWeightTpl<T> {
        SignedLogWeightTpl::from(*self)
    }
}

impl<T: FloatValue> ConvertWeight<LogWeightTpl<T>> for SignedLogWeightTpl<T> {
    fn convert(&self) -> LogWeightTpl<T> {
        if self.is_negative() {
            LogWeightTpl::no_weight()
        } else {
            LogWeightTpl::new(self.value())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LogWeight, LogWeight64, SignedLogWeight64, TropicalWeight};

    fn round_trip<W1, W2>(w: W1) -> W1
    where
        W1: ConvertWeight<W2>,
        W2: ConvertWeight<W1>,
    {
        let there: W2 = w.convert();
        there.convert()
    }

    #[test]
    fn tropical_log_round_trip() {
        let w = TropicalWeight::new(2.0);
        let log: LogWeight = w.convert();
        assert_eq!(log, LogWeight::new(2.0));
        assert_eq!(round_trip::<_, LogWeight>(w), w);
        assert_eq!(
            round_trip::<_, LogWeight>(TropicalWeight::zero()),
            TropicalWeight::zero()
        );
    }

    #[test]
    fn log_signed_log_round_trip() {
        let w = LogWeight64::new(0.75);
        assert_eq!(round_trip::<_, SignedLogWeight64>(w), w);
    }

    #[test]
    fn negative_signed_log_has_no_log_weight() {
        let w = SignedLogWeight64::new(true, 1.0);
        let log: LogWeight64 = w.convert();
        assert!(!log.member());
        let positive: LogWeight64 = w.negate().convert();
        assert_eq!(positive, LogWeight64::new(1.0));
    }

    #[test]
    fn identity_conversion() {
        let w = TropicalWeight::new(4.5);
        let same: TropicalWeight = w.convert();
        assert_eq!(same, w);
    }

    #[test]
    fn non_member_stays_non_member() {
        let log: LogWeight = TropicalWeight::no_weight().convert();
        assert!(!log.member());
    }
}
