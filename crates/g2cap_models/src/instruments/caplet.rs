//! Single caplet on a simple forward rate.

use super::InstrumentError;

/// A caplet: a call on the simple forward rate over `[reset, payment]`.
///
/// The identity `(reset, payment, strike, notional)` is fixed at
/// construction. The discount factors `P(0, reset)` and `P(0, payment)` are
/// attached exactly once afterwards; pricing before attachment fails with
/// [`InstrumentError::DiscountsNotSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct Caplet {
    reset: f64,
    payment: f64,
    strike: f64,
    notional: f64,
    discounts: Option<(f64, f64)>,
}

impl Caplet {
    /// Create a caplet. Requires `0 <= reset < payment`.
    ///
    /// # Errors
    ///
    /// `InstrumentError::InvalidAccrual` when the accrual period is
    /// degenerate or starts in the past.
    pub fn new(reset: f64, payment: f64, strike: f64, notional: f64) -> Result<Self, InstrumentError> {
        if !(0.0 <= reset && reset < payment) {
            return Err(InstrumentError::InvalidAccrual { reset, payment });
        }
        Ok(Self {
            reset,
            payment,
            strike,
            notional,
            discounts: None,
        })
    }

    /// Reset (rate-fixing) date in year fractions.
    #[inline]
    pub fn reset(&self) -> f64 {
        self.reset
    }

    /// Payment date in year fractions.
    #[inline]
    pub fn payment(&self) -> f64 {
        self.payment
    }

    /// Strike rate.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Notional amount.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Accrual year fraction `payment - reset`.
    #[inline]
    pub fn accrual(&self) -> f64 {
        self.payment - self.reset
    }

    /// Attach the discount factors `(P(0, reset), P(0, payment))`.
    ///
    /// # Errors
    ///
    /// `InstrumentError::DiscountsAlreadySet` on a second attach.
    pub fn attach_discounts(
        &mut self,
        p_reset: f64,
        p_payment: f64,
    ) -> Result<(), InstrumentError> {
        if self.discounts.is_some() {
            return Err(InstrumentError::DiscountsAlreadySet);
        }
        self.discounts = Some((p_reset, p_payment));
        Ok(())
    }

    /// The attached discount factors `(P(0, reset), P(0, payment))`.
    ///
    /// # Errors
    ///
    /// `InstrumentError::DiscountsNotSet` before attachment.
    pub fn discounts(&self) -> Result<(f64, f64), InstrumentError> {
        self.discounts.ok_or(InstrumentError::DiscountsNotSet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_construction() {
        let c = Caplet::new(0.25, 0.5, 0.05, 1_000_000.0).unwrap();
        assert_eq!(c.reset(), 0.25);
        assert_eq!(c.payment(), 0.5);
        assert_eq!(c.accrual(), 0.25);
    }

    #[test]
    fn test_rejects_bad_accrual() {
        assert!(Caplet::new(0.5, 0.5, 0.05, 1.0).is_err());
        assert!(Caplet::new(0.75, 0.5, 0.05, 1.0).is_err());
        assert!(Caplet::new(-0.25, 0.5, 0.05, 1.0).is_err());
    }

    #[test]
    fn test_discounts_attach_once() {
        let mut c = Caplet::new(0.25, 0.5, 0.05, 1.0).unwrap();
        assert_eq!(c.discounts(), Err(InstrumentError::DiscountsNotSet));

        c.attach_discounts(0.99, 0.98).unwrap();
        assert_eq!(c.discounts().unwrap(), (0.99, 0.98));

        assert_eq!(
            c.attach_discounts(0.97, 0.96),
            Err(InstrumentError::DiscountsAlreadySet)
        );
        assert_eq!(c.discounts().unwrap(), (0.99, 0.98));
    }
}
