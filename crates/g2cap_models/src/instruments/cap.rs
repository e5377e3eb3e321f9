//! Interest-rate cap: a strip of caplets sharing one strike and quote.

use g2cap_core::market_data::{MarketDataError, ZeroCurve};

use super::{Caplet, InstrumentError};

/// A cap quoted by maturity and flat market volatility.
///
/// The caplet strip is derived from consecutive dates of the payment
/// schedule; every caplet shares the cap's strike and notional. The market
/// price is a set-once field, filled from the Black price at the quoted
/// volatility before calibration starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Cap {
    maturity_years: usize,
    market_vol: f64,
    strike: f64,
    notional: f64,
    caplets: Vec<Caplet>,
    market_price: Option<f64>,
}

impl Cap {
    /// Build a cap from its payment schedule.
    ///
    /// # Errors
    ///
    /// - `InstrumentError::EmptySchedule` with fewer than two dates
    /// - `InstrumentError::NonIncreasingSchedule` if dates are not strictly
    ///   increasing
    /// - `InstrumentError::InvalidAccrual` if the first date is negative
    pub fn new(
        maturity_years: usize,
        market_vol: f64,
        strike: f64,
        notional: f64,
        schedule: &[f64],
    ) -> Result<Self, InstrumentError> {
        if schedule.len() < 2 {
            return Err(InstrumentError::EmptySchedule {
                got: schedule.len(),
            });
        }
        for (index, pair) in schedule.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(InstrumentError::NonIncreasingSchedule { index: index + 1 });
            }
        }

        let caplets = schedule
            .windows(2)
            .map(|pair| Caplet::new(pair[0], pair[1], strike, notional))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            maturity_years,
            market_vol,
            strike,
            notional,
            caplets,
            market_price: None,
        })
    }

    /// Cap maturity in whole years.
    #[inline]
    pub fn maturity_years(&self) -> usize {
        self.maturity_years
    }

    /// Quoted flat volatility.
    #[inline]
    pub fn market_vol(&self) -> f64 {
        self.market_vol
    }

    /// Strike rate shared by all caplets.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Notional amount.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// The caplet strip.
    #[inline]
    pub fn caplets(&self) -> &[Caplet] {
        &self.caplets
    }

    /// Attach discount factors from `curve` to every caplet.
    ///
    /// # Errors
    ///
    /// Fails if any curve query fails or if discounts were already attached.
    pub fn attach_curve(&mut self, curve: &ZeroCurve) -> Result<(), InstrumentError> {
        for caplet in &mut self.caplets {
            let p_reset = curve.discount_factor(caplet.reset())?;
            let p_payment = curve.discount_factor(caplet.payment())?;
            caplet.attach_discounts(p_reset, p_payment)?;
        }
        Ok(())
    }

    /// Record the market price. Set-once.
    ///
    /// # Errors
    ///
    /// `InstrumentError::PriceAlreadySet` on a second call.
    pub fn set_market_price(&mut self, price: f64) -> Result<(), InstrumentError> {
        if self.market_price.is_some() {
            return Err(InstrumentError::PriceAlreadySet);
        }
        self.market_price = Some(price);
        Ok(())
    }

    /// The recorded market price, if set.
    #[inline]
    pub fn market_price(&self) -> Option<f64> {
        self.market_price
    }
}

/// The standard payment grid for a cap of `maturity_years` years:
/// quarterly dates through the first year, semiannual afterwards.
///
/// A 1y cap pays at `0.25, 0.5, 0.75, 1.0`; a 3y cap continues with
/// `1.5, 2.0, 2.5, 3.0`.
pub fn standard_cap_schedule(maturity_years: usize) -> Vec<f64> {
    let mut dates = vec![0.25, 0.5, 0.75, 1.0];
    if maturity_years > 1 {
        dates.extend((1..=2 * maturity_years - 2).map(|j| 1.0 + 0.5 * j as f64));
    }
    dates
}

/// The at-the-money swap rate for the given payment schedule:
/// `(P(0, first) - P(0, last)) / sum_j tau_j * P(0, S_j)`.
///
/// # Errors
///
/// - `InstrumentError::EmptySchedule` with fewer than two dates
/// - curve query failures propagate as `InstrumentError::MarketData`
pub fn atm_swap_rate(curve: &ZeroCurve, schedule: &[f64]) -> Result<f64, InstrumentError> {
    if schedule.len() < 2 {
        return Err(InstrumentError::EmptySchedule {
            got: schedule.len(),
        });
    }

    let first = curve.discount_factor(schedule[0])?;
    let last = curve.discount_factor(schedule[schedule.len() - 1])?;

    let annuity = schedule
        .windows(2)
        .map(|pair| Ok((pair[1] - pair[0]) * curve.discount_factor(pair[1])?))
        .sum::<Result<f64, MarketDataError>>()?;

    Ok((first - last) / annuity)
}
