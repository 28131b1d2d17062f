use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const VND_CURRENCY_CODE: &str = "VND";

/// The payment gateway denominates `vnp_Amount` in 1/100ths of a Dong. An order total of
/// 150,000 ₫ goes over the wire as `15000000`.
pub const GATEWAY_MINOR_UNITS: i64 = 100;

//--------------------------------------        Vnd        -----------------------------------------------------------
/// An amount of Vietnamese Dong. VND has no physical subunit, so the inner value is a whole number
/// of Dong. Conversion to and from the gateway's ×100 minor-unit representation lives here so that
/// no caller ever does the multiplication by hand.
#[derive(Debug, Clone, Copy, Default, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vnd(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in Dong: {0}")]
pub struct VndConversionError(String);

impl From<i64> for Vnd {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Vnd {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Vnd {}

impl Add for Vnd {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Vnd {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Vnd {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Vnd {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Vnd {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl Display for Vnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ₫", self.0)
    }
}

impl Vnd {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// The amount as the gateway expects it: an integer count of minor units (×100, no decimals).
    pub fn gateway_amount(&self) -> i64 {
        self.0 * GATEWAY_MINOR_UNITS
    }

    /// Converts a gateway minor-unit amount back into Dong. The gateway only ever produces whole
    /// multiples of 100, so anything else is a malformed (or tampered-with) amount field.
    pub fn from_gateway_amount(minor_units: i64) -> Result<Self, VndConversionError> {
        if minor_units < 0 {
            return Err(VndConversionError(format!("gateway amount is negative: {minor_units}")));
        }
        if minor_units % GATEWAY_MINOR_UNITS != 0 {
            return Err(VndConversionError(format!(
                "gateway amount {minor_units} is not a multiple of {GATEWAY_MINOR_UNITS}"
            )));
        }
        Ok(Self(minor_units / GATEWAY_MINOR_UNITS))
    }
}
