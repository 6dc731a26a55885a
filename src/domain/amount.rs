//! Human-scale token amounts and their fixed-point base-unit representation.
//!
//! Amounts are kept as exact decimals (mantissa + scale) so that converting
//! user input into base units never goes through a float.

use std::{fmt, str::FromStr};

use color_eyre::eyre::{Result, eyre};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Decimal precision assumed when a jetton's metadata omits `decimals`.
pub const DEFAULT_DECIMALS: u8 = 9;

/// A decimal quantity as entered by a user, e.g. `5.25`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanAmount {
    /// All digits of the amount with the decimal point removed.
    mantissa: BigUint,
    /// Number of digits after the decimal point.
    scale: u32,
    negative: bool,
}

impl HumanAmount {
    pub fn zero() -> Self {
        Self {
            mantissa: BigUint::ZERO,
            scale: 0,
            negative: false,
        }
    }

    /// Build a whole-unit amount.
    pub fn from_units(units: u64) -> Self {
        Self {
            mantissa: BigUint::from(units),
            scale: 0,
            negative: false,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == BigUint::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.negative && !self.is_zero()
    }

    /// Convert to base units: `self × 10^decimals`.
    ///
    /// Fractional digits beyond `decimals` are rounded half-up.
    pub fn to_base_units(&self, decimals: u8) -> Result<BigUint> {
        if self.is_negative() {
            return Err(eyre!("Cannot convert negative amount {} to base units", self));
        }

        let decimals = u32::from(decimals);
        if self.scale <= decimals {
            return Ok(&self.mantissa * pow10(decimals - self.scale));
        }

        let divisor = pow10(self.scale - decimals);
        let quotient = &self.mantissa / &divisor;
        let remainder = &self.mantissa % &divisor;
        if remainder * 2u32 >= divisor {
            Ok(quotient + 1u32)
        } else {
            Ok(quotient)
        }
    }

    /// Split into integer digits and fractional digits (without sign).
    fn parts(&self) -> (String, String) {
        let digits = self.mantissa.to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            return (digits, String::new());
        }
        let padded = format!("{:0>width$}", digits, width = scale + 1);
        let (int, frac) = padded.split_at(padded.len() - scale);
        (int.to_string(), frac.trim_end_matches('0').to_string())
    }
}

impl Default for HumanAmount {
    fn default() -> Self {
        Self::zero()
    }
}

impl FromStr for HumanAmount {
    type Err = color_eyre::eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (int, frac) = match body.split_once('.') {
            Some((int, frac)) => (int, frac),
            None => (body, ""),
        };

        if int.is_empty() && frac.is_empty() {
            return Err(eyre!("Invalid amount: {:?}", s));
        }
        if !int.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return Err(eyre!("Invalid amount: {:?}", s));
        }

        let digits = format!("{}{}", int, frac);
        let mantissa = BigUint::parse_bytes(digits.as_bytes(), 10)
            .ok_or_else(|| eyre!("Invalid amount: {:?}", s))?;

        Ok(Self {
            mantissa,
            scale: frac.len() as u32,
            negative,
        })
    }
}

impl fmt::Display for HumanAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (int, frac) = self.parts();
        let sign = if self.is_negative() { "-" } else { "" };
        if frac.is_empty() {
            write!(f, "{}{}", sign, int)
        } else {
            write!(f, "{}{}.{}", sign, int, frac)
        }
    }
}

/// Format an amount for large-number display: `1234567.5` -> `1,234,567.5`.
pub fn format_grouped(amount: &HumanAmount) -> String {
    let (int, frac) = amount.parts();
    let sign = if amount.is_negative() { "-" } else { "" };
    let grouped = group_thousands(&int);
    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}

/// Format a base-unit integer as a grouped human-scale amount.
pub fn format_base_units(value: &BigUint, decimals: u8) -> String {
    let amount = HumanAmount {
        mantissa: value.clone(),
        scale: u32::from(decimals),
        negative: false,
    };
    format_grouped(&amount)
}

fn group_thousands(int: &str) -> String {
    let mut out = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn pow10(exp: u32) -> BigUint {
    BigUint::from(10u32).pow(exp)
}
