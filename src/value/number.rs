//=====================================================
// File: value/number.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Exact decimal numbers for scenario values
// Objective: Parse, compare, round and display arbitrary-precision decimals
//            including the 1e18 fixed-point mantissa display variants
//=====================================================

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::interpreter::{ScenarioError, ScenarioResult};

/// Decimal places of the protocol's fixed-point mantissa.
pub const MANTISSA_DECIMALS: u32 = 18;

const DISPLAY_FRACTION_DIGITS: usize = 18;
const MAX_EXPONENT: i64 = 4096;

/// How a number is rendered. Equality ignores the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberFormat {
    #[default]
    Plain,
    /// Divide by 1e18 before display.
    Exp,
    /// Divide by 1e18, multiply by 100, append `%`.
    Percent,
}

#[derive(Debug, Clone)]
pub struct Number {
    val: BigRational,
    format: NumberFormat,
}

impl Number {
    pub fn new(val: BigRational) -> Self {
        Self {
            val,
            format: NumberFormat::Plain,
        }
    }

    pub fn from_integer(val: impl Into<BigInt>) -> Self {
        Self::new(BigRational::from_integer(val.into()))
    }

    pub fn zero() -> Self {
        Self::new(BigRational::zero())
    }

    //Function: parse
    //Purpose: Read a decimal literal such as `-12.5`, `1e18` or `1.5E-3`
    //Inputs: text: &str
    //Returns: ScenarioResult<Number>
    pub fn parse(text: &str) -> ScenarioResult<Self> {
        let invalid = || ScenarioError::invalid(format!("`{text}` is not a number"));
        let trimmed = text.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (mantissa, exponent) = match body.find(['e', 'E']) {
            Some(index) => {
                let exponent = body[index + 1..]
                    .parse::<i64>()
                    .map_err(|_| invalid())?;
                if !(-MAX_EXPONENT..=MAX_EXPONENT).contains(&exponent) {
                    return Err(invalid());
                }
                (&body[..index], exponent)
            }
            None => (body, 0),
        };
        let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().chain(fraction.chars()).all(|ch| ch.is_ascii_digit()) {
            return Err(invalid());
        }

        let digits = format!("{whole}{fraction}");
        let mut numer: BigInt = digits.parse().map_err(|_| invalid())?;
        if negative {
            numer = -numer;
        }
        let scale = i64::try_from(fraction.len())
            .ok()
            .and_then(|digits| exponent.checked_sub(digits))
            .filter(|scale| (-MAX_EXPONENT..=MAX_EXPONENT).contains(scale))
            .ok_or_else(invalid)?;
        Ok(Self::new(shift_decimal(&BigRational::from_integer(numer), scale)))
    }

    /// `x` expressed as a 1e18 mantissa, displayed back as `x`.
    pub fn exp(self) -> Self {
        Self {
            val: shift_decimal(&self.val, MANTISSA_DECIMALS as i64),
            format: NumberFormat::Exp,
        }
    }

    /// `x` percent expressed as a 1e18 mantissa, displayed back as `x%`.
    pub fn percent(self) -> Self {
        Self {
            val: shift_decimal(&self.val, MANTISSA_DECIMALS as i64 - 2),
            format: NumberFormat::Percent,
        }
    }

    pub fn with_format(mut self, format: NumberFormat) -> Self {
        self.format = format;
        self
    }

    pub fn value(&self) -> &BigRational {
        &self.val
    }

    pub fn format(&self) -> NumberFormat {
        self.format
    }

    pub fn is_zero(&self) -> bool {
        self.val.is_zero()
    }

    pub fn is_integer(&self) -> bool {
        self.val.is_integer()
    }

    pub fn to_u32(&self) -> Option<u32> {
        if self.val.is_integer() {
            self.val.to_integer().to_u32()
        } else {
            None
        }
    }

    pub fn add(&self, other: &Number) -> Number {
        Number::new(self.val.clone() + other.val.clone())
    }

    pub fn sub(&self, other: &Number) -> Number {
        Number::new(self.val.clone() - other.val.clone())
    }

    pub fn mul(&self, other: &Number) -> Number {
        Number::new(self.val.clone() * other.val.clone())
    }

    pub fn div(&self, other: &Number) -> ScenarioResult<Number> {
        if other.val.is_zero() {
            return Err(ScenarioError::invalid(format!("cannot divide {self} by zero")));
        }
        Ok(Number::new(self.val.clone() / other.val.clone()))
    }

    /// Plain decimal expansion without the display format applied.
    pub fn to_plain_string(&self) -> String {
        render_decimal(&self.val)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.val == other.val
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            NumberFormat::Plain => f.write_str(&render_decimal(&self.val)),
            NumberFormat::Exp => f.write_str(&render_decimal(&shift_decimal(
                &self.val,
                -(MANTISSA_DECIMALS as i64),
            ))),
            NumberFormat::Percent => write!(
                f,
                "{}%",
                render_decimal(&shift_decimal(&self.val, 2 - MANTISSA_DECIMALS as i64))
            ),
        }
    }
}

fn pow10(exponent: u32) -> BigInt {
    num_traits::pow(BigInt::from(10u8), exponent as usize)
}

/// Multiply by `10^shift` (negative shifts divide).
pub(crate) fn shift_decimal(val: &BigRational, shift: i64) -> BigRational {
    let factor = BigRational::from_integer(pow10(shift.unsigned_abs() as u32));
    if shift >= 0 {
        val.clone() * factor
    } else {
        val.clone() / factor
    }
}

/// `floor(log10(|val|))` for a non-zero value.
fn decimal_exponent(val: &BigRational) -> i64 {
    let abs = val.abs();
    let one = BigRational::from_integer(BigInt::from(1u8));
    let ten = BigRational::from_integer(BigInt::from(10u8));
    let mut exponent =
        abs.numer().to_string().len() as i64 - abs.denom().to_string().len() as i64;
    loop {
        let scaled = shift_decimal(&abs, -exponent);
        if scaled >= ten {
            exponent += 1;
        } else if scaled < one {
            exponent -= 1;
        } else {
            return exponent;
        }
    }
}

/// Truncate toward zero to `precision` significant figures.
pub(crate) fn truncate_significant(val: &BigRational, precision: u32) -> BigRational {
    if val.is_zero() {
        return val.clone();
    }
    let shift = precision.max(1) as i64 - 1 - decimal_exponent(val);
    let scaled = shift_decimal(val, shift);
    shift_decimal(&BigRational::from_integer(scaled.to_integer()), -shift)
}

fn render_decimal(val: &BigRational) -> String {
    let abs = val.abs();
    let mut out = abs.to_integer().to_string();
    let mut rest = abs.fract();
    if !rest.is_zero() {
        let ten = BigRational::from_integer(BigInt::from(10u8));
        let mut fraction = String::new();
        for _ in 0..DISPLAY_FRACTION_DIGITS {
            if rest.is_zero() {
                break;
            }
            rest = rest * ten.clone();
            let digit = rest.to_integer();
            fraction.push_str(&digit.to_string());
            rest = rest - BigRational::from_integer(digit);
        }
        let fraction = fraction.trim_end_matches('0');
        if !fraction.is_empty() {
            out.push('.');
            out.push_str(fraction);
        }
    }
    if val.is_negative() && out != "0" {
        out.insert(0, '-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(text: &str) -> Number {
        Number::parse(text).unwrap()
    }

    #[test]
    fn parses_fractions_and_exponents() {
        assert_eq!(num("1.0"), num("1.00"));
        assert_eq!(num("1e18"), num("1000000000000000000"));
        assert_eq!(num("1.5e3").to_string(), "1500");
        assert_eq!(num("-0.25").to_string(), "-0.25");
        assert_eq!(num(".5").to_string(), "0.5");
    }

    #[test]
    fn rejects_garbage() {
        for text in [
            "",
            "abc",
            "1.2.3",
            "0x10",
            "1e",
            "--1",
            "1e-9223372036854775808",
            "1.5e-9223372036854775808",
            "1e9223372036854775807",
            "1e4097",
        ] {
            assert!(Number::parse(text).is_err(), "{text} should not parse");
        }
        assert_eq!(num("1e4096"), Number::new(shift_decimal(num("1").value(), 4096)));
    }

    #[test]
    fn exp_and_percent_display() {
        let exp = num("1.5").exp();
        assert_eq!(exp.to_plain_string(), "1500000000000000000");
        assert_eq!(exp.to_string(), "1.5");

        let percent = num("5").percent();
        assert_eq!(percent.to_plain_string(), "50000000000000000");
        assert_eq!(percent.to_string(), "5%");
    }

    #[test]
    fn non_terminating_expansion_is_truncated() {
        let third = num("1").div(&num("3")).unwrap();
        assert_eq!(third.to_string(), "0.333333333333333333");
    }

    #[test]
    fn significant_figure_truncation() {
        let val = num("5.10007");
        assert_eq!(
            Number::new(truncate_significant(val.value(), 5)),
            num("5.1")
        );
        assert_eq!(
            Number::new(truncate_significant(val.value(), 6)),
            num("5.10007")
        );
        assert_eq!(
            Number::new(truncate_significant(num("0.0012345").value(), 2)),
            num("0.0012")
        );
        assert_eq!(
            Number::new(truncate_significant(num("-98765").value(), 3)),
            num("-98700")
        );
    }

    #[test]
    fn division_by_zero_fails() {
        assert!(num("1").div(&Number::zero()).is_err());
    }
}

//=====================================================
// End of file
//=====================================================
