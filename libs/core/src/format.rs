use std::fmt::{self, Display, Formatter};

use thiserror::Error;

/// Errors related to rendering sensor values into display digits.
#[derive(Error, Debug, Copy, Clone, PartialEq)]
#[non_exhaustive]
pub enum FormatError {
    /// The value cannot be shown in a two-digit field.
    ///
    /// Fields hold values from 0 up to (but not including) 100. Negative numbers,
    /// larger numbers, and NaN are rejected rather than rendered as garbage characters.
    #[error("Value {} is outside the displayable range 0 to 99.9", value)]
    OutOfRange {
        /// The rejected value.
        value: f32,
    },
}

/// The digit characters of a temperature reading, rendered as `TO.t`.
///
/// The tens place is blanked (a space) when zero; the ones and tenths places are always shown.
/// Digits are extracted by truncation, not rounding: the integer part is truncated toward zero and
/// the tenths digit is the truncated value of `(value * 10) mod 10`.
///
/// # Examples
///
/// ```
/// use charmatrix_core::TemperatureDigits;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let digits = TemperatureDigits::from_celsius(23.05)?;
/// assert_eq!(b"23.0", &digits.to_bytes());
///
/// let digits = TemperatureDigits::from_celsius(7.0)?;
/// assert_eq!(" 7.0", digits.to_string());
/// #
/// # Ok(()) }
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TemperatureDigits {
    tens: u8,
    ones: u8,
    tenths: u8,
}

/// The digit characters of a relative humidity reading, rendered as `TO`.
///
/// The tens place is blanked when zero, and there is no fractional part.
///
/// # Examples
///
/// ```
/// use charmatrix_core::HumidityDigits;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// assert_eq!(b"45", &HumidityDigits::from_percent(45.0)?.to_bytes());
/// assert_eq!(b" 5", &HumidityDigits::from_percent(5.9)?.to_bytes());
/// #
/// # Ok(()) }
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct HumidityDigits {
    tens: u8,
    ones: u8,
}

impl TemperatureDigits {
    /// Renders a temperature for display.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::OutOfRange`] if `value` is NaN, negative, or 100 or more.
    pub fn from_celsius(value: f32) -> Result<Self, FormatError> {
        check_range(value)?;
        let whole = value as u8;
        let tenths = ((value * 10.0) % 10.0) as u8;
        Ok(TemperatureDigits {
            tens: tens_char(whole),
            ones: digit_char(whole % 10),
            tenths: digit_char(tenths),
        })
    }

    /// Builds digits from raw characters, e.g. ones decoded from a frame.
    ///
    /// Returns `None` unless `tens` is a digit or space and `ones` and `tenths` are digits.
    pub fn from_chars(tens: u8, ones: u8, tenths: u8) -> Option<Self> {
        if (tens == b' ' || tens.is_ascii_digit()) && ones.is_ascii_digit() && tenths.is_ascii_digit() {
            Some(TemperatureDigits { tens, ones, tenths })
        } else {
            None
        }
    }

    /// Returns the tens character, which is a space for values under 10.
    pub fn tens(&self) -> char {
        char::from(self.tens)
    }

    /// Returns the ones character.
    pub fn ones(&self) -> char {
        char::from(self.ones)
    }

    /// Returns the tenths character.
    pub fn tenths(&self) -> char {
        char::from(self.tenths)
    }

    /// Returns the four characters as they appear on the display, decimal point included.
    pub fn to_bytes(&self) -> [u8; 4] {
        [self.tens, self.ones, b'.', self.tenths]
    }
}

impl HumidityDigits {
    /// Renders a relative humidity percentage for display.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::OutOfRange`] if `value` is NaN, negative, or 100 or more.
    pub fn from_percent(value: f32) -> Result<Self, FormatError> {
        check_range(value)?;
        let whole = value as u8;
        Ok(HumidityDigits {
            tens: tens_char(whole),
            ones: digit_char(whole % 10),
        })
    }

    /// Builds digits from raw characters.
    ///
    /// Returns `None` unless `tens` is a digit or space and `ones` is a digit.
    pub fn from_chars(tens: u8, ones: u8) -> Option<Self> {
        if (tens == b' ' || tens.is_ascii_digit()) && ones.is_ascii_digit() {
            Some(HumidityDigits { tens, ones })
        } else {
            None
        }
    }

    /// Returns the tens character, which is a space for values under 10.
    pub fn tens(&self) -> char {
        char::from(self.tens)
    }

    /// Returns the ones character.
    pub fn ones(&self) -> char {
        char::from(self.ones)
    }

    /// Returns the two characters as they appear on the display.
    pub fn to_bytes(&self) -> [u8; 2] {
        [self.tens, self.ones]
    }
}

impl Display for TemperatureDigits {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}.{}", self.tens(), self.ones(), self.tenths())
    }
}

impl Display for HumidityDigits {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tens(), self.ones())
    }
}

fn check_range(value: f32) -> Result<(), FormatError> {
    // NaN fails both comparisons, so test for the valid range rather than the invalid one.
    if (0.0..100.0).contains(&value) {
        Ok(())
    } else {
        Err(FormatError::OutOfRange { value })
    }
}

fn digit_char(digit: u8) -> u8 {
    b'0' + digit
}

/// Tens digit with leading-zero suppression.
fn tens_char(whole: u8) -> u8 {
    match whole / 10 {
        0 => b' ',
        tens => digit_char(tens),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(7.83, ' ', '7', '8' ; "tens blanked")]
    #[test_case(23.05, '2', '3', '0' ; "tenths truncated")]
    #[test_case(18.5, '1', '8', '5' ; "exact tenths")]
    #[test_case(0.0, ' ', '0', '0' ; "zero")]
    #[test_case(10.0, '1', '0', '0' ; "ones zero shown")]
    #[test_case(99.99, '9', '9', '9' ; "top of range")]
    fn temperature_digits(value: f32, tens: char, ones: char, tenths: char) {
        let digits = TemperatureDigits::from_celsius(value).unwrap();
        assert_eq!((tens, ones, tenths), (digits.tens(), digits.ones(), digits.tenths()));
    }

    #[test_case(45.0, '4', '5' ; "two digits")]
    #[test_case(5.0, ' ', '5' ; "tens blanked")]
    #[test_case(59.9, '5', '9' ; "truncated not rounded")]
    #[test_case(0.4, ' ', '0' ; "under one")]
    fn humidity_digits(value: f32, tens: char, ones: char) {
        let digits = HumidityDigits::from_percent(value).unwrap();
        assert_eq!((tens, ones), (digits.tens(), digits.ones()));
    }

    #[test_case(-0.1 ; "negative")]
    #[test_case(100.0 ; "hundred")]
    #[test_case(250.0 ; "far above")]
    #[test_case(f32::NAN ; "nan")]
    #[test_case(f32::INFINITY ; "infinity")]
    fn out_of_range_rejected(value: f32) {
        assert!(matches!(
            TemperatureDigits::from_celsius(value),
            Err(FormatError::OutOfRange { .. })
        ));
        assert!(matches!(
            HumidityDigits::from_percent(value),
            Err(FormatError::OutOfRange { .. })
        ));
    }

    #[test]
    fn rendering() {
        assert_eq!(" 7.8", TemperatureDigits::from_celsius(7.83).unwrap().to_string());
        assert_eq!(*b"18.5", TemperatureDigits::from_celsius(18.5).unwrap().to_bytes());
        assert_eq!(" 5", HumidityDigits::from_percent(5.0).unwrap().to_string());
    }

    #[test]
    fn from_chars_validates() {
        assert!(TemperatureDigits::from_chars(b' ', b'1', b'2').is_some());
        assert!(TemperatureDigits::from_chars(b'x', b'1', b'2').is_none());
        assert!(TemperatureDigits::from_chars(b'1', b' ', b'2').is_none());
        assert!(HumidityDigits::from_chars(b'4', b'2').is_some());
        assert!(HumidityDigits::from_chars(b'4', b'.').is_none());
    }
}
