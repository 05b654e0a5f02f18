//! Bit-field helpers shared by the advertisement parsers.
//!
//! Advertisement payloads pack state into single bits and short bit runs.
//! Every helper works on bytes the caller has already length-checked.

/// True when any bit selected by `mask` is set.
pub const fn bit(byte: u8, mask: u8) -> bool {
    byte & mask != 0
}

/// Low seven bits: battery and humidity percentages, brightness, counters.
pub const fn low7(byte: u8) -> u8 {
    byte & 0x7f
}

/// Seven-bit value clamped to the 0-100 range used by position fields.
pub fn percent(byte: u8) -> u8 {
    low7(byte).min(100)
}

/// Big-endian two-byte quantity.
pub const fn u16_be(high: u8, low: u8) -> u16 {
    ((high as u16) << 8) | low as u16
}

/// Two-byte power reading reported in tenths of a watt.
pub fn deciwatt(high: u8, low: u8) -> f32 {
    u16_be(high, low) as f32 / 10.0
}

/// Signed temperature shared by the whole meter family.
///
/// `frac` carries the tenths digit in its low nibble. `int` carries the
/// sign bit (set means at or above zero) and the integer part.
pub fn temperature_c(frac: u8, int: u8) -> f32 {
    let sign = if bit(int, 0x80) { 1.0 } else { -1.0 };
    let whole = ((int & 0x70) >> 4) as f32;
    let tenths = (frac & 0x0f) as f32 / 10.0;
    sign * (whole + tenths)
}

/// Celsius to Fahrenheit, rounded to one decimal as the devices report it.
pub fn fahrenheit(celsius: f32) -> f32 {
    ((celsius * 9.0 / 5.0 + 32.0) * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_selects_single_flags() {
        assert!(bit(0b1000_0000, 0x80));
        assert!(!bit(0b0111_1111, 0x80));
        assert!(bit(0b0000_0100, 0x04));
    }

    #[test]
    fn low7_strips_the_top_bit() {
        assert_eq!(low7(0xff), 0x7f);
        assert_eq!(low7(0x85), 0x05);
    }

    #[test]
    fn percent_clamps_to_100() {
        assert_eq!(percent(0x32), 50);
        assert_eq!(percent(0x64), 100);
        assert_eq!(percent(0x7f), 100);
        assert_eq!(percent(0xff), 100);
    }

    #[test]
    fn u16_be_joins_bytes() {
        assert_eq!(u16_be(0x12, 0x34), 0x1234);
        assert_eq!(u16_be(0x00, 0x00), 0);
    }

    #[test]
    fn deciwatt_scales_by_ten() {
        assert_eq!(deciwatt(0x00, 0x7b), 12.3);
        assert_eq!(deciwatt(0x00, 0x00), 0.0);
    }

    #[test]
    fn temperature_sign_and_magnitude() {
        // Sign bit clear reads below zero.
        assert_eq!(temperature_c(0x04, 0x05), -0.4);
        // Sign bit set reads above zero.
        assert_eq!(temperature_c(0x03, 0x92), 1.3);
        assert_eq!(temperature_c(0x00, 0x80), 0.0);
    }

    #[test]
    fn fahrenheit_rounds_to_one_decimal() {
        assert_eq!(fahrenheit(-0.4), 31.3);
        assert_eq!(fahrenheit(0.0), 32.0);
    }
}
