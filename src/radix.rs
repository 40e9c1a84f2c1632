//! Base-N digit strings (N in 2..=36) to field integers.

use crate::error::{Error, Result};
use crate::field::Modulus;

pub const MIN_BASE: u32 = 2;
pub const MAX_BASE: u32 = 36;

/// Decode `value` written in `base` into an integer.
///
/// Digits are `0-9` then `a-z` (case-insensitive). The accumulator is folded
/// modulo `modulus` whenever it reaches or exceeds it, so the result is exact
/// below the modulus and a field representative above it. An empty digit
/// string decodes to 0.
pub fn decode(value: &str, base: u32, modulus: Modulus) -> Result<u64> {
    if !(MIN_BASE..=MAX_BASE).contains(&base) {
        return Err(Error::InvalidBase(u64::from(base)));
    }

    let m = modulus.get() as u128;
    let mut acc: u128 = 0;
    for c in value.chars() {
        let digit = c
            .to_digit(base)
            .ok_or(Error::InvalidDigit { digit: c, base })?;
        acc = acc * base as u128 + digit as u128;
        if acc >= m {
            acc %= m;
        }
    }
    Ok(acc as u64)
}

/// Parse a text-encoded base such as `"16"`.
///
/// Text that is not a number is a malformed entry; a number outside
/// 2..=36 is an invalid base.
pub fn parse_base(label: &str, text: &str) -> Result<u32> {
    let base: u64 = text
        .trim()
        .parse()
        .map_err(|_| Error::malformed(label, format!("base {text:?} is not a number")))?;
    check_base(base)
}

/// Narrow a numeric base, rejecting anything outside 2..=36.
pub fn check_base(base: u64) -> Result<u32> {
    match u32::try_from(base) {
        Ok(b) if (MIN_BASE..=MAX_BASE).contains(&b) => Ok(b),
        _ => Err(Error::InvalidBase(base)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str, base: u32) -> Result<u64> {
        decode(value, base, Modulus::DEFAULT)
    }

    #[test]
    fn known_values() {
        assert_eq!(dec("FF", 16).unwrap(), 255);
        assert_eq!(dec("ff", 16).unwrap(), 255);
        assert_eq!(dec("10", 2).unwrap(), 2);
        assert_eq!(dec("Z", 36).unwrap(), 35);
        assert_eq!(dec("z", 36).unwrap(), 35);
        assert_eq!(dec("0", 10).unwrap(), 0);
        assert_eq!(dec("0007", 8).unwrap(), 7);
        assert_eq!(dec("111", 2).unwrap(), 7);
        assert_eq!(dec("213", 4).unwrap(), 39);
    }

    #[test]
    fn rejects_bad_base() {
        assert!(matches!(dec("2", 1), Err(Error::InvalidBase(1))));
        assert!(matches!(dec("0", 0), Err(Error::InvalidBase(0))));
        assert!(matches!(dec("1", 37), Err(Error::InvalidBase(37))));
    }

    #[test]
    fn rejects_bad_digit() {
        assert!(matches!(
            dec("G", 16),
            Err(Error::InvalidDigit { digit: 'G', base: 16 })
        ));
        assert!(matches!(dec("12", 2), Err(Error::InvalidDigit { digit: '2', .. })));
        assert!(matches!(dec("-1", 10), Err(Error::InvalidDigit { digit: '-', .. })));
        assert!(matches!(dec(" 1", 10), Err(Error::InvalidDigit { digit: ' ', .. })));
        assert!(matches!(dec("1.5", 10), Err(Error::InvalidDigit { digit: '.', .. })));
        assert!(matches!(dec("٣", 10), Err(Error::InvalidDigit { .. })));
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(dec("", 10).unwrap(), 0);
        assert_eq!(dec("", 36).unwrap(), 0);
        assert!(matches!(dec("", 1), Err(Error::InvalidBase(1))));
    }

    #[test]
    fn folds_at_the_modulus() {
        let p = Modulus::DEFAULT;
        assert_eq!(dec("1000000006", 10).unwrap(), 1_000_000_006);
        assert_eq!(dec("1000000007", 10).unwrap(), 0);
        assert_eq!(dec("1000000008", 10).unwrap(), 1);

        // Large inputs agree with Horner evaluation in the field.
        let digits = "123456789012345678901234567890";
        let mut expected = 0u64;
        for c in digits.chars() {
            expected = p.add(p.mul(expected, 10), c.to_digit(10).unwrap() as u64);
        }
        assert_eq!(dec(digits, 10).unwrap(), expected);

        let small = Modulus::new(7).unwrap();
        assert_eq!(decode("FF", 16, small).unwrap(), 255 % 7);
    }

    #[test]
    fn max_base_near_u64_modulus() {
        let p = Modulus::new(18_446_744_073_709_551_557).unwrap();
        let v = decode("zzzzzzzzzzzzzzzzzzzz", 36, p).unwrap();
        assert!(v < p.get());
    }

    #[test]
    fn base_text() {
        assert_eq!(parse_base("1", "16").unwrap(), 16);
        assert_eq!(parse_base("1", " 2 ").unwrap(), 2);
        assert!(matches!(parse_base("1", "1"), Err(Error::InvalidBase(1))));
        assert!(matches!(parse_base("1", "99"), Err(Error::InvalidBase(99))));
        assert!(matches!(
            parse_base("1", "99999999999"),
            Err(Error::InvalidBase(99_999_999_999))
        ));
        assert!(matches!(check_base(4_294_967_298), Err(Error::InvalidBase(4_294_967_298))));
        assert_eq!(check_base(36).unwrap(), 36);
        assert!(matches!(parse_base("1", "hex"), Err(Error::MalformedEntry { .. })));
        assert!(matches!(parse_base("1", ""), Err(Error::MalformedEntry { .. })));
    }
}
