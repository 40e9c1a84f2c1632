//! Arithmetic in the prime field GF(p), p < 2^64.
//!
//! Field elements are `u64` values in `[0, p)`. Every product is formed in
//! `u128` before reduction, so no intermediate can overflow for any 64-bit
//! modulus.

use crate::error::{Error, Result};
use std::fmt;

/// Witnesses that make Miller–Rabin deterministic for every n < 2^64.
const MR_BASES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// `base^exponent mod modulus` by square-and-multiply.
///
/// `base` is reduced first. Panics if `modulus` is zero.
pub fn mod_pow(base: u64, mut exponent: u64, modulus: u64) -> u64 {
    let m = modulus as u128;
    let mut result = 1 % m;
    let mut base = base as u128 % m;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = result * base % m;
        }
        base = base * base % m;
        exponent >>= 1;
    }
    result as u64
}

/// Multiplicative inverse via Fermat's little theorem: `a^(p-2) mod p`.
///
/// Only meaningful when `modulus` is prime. Zero has no inverse.
pub fn mod_inverse(a: u64, modulus: u64) -> Result<u64> {
    if a % modulus == 0 {
        return Err(Error::DivisionByZero);
    }
    Ok(mod_pow(a, modulus - 2, modulus))
}

#[inline]
fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    (a as u128 * b as u128 % m as u128) as u64
}

/// Deterministic Miller–Rabin primality test for 64-bit integers.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for p in MR_BASES {
        if n % p == 0 {
            return n == p;
        }
    }

    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;

    'witness: for a in MR_BASES {
        let mut x = mod_pow(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// A validated prime modulus defining the working field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Modulus(u64);

impl Modulus {
    /// 10^9 + 7.
    pub const DEFAULT: Modulus = Modulus(1_000_000_007);

    /// Validate `p` and wrap it. Composite values (and 0, 1) are rejected.
    pub fn new(p: u64) -> Result<Self> {
        if is_prime(p) {
            Ok(Self(p))
        } else {
            Err(Error::InvalidModulus(p))
        }
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn reduce(self, a: u64) -> u64 {
        a % self.0
    }

    /// Map a signed integer onto its representative in `[0, p)`.
    #[inline]
    pub fn reduce_signed(self, a: i64) -> u64 {
        (a as i128).rem_euclid(self.0 as i128) as u64
    }

    #[inline]
    pub fn add(self, a: u64, b: u64) -> u64 {
        ((a as u128 + b as u128) % self.0 as u128) as u64
    }

    /// `(a - b + p) mod p` on reduced operands.
    #[inline]
    pub fn sub(self, a: u64, b: u64) -> u64 {
        ((a as u128 + self.0 as u128 - b as u128) % self.0 as u128) as u64
    }

    #[inline]
    pub fn mul(self, a: u64, b: u64) -> u64 {
        mul_mod(a, b, self.0)
    }

    pub fn inverse(self, a: u64) -> Result<u64> {
        mod_inverse(a, self.0)
    }
}

impl Default for Modulus {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
