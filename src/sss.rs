//! Shamir secret reconstruction over GF(p).
//!
//! - Secret is the constant term of a degree-(k-1) polynomial.
//! - Each share is (x: i64, y: field element); x is mapped into the field
//!   before use, so negative x-coordinates are fine.
//! - Any k shares with distinct x (mod p) recover the secret.

use crate::error::{Error, Result};
use crate::field::Modulus;
use crate::share::Share;
use zeroize::Zeroizing;

/// Reconstruct the secret from the first `k` of `shares`.
///
/// Fails with [`Error::InsufficientShares`] if fewer than `k` shares are
/// provided, and with [`Error::DivisionByZero`] if two of the selected
/// shares collide on x.
pub fn combine(shares: &[Share], k: usize, modulus: Modulus) -> Result<Zeroizing<u64>> {
    if k == 0 || shares.len() < k {
        return Err(Error::InsufficientShares {
            needed: k.max(1),
            available: shares.len(),
        });
    }
    interpolate(&shares[..k], modulus)
}

/// Lagrange interpolation at x = 0.
///
/// term_i = y_i * prod_{j != i}(0 - x_j) / prod_{j != i}(x_i - x_j)
pub fn interpolate(points: &[Share], modulus: Modulus) -> Result<Zeroizing<u64>> {
    if points.is_empty() {
        return Err(Error::InsufficientShares {
            needed: 1,
            available: 0,
        });
    }

    let xs: Vec<u64> = points.iter().map(|s| modulus.reduce_signed(s.x)).collect();
    let mut acc = Zeroizing::new(0u64);
    for (i, share) in points.iter().enumerate() {
        let xi = xs[i];
        let mut num = 1u64;
        let mut den = 1u64;
        for (j, &xj) in xs.iter().enumerate() {
            if i == j {
                continue;
            }
            num = modulus.mul(num, modulus.sub(0, xj));
            den = modulus.mul(den, modulus.sub(xi, xj));
        }
        let li = modulus.mul(num, modulus.inverse(den)?);
        let term = modulus.mul(modulus.reduce(share.y), li);
        *acc = modulus.add(*acc, term);
    }
    // normalize: add p once more and re-reduce
    *acc = modulus.add(*acc, modulus.get());
    Ok(acc)
}
