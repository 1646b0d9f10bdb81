//! Raw RSA arithmetic: the public-key operation and the blinded CRT
//! private-key operation.

use num_bigint::{BigUint, IntoBigInt, IntoBigUint, ModInverse, RandBigInt, ToBigInt};
use num_traits::{Signed, Zero};
use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::errors::{Error, Result};
use crate::key::{Blinding, PublicKeyParts, RsaPrivateKey};

/// Raw RSA encryption of m with the public key. No padding is performed.
#[inline]
pub(crate) fn encrypt<K: PublicKeyParts>(key: &K, m: &BigUint) -> BigUint {
    m.modpow(key.e(), key.n())
}

/// Performs raw RSA decryption with no padding, blinded and computed
/// through the CRT.
///
/// The blinding pair lives on the key: the first call samples it, and every
/// call squares both halves afterwards, so the next invocation sees a fresh
/// mask without paying for another inversion and exponentiation.
pub(crate) fn decrypt<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    priv_key: &mut RsaPrivateKey,
    c: &BigUint,
) -> Result<BigUint> {
    if priv_key.n().is_zero() {
        return Err(Error::InvalidModulus);
    }

    if c >= priv_key.n() {
        return Err(Error::InputOutOfRange);
    }

    let blinding = match priv_key.blinding.take() {
        Some(blinding) => blinding,
        None => sample_blinding(rng, priv_key.n(), priv_key.e()),
    };

    // Blind the input, run the private exponentiation on the masked value,
    // then strip the mask from the result.
    let mut blinded = (c * &blinding.blinder) % priv_key.n();
    let mut m = crt_private_op(priv_key, &blinded)?;
    let result = (&m * &blinding.unblinder) % priv_key.n();

    blinded.zeroize();
    m.zeroize();

    // Advance the mask for the next call. Squaring keeps the pair mutually
    // consistent: blinder stays an e-th power of the unblinder's inverse.
    priv_key.blinding = Some(Blinding {
        blinder: (&blinding.blinder * &blinding.blinder) % priv_key.n(),
        unblinder: (&blinding.unblinder * &blinding.unblinder) % priv_key.n(),
    });

    Ok(result)
}

/// Performs raw RSA decryption and checks the result for errors in the CRT
/// computation: m^e is calculated, which must match the original ciphertext.
pub(crate) fn decrypt_and_check<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    priv_key: &mut RsaPrivateKey,
    c: &BigUint,
) -> Result<BigUint> {
    let m = decrypt(rng, priv_key, c)?;

    let check = encrypt(priv_key, &m);
    if c != &check {
        return Err(Error::Internal);
    }

    Ok(m)
}

/// Samples a fresh blinding pair for `n`.
///
/// The unblinder is drawn uniformly from `[2, n)` and resampled until it is
/// invertible; the blinder is its inverse raised to the public exponent, so
/// multiplying the output by the unblinder undoes the mask exactly.
fn sample_blinding<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    n: &BigUint,
    e: &BigUint,
) -> Blinding {
    let two = BigUint::from(2u8);
    loop {
        let unblinder = rng.gen_biguint_range(&two, n);
        let inverse = unblinder
            .clone()
            .mod_inverse(n)
            .and_then(|inverse| inverse.into_biguint());

        if let Some(mut inverse) = inverse {
            let blinder = inverse.modpow(e, n);
            inverse.zeroize();
            return Blinding { blinder, unblinder };
        }
    }
}

/// Reconstructs `c^d mod n` from the two half-size exponentiations:
/// `s2 + q * ((s1 - s2) * qinv mod p)`, carried out in signed arithmetic
/// since `s1 - s2` may be negative.
fn crt_private_op(priv_key: &RsaPrivateKey, c: &BigUint) -> Result<BigUint> {
    let precomputed = priv_key.precomputed.as_ref().ok_or(Error::MissingPrimes)?;

    let p = &priv_key.primes[0];
    let q = &priv_key.primes[1];

    let mut m = c.modpow(&precomputed.dp, p).into_bigint().unwrap();
    let mut m2 = c.modpow(&precomputed.dq, q).into_bigint().unwrap();

    m -= &m2;

    let p_int = p.to_bigint().unwrap();

    while m.is_negative() {
        m += &p_int;
    }
    m *= &precomputed.qinv.to_bigint().unwrap();
    m %= &p_int;
    m *= &q.to_bigint().unwrap();
    m += &m2;

    m2.zeroize();

    Ok(m.into_biguint().expect("value is non-negative"))
}
