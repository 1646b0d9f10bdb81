//! RSA key generation.

use num_bigint::{BigUint, IntoBigUint, ModInverse, RandPrime};
use num_integer::Integer;
use num_traits::One;
use rand_core::CryptoRngCore;

use crate::errors::{Error, Result};
use crate::key::RsaPrivateKey;

/// Fixed public exponent for generated keys.
const EXP: u64 = 65537;

/// Smallest supported modulus size in bits. Below this the prime pair is too
/// small for the fixed public exponent to be invertible reliably.
const MIN_BIT_SIZE: usize = 16;

/// Generates a two-prime RSA key of the given bit size.
///
/// Each prime carries half the bits. The private exponent is derived as
/// `e^-1 mod lcm(p-1, q-1)` and the CRT parameters are computed at
/// construction; the blinding state is left unset so the first private
/// operation initializes it.
pub(crate) fn generate_rsa_key<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bit_size: usize,
) -> Result<RsaPrivateKey> {
    if bit_size < MIN_BIT_SIZE {
        return Err(Error::KeySizeTooSmall);
    }

    let exp = BigUint::from(EXP);

    loop {
        let p = rng.gen_prime(bit_size / 2);
        let q = rng.gen_prime(bit_size - bit_size / 2);

        if p == q {
            continue;
        }

        let n = &p * &q;
        if n.bits() != bit_size {
            // gen_prime sets the top two bits of each prime, so a short
            // product is rare.
            continue;
        }

        // e must be invertible modulo lcm(p-1, q-1); retry with new primes
        // when it is not.
        let totient = (&p - BigUint::one()).lcm(&(&q - BigUint::one()));
        if let Some(d) = exp
            .clone()
            .mod_inverse(&totient)
            .and_then(|d| d.into_biguint())
        {
            return RsaPrivateKey::from_components(n, exp, Some(d), vec![p, q]);
        }
    }
}
