//! RSA key types and the decoded-key dispatch enum.

use num_bigint::{BigUint, IntoBigUint, ModInverse};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::algorithms::generate_rsa_key;
use crate::ec::EcdsaPrivateKey;
use crate::errors::{Error, Result};
use crate::internals;

/// Components of an RSA public key.
pub trait PublicKeyParts {
    /// Returns the modulus of the key.
    fn n(&self) -> &BigUint;

    /// Returns the public exponent of the key.
    fn e(&self) -> &BigUint;

    /// Returns the modulus size in bytes. Raw signatures and ciphertexts for
    /// or by this key will have the same size.
    fn size(&self) -> usize {
        (self.n().bits() + 7) / 8
    }
}

/// A decoded private key, dispatched by algorithm family.
#[derive(Clone)]
pub enum PrivateKey {
    /// An RSA key (also produced for RSASSA-PSS containers).
    Rsa(RsaPrivateKey),
    /// An ECDSA key pair over a named curve.
    Ecdsa(EcdsaPrivateKey),
}

impl PrivateKey {
    /// Returns `true` when the key carries private material.
    pub fn has_private_key(&self) -> bool {
        match self {
            PrivateKey::Rsa(key) => key.has_private_key(),
            PrivateKey::Ecdsa(_) => true,
        }
    }
}

/// Represents a whole RSA key, public and private parts.
///
/// The key material is immutable after construction; the only mutable state
/// is the message-blinding scratch pair advanced by every private operation.
/// Because of that scratch state, concurrent private operations on one key
/// object must be serialized by the caller, which the `&mut self` receiver
/// of [`RsaPrivateKey::private_op`] enforces at compile time.
#[derive(Debug, Clone)]
pub struct RsaPrivateKey {
    /// Modulus.
    pub(crate) n: BigUint,
    /// Public exponent.
    pub(crate) e: BigUint,
    /// Private exponent; zero for a key without private material.
    pub(crate) d: BigUint,
    /// Prime factors of `n`: empty, or exactly two entries.
    pub(crate) primes: Vec<BigUint>,
    /// CRT parameters, present whenever the prime factors are.
    pub(crate) precomputed: Option<PrecomputedValues>,
    /// Blinding scratch, populated by the first private operation.
    pub(crate) blinding: Option<Blinding>,
}

/// Precomputed Chinese remainder theorem parameters.
#[derive(Debug, Clone)]
pub(crate) struct PrecomputedValues {
    /// d mod (p-1)
    pub(crate) dp: BigUint,
    /// d mod (q-1)
    pub(crate) dq: BigUint,
    /// q^-1 mod p
    pub(crate) qinv: BigUint,
}

/// Message-blinding scratch pair. The two values stay mutually consistent:
/// `blinder` is always an e-th power whose effect `unblinder` removes.
#[derive(Debug, Clone)]
pub(crate) struct Blinding {
    pub(crate) blinder: BigUint,
    pub(crate) unblinder: BigUint,
}

impl RsaPrivateKey {
    /// Generates a fresh two-prime key of `bit_size` bits with `e = 65537`.
    pub fn new<R: CryptoRngCore + ?Sized>(rng: &mut R, bit_size: usize) -> Result<RsaPrivateKey> {
        generate_rsa_key(rng, bit_size)
    }

    /// Constructs a key from a modulus, public exponent and optional private
    /// material.
    ///
    /// The prime factors must come as a pair. When they are present and `d`
    /// is not, the private exponent is derived as `e^-1 mod lcm(p-1, q-1)`;
    /// the CRT parameters are always computed here, never lazily. A nonzero
    /// `d` without the factorization is rejected, since the private
    /// operation depends on the CRT parameters.
    pub fn from_components(
        n: BigUint,
        e: BigUint,
        d: Option<BigUint>,
        primes: Vec<BigUint>,
    ) -> Result<RsaPrivateKey> {
        if n.is_zero() {
            return Err(Error::InvalidModulus);
        }

        match primes.len() {
            0 => {
                let d = d.unwrap_or_else(BigUint::zero);
                if !d.is_zero() {
                    return Err(Error::MissingPrimes);
                }
                Ok(RsaPrivateKey {
                    n,
                    e,
                    d,
                    primes,
                    precomputed: None,
                    blinding: None,
                })
            }
            2 => {
                if primes.iter().any(|prime| prime <= &BigUint::one()) {
                    return Err(Error::InvalidPrime);
                }

                let d = match d {
                    Some(d) => d,
                    None => {
                        let totient = (&primes[0] - BigUint::one())
                            .lcm(&(&primes[1] - BigUint::one()));
                        e.clone()
                            .mod_inverse(&totient)
                            .and_then(|d| d.into_biguint())
                            .ok_or(Error::InvalidExponent)?
                    }
                };

                let mut key = RsaPrivateKey {
                    n,
                    e,
                    d,
                    primes,
                    precomputed: None,
                    blinding: None,
                };
                key.precompute()?;
                Ok(key)
            }
            _ => Err(Error::MissingPrimes),
        }
    }

    /// Constructs a key from the nine explicit PKCS#1 fields.
    ///
    /// Every CRT parameter is taken as supplied; nothing is re-derived.
    /// This is the path parsed keys arrive through.
    #[allow(clippy::too_many_arguments)]
    pub fn from_pkcs1_components(
        n: BigUint,
        e: BigUint,
        d: BigUint,
        p: BigUint,
        q: BigUint,
        dp: BigUint,
        dq: BigUint,
        qinv: BigUint,
    ) -> Result<RsaPrivateKey> {
        if n.is_zero() {
            return Err(Error::InvalidModulus);
        }
        if p.is_zero() || q.is_zero() {
            return Err(Error::InvalidPrime);
        }

        Ok(RsaPrivateKey {
            n,
            e,
            d,
            primes: vec![p, q],
            precomputed: Some(PrecomputedValues { dp, dq, qinv }),
            blinding: None,
        })
    }

    /// Computes the CRT parameters from the prime factors.
    fn precompute(&mut self) -> Result<()> {
        if self.precomputed.is_some() {
            return Ok(());
        }

        let dp = &self.d % (&self.primes[0] - BigUint::one());
        let dq = &self.d % (&self.primes[1] - BigUint::one());
        let qinv = self.primes[1]
            .clone()
            .mod_inverse(&self.primes[0])
            .and_then(|qinv| qinv.into_biguint())
            .ok_or(Error::InvalidCoefficient)?;

        self.precomputed = Some(PrecomputedValues { dp, dq, qinv });
        Ok(())
    }

    /// Returns the private exponent; zero for a key without private
    /// material.
    pub fn d(&self) -> &BigUint {
        &self.d
    }

    /// Returns the prime factors, when known.
    pub fn primes(&self) -> &[BigUint] {
        &self.primes
    }

    /// Returns the precomputed `d mod (p-1)`.
    pub fn dp(&self) -> Option<&BigUint> {
        self.precomputed.as_ref().map(|precomputed| &precomputed.dp)
    }

    /// Returns the precomputed `d mod (q-1)`.
    pub fn dq(&self) -> Option<&BigUint> {
        self.precomputed.as_ref().map(|precomputed| &precomputed.dq)
    }

    /// Returns the precomputed `q^-1 mod p`.
    pub fn qinv(&self) -> Option<&BigUint> {
        self.precomputed.as_ref().map(|precomputed| &precomputed.qinv)
    }

    /// Returns `true` when the key carries a private exponent.
    ///
    /// Callers must check this before invoking [`RsaPrivateKey::private_op`]
    /// on a key that may hold only public material.
    pub fn has_private_key(&self) -> bool {
        !self.d.is_zero()
    }

    /// Raw RSA public-key operation: `c^e mod n`. No padding is performed.
    pub fn public_op(&self, c: &BigUint) -> BigUint {
        internals::encrypt(self, c)
    }

    /// Raw RSA private-key operation: `m^d mod n`, computed through the CRT
    /// on a blinded input.
    ///
    /// `m` must be reduced to `[0, n)`. The RNG feeds the first-call
    /// blinding initialization; subsequent calls advance the existing
    /// blinding state instead of sampling.
    pub fn private_op<R: CryptoRngCore + ?Sized>(
        &mut self,
        rng: &mut R,
        m: &BigUint,
    ) -> Result<BigUint> {
        if !self.has_private_key() {
            return Err(Error::MissingPrivateMaterial);
        }
        internals::decrypt(rng, self, m)
    }

    /// [`RsaPrivateKey::private_op`] plus a re-encryption check of the CRT
    /// result against the input.
    pub fn private_op_checked<R: CryptoRngCore + ?Sized>(
        &mut self,
        rng: &mut R,
        m: &BigUint,
    ) -> Result<BigUint> {
        if !self.has_private_key() {
            return Err(Error::MissingPrivateMaterial);
        }
        internals::decrypt_and_check(rng, self, m)
    }
}

impl PublicKeyParts for RsaPrivateKey {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn e(&self) -> &BigUint {
        &self.e
    }
}

impl PartialEq for RsaPrivateKey {
    #[inline]
    fn eq(&self, other: &RsaPrivateKey) -> bool {
        self.n == other.n && self.e == other.e && self.d == other.d && self.primes == other.primes
    }
}

impl Eq for RsaPrivateKey {}

impl Zeroize for RsaPrivateKey {
    fn zeroize(&mut self) {
        self.d.zeroize();
        for prime in self.primes.iter_mut() {
            prime.zeroize();
        }
        self.primes.clear();
        self.precomputed = None;
        self.blinding = None;
    }
}

impl Drop for RsaPrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Zeroize for PrecomputedValues {
    fn zeroize(&mut self) {
        self.dp.zeroize();
        self.dq.zeroize();
        self.qinv.zeroize();
    }
}

impl Drop for PrecomputedValues {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Zeroize for Blinding {
    fn zeroize(&mut self) {
        self.blinder.zeroize();
        self.unblinder.zeroize();
    }
}

impl Drop for Blinding {
    fn drop(&mut self) {
        self.zeroize();
    }
}
