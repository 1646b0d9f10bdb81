//! ECDSA key pairs over the supported named curves.
//!
//! Curve arithmetic itself is delegated to the [`p256`] crate; this module
//! only binds raw key bytes produced by the container decoder to that
//! capability.

use p256::ecdsa::{SigningKey, VerifyingKey};

use crate::errors::{Error, Result};

/// Named curves recognized by the container decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum NamedCurve {
    /// NIST P-256, also known as secp256r1 / prime256v1.
    NistP256,
}

/// An ECDSA key pair bound to a named curve.
///
/// Both halves are always populated: decoding paths that only carry the
/// private scalar synthesize the verifying key from it immediately.
#[derive(Clone)]
pub struct EcdsaPrivateKey {
    curve: NamedCurve,
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl EcdsaPrivateKey {
    /// Builds a key pair from a raw big-endian scalar and an uncompressed
    /// SEC1 point.
    pub fn from_raw_parts(
        curve: NamedCurve,
        scalar: &[u8],
        point: &[u8],
    ) -> Result<EcdsaPrivateKey> {
        match curve {
            NamedCurve::NistP256 => {
                let signing_key =
                    SigningKey::from_slice(scalar).map_err(|_| Error::MalformedKey)?;
                let verifying_key =
                    VerifyingKey::from_sec1_bytes(point).map_err(|_| Error::MalformedKey)?;
                Ok(EcdsaPrivateKey {
                    curve,
                    signing_key,
                    verifying_key,
                })
            }
        }
    }

    /// Decodes a SEC1 `ECPrivateKey` blob directly and synthesizes the
    /// verifying key from the scalar.
    ///
    /// This is the legacy SSLeay path: the container carries no algorithm
    /// identifier, so the curve is assumed to be P-256.
    pub fn from_sec1_der(der_bytes: &[u8]) -> Result<EcdsaPrivateKey> {
        let secret = p256::SecretKey::from_sec1_der(der_bytes).map_err(|_| Error::MalformedKey)?;
        let signing_key = SigningKey::from(secret);
        let verifying_key = VerifyingKey::from(&signing_key);

        Ok(EcdsaPrivateKey {
            curve: NamedCurve::NistP256,
            signing_key,
            verifying_key,
        })
    }

    /// Returns the curve this key pair is bound to.
    pub fn curve(&self) -> NamedCurve {
        self.curve
    }

    /// Returns the signing half.
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Returns the verifying half.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}
