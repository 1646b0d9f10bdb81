//! Private-key container decoding.
//!
//! Three on-wire formats are handled, selected by the PEM type label the
//! caller already stripped: PKCS#8 `PrivateKeyInfo` (`PRIVATE KEY`), the
//! legacy SSLeay `RSAPrivateKey` (`RSA PRIVATE KEY`) and the legacy SSLeay
//! SEC1 `ECPrivateKey` (`EC PRIVATE KEY`). Any structural or semantic
//! violation aborts the whole decode; no partial key is ever produced.

use const_oid::ObjectIdentifier;
use num_traits::Zero;

use crate::asn1::Asn1Node;
use crate::ec::{EcdsaPrivateKey, NamedCurve};
use crate::errors::{Error, Result};
use crate::key::{PrivateKey, RsaPrivateKey};

/// ObjectID for RSA keys.
pub(crate) const RSA_ENCRYPTION: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// ObjectID for the RSA PSS keys.
pub(crate) const ID_RSASSA_PSS: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.10");

/// ObjectID for EC keys.
pub(crate) const ID_EC_PUBLIC_KEY: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// ObjectID for the NIST P-256 curve.
pub(crate) const PRIME256V1: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");

/// Recognized key-algorithm families, resolved once from the
/// `AlgorithmIdentifier`. Extending the decoder to a new algorithm means
/// adding a case here.
enum KeyAlgorithm {
    Rsa,
    RsaPss,
    Ec(NamedCurve),
}

impl PrivateKey {
    /// Decodes DER bytes whose container format was already identified by
    /// the PEM type label: one of `PRIVATE KEY`, `RSA PRIVATE KEY` or
    /// `EC PRIVATE KEY`.
    pub fn from_labeled_der(label: &str, der_bytes: &[u8]) -> Result<PrivateKey> {
        match label {
            "PRIVATE KEY" => PrivateKey::from_pkcs8_der(der_bytes),
            "RSA PRIVATE KEY" => RsaPrivateKey::from_pkcs1_der(der_bytes).map(PrivateKey::Rsa),
            "EC PRIVATE KEY" => EcdsaPrivateKey::from_sec1_der(der_bytes).map(PrivateKey::Ecdsa),
            _ => Err(Error::InvalidContainer),
        }
    }

    /// Decodes a PKCS#8 `PrivateKeyInfo` structure.
    pub fn from_pkcs8_der(der_bytes: &[u8]) -> Result<PrivateKey> {
        let info = Asn1Node::parse(der_bytes)?;
        if info.child_count() != 3 {
            return Err(Error::MalformedKey);
        }

        if !info.child(0)?.uint().is_zero() {
            return Err(Error::MalformedKey);
        }

        let algorithm = resolve_algorithm(info.child(1)?)?;

        // The key material proper is wrapped in an OCTET STRING and
        // re-parsed as its own DER structure.
        let key_data = Asn1Node::parse(info.child(2)?.value())?;

        match algorithm {
            KeyAlgorithm::Rsa | KeyAlgorithm::RsaPss => {
                parse_rsa_private_key(&key_data).map(PrivateKey::Rsa)
            }
            KeyAlgorithm::Ec(curve) => {
                parse_ec_private_key(&key_data, curve).map(PrivateKey::Ecdsa)
            }
        }
    }
}

impl RsaPrivateKey {
    /// Decodes a legacy SSLeay `RSAPrivateKey` blob (PKCS#1, no PKCS#8
    /// wrapper).
    pub fn from_pkcs1_der(der_bytes: &[u8]) -> Result<RsaPrivateKey> {
        parse_rsa_private_key(&Asn1Node::parse(der_bytes)?)
    }
}

/// Resolves an `AlgorithmIdentifier` node into a recognized algorithm
/// family, enforcing the per-algorithm parameter rules.
fn resolve_algorithm(alg: &Asn1Node<'_>) -> Result<KeyAlgorithm> {
    let oid = alg.child(0)?.oid()?;

    let algorithm = if oid == RSA_ENCRYPTION {
        if alg.child_count() != 2 {
            return Err(Error::MalformedKey);
        }
        // RSA parameters must be the DER NULL value.
        if !alg.child(1)?.value().is_empty() {
            return Err(Error::MalformedKey);
        }
        KeyAlgorithm::Rsa
    } else if oid == ID_RSASSA_PSS {
        // PSS parameters are accepted without interpretation; no
        // restrictions apply at key-parsing time.
        KeyAlgorithm::RsaPss
    } else if oid == ID_EC_PUBLIC_KEY {
        if alg.child_count() != 2 {
            return Err(Error::MalformedKey);
        }
        let curve = alg.child(1)?.oid()?;
        if curve != PRIME256V1 {
            return Err(Error::UnsupportedCurve(curve));
        }
        KeyAlgorithm::Ec(NamedCurve::NistP256)
    } else {
        return Err(Error::UnsupportedAlgorithm(oid));
    };

    if alg.child_count() > 2 {
        return Err(Error::MalformedKey);
    }

    Ok(algorithm)
}

/// Parses a PKCS#1 `RSAPrivateKey` sequence: a version byte followed by the
/// nine integer fields, positionally.
fn parse_rsa_private_key(key: &Asn1Node<'_>) -> Result<RsaPrivateKey> {
    match key.child(0)?.value().first() {
        Some(&0) => {}
        Some(_) => return Err(Error::UnsupportedVersion),
        None => return Err(Error::MalformedKey),
    }

    let n = key.child(1)?.uint();
    let e = key.child(2)?.uint();
    let d = key.child(3)?.uint();
    let p = key.child(4)?.uint();
    let q = key.child(5)?.uint();
    let dp = key.child(6)?.uint();
    let dq = key.child(7)?.uint();
    let qinv = key.child(8)?.uint();

    RsaPrivateKey::from_pkcs1_components(n, e, d, p, q, dp, dq, qinv)
}

/// Parses a SEC1 `ECPrivateKey` sequence for a curve already resolved from
/// the outer algorithm identifier.
fn parse_ec_private_key(key: &Asn1Node<'_>, curve: NamedCurve) -> Result<EcdsaPrivateKey> {
    if key.child(0)?.value() != [1] {
        return Err(Error::UnsupportedVersion);
    }

    let scalar = key.child(1)?.value();

    // The public-key field wraps a BIT STRING with zero unused bits whose
    // payload must be an uncompressed SEC1 point: tag 3, then {0, 4} at
    // offsets 2-3.
    let public = key.child(2)?.value();
    if public.first() != Some(&3) || public.get(2..4) != Some(&[0, 4][..]) {
        return Err(Error::UnsupportedEncoding);
    }

    EcdsaPrivateKey::from_raw_parts(curve, scalar, &public[3..])
}
