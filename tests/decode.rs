//! Container decoding tests.
//!
//! Fixtures are built with a minimal test-only DER encoder so that the
//! generate -> encode -> decode round trip is exercised without the crate
//! growing an encoder of its own.

use hex_literal::hex;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use tlskey::p256::ecdsa::signature::{Signer, Verifier};
use tlskey::p256::ecdsa::{Signature, SigningKey};
use tlskey::{BigUint, Error, NamedCurve, PrivateKey, PublicKeyParts, RsaPrivateKey};

// Private scalar from RFC 6979, A.2.5.
const EC_SCALAR: [u8; 32] =
    hex!("c9afa9d845ba75166b5c215767b1d6934e50c3db36e89b127b8a622b120f6721");

// --- test-only DER encoder -------------------------------------------------

fn der_len(len: usize) -> Vec<u8> {
    if len < 0x80 {
        vec![len as u8]
    } else if len < 0x100 {
        vec![0x81, len as u8]
    } else {
        vec![0x82, (len >> 8) as u8, len as u8]
    }
}

fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend(der_len(content.len()));
    out.extend_from_slice(content);
    out
}

fn der_uint(value: &BigUint) -> Vec<u8> {
    let mut bytes = value.to_bytes_be();
    if bytes[0] & 0x80 != 0 {
        bytes.insert(0, 0);
    }
    tlv(0x02, &bytes)
}

fn der_seq(children: &[Vec<u8>]) -> Vec<u8> {
    tlv(0x30, &children.concat())
}

fn der_null() -> Vec<u8> {
    tlv(0x05, &[])
}

fn oid_rsa() -> Vec<u8> {
    tlv(0x06, &hex!("2a864886f70d010101"))
}

fn oid_rsa_pss() -> Vec<u8> {
    tlv(0x06, &hex!("2a864886f70d01010a"))
}

fn oid_ec() -> Vec<u8> {
    tlv(0x06, &hex!("2a8648ce3d0201"))
}

fn oid_p256() -> Vec<u8> {
    tlv(0x06, &hex!("2a8648ce3d030107"))
}

/// PKCS#1 `RSAPrivateKey` with an arbitrary version field.
fn pkcs1_der_with_version(key: &RsaPrivateKey, version: u8) -> Vec<u8> {
    der_seq(&[
        der_uint(&BigUint::from(version)),
        der_uint(key.n()),
        der_uint(key.e()),
        der_uint(key.d()),
        der_uint(&key.primes()[0]),
        der_uint(&key.primes()[1]),
        der_uint(key.dp().unwrap()),
        der_uint(key.dq().unwrap()),
        der_uint(key.qinv().unwrap()),
    ])
}

fn pkcs1_der(key: &RsaPrivateKey) -> Vec<u8> {
    pkcs1_der_with_version(key, 0)
}

/// PKCS#8 `PrivateKeyInfo` around an already-encoded inner key.
fn pkcs8_der(algorithm: Vec<u8>, inner: &[u8]) -> Vec<u8> {
    der_seq(&[
        der_uint(&BigUint::from(0u8)),
        algorithm,
        tlv(0x04, inner),
    ])
}

/// SEC1 `ECPrivateKey`, optionally carrying the named-curve parameters.
fn sec1_ec_der(scalar: &[u8], point: &[u8], with_params: bool) -> Vec<u8> {
    let mut bit_string_content = vec![0u8];
    bit_string_content.extend_from_slice(point);
    let public = tlv(0xa1, &tlv(0x03, &bit_string_content));

    let mut children = vec![tlv(0x02, &[1]), tlv(0x04, scalar)];
    if with_params {
        children.push(tlv(0xa0, &oid_p256()));
    }
    children.push(public);
    der_seq(&children)
}

fn test_rsa_key() -> RsaPrivateKey {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);
    RsaPrivateKey::new(&mut rng, 256).unwrap()
}

fn ec_point() -> Vec<u8> {
    let signing_key = SigningKey::from_slice(&EC_SCALAR).unwrap();
    signing_key
        .verifying_key()
        .to_encoded_point(false)
        .as_bytes()
        .to_vec()
}

// --- RSA -------------------------------------------------------------------

#[test]
fn decodes_pkcs8_rsa_and_round_trips_the_fields() {
    let key = test_rsa_key();
    let der = pkcs8_der(der_seq(&[oid_rsa(), der_null()]), &pkcs1_der(&key));

    let decoded = match PrivateKey::from_labeled_der("PRIVATE KEY", &der).unwrap() {
        PrivateKey::Rsa(decoded) => decoded,
        PrivateKey::Ecdsa(_) => panic!("expected an RSA key"),
    };

    assert_eq!(decoded, key);
    assert_eq!(decoded.dp(), key.dp());
    assert_eq!(decoded.dq(), key.dq());
    assert_eq!(decoded.qinv(), key.qinv());
}

#[test]
fn decodes_legacy_ssleay_rsa() {
    let mut rng = ChaCha8Rng::from_seed([1; 32]);
    let key = test_rsa_key();
    let der = pkcs1_der(&key);

    let mut decoded = match PrivateKey::from_labeled_der("RSA PRIVATE KEY", &der).unwrap() {
        PrivateKey::Rsa(decoded) => decoded,
        PrivateKey::Ecdsa(_) => panic!("expected an RSA key"),
    };

    assert_eq!(decoded, key);
    assert!(decoded.has_private_key());

    // The decoded key must be operational, not just field-equal.
    let m = BigUint::from(0xc0ffeeu32);
    let c = decoded.public_op(&m);
    assert_eq!(decoded.private_op(&mut rng, &c).unwrap(), m);
}

#[test]
fn rsa_pss_parameters_are_not_restricted() {
    let key = test_rsa_key();
    let pkcs1 = pkcs1_der(&key);

    // Any parameter encoding must be accepted for PSS, including none.
    let with_params = pkcs8_der(der_seq(&[oid_rsa_pss(), der_seq(&[])]), &pkcs1);
    let without_params = pkcs8_der(der_seq(&[oid_rsa_pss()]), &pkcs1);

    for der in [with_params, without_params] {
        assert!(matches!(
            PrivateKey::from_labeled_der("PRIVATE KEY", &der),
            Ok(PrivateKey::Rsa(_))
        ));
    }
}

#[test]
fn rsa_parameters_must_be_null() {
    let key = test_rsa_key();
    let alg = der_seq(&[oid_rsa(), der_uint(&BigUint::from(0u8))]);
    let der = pkcs8_der(alg, &pkcs1_der(&key));

    assert_eq!(
        PrivateKey::from_labeled_der("PRIVATE KEY", &der).err(),
        Some(Error::MalformedKey)
    );
}

#[test]
fn rsa_parameters_must_be_present() {
    let key = test_rsa_key();
    let der = pkcs8_der(der_seq(&[oid_rsa()]), &pkcs1_der(&key));

    assert_eq!(
        PrivateKey::from_labeled_der("PRIVATE KEY", &der).err(),
        Some(Error::MalformedKey)
    );
}

#[test]
fn oversized_algorithm_identifier_is_rejected() {
    let key = test_rsa_key();
    let pkcs1 = pkcs1_der(&key);

    let rsa_alg = der_seq(&[oid_rsa(), der_null(), der_null()]);
    let pss_alg = der_seq(&[oid_rsa_pss(), der_seq(&[]), der_null()]);

    for alg in [rsa_alg, pss_alg] {
        let der = pkcs8_der(alg, &pkcs1);
        assert_eq!(
            PrivateKey::from_labeled_der("PRIVATE KEY", &der).err(),
            Some(Error::MalformedKey)
        );
    }
}

#[test]
fn unknown_algorithm_oid_is_rejected() {
    let key = test_rsa_key();
    // md2WithRSAEncryption: a valid OID, but not a key algorithm.
    let alg = der_seq(&[tlv(0x06, &hex!("2a864886f70d010102")), der_null()]);
    let der = pkcs8_der(alg, &pkcs1_der(&key));

    assert!(matches!(
        PrivateKey::from_labeled_der("PRIVATE KEY", &der),
        Err(Error::UnsupportedAlgorithm(_))
    ));
}

#[test]
fn legacy_rsa_with_nonzero_version_is_rejected() {
    let key = test_rsa_key();
    let der = pkcs1_der_with_version(&key, 1);

    assert_eq!(
        PrivateKey::from_labeled_der("RSA PRIVATE KEY", &der).err(),
        Some(Error::UnsupportedVersion)
    );
}

#[test]
fn truncated_rsa_key_is_rejected() {
    let key = test_rsa_key();
    let der = der_seq(&[
        der_uint(&BigUint::from(0u8)),
        der_uint(key.n()),
        der_uint(key.e()),
        der_uint(key.d()),
    ]);

    assert_eq!(
        PrivateKey::from_labeled_der("RSA PRIVATE KEY", &der).err(),
        Some(Error::MalformedKey)
    );
}

// --- PKCS#8 envelope -------------------------------------------------------

#[test]
fn unknown_label_is_rejected() {
    assert_eq!(
        PrivateKey::from_labeled_der("CERTIFICATE", &[0x30, 0x00]).err(),
        Some(Error::InvalidContainer)
    );
}

#[test]
fn pkcs8_version_must_be_zero() {
    let key = test_rsa_key();
    let der = der_seq(&[
        der_uint(&BigUint::from(1u8)),
        der_seq(&[oid_rsa(), der_null()]),
        tlv(0x04, &pkcs1_der(&key)),
    ]);

    assert_eq!(
        PrivateKey::from_labeled_der("PRIVATE KEY", &der).err(),
        Some(Error::MalformedKey)
    );
}

#[test]
fn pkcs8_must_have_three_children() {
    let der = der_seq(&[
        der_uint(&BigUint::from(0u8)),
        der_seq(&[oid_rsa(), der_null()]),
    ]);

    assert_eq!(
        PrivateKey::from_labeled_der("PRIVATE KEY", &der).err(),
        Some(Error::MalformedKey)
    );
}

#[test]
fn garbage_der_is_rejected() {
    assert_eq!(
        PrivateKey::from_labeled_der("PRIVATE KEY", &hex!("020100")).err(),
        Some(Error::MalformedKey)
    );
}

// --- EC --------------------------------------------------------------------

#[test]
fn decodes_pkcs8_p256_key_pair() {
    let point = ec_point();
    let inner = sec1_ec_der(&EC_SCALAR, &point, false);
    let der = pkcs8_der(der_seq(&[oid_ec(), oid_p256()]), &inner);

    let decoded = match PrivateKey::from_labeled_der("PRIVATE KEY", &der).unwrap() {
        PrivateKey::Ecdsa(decoded) => decoded,
        PrivateKey::Rsa(_) => panic!("expected an EC key"),
    };

    assert_eq!(decoded.curve(), NamedCurve::NistP256);
    assert_eq!(
        decoded.verifying_key().to_encoded_point(false).as_bytes(),
        point.as_slice()
    );

    // The decoded pair must actually sign and verify.
    let message = b"sample";
    let signature: Signature = decoded.signing_key().sign(message);
    decoded.verifying_key().verify(message, &signature).unwrap();
}

#[test]
fn decodes_legacy_ssleay_ec() {
    let point = ec_point();
    let der = sec1_ec_der(&EC_SCALAR, &point, true);

    let decoded = match PrivateKey::from_labeled_der("EC PRIVATE KEY", &der).unwrap() {
        PrivateKey::Ecdsa(decoded) => decoded,
        PrivateKey::Rsa(_) => panic!("expected an EC key"),
    };

    // The verifying key is synthesized from the scalar on this path.
    assert_eq!(decoded.curve(), NamedCurve::NistP256);
    assert_eq!(
        decoded.verifying_key().to_encoded_point(false).as_bytes(),
        point.as_slice()
    );
}

#[test]
fn unsupported_curve_is_rejected() {
    let point = ec_point();
    let inner = sec1_ec_der(&EC_SCALAR, &point, false);
    // secp384r1
    let alg = der_seq(&[oid_ec(), tlv(0x06, &hex!("2b81040022"))]);
    let der = pkcs8_der(alg, &inner);

    assert!(matches!(
        PrivateKey::from_labeled_der("PRIVATE KEY", &der),
        Err(Error::UnsupportedCurve(_))
    ));
}

#[test]
fn ec_version_must_be_one() {
    let point = ec_point();

    let mut bit_string_content = vec![0u8];
    bit_string_content.extend_from_slice(&point);
    let inner = der_seq(&[
        tlv(0x02, &[2]),
        tlv(0x04, &EC_SCALAR),
        tlv(0xa1, &tlv(0x03, &bit_string_content)),
    ]);
    let der = pkcs8_der(der_seq(&[oid_ec(), oid_p256()]), &inner);

    assert_eq!(
        PrivateKey::from_labeled_der("PRIVATE KEY", &der).err(),
        Some(Error::UnsupportedVersion)
    );
}

#[test]
fn compressed_ec_points_are_rejected() {
    let signing_key = SigningKey::from_slice(&EC_SCALAR).unwrap();
    let compressed = signing_key.verifying_key().to_encoded_point(true);

    let inner = sec1_ec_der(&EC_SCALAR, compressed.as_bytes(), false);
    let der = pkcs8_der(der_seq(&[oid_ec(), oid_p256()]), &inner);

    assert_eq!(
        PrivateKey::from_labeled_der("PRIVATE KEY", &der).err(),
        Some(Error::UnsupportedEncoding)
    );
}

#[test]
fn decoded_keys_report_private_material() {
    let key = test_rsa_key();
    let rsa = PrivateKey::from_labeled_der("RSA PRIVATE KEY", &pkcs1_der(&key)).unwrap();
    assert!(rsa.has_private_key());

    let point = ec_point();
    let ec =
        PrivateKey::from_labeled_der("EC PRIVATE KEY", &sec1_ec_der(&EC_SCALAR, &point, true))
            .unwrap();
    assert!(ec.has_private_key());
}
