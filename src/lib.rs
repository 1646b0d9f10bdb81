#![warn(missing_docs)]

//! Private-key ingestion and RSA private-key operations for a TLS stack.
//!
//! Two halves:
//!
//! - **Container decoding**: [`PrivateKey::from_labeled_der`] takes DER
//!   bytes already stripped of their PEM armor, together with the PEM type
//!   label, and produces either an RSA key or a P-256 ECDSA key pair.
//!   PKCS#8 `PrivateKeyInfo` and the two legacy SSLeay encodings are
//!   supported.
//! - **The RSA engine**: [`RsaPrivateKey::private_op`] computes the raw
//!   private-key transform through the Chinese remainder theorem on a
//!   blinded input, and [`RsaPrivateKey::public_op`] the matching public
//!   transform. The blinding state persists on the key and is advanced by
//!   every call.
//!
//! PEM armor handling, padding schemes and the TLS handshake all live in
//! neighboring layers; this crate starts at DER bytes and ends at raw
//! modular arithmetic or a [`p256`] key pair.
//!
//! # Example
//!
//! ```
//! use tlskey::{BigUint, RsaPrivateKey};
//!
//! # fn main() -> tlskey::Result<()> {
//! let mut rng = rand::thread_rng();
//! let mut key = RsaPrivateKey::new(&mut rng, 512)?;
//!
//! let m = BigUint::from(42u32);
//! let c = key.public_op(&m);
//! assert_eq!(key.private_op(&mut rng, &c)?, m);
//! # Ok(())
//! # }
//! ```

pub use num_bigint::BigUint;
pub use p256;
pub use rand_core;

mod algorithms;
mod asn1;
mod decode;
mod ec;
pub mod errors;
mod internals;
mod key;

pub use crate::{
    ec::{EcdsaPrivateKey, NamedCurve},
    errors::{Error, Result},
    key::{PrivateKey, PublicKeyParts, RsaPrivateKey},
};
