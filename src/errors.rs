//! Error types.

use core::fmt;

use const_oid::ObjectIdentifier;

/// Alias for [`core::result::Result`] with the crate [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported while decoding a private-key container or performing an
/// RSA key operation.
///
/// Every decoding failure is fatal and local: no partial key is ever
/// returned, and the variant identifies which check rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The PEM type label is not one of the recognized private-key
    /// containers.
    InvalidContainer,

    /// Structural ASN.1 violation: malformed DER, a wrong child count, a
    /// fixed constant with the wrong value, or a missing encapsulation.
    MalformedKey,

    /// The algorithm identifier names an algorithm this crate does not
    /// handle.
    UnsupportedAlgorithm(ObjectIdentifier),

    /// The EC algorithm identifier names a curve other than NIST P-256.
    UnsupportedCurve(ObjectIdentifier),

    /// The EC public-key field does not carry an uncompressed SEC1 point.
    UnsupportedEncoding,

    /// The inner private-key structure carries an unrecognized version
    /// number.
    UnsupportedVersion,

    /// A private operation was invoked on a key without private material.
    MissingPrivateMaterial,

    /// A private exponent was supplied or requested without the pair of
    /// prime factors that the CRT parameters are computed from.
    MissingPrimes,

    /// The input to the private operation is not reduced modulo `n`.
    InputOutOfRange,

    /// The modulus is zero.
    InvalidModulus,

    /// A prime factor is zero, one, or otherwise unusable.
    InvalidPrime,

    /// The public exponent is not invertible modulo the totient.
    InvalidExponent,

    /// The CRT coefficient could not be computed.
    InvalidCoefficient,

    /// The requested key size is below the supported floor.
    KeySizeTooSmall,

    /// The CRT result failed the consistency re-check.
    Internal,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidContainer => write!(f, "unrecognized private-key container label"),
            Error::MalformedKey => write!(f, "malformed key structure"),
            Error::UnsupportedAlgorithm(oid) => write!(f, "unsupported key algorithm: {}", oid),
            Error::UnsupportedCurve(oid) => write!(f, "unsupported curve: {}", oid),
            Error::UnsupportedEncoding => write!(f, "unsupported public-key encoding"),
            Error::UnsupportedVersion => write!(f, "unsupported key structure version"),
            Error::MissingPrivateMaterial => write!(f, "key has no private material"),
            Error::MissingPrimes => write!(f, "missing prime factors"),
            Error::InputOutOfRange => write!(f, "input out of range"),
            Error::InvalidModulus => write!(f, "invalid modulus"),
            Error::InvalidPrime => write!(f, "invalid prime value"),
            Error::InvalidExponent => write!(f, "invalid public exponent"),
            Error::InvalidCoefficient => write!(f, "invalid CRT coefficient"),
            Error::KeySizeTooSmall => write!(f, "key size too small"),
            Error::Internal => write!(f, "internal error"),
        }
    }
}

impl std::error::Error for Error {}

impl From<der::Error> for Error {
    fn from(_: der::Error) -> Error {
        Error::MalformedKey
    }
}
