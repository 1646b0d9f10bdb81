//! Positional DER tree walking on top of the [`der`] reader.
//!
//! The container decoder never needs more than a node's content octets and
//! indexed access to the children of constructed nodes, so this adapter
//! parses a blob eagerly into that shape. Anything `der` rejects surfaces as
//! [`Error::MalformedKey`], as does indexing past the last child.

use const_oid::ObjectIdentifier;
use der::{asn1::AnyRef, Decode, Reader, SliceReader, Tagged};
use num_bigint::BigUint;

use crate::errors::{Error, Result};

const CONSTRUCTED: u8 = 0b0010_0000;

/// A parsed DER element: its content octets plus, for constructed elements,
/// the parsed children in encoding order.
pub(crate) struct Asn1Node<'a> {
    value: &'a [u8],
    children: Vec<Asn1Node<'a>>,
}

impl<'a> Asn1Node<'a> {
    /// Parses the first DER element of `input`.
    pub(crate) fn parse(input: &'a [u8]) -> Result<Self> {
        let mut reader = SliceReader::new(input)?;
        Self::decode_node(&mut reader)
    }

    fn decode_node(reader: &mut SliceReader<'a>) -> Result<Self> {
        let any = AnyRef::decode(reader)?;
        let value = any.value();
        let children = if any.tag().octet() & CONSTRUCTED != 0 {
            Self::decode_children(value)?
        } else {
            Vec::new()
        };
        Ok(Asn1Node { value, children })
    }

    fn decode_children(value: &'a [u8]) -> Result<Vec<Self>> {
        let mut reader = SliceReader::new(value)?;
        let mut children = Vec::new();
        while !reader.is_finished() {
            children.push(Self::decode_node(&mut reader)?);
        }
        Ok(children)
    }

    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Positional child access; a missing child is a structural failure.
    pub(crate) fn child(&self, index: usize) -> Result<&Asn1Node<'a>> {
        self.children.get(index).ok_or(Error::MalformedKey)
    }

    /// Raw content octets.
    pub(crate) fn value(&self) -> &'a [u8] {
        self.value
    }

    /// Content octets read as a big-endian unsigned integer.
    pub(crate) fn uint(&self) -> BigUint {
        BigUint::from_bytes_be(self.value)
    }

    /// Content octets read as an object identifier.
    pub(crate) fn oid(&self) -> Result<ObjectIdentifier> {
        ObjectIdentifier::from_bytes(self.value).map_err(|_| Error::MalformedKey)
    }
}
