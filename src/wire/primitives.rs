//! Strict hex forms of Ethereum primitive values
//!
//! Every value travels as a `0x`-prefixed hex string. Parsing accepts
//! exactly one shape per type and fails with the expected pattern;
//! serializing always produces canonical lowercase hex, left-padded to the
//! type's width when it has one.

use alloy::hex;
use alloy::primitives::{Address, Bytes, FixedBytes, U256};
use serde::{Deserialize, Deserializer, Serializer};

use crate::error::{Error, Result};

pub const QUANTITY_PATTERN: &str = "0x followed by 1-64 hex digits";
pub const ADDRESS_PATTERN: &str = "0x followed by exactly 40 hex digits";
pub const BYTES_PATTERN: &str = "0x followed by an even number of hex digits";

/// A value with a single canonical hex wire form
pub trait WireValue: Sized {
    /// Parses the wire form, rejecting any other shape
    fn parse_wire(s: &str) -> Result<Self>;

    /// Produces the canonical wire form
    fn to_wire(&self) -> String;
}

fn strip_hex<'a>(s: &'a str, expected: &'static str) -> Result<&'a str> {
    let digits = s.strip_prefix("0x").ok_or_else(|| Error::wire(expected, s))?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::wire(expected, s));
    }
    Ok(digits)
}

/// Parses a quantity: `0x` and 1 to 64 hex digits
pub fn parse_quantity(s: &str) -> Result<U256> {
    let digits = strip_hex(s, QUANTITY_PATTERN)?;
    if digits.is_empty() || digits.len() > 64 {
        return Err(Error::wire(QUANTITY_PATTERN, s));
    }
    U256::from_str_radix(digits, 16).map_err(|_| Error::wire(QUANTITY_PATTERN, s))
}

/// Formats a quantity in minimal form (`0x0` for zero)
pub fn format_quantity(value: U256) -> String {
    format!("0x{value:x}")
}

/// Parses an address: `0x` and exactly 40 hex digits
pub fn parse_address(s: &str) -> Result<Address> {
    let digits = strip_hex(s, ADDRESS_PATTERN)?;
    if digits.len() != 40 {
        return Err(Error::wire(ADDRESS_PATTERN, s));
    }
    let raw = hex::decode(digits).map_err(|_| Error::wire(ADDRESS_PATTERN, s))?;
    Ok(Address::from_slice(&raw))
}

/// Formats an address as 42 lowercase characters
pub fn format_address(address: Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

/// Parses an arbitrary-length byte string; bare `0x` is empty
pub fn parse_bytes(s: &str) -> Result<Bytes> {
    let digits = strip_hex(s, BYTES_PATTERN)?;
    if digits.len() % 2 != 0 {
        return Err(Error::wire(BYTES_PATTERN, s));
    }
    let raw = hex::decode(digits).map_err(|_| Error::wire(BYTES_PATTERN, s))?;
    Ok(Bytes::from(raw))
}

pub fn format_bytes(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

impl WireValue for U256 {
    fn parse_wire(s: &str) -> Result<Self> {
        parse_quantity(s)
    }

    fn to_wire(&self) -> String {
        format_quantity(*self)
    }
}

impl WireValue for u64 {
    fn parse_wire(s: &str) -> Result<Self> {
        let value = parse_quantity(s)?;
        u64::try_from(value).map_err(|_| Error::wire("quantity fitting in 64 bits", s))
    }

    fn to_wire(&self) -> String {
        format!("0x{self:x}")
    }
}

impl WireValue for u128 {
    fn parse_wire(s: &str) -> Result<Self> {
        let value = parse_quantity(s)?;
        u128::try_from(value).map_err(|_| Error::wire("quantity fitting in 128 bits", s))
    }

    fn to_wire(&self) -> String {
        format!("0x{self:x}")
    }
}

impl WireValue for Address {
    fn parse_wire(s: &str) -> Result<Self> {
        parse_address(s)
    }

    fn to_wire(&self) -> String {
        format_address(*self)
    }
}

impl WireValue for Bytes {
    fn parse_wire(s: &str) -> Result<Self> {
        parse_bytes(s)
    }

    fn to_wire(&self) -> String {
        format_bytes(self)
    }
}

/// Fixed-width byte strings: bytes32 is 64 hex digits, bytes256 is 512
impl<const N: usize> WireValue for FixedBytes<N> {
    fn parse_wire(s: &str) -> Result<Self> {
        let expected = match N {
            32 => "0x followed by exactly 64 hex digits",
            256 => "0x followed by exactly 512 hex digits",
            _ => "0x followed by a fixed-width hex string",
        };
        let digits = strip_hex(s, expected)?;
        if digits.len() != N * 2 {
            return Err(Error::wire(expected, s));
        }
        let raw = hex::decode(digits).map_err(|_| Error::wire(expected, s))?;
        Ok(FixedBytes::from_slice(&raw))
    }

    fn to_wire(&self) -> String {
        format_bytes(self.as_slice())
    }
}

/// `#[serde(with = "strict")]` for a required wire value
pub mod strict {
    use super::*;

    pub fn serialize<T: WireValue, S: Serializer>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_wire())
    }

    pub fn deserialize<'de, T: WireValue, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<T, D::Error> {
        let s = String::deserialize(deserializer)?;
        T::parse_wire(&s).map_err(serde::de::Error::custom)
    }
}

/// `#[serde(default, with = "strict_opt")]` for a nullable or absent wire value
pub mod strict_opt {
    use super::*;

    pub fn serialize<T: WireValue, S: Serializer>(
        value: &Option<T>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_str(&v.to_wire()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T: WireValue, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<T>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| T::parse_wire(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// `#[serde(with = "strict_vec")]` for a list of wire values
pub mod strict_vec {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<T: WireValue, S: Serializer>(values: &[T], serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&value.to_wire())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, T: WireValue, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<T>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|s| T::parse_wire(s).map_err(serde::de::Error::custom))
            .collect()
    }
}
