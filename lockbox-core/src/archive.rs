//! Typed values and the archiver that maps them to and from opaque bytes.
//!
//! Arbitrary values are expressed as a closed [`Value`] enum and archived to
//! self-describing CBOR. Decoding walks the whole reconstructed graph and
//! rejects any kind outside the caller's allow-list before a value is
//! returned, so attacker-influenced bytes can never materialize an
//! unexpected shape.
//!
//! Scalar accessors bypass the archive entirely: booleans, integers, and
//! floating-point values use fixed-width little-endian encodings defined at
//! the bottom of this module.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::{ArchiveError, DecodeError};

/// A typed value the facade can archive and reconstruct.
///
/// The set of variants is closed: it is the decode allow-list universe, the
/// analog of the class list a platform unarchiver would accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw byte blob.
    Bytes(Vec<u8>),
    /// Ordered list of values.
    List(Vec<Value>),
    /// String-keyed map of values.
    Map(BTreeMap<String, Value>),
}

/// The kind tag of a [`Value`], used in decode allow-lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ValueKind {
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Integer`]
    Integer,
    /// [`Value::Float`]
    Float,
    /// [`Value::Text`]
    Text,
    /// [`Value::Bytes`]
    Bytes,
    /// [`Value::List`]
    List,
    /// [`Value::Map`]
    Map,
}

/// Kinds every decode accepts without the caller asking.
///
/// Mirrors the conservative base class set of the original platform
/// unarchiver (strings, numbers, lists, maps). [`ValueKind::Bytes`] is the
/// one kind a caller must opt into explicitly.
pub const BASE_ALLOWED_KINDS: &[ValueKind] = &[
    ValueKind::Bool,
    ValueKind::Integer,
    ValueKind::Float,
    ValueKind::Text,
    ValueKind::List,
    ValueKind::Map,
];

impl Value {
    /// The kind tag of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
        }
    }

    /// Returns the boolean payload, if this is a [`Value::Bool`].
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is a [`Value::Integer`].
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the float payload, if this is a [`Value::Float`].
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text payload, if this is a [`Value::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the byte payload, if this is a [`Value::Bytes`].
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

/// Maps typed value graphs to opaque bytes and back.
///
/// `decode` must validate every kind in the reconstructed graph against the
/// allow-list and fail closed on a mismatch; it must never substitute a
/// default value for a rejected archive.
pub trait Archiver: Send + Sync {
    /// Archives `value` into a self-describing byte stream.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] when the value cannot be serialized.
    fn encode(&self, value: &Value) -> Result<Vec<u8>, ArchiveError>;

    /// Reconstructs a value from `bytes`.
    ///
    /// `allowed` is merged with [`BASE_ALLOWED_KINDS`]; any kind in the
    /// reconstructed graph outside the merged set is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MalformedPayload`] when the bytes do not parse,
    /// and [`DecodeError::DisallowedKind`] when the archive reconstructs a
    /// kind outside the allow-list.
    fn decode(&self, bytes: &[u8], allowed: &[ValueKind]) -> Result<Value, DecodeError>;
}

/// The shipped [`Archiver`]: CBOR via `ciborium`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CborArchiver;

impl Archiver for CborArchiver {
    fn encode(&self, value: &Value) -> Result<Vec<u8>, ArchiveError> {
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(value, &mut bytes).map_err(|err| ArchiveError {
            message: err.to_string(),
        })?;
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8], allowed: &[ValueKind]) -> Result<Value, DecodeError> {
        let value: Value =
            ciborium::de::from_reader(bytes).map_err(|err| DecodeError::MalformedPayload {
                context: err.to_string(),
            })?;
        ensure_allowed(&value, allowed)?;
        Ok(value)
    }
}

/// Walks the graph and rejects the first kind outside the merged allow-list.
fn ensure_allowed(value: &Value, allowed: &[ValueKind]) -> Result<(), DecodeError> {
    let kind = value.kind();
    if !BASE_ALLOWED_KINDS.contains(&kind) && !allowed.contains(&kind) {
        return Err(DecodeError::DisallowedKind { found: kind });
    }
    match value {
        Value::List(items) => items.iter().try_for_each(|item| ensure_allowed(item, allowed)),
        Value::Map(entries) => entries
            .values()
            .try_for_each(|entry| ensure_allowed(entry, allowed)),
        _ => Ok(()),
    }
}

// Fixed-width scalar encodings. Little-endian throughout; writer and reader
// must agree, and the decoders reject any length mismatch.

pub(crate) fn encode_bool(value: bool) -> [u8; 1] {
    [u8::from(value)]
}

pub(crate) fn decode_bool(bytes: &[u8]) -> Result<bool, DecodeError> {
    match bytes {
        [0] => Ok(false),
        [1] => Ok(true),
        _ => Err(DecodeError::MalformedPayload {
            context: format!("expected 1 boolean byte, got {} bytes", bytes.len()),
        }),
    }
}

pub(crate) fn encode_i64(value: i64) -> [u8; 8] {
    value.to_le_bytes()
}

pub(crate) fn decode_i64(bytes: &[u8]) -> Result<i64, DecodeError> {
    fixed_width(bytes, "integer").map(i64::from_le_bytes)
}

pub(crate) fn encode_f32(value: f32) -> [u8; 4] {
    value.to_le_bytes()
}

pub(crate) fn decode_f32(bytes: &[u8]) -> Result<f32, DecodeError> {
    fixed_width(bytes, "float").map(f32::from_le_bytes)
}

pub(crate) fn encode_f64(value: f64) -> [u8; 8] {
    value.to_le_bytes()
}

pub(crate) fn decode_f64(bytes: &[u8]) -> Result<f64, DecodeError> {
    fixed_width(bytes, "double").map(f64::from_le_bytes)
}

fn fixed_width<const N: usize>(bytes: &[u8], what: &str) -> Result<[u8; N], DecodeError> {
    bytes
        .try_into()
        .map_err(|_| DecodeError::MalformedPayload {
            context: format!("expected {N} {what} bytes, got {}", bytes.len()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_round_trip() {
        let archiver = CborArchiver;
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), Value::from("token"));
        map.insert("uses".to_string(), Value::from(3_i64));
        let value = Value::Map(map);

        let bytes = archiver.encode(&value).unwrap();
        let decoded = archiver.decode(&bytes, &[]).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_decode_rejects_bytes_kind_by_default() {
        let archiver = CborArchiver;
        let bytes = archiver.encode(&Value::from(b"blob".to_vec())).unwrap();

        let err = archiver.decode(&bytes, &[]).unwrap_err();
        assert_eq!(err, DecodeError::DisallowedKind { found: ValueKind::Bytes });

        // Explicitly allowing the kind makes the same bytes decode.
        let decoded = archiver.decode(&bytes, &[ValueKind::Bytes]).unwrap();
        assert_eq!(decoded, Value::from(b"blob".to_vec()));
    }

    #[test]
    fn test_decode_rejects_nested_disallowed_kind() {
        let archiver = CborArchiver;
        let value = Value::List(vec![Value::from(1_i64), Value::from(b"blob".to_vec())]);
        let bytes = archiver.encode(&value).unwrap();

        let err = archiver.decode(&bytes, &[]).unwrap_err();
        assert_eq!(err, DecodeError::DisallowedKind { found: ValueKind::Bytes });
    }

    #[test]
    fn test_decode_malformed_archive() {
        let archiver = CborArchiver;
        let err = archiver.decode(b"\xffnot cbor", &[]).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedPayload { .. }));
    }

    #[test]
    fn test_scalar_codecs_round_trip() {
        assert!(decode_bool(&encode_bool(true)).unwrap());
        assert!(!decode_bool(&encode_bool(false)).unwrap());
        assert_eq!(decode_i64(&encode_i64(-1)).unwrap(), -1);
        assert_eq!(decode_i64(&encode_i64(i64::MAX)).unwrap(), i64::MAX);
        assert_eq!(decode_f32(&encode_f32(3.14)).unwrap(), 3.14);
        assert_eq!(decode_f64(&encode_f64(-2.5)).unwrap(), -2.5);
    }

    #[test]
    fn test_scalar_codecs_reject_wrong_width() {
        assert!(decode_bool(&[2]).is_err());
        assert!(decode_bool(&[]).is_err());
        assert!(decode_i64(&[0; 4]).is_err());
        assert!(decode_f32(&[0; 8]).is_err());
        assert!(decode_f64(&[0; 7]).is_err());
    }
}
