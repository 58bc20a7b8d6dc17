//! Canonical CBOR encoding for instruction signing.
//!
//! Follows RFC 8949 Core Deterministic Encoding for the subset of values
//! instructions use:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//!
//! Signatures are computed over these bytes, so the same instruction must
//! encode identically on every platform.

use ciborium::value::Value;

use crate::error::CoreError;

/// Encode a CBOR value to canonical bytes.
pub fn encode_canonical(value: &Value) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value)?;
    Ok(buf)
}

/// Decode a CBOR value from bytes.
pub fn decode(bytes: &[u8]) -> Result<Value, CoreError> {
    ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
}

fn encode_value_to(buf: &mut Vec<u8>, value: &Value) -> Result<(), CoreError> {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => {
            encode_uint(buf, 2, b.len() as u64);
            buf.extend_from_slice(b);
        }
        Value::Text(s) => {
            encode_uint(buf, 3, s.len() as u64);
            buf.extend_from_slice(s.as_bytes());
        }
        Value::Map(entries) => encode_map_canonical(buf, entries)?,
        other => {
            return Err(CoreError::EncodingError(format!(
                "unsupported value in canonical encoding: {:?}",
                other
            )))
        }
    }
    Ok(())
}

fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) -> Result<(), CoreError> {
    let mut pairs: Vec<(Vec<u8>, &Value)> = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        let mut key_buf = Vec::new();
        encode_value_to(&mut key_buf, k)?;
        pairs.push((key_buf, v));
    }

    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, pairs.len() as u64);
    for (key_bytes, value) in pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value)?;
    }
    Ok(())
}

/// Look up an integer-keyed map entry.
pub(crate) fn map_get(entries: &[(Value, Value)], key: u64) -> Option<&Value> {
    entries.iter().find_map(|(k, v)| match k {
        Value::Integer(i) if u64::try_from(*i).ok() == Some(key) => Some(v),
        _ => None,
    })
}

pub(crate) fn bytes32(value: Option<&Value>, field: &str) -> Result<[u8; 32], CoreError> {
    match value {
        Some(Value::Bytes(b)) => b
            .as_slice()
            .try_into()
            .map_err(|_| CoreError::DecodingError(format!("{} must be 32 bytes", field))),
        _ => Err(CoreError::DecodingError(format!("missing {}", field))),
    }
}

pub(crate) fn uint(value: Option<&Value>, field: &str) -> Result<u64, CoreError> {
    match value {
        Some(Value::Integer(i)) => u64::try_from(*i)
            .map_err(|_| CoreError::DecodingError(format!("{} out of range", field))),
        _ => Err(CoreError::DecodingError(format!("missing {}", field))),
    }
}

pub(crate) fn text(value: Option<&Value>, field: &str) -> Result<String, CoreError> {
    match value {
        Some(Value::Text(s)) => Ok(s.clone()),
        _ => Err(CoreError::DecodingError(format!("missing {}", field))),
    }
}
