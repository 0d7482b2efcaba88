//! Decoding of `eth_call` return data into [`DecodedValue`]s.
//!
//! Decoding is strict, except for one shape: a single dynamic array of static
//! elements. Some providers hand back truncated batch results whose declared length
//! exceeds the words actually present; those missing elements decode to the zero
//! value of the element kind instead of failing the whole read.

use alloy::{
    dyn_abi::{DynSolType, DynSolValue},
    primitives::{Address, Bytes, U256},
};
use serde_json::Value;

use crate::error::{ContractError, Result};
use crate::ethereum::abi::AbiKind;

const WORD: usize = 32;

/// A value decoded from contract return data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedValue {
    Uint(U256),
    Address(Address),
    Bool(bool),
    Bytes(Bytes),
    Array(Vec<DecodedValue>),
}

impl DecodedValue {
    /// Zero value for `kind`, used in place of absent batch elements.
    pub fn zero_of(kind: &AbiKind) -> Self {
        match kind {
            AbiKind::Uint256 => DecodedValue::Uint(U256::ZERO),
            AbiKind::Address => DecodedValue::Address(Address::ZERO),
            AbiKind::Bool => DecodedValue::Bool(false),
            AbiKind::Bytes => DecodedValue::Bytes(Bytes::new()),
            AbiKind::Array(_) => DecodedValue::Array(Vec::new()),
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            DecodedValue::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            DecodedValue::Address(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DecodedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            DecodedValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[DecodedValue]> {
        match self {
            DecodedValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// JSON rendering used for logging and for callers that forward results.
    pub fn to_json(&self) -> Value {
        match self {
            DecodedValue::Address(addr) => Value::String(format!("0x{:x}", addr)),
            DecodedValue::Uint(num) => Value::String(num.to_string()),
            DecodedValue::Bool(b) => Value::Bool(*b),
            DecodedValue::Bytes(bytes) => Value::String(format!("0x{}", hex::encode(bytes))),
            DecodedValue::Array(items) => {
                Value::Array(items.iter().map(DecodedValue::to_json).collect())
            }
        }
    }
}

/// Decodes `raw` according to `shape`.
///
/// Empty return data yields an empty sequence.
pub fn decode_output(raw: &[u8], shape: &[AbiKind]) -> Result<Vec<DecodedValue>> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let tuple = DynSolType::Tuple(shape.iter().map(AbiKind::sol_type).collect());
    match tuple.abi_decode_params(raw) {
        Ok(DynSolValue::Tuple(values)) => values.into_iter().map(from_sol_value).collect(),
        Ok(other) => Ok(vec![from_sol_value(other)?]),
        Err(e) => match shape {
            [AbiKind::Array(element)] if element.is_static() => {
                tracing::debug!("Strict decode failed ({}), decoding partial array", e);
                Ok(vec![decode_partial_array(raw, element)?])
            }
            _ => Err(ContractError::Decoding(format!(
                "Failed to decode output: {}",
                e
            ))),
        },
    }
}

/// Flattens a decoded integer array, e.g. a `balanceOfBatch` result.
pub fn uint_batch(value: &DecodedValue) -> Result<Vec<U256>> {
    let items = value.as_array().ok_or_else(|| {
        ContractError::Decoding(format!("expected an array result, got {:?}", value))
    })?;

    items
        .iter()
        .map(|item| {
            item.as_uint().ok_or_else(|| {
                ContractError::Decoding(format!("expected an integer element, got {:?}", item))
            })
        })
        .collect()
}

fn decode_partial_array(raw: &[u8], element: &AbiKind) -> Result<DecodedValue> {
    let offset = read_word(raw, 0, "array offset")?;
    if offset > U256::from(raw.len()) {
        return Err(ContractError::Decoding(format!(
            "array offset {} exceeds the {}-byte payload",
            offset,
            raw.len()
        )));
    }
    let offset = offset.to::<usize>();

    // length is capped by the number of words in the payload
    let length = read_word(raw, offset, "array length")?;
    let max_length = raw.len() / WORD;
    if length > U256::from(max_length) {
        return Err(ContractError::Decoding(format!(
            "array length {} exceeds the {} words in the payload",
            length, max_length
        )));
    }
    let length = length.to::<usize>();
    let body = offset + WORD;

    let element_type = element.sol_type();
    let mut items = Vec::with_capacity(length);
    for i in 0..length {
        let start = body + i * WORD;
        if start >= raw.len() {
            items.push(DecodedValue::zero_of(element));
            continue;
        }

        let word = raw.get(start..start + WORD).ok_or_else(|| {
            ContractError::Decoding(format!(
                "array element #{} is cut off after {} bytes",
                i,
                raw.len() - start
            ))
        })?;
        let value = element_type
            .abi_decode(word)
            .map_err(|e| ContractError::Decoding(format!("array element #{}: {}", i, e)))?;
        items.push(from_sol_value(value)?);
    }

    Ok(DecodedValue::Array(items))
}

fn read_word(raw: &[u8], at: usize, what: &str) -> Result<U256> {
    let word = raw.get(at..at + WORD).ok_or_else(|| {
        ContractError::Decoding(format!("{} word missing at byte {}", what, at))
    })?;
    Ok(U256::from_be_slice(word))
}

fn from_sol_value(value: DynSolValue) -> Result<DecodedValue> {
    match value {
        DynSolValue::Uint(num, _) => Ok(DecodedValue::Uint(num)),
        DynSolValue::Address(addr) => Ok(DecodedValue::Address(addr)),
        DynSolValue::Bool(b) => Ok(DecodedValue::Bool(b)),
        DynSolValue::Bytes(bytes) => Ok(DecodedValue::Bytes(bytes.into())),
        DynSolValue::Array(items) => Ok(DecodedValue::Array(
            items
                .into_iter()
                .map(from_sol_value)
                .collect::<Result<_>>()?,
        )),
        other => Err(ContractError::Decoding(format!(
            "Unsupported value in output: {:?}",
            other
        ))),
    }
}
