//! Typed call arguments and calldata encoding.
//!
//! Word packing is delegated to `alloy::dyn_abi`; this module only builds the
//! canonical signature, the selector, and the argument tuple handed to the codec.

use alloy::{
    dyn_abi::{DynSolType, DynSolValue},
    primitives::{keccak256, ruint::UintTryFrom, Address, Bytes, U256},
};
use std::fmt;

use crate::error::{ContractError, Result};
use crate::ethereum::utils;

/// ABI kinds supported by calls and result shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiKind {
    Uint256,
    Address,
    Bool,
    Bytes,
    Array(Box<AbiKind>),
}

impl AbiKind {
    pub fn array_of(element: AbiKind) -> Self {
        AbiKind::Array(Box::new(element))
    }

    /// Whether values of this kind occupy exactly one head word.
    pub fn is_static(&self) -> bool {
        matches!(self, AbiKind::Uint256 | AbiKind::Address | AbiKind::Bool)
    }

    pub(crate) fn sol_type(&self) -> DynSolType {
        match self {
            AbiKind::Uint256 => DynSolType::Uint(256),
            AbiKind::Address => DynSolType::Address,
            AbiKind::Bool => DynSolType::Bool,
            AbiKind::Bytes => DynSolType::Bytes,
            AbiKind::Array(element) => DynSolType::Array(Box::new(element.sol_type())),
        }
    }
}

impl fmt::Display for AbiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiKind::Uint256 => f.write_str("uint256"),
            AbiKind::Address => f.write_str("address"),
            AbiKind::Bool => f.write_str("bool"),
            AbiKind::Bytes => f.write_str("bytes"),
            AbiKind::Array(element) => write!(f, "{}[]", element),
        }
    }
}

/// A call argument together with its ABI kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    Uint256(U256),
    Address(Address),
    Bool(bool),
    Bytes(Bytes),
    /// Homogeneous dynamic array. `element` is kept even when `items` is empty so the
    /// canonical signature stays well defined.
    Array {
        element: AbiKind,
        items: Vec<TypedValue>,
    },
}

impl TypedValue {
    pub fn uint<V>(value: V) -> Self
    where
        U256: UintTryFrom<V>,
    {
        TypedValue::Uint256(U256::from(value))
    }

    pub fn bytes(data: impl Into<Bytes>) -> Self {
        TypedValue::Bytes(data.into())
    }

    pub fn address_array(addresses: impl IntoIterator<Item = Address>) -> Self {
        TypedValue::Array {
            element: AbiKind::Address,
            items: addresses.into_iter().map(TypedValue::Address).collect(),
        }
    }

    pub fn uint_array(values: impl IntoIterator<Item = U256>) -> Self {
        TypedValue::Array {
            element: AbiKind::Uint256,
            items: values.into_iter().map(TypedValue::Uint256).collect(),
        }
    }

    pub fn kind(&self) -> AbiKind {
        match self {
            TypedValue::Uint256(_) => AbiKind::Uint256,
            TypedValue::Address(_) => AbiKind::Address,
            TypedValue::Bool(_) => AbiKind::Bool,
            TypedValue::Bytes(_) => AbiKind::Bytes,
            TypedValue::Array { element, .. } => AbiKind::array_of(element.clone()),
        }
    }

    fn to_sol_value(&self) -> Result<DynSolValue> {
        match self {
            TypedValue::Uint256(value) => Ok(DynSolValue::Uint(*value, 256)),
            TypedValue::Address(address) => Ok(DynSolValue::Address(*address)),
            TypedValue::Bool(b) => Ok(DynSolValue::Bool(*b)),
            TypedValue::Bytes(data) => Ok(DynSolValue::Bytes(data.to_vec())),
            TypedValue::Array { element, items } => {
                let mut values = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let kind = item.kind();
                    if &kind != element {
                        return Err(ContractError::Encoding(format!(
                            "array element #{} has kind '{}', expected '{}'",
                            i, kind, element
                        )));
                    }
                    values.push(item.to_sol_value()?);
                }
                Ok(DynSolValue::Array(values))
            }
        }
    }
}

/// A function call against one contract, ready to be encoded.
#[derive(Debug, Clone)]
pub struct CallSpec {
    pub contract_address: String,
    pub function_name: String,
    pub arguments: Vec<TypedValue>,
}

impl CallSpec {
    pub fn new(
        contract_address: impl Into<String>,
        function_name: impl Into<String>,
        arguments: Vec<TypedValue>,
    ) -> Self {
        Self {
            contract_address: contract_address.into(),
            function_name: function_name.into(),
            arguments,
        }
    }

    pub fn encode(&self) -> Result<Bytes> {
        encode_call(&self.function_name, &self.arguments)
    }
}

/// Canonical signature, e.g. `balanceOfBatch(address[],uint256[])`.
pub fn function_signature(function_name: &str, arguments: &[TypedValue]) -> String {
    let kinds: Vec<String> = arguments.iter().map(|a| a.kind().to_string()).collect();
    format!("{}({})", function_name, kinds.join(","))
}

pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Encodes `selector || abi_encode(arguments)`.
pub fn encode_call(function_name: &str, arguments: &[TypedValue]) -> Result<Bytes> {
    utils::validate_function_name(function_name)?;

    let values = arguments
        .iter()
        .map(TypedValue::to_sol_value)
        .collect::<Result<Vec<_>>>()?;

    let signature = function_signature(function_name, arguments);
    let selector = function_selector(&signature);
    let encoded_args = DynSolValue::Tuple(values).abi_encode_params();

    let mut calldata = Vec::with_capacity(4 + encoded_args.len());
    calldata.extend_from_slice(&selector);
    calldata.extend_from_slice(&encoded_args);

    tracing::debug!(
        "Encoded {} into {} bytes of calldata",
        signature,
        calldata.len()
    );
    Ok(calldata.into())
}
