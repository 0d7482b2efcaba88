//! Typed wrappers for the standard token interfaces.

mod erc1155;
mod erc20;
mod erc721;

pub use erc1155::Erc1155;
pub use erc20::Erc20;
pub use erc721::Erc721;

use crate::error::Result;
use crate::ethereum::{abi::TypedValue, utils};

fn address_arg(address: &str) -> Result<TypedValue> {
    utils::validate_address(address).map(TypedValue::Address)
}

fn address_array_arg(addresses: &[&str]) -> Result<TypedValue> {
    let addresses = addresses
        .iter()
        .map(|address| utils::validate_address(address))
        .collect::<Result<Vec<_>>>()?;
    Ok(TypedValue::address_array(addresses))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContractError;

    #[test]
    fn address_arguments_are_validated() {
        let arg = address_arg("0x5FbDB2315678afecb367f032d93F642f64180aa3").unwrap();
        assert!(matches!(arg, TypedValue::Address(_)));

        assert!(matches!(
            address_arg("5FbDB2315678afecb367f032d93F642f64180aa3"),
            Err(ContractError::InvalidArgument(_))
        ));
        assert!(matches!(
            address_array_arg(&["0x5FbDB2315678afecb367f032d93F642f64180aa3", "0x12"]),
            Err(ContractError::InvalidArgument(_))
        ));
    }
}
