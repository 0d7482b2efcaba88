use alloy::primitives::{Bytes, U256};

use super::{address_arg, address_array_arg};
use crate::error::{ContractError, Result};
use crate::ethereum::{
    abi::TypedValue, contract::Contract, provider::Transport, SendRequest, SendResult,
};

/// ERC-1155 multi-token.
pub struct Erc1155<T: ?Sized> {
    contract: Contract<T>,
}

impl<T: Transport + ?Sized> Erc1155<T> {
    pub fn new(contract: Contract<T>) -> Self {
        Self { contract }
    }

    pub fn contract(&self) -> &Contract<T> {
        &self.contract
    }

    pub async fn balance_of(&self, account: &str, id: U256) -> Result<Option<U256>> {
        self.contract
            .read_uint("balanceOf", &[address_arg(account)?, TypedValue::Uint256(id)])
            .await
    }

    /// Balance of `accounts[i]` for `ids[i]`. Positions the node left out of a
    /// truncated response read as zero.
    pub async fn balance_of_batch(
        &self,
        accounts: &[&str],
        ids: &[U256],
    ) -> Result<Option<Vec<U256>>> {
        if accounts.len() != ids.len() {
            return Err(ContractError::InvalidArgument(
                "ERC1155: accounts and ids length mismatch".to_string(),
            ));
        }

        self.contract
            .read_uint_batch(
                "balanceOfBatch",
                &[
                    address_array_arg(accounts)?,
                    TypedValue::uint_array(ids.iter().copied()),
                ],
            )
            .await
    }

    pub async fn is_approved_for_all(&self, account: &str, operator: &str) -> Result<Option<bool>> {
        self.contract
            .read_bool(
                "isApprovedForAll",
                &[address_arg(account)?, address_arg(operator)?],
            )
            .await
    }

    pub async fn set_approval_for_all(
        &self,
        operator: &str,
        approved: bool,
        request: SendRequest,
    ) -> Result<SendResult> {
        self.contract
            .send_function(
                "setApprovalForAll",
                &[address_arg(operator)?, TypedValue::Bool(approved)],
                request,
            )
            .await
    }

    pub async fn safe_transfer_from(
        &self,
        from: &str,
        to: &str,
        id: U256,
        amount: U256,
        data: Bytes,
        request: SendRequest,
    ) -> Result<SendResult> {
        self.contract
            .send_function(
                "safeTransferFrom",
                &[
                    address_arg(from)?,
                    address_arg(to)?,
                    TypedValue::Uint256(id),
                    TypedValue::Uint256(amount),
                    TypedValue::Bytes(data),
                ],
                request,
            )
            .await
    }

    pub async fn safe_batch_transfer_from(
        &self,
        from: &str,
        to: &str,
        ids: &[U256],
        amounts: &[U256],
        data: Bytes,
        request: SendRequest,
    ) -> Result<SendResult> {
        if ids.len() != amounts.len() {
            return Err(ContractError::InvalidArgument(
                "ERC1155: ids and amounts length mismatch".to_string(),
            ));
        }

        self.contract
            .send_function(
                "safeBatchTransferFrom",
                &[
                    address_arg(from)?,
                    address_arg(to)?,
                    TypedValue::uint_array(ids.iter().copied()),
                    TypedValue::uint_array(amounts.iter().copied()),
                    TypedValue::Bytes(data),
                ],
                request,
            )
            .await
    }
}
