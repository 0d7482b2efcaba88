use alloy::primitives::{Address, Bytes, U256};

use super::address_arg;
use crate::error::Result;
use crate::ethereum::{
    abi::TypedValue, contract::Contract, provider::Transport, SendRequest, SendResult,
};

/// ERC-721 non-fungible token.
pub struct Erc721<T: ?Sized> {
    contract: Contract<T>,
}

impl<T: Transport + ?Sized> Erc721<T> {
    pub fn new(contract: Contract<T>) -> Self {
        Self { contract }
    }

    pub fn contract(&self) -> &Contract<T> {
        &self.contract
    }

    pub async fn balance_of(&self, owner: &str) -> Result<Option<U256>> {
        self.contract
            .read_uint("balanceOf", &[address_arg(owner)?])
            .await
    }

    pub async fn owner_of(&self, token_id: U256) -> Result<Option<Address>> {
        self.contract
            .read_address("ownerOf", &[TypedValue::Uint256(token_id)])
            .await
    }

    pub async fn is_approved_for_all(&self, owner: &str, operator: &str) -> Result<Option<bool>> {
        self.contract
            .read_bool(
                "isApprovedForAll",
                &[address_arg(owner)?, address_arg(operator)?],
            )
            .await
    }

    pub async fn get_approved(&self, token_id: U256) -> Result<Option<Address>> {
        self.contract
            .read_address("getApproved", &[TypedValue::Uint256(token_id)])
            .await
    }

    pub async fn safe_transfer_from(
        &self,
        from: &str,
        to: &str,
        token_id: U256,
        request: SendRequest,
    ) -> Result<SendResult> {
        self.contract
            .send_function(
                "safeTransferFrom",
                &[address_arg(from)?, address_arg(to)?, TypedValue::Uint256(token_id)],
                request,
            )
            .await
    }

    /// `safeTransferFrom(address,address,uint256,bytes)`; `data` is forwarded to the
    /// receiver's `onERC721Received` hook.
    pub async fn safe_transfer_from_with_data(
        &self,
        from: &str,
        to: &str,
        token_id: U256,
        data: Bytes,
        request: SendRequest,
    ) -> Result<SendResult> {
        self.contract
            .send_function(
                "safeTransferFrom",
                &[
                    address_arg(from)?,
                    address_arg(to)?,
                    TypedValue::Uint256(token_id),
                    TypedValue::Bytes(data),
                ],
                request,
            )
            .await
    }

    pub async fn transfer_from(
        &self,
        from: &str,
        to: &str,
        token_id: U256,
        request: SendRequest,
    ) -> Result<SendResult> {
        self.contract
            .send_function(
                "transferFrom",
                &[address_arg(from)?, address_arg(to)?, TypedValue::Uint256(token_id)],
                request,
            )
            .await
    }

    pub async fn approve(
        &self,
        to: &str,
        token_id: U256,
        request: SendRequest,
    ) -> Result<SendResult> {
        self.contract
            .send_function(
                "approve",
                &[address_arg(to)?, TypedValue::Uint256(token_id)],
                request,
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
}
