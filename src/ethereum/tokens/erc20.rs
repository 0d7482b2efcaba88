use alloy::primitives::U256;

use super::address_arg;
use crate::error::Result;
use crate::ethereum::{
    abi::TypedValue, contract::Contract, provider::Transport, SendRequest, SendResult,
};

/// ERC-20 fungible token.
pub struct Erc20<T: ?Sized> {
    contract: Contract<T>,
}

impl<T: Transport + ?Sized> Erc20<T> {
    pub fn new(contract: Contract<T>) -> Self {
        Self { contract }
    }

    pub fn contract(&self) -> &Contract<T> {
        &self.contract
    }

    pub async fn total_supply(&self) -> Result<Option<U256>> {
        self.contract.read_uint("totalSupply", &[]).await
    }

    pub async fn balance_of(&self, account: &str) -> Result<Option<U256>> {
        self.contract
            .read_uint("balanceOf", &[address_arg(account)?])
            .await
    }

    /// Remaining amount `spender` may move on behalf of `owner`.
    pub async fn allowance(&self, owner: &str, spender: &str) -> Result<Option<U256>> {
        self.contract
            .read_uint("allowance", &[address_arg(owner)?, address_arg(spender)?])
            .await
    }

    pub async fn transfer(
        &self,
        to: &str,
        amount: U256,
        request: SendRequest,
    ) -> Result<SendResult> {
        self.contract
            .send_function(
                "transfer",
                &[address_arg(to)?, TypedValue::Uint256(amount)],
                request,
            )
            .await
    }

    pub async fn transfer_from(
        &self,
        from: &str,
        to: &str,
        amount: U256,
        request: SendRequest,
    ) -> Result<SendResult> {
        self.contract
            .send_function(
                "transferFrom",
                &[address_arg(from)?, address_arg(to)?, TypedValue::Uint256(amount)],
                request,
            )
            .await
    }

    pub async fn approve(
        &self,
        spender: &str,
        amount: U256,
        request: SendRequest,
    ) -> Result<SendResult> {
        self.contract
            .send_function(
                "approve",
                &[address_arg(spender)?, TypedValue::Uint256(amount)],
                request,
            )
            .await
    }
}
