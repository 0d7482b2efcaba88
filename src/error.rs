use thiserror::Error;

/// Errors raised by contract reads, encoding and transaction submission.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("contract call failed: {0}")]
    ContractCall(String),

    #[error("broadcast rejected: {0}")]
    Broadcast(String),

    #[error("signing error: {0}")]
    Signing(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Failures reported by a [`Transport`](crate::ethereum::provider::Transport).
///
/// `Rpc` is an application-level error returned by the node (revert, nonce too low,
/// ...). `Connection` covers everything that prevented a response from arriving.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("{0}")]
    Connection(String),
}

pub type Result<T, E = ContractError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_argument() {
        let err = ContractError::InvalidArgument("senderAddress must not be empty".into());
        assert_eq!(
            err.to_string(),
            "invalid argument: senderAddress must not be empty"
        );
    }

    #[test]
    fn display_contract_call() {
        let err = ContractError::ContractCall("execution reverted".into());
        assert_eq!(err.to_string(), "contract call failed: execution reverted");
    }

    #[test]
    fn display_broadcast() {
        let err = ContractError::Broadcast("nonce too low".into());
        assert_eq!(err.to_string(), "broadcast rejected: nonce too low");
    }

    #[test]
    fn display_rpc_transport_error() {
        let err = TransportError::Rpc {
            code: -32000,
            message: "insufficient funds".into(),
        };
        assert_eq!(err.to_string(), "rpc error -32000: insufficient funds");
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(ContractError::Decoding("short".into()));
        assert!(err.to_string().contains("short"));
    }
}
