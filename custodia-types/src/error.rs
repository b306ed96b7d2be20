use thiserror::Error;

/// Failure taxonomy for bank operations. Every error aborts its operation
/// with no state change; none are retried by the ledger itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BankError {
    #[error("caller is not authorized for this operation")]
    NotAuthorized,
    #[error("operator already has an outstanding loan")]
    AlreadyBorrowed,
    #[error("operator has no outstanding loan")]
    NoActiveLoan,
    #[error("batch of {len} exceeds maximum of {max}")]
    BatchTooLarge { len: usize, max: usize },
    #[error("batch is empty")]
    EmptyBatch,
    #[error("batch spans more than one depositor")]
    MixedDepositors,
    #[error("asset {id} is not available for borrowing")]
    AssetUnavailable { id: u64 },
    #[error("caller does not own asset {id}")]
    NotOwner { id: u64 },
    #[error("asset {id} is referenced by a live loan")]
    OnLoan { id: u64 },
    #[error("bonded collateral does not cover the required bond")]
    InsufficientCollateral,
    #[error("bonded collateral is fully locked by active operators")]
    Locked,
    #[error("insufficient score")]
    InsufficientScore,
    #[error("requested payout exceeds entitled share")]
    ExceedsEntitlement,
    #[error("holder has no score to settle")]
    NoScore,
    #[error("grace period has not elapsed")]
    TooEarly,
    #[error("insufficient balance")]
    InsufficientBalance,
    #[error("invalid nonce: expected {expected}, got {got}")]
    InvalidNonce { expected: u64, got: u64 },
    #[error("signature verification failed")]
    InvalidSignature,
}
