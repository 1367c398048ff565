use thiserror::Error;

/// Failure taxonomy for user-initiated dashboard actions. None of these are
/// retried automatically; each surfaces once at the action boundary.
/// `ConfigUnavailable` is the only self-healing case (the VIP config falls
/// back to a built-in default).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DashboardError {
    #[error("wallet keypair is not available")]
    WalletNotConnected,
    #[error("price quote unavailable")]
    QuoteUnavailable,
    #[error("amount must be positive")]
    ZeroOrNegativeInput,
    #[error("daily payout rate is zero")]
    ZeroRate,
    #[error("no full days accrued yet")]
    NothingAccrued,
    #[error("reward vault is empty")]
    EmptyReserve,
    #[error("reward vault cannot cover a single day")]
    InsufficientReserve,
    #[error("chain submission failed: {0}")]
    ChainSubmissionFailed(String),
    #[error("vip config unavailable")]
    ConfigUnavailable,
    #[error("your tier does not grant a {0} USDT/day payout")]
    VipNotEntitled(u64),
}
