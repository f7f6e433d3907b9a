use anchor_lang::prelude::*;

#[error_code]
pub enum VaultError {
    // Validation
    #[msg("Donation percent must be between 100 and 2000 bps")]
    InvalidDonationPercent,

    #[msg("Beneficiary selection must name 1 to 6 distinct active beneficiaries")]
    InvalidBeneficiarySelection,

    #[msg("Deposit below protocol minimum")]
    DepositBelowMinimum,

    #[msg("Swap interval below minimum")]
    InvalidSwapInterval,

    #[msg("Beneficiary metadata too long")]
    MetadataTooLong,

    #[msg("Payout token account does not match recipient and mint")]
    InvalidPayoutAccount,

    #[msg("Beneficiary records do not match the position's election")]
    BeneficiaryMismatch,

    #[msg("Account listed more than once in a batch")]
    DuplicateBatchEntry,

    // State
    #[msg("Owner already has an active position")]
    DuplicatePosition,

    #[msg("Owner has no active position")]
    NoActivePosition,

    #[msg("Swap interval has not elapsed")]
    NotEligible,

    #[msg("Position has no remaining principal to convert")]
    ZeroRemainingPrincipal,

    #[msg("No yield to claim")]
    NoYieldToClaim,

    #[msg("Protocol is paused")]
    ProtocolPaused,

    #[msg("Unauthorized authority for this operation")]
    Unauthorized,

    // External
    #[msg("Swap returned no output")]
    SwapFailed,

    #[msg("Yield source returned less than requested")]
    InsufficientLiquidity,

    #[msg("Token transfer failed")]
    TransferFailed,

    #[msg("External account does not match protocol configuration")]
    InvalidExternalAccount,

    // Fatal
    #[msg("Ledger conservation check failed")]
    InvariantViolation,

    #[msg("Math overflow")]
    MathOverflow,
}
