/// PDA seeds
pub const PROTOCOL_SEED: &[u8] = b"protocol";
/// Signs for the deposit and converted vaults and for yield-source positions
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";
pub const POSITION_SEED: &[u8] = b"position";
pub const BENEFICIARY_SEED: &[u8] = b"beneficiary";

/// Basis point constants
pub const MAX_BPS: u64 = 10_000;
pub const MIN_DONATION_BPS: u16 = 100;
pub const MAX_DONATION_BPS: u16 = 2_000;
/// Each scheduled conversion moves 1% of the original principal
pub const PER_SWAP_BPS: u64 = 100;

/// Donation election bounds
pub const MIN_BENEFICIARIES: usize = 1;
pub const MAX_BENEFICIARIES: usize = 6;

/// Beneficiary display metadata limits (bytes)
pub const MAX_NAME_LEN: usize = 32;
pub const MAX_DESCRIPTION_LEN: usize = 128;

/// Time constants
pub const SECONDS_PER_DAY: i64 = 86_400;

#[cfg(not(feature = "testing"))]
pub const DEFAULT_SWAP_INTERVAL: i64 = SECONDS_PER_DAY;
#[cfg(feature = "testing")]
pub const DEFAULT_SWAP_INTERVAL: i64 = 60;

pub const MIN_SWAP_INTERVAL: i64 = 60;

/// Smallest principal a position can open with, in deposit-mint base units
pub const DEFAULT_MIN_DEPOSIT: u64 = 1_000;

/// Lowest output the swap router may return for a scheduled conversion
pub const MIN_SWAP_OUTPUT: u64 = 1;
