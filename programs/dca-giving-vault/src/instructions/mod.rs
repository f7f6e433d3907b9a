pub mod shared;

pub mod admin;
pub mod open_position;
pub mod close_position;
pub mod update_donation;
pub mod execute_swap;
pub mod accrue_yield;
pub mod claim_yield;
pub mod execute_batch;
pub mod views;

pub use shared::*;
pub use admin::*;
pub use open_position::*;
pub use close_position::*;
pub use update_donation::*;
pub use execute_swap::*;
pub use accrue_yield::*;
pub use claim_yield::*;
pub use execute_batch::*;
pub use views::*;
