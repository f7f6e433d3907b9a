pub mod beneficiary;
pub mod position;
pub mod protocol;

pub use beneficiary::*;
pub use position::*;
pub use protocol::*;
