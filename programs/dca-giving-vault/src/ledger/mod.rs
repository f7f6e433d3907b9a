//! Accounting core. Everything here works on plain records and adapter
//! traits; account loading, CPIs and events live in `instructions`.

pub mod accrual;
pub mod batch;
pub mod donation;
pub mod positions;
pub mod scheduler;
