pub mod pool;
pub mod status;

pub use pool::{PoolRecord, RankedPool};
pub use status::{AvailabilityState, ServerStatus, StatusTransition};
