pub mod filter;
pub mod format;
pub mod knowledge;
pub mod monitor;
pub mod notifier;
pub mod ranker;
pub mod scheduler;

pub use monitor::AvailabilityMonitor;
pub use notifier::{Destination, Notifier};
