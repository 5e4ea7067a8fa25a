pub mod commands;
pub mod health;

pub use commands::CommandRouter;
pub use health::HealthState;
