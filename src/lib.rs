/// Admin Watchdog - audit trail for privileged game server actions
///
/// Core library providing custom command responses, monitoring policy,
/// audit logging and webhook notifications for server operators.

pub mod config;
pub mod core;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
