//! Library entry for the hamlink service, used by the binary and integration tests.

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod forward;
pub mod ingress;
pub mod transfer;
pub mod wire;

// Re-export commonly used items
pub use crate::config::{PolicyArgs, ServiceConfig};
pub use crate::dispatch::{DispatchError, DispatchHandle, Dispatcher};
pub use crate::forward::{ForwardError, Forwarder, HttpForwarder};
pub use crate::transfer::{Transfer, TransferStatus};
