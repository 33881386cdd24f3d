// crates/core/src/lib.rs
//! Domain model and pure reductions for the Copilot usage dashboard.

pub mod aggregate;
pub mod chat;
pub mod demo;
pub mod error;
pub mod paths;
pub mod timeframe;
pub mod types;

pub use chat::{ChatPayload, ChatRequest, ChatResponse, Intent};
pub use error::*;
pub use timeframe::{DateWindow, Timeframe};
pub use types::*;
