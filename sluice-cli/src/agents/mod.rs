//! Demo agents exercising the lifecycle core end to end.
//!
//! - [echo]: a fixed-length reasoning/acting loop that checks in with its
//!   hook at each step and persists a step counter as session state.

pub mod echo;

pub use echo::{EchoCountAgent, EchoCountAgentFactory};
