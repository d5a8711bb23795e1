#![deny(missing_docs)]

//! # Strategies
//!
//! This module defines the architecture for pluggable client generation.
//!
//! - **traits**: Defines `ClientStrategy` for implementing new HTTP libraries.
//! - **reqwest**: The default implementation, async `reqwest` clients.

pub mod reqwest;
pub mod traits;

// Re-export for easier access downstream
pub use self::reqwest::ReqwestStrategy;
pub use traits::{ClientStrategy, ParamBinding, ResponseShape};
