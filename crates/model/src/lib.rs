//! An abstraction layer for chat completion services.
//!
//! This crate establishes an unified protocol for the conversation core to
//! talk to a remote completion service, so that the service (and the model
//! behind it) can be switched without touching the core codebase.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
