//! An out-of-the-box chat assistant that talks to an OpenAI-compatible
//! completion service and accepts uploaded documents.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library to bring the assistant into your own host apps.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

mod error;
mod session;
pub mod upload;

pub use error::Error;
pub use session::{Session, SessionBuilder};

/// Re-exports of [`parley_core`] crate.
pub mod core {
    pub use parley_core::*;
}
