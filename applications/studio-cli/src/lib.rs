//! Creator Studio CLI Library
//!
//! Terminal front end for the studio: configuration, file loading, the
//! command shell and text rendering of the views.
//!
//! This library exposes the shell pieces for testing purposes.

pub mod config;
pub mod error;
pub mod media;
pub mod render;
pub mod shell;

pub use config::StudioConfig;
pub use error::{CliError, Result};
pub use shell::{Outcome, Shell};
