//! Types shared between the analysis session core and its hosts.

pub mod domain;
pub mod error;
pub mod protocol;
