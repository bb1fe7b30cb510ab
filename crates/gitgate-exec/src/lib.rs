//! External process invocation for the gitgate gateway
//!
//! Runs a version-control command in a working directory and normalises the
//! outcome into an [`Invocation`]. Launch failures, missing directories and
//! timeouts are reported inside the result rather than as errors, so callers
//! never need to handle a failure crossing this boundary.
//!
//! ```text
//! [ tool handler ] --argv + dir--> [ Invoker ] --spawn--> [ git ]
//!                  <--Invocation--             <--exit code, stdout, stderr--
//! ```

pub mod error;
pub mod invocation;
pub mod invoker;

pub use error::{Error, Result};
pub use invocation::Invocation;
pub use invoker::{Invoker, ProcessInvoker};
