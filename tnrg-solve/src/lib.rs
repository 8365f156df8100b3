//! Search routines driven by an RG phase oracle.
//!
//! The only search so far is [`bisection`], which narrows a temperature
//! bracket around the critical point with a fixed number of oracle calls.

pub mod bisection;
mod observe;

pub use observe::Observer;
