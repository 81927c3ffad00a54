//! # satchel-session
//!
//! Session-scoped visibility for the Satchel capability system.
//!
//! Tracks which capabilities a session has loaded ([`SessionState`]), folds
//! new loads into that state under a configurable policy
//! ([`VisibilityPolicy`]), and computes the action set visible to each
//! model call ([`DynamicFilter`]).

#![deny(unsafe_code)]

pub mod filter;
pub mod reducer;
pub mod state;

pub use filter::{DynamicFilter, VisibilityStage};
pub use reducer::VisibilityPolicy;
pub use state::SessionState;
