//! # satchel-core
//!
//! Foundation types for the Satchel capability system.
//!
//! This crate provides the shared vocabulary the other Satchel crates build
//! on:
//!
//! - **Descriptors**: [`CapabilityDescriptor`] metadata with a
//!   [`Visibility`] level
//! - **Actions**: [`ActionSpec`] schema sent to the model, the
//!   [`CapabilityAction`] handler trait, and [`ActionResult`]
//! - **Errors**: [`CapabilityError`] hierarchy via `thiserror`
//! - **Observability**: [`VisibilityEvent`] and the [`VisibilitySink`]
//!   injection point

#![deny(unsafe_code)]

pub mod actions;
pub mod constants;
pub mod descriptor;
pub mod errors;
pub mod events;

pub use actions::{
    ActionParameterSchema, ActionResult, ActionSpec, CapabilityAction, error_result, text_result,
};
pub use descriptor::{CapabilityDescriptor, Visibility};
pub use errors::{CapabilityError, Result};
pub use events::{NullSink, TracingSink, VisibilityEvent, VisibilitySink};
