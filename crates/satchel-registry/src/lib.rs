//! # satchel-registry
//!
//! Capability bundle registry for the Satchel capability system.
//!
//! A [`CapabilityBundle`] packages a descriptor, a set of actions, and a
//! loader action that reveals the capability's instructions. The
//! [`CapabilityRegistry`] holds bundles by name and answers the visibility
//! questions the session layer asks: which loader actions exist, and which
//! actions belong to a given set of loaded capabilities. Filesystem
//! discovery registers bundles found under a capabilities directory.

#![deny(unsafe_code)]

pub mod bundle;
pub mod discovery;
pub mod registry;

pub use bundle::{CapabilityBundle, generate_instructions};
pub use discovery::CapabilityLoader;
pub use registry::{CapabilityRegistry, DescriptorPredicate, visibility_filter};
