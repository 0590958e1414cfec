//! # Pumpwise Core
//!
//! Domain types, traits, and error definitions for the Pumpwise pump selection
//! assistant. This crate has **no framework dependencies**: it defines the
//! domain model that the session, provider and renderer crates build on.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Testing the session logic with scripted stub providers
//! - A clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod message;
pub mod provider;
pub mod render;
pub mod spec;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ErrorKind, ProviderError, RenderError, Result, SessionError, SpecError};
pub use message::{Message, MessageLog, Role};
pub use provider::{Completion, CompletionProvider, Usage};
pub use render::{Document, DocumentRenderer};
pub use spec::{FluidType, Material, PumpType, SealingSystem, SpecificationRecord};
