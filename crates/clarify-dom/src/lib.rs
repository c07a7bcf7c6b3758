//! # Clarify DOM
//!
//! A small arena-backed document model with the pieces Clarify needs to
//! mutate a page reversibly:
//!
//! - [`Document`] - node arena, tree edits and markup (de)serialization
//! - [`Range`] / [`Boundary`] - live selection ranges with DOM semantics
//! - [`MutationEngine`] - apply/restore substitutions tagged with a
//!   back-reference to the original markup
//! - [`bionic`] - the local emphasis transform

mod document;
mod error;
mod geometry;
mod markup;
mod node;
mod page;
mod range;

pub mod bionic;
pub mod mutation;

pub use document::Document;
pub use error::DomError;
pub use geometry::{BoundingBox, Point, ViewportInfo};
pub use mutation::{Base64Codec, MutatedRegion, MutationEngine, SnapshotCodec};
pub use node::{ElementData, NodeId, NodeKind};
pub use range::{Boundary, Range};
