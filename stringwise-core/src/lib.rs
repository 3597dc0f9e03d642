//! Core traits and types for Stringwise.
//!
//! This crate defines the shared abstractions that the sizing engine builds on:
//!
//! - [`Component`]: a deterministic stage mapping a typed input to a typed
//!   output, composable with [`Component::chain()`] and friends
//! - [`constraint`]: numeric invariants checked once at construction
//! - [`units`]: unit-safe temperature helpers and standard test conditions

mod component;
pub mod constraint;
pub mod units;

pub use component::Component;
