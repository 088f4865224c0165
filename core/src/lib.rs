#![deny(unsafe_code)]
//! Base identity and decision contracts for the Turnstile navigation core.
//!
//! This crate defines the vocabulary shared between route guards and the
//! navigation pipeline: the point-in-time [`IdentitySnapshot`], the
//! [`IdentityProvider`] trait guards read it through, and the tagged
//! [`Decision`] a guard evaluation produces.

mod decision;
pub use decision::{Decision, DeferReason};

mod identity;
pub use identity::{IdentityProvider, IdentitySnapshot, IdentityState, IdentityUnavailable};
