//! Verification oracle for a version-control command-line client.
//!
//! Client output, working copies on disk and status reports are all turned
//! into [`tree::Tree`]s and compared against hand-written expectations.

#![allow(clippy::enum_variant_names)]

pub mod bootstrap;
pub mod builders;
pub mod collaborators;
pub mod compare;
pub mod config;
pub mod ext;
pub mod tree;
pub mod verify;
