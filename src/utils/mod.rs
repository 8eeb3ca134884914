//! Utility functions.
//!
//! Helpers for picking apart untyped JSON payloads.

pub mod fields;
