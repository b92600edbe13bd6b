//! Shared utilities for the taku tabletop relay.
//!
//! This crate provides the pieces both the server and its tests need:
//! time handling (JST timestamps, clock-time formatting) and logging setup.

pub mod logger;
pub mod time;
