//! Core relay, mocap and drive utilities for the Pololu mocap rig.
//!
//! The host binary lives in `mrl-app/mock-host`.
#![no_std]

extern crate alloc;

pub mod utils;
