//! Diorama application library
//!
//! Configuration, input mapping, scene assembly, and the window, render, and
//! animation systems used by the `diorama` binary.

pub mod config;
pub mod input;
pub mod scene;
pub mod systems;
