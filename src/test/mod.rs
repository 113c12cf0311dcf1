//! Shared test tooling: synthetic assembly images and temporary cache installations.

pub mod helpers;
