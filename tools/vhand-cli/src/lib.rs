//! vhand - hand stream tool
//!
//! Converts JSON hand poses to `.vhs` streams and back, and summarizes streams.
//! Each command lives in its own module with a clap `Args` struct and an
//! `execute` function.

pub mod config;
pub mod decode;
pub mod encode;
pub mod init;
pub mod inspect;
pub mod poses;
pub mod sample;
