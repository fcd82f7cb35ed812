#![forbid(unsafe_code)]

//! VideoVault backend: a small search facade in front of the YouTube Data
//! API that degrades to generated demo results whenever the upstream is
//! disabled or unavailable.

pub mod api;
pub mod config;
pub mod fallback;
pub mod models;
pub mod normalize;
pub mod search;
pub mod upstream;
