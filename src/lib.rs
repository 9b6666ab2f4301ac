// src/lib.rs

//! feedfinder: builds an OPML subscription list of community blogs

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub(crate) mod testutil;
