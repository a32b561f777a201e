//! Subtitle downloader for sites which hide a per episode access token behind
//! a rendered watch page and encrypt subtitle lines.
//!
//! A run goes through three phases:
//!
//! 1. [`catalog`] lists the episodes of the requested shows.
//! 2. [`orchestrator::Orchestrator`] renders each watch page with a
//!    [`token::TokenExtractor`] and exchanges the captured token for the
//!    episode's subtitle list with a [`descriptor::DescriptorFetcher`],
//!    several episodes at a time.
//! 3. [`downloader::Downloader`] fetches every subtitle, decrypts it with
//!    [`ksd_crypt`] and stores it as srt.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod descriptor;
pub mod downloader;
pub mod episode;
pub mod logger;
pub mod orchestrator;
pub mod progress;
pub mod summary;
pub mod token;
pub mod utils;

#[doc(hidden)]
pub use commands::Args;
pub use ksd_crypt;
pub use reqwest;
