#![doc = "asset-sync: reconcile local build artifacts with an object-storage bucket."]

//! This crate computes the minimal set of remote mutations needed to make a
//! bucket match a local directory of static build artifacts: what to upload
//! (with fingerprint aliasing, pre-compressed-variant substitution and cache
//! metadata), what to delete, and which CDN paths to invalidate afterwards.
//!
//! # Usage
//! Construct a [`synchronise::Syncer`] with a [`config::SyncConfig`] and
//! already-initialized collaborators ([`contract`]), then call `run()`.
//! The binary wires the bundled directory-backed collaborators from a YAML
//! config file.

pub mod cli;
pub mod compress;
pub mod config;
pub mod contract;
pub mod fingerprint;
pub mod headers;
pub mod inventory;
pub mod load_config;
pub mod plan;
pub mod reconcile;
pub mod store;
pub mod synchronise;
