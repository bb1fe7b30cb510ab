//! Shared test utilities for the gitgate workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`git`]: git repository fixtures at two realism levels
//! - [`repo`]: [`repo::TestRepo`] builder for scratch repositories and remotes
//! - [`invoker`]: [`invoker::RecordingInvoker`], a scripted fake that never spawns processes

pub mod git;
pub mod invoker;
pub mod repo;
