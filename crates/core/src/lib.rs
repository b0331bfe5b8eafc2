//! Core types and pure functions for the roster service.
//!
//! Following the Functional Core pattern, nothing in this crate performs I/O.
//! Storage and cache backends live in the `roster` crate and implement the
//! traits defined here.

pub mod auth;
pub mod cache;
pub mod dispatch;
pub mod envelope;
pub mod storage;
pub mod student;
