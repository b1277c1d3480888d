//! Core domain types and repository traits for the medichat backend.
//!
//! This crate is pure: domain structs, repository trait definitions,
//! session primitives and the API response envelope. No I/O happens here;
//! concrete storage and HTTP live in the other workspace crates.

pub mod auth;
pub mod domain;
pub mod response;
pub mod storage;
