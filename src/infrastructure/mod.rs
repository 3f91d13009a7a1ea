//! # Infrastructure Layer
//!
//! Adapters behind the domain's ports: persistence implementations.

pub mod persistence;
