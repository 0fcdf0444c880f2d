//! # Repository Module
//!
//! Data access objects over the SQLite pool.
//!
//! ## Repository Pattern
//! Each repository owns a clone of the pool and exposes typed async methods;
//! SQL never leaks past this module.
//!
//! - [`kv`] - Key-value rows (cart snapshot and any other namespaced keys)

pub mod kv;
