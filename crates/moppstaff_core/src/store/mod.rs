//! Durable storage layer for the roster mirror.
//!
//! # Responsibility
//! - Define the byte-store contract the roster is mirrored into.
//! - Serialize store writes behind a single-writer queue.
//!
//! # Invariants
//! - The store holds a mirror, never the canonical roster.
//! - Writes are applied in the order mutations were issued.

pub mod kv;
pub mod write_queue;
