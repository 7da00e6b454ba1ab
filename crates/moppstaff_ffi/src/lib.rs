//! FFI bindings crate for the MOPP Staff mobile shell.
//!
//! The Dart side talks to [`api`] only; everything else lives in
//! `moppstaff_core`.

pub mod api;
