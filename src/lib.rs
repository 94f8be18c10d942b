//! bomx: effective-dated Bill-of-Materials explosion
//!
//! Explodes a product's multi-level BOM into per-component requirements as
//! of a given date, over master data whose every record carries a
//! half-open validity interval `[effective_from, effective_to)`.
//!
//! The engine lives in [`core`] and does no I/O; link data comes from any
//! [`core::BomLinkSource`], such as an in-memory [`core::BomLinkTable`] or
//! the SQLite-backed [`core::LinkStore`].

pub mod cli;
pub mod core;
pub mod entities;
pub mod logging;
pub mod yaml;
