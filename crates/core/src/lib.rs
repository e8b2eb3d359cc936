//! Core business logic for Obrix.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `quotation` - Quotation pricing: detail derivations, the AIU cost rollup
//!   and the report service over a repository trait

pub mod quotation;
