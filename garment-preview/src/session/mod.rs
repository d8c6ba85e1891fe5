//! Upload/edit session: per-side inputs, form metadata and design persistence.
//!
//! The session is the single writer of compositor inputs. Every input change
//! marks it dirty, and the compositing systems turn that into at most one
//! compute per frame.

/// Garment and colour catalog lookups backed by the customizer manifest.
pub mod catalog;

/// Session state, recompute bookkeeping, submission and rehydration.
pub mod controller;

/// Design persistence interface with file and in-memory implementations.
pub mod design_store;

/// Session and persistence error kinds.
pub mod error;

/// Order form fields submitted alongside the composite.
pub mod form;
