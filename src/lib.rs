//! Crew per-diem engine for flight-duty reports
//!
//! This crate reads monthly flight-duty (EP5) reports, rebuilds the rotations
//! flown from a home base, prices each rotation at the tax-authority per-diem
//! rate of its principal stopover, and produces the annual indemnity total
//! together with the rotations table and aircraft usage statistics.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod extraction;
pub mod models;
