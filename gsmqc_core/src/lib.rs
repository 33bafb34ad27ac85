//! Core crate of gsmqc, quality control for genome scale metabolic reconstructions.
//!
//! The [`quality`] module holds the four checks (orphan reactions, free mass,
//! mass/charge balance, blocked reactions); [`metabolic_model`] the model
//! representation they run against, [`io`] the COBRA JSON reader, and
//! [`optimize`] the linear programming layer the flux based checks delegate to.

pub mod configuration;
pub mod io;
pub mod metabolic_model;
pub mod optimize;
pub mod quality;
