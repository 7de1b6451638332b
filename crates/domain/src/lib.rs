//! # radiohub-domain
//!
//! Pure domain model for the radiohub radio integration.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Entities** (polled on/off snapshots with descriptive attributes)
//! - Define **Devices** (the physical gateway radio an entity represents)
//! - Define **Services** (`turn_on`, `turn_off`, `toggle`, `play_url`, …) and
//!   the payload schemas each one accepts
//! - Define the `radio` domain constants (entity id format, group, intervals)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod entity;
pub mod radio;
pub mod service;
