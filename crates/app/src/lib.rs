//! # radiohub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement:
//!   - `RadioDevice` — the radio entity contract (seven operations, each
//!     defaulting to "not implemented")
//!   - `RadioPlatform` — sets up the radios of one integration
//!   - `JobExecutor` — runs blocking device calls off the cooperative loop
//! - Provide the **`RadioComponent`** use-case: validates service calls,
//!   dispatches them to the targeted radios and keeps their polled snapshots
//! - Provide **in-process infrastructure** (the tokio-backed executor)
//!
//! ## Dependency rule
//! Depends on `radiohub-domain` only (plus `tokio` for the blocking pool).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod executor;
pub mod ports;
pub mod services;
