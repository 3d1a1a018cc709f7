//! Core library for pitwall
//!
//! This crate implements the **Functional Core** of the pitwall application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The pitwall project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`pitwall_core`** (this crate): Pure transformation functions and the pin store
//! - **`pitwall`**: HTTP calls, terminal rendering and orchestration (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! Functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No network access**: Everything works on already-fetched data
//! - **Deterministic**: No reliance on the clock, the terminal size or storage state
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! The only I/O that lives here is [`pins::FilePinStore`], which reads and writes
//! a single JSON file.
//!
//! # Module Organization
//!
//! - [`ergast`]: Decode boundary from the Ergast JSON envelope to domain types
//! - [`listing`]: Page windows, pinned/unpinned reconciliation and pagination metadata
//! - [`pins`]: Pin set persistence and the toggle operation
//! - [`state`]: Listing state and the reducer that drives it
//! - [`results`]: Race results ordering and driver highlighting
//! - [`view`]: Card and list view modes
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use pitwall_core::listing::reconcile;
//!
//! // Races fetched for page 1 and for the whole season
//! let view = reconcile(&page_races, &all_races, &["2024-3".to_string()]);
//!
//! assert_eq!(view.pinned[0].round, 3);
//! assert!(view.unpinned.iter().all(|race| race.round != 3));
//! ```

pub mod ergast;
pub mod listing;
pub mod pins;
pub mod results;
pub mod state;
pub mod view;
