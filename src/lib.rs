//! Weather-aware foodie tour planner.
//!
//! Drives a hosted workflow service to produce a per-city itinerary, then lays
//! the text out into a styled PDF.
pub mod cli;
pub mod config;
pub mod julep;
pub mod poll;
pub mod render;
pub mod tour;
pub mod util;
