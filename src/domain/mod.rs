//! Domain layer containing business entities and logic.
//!
//! This module defines entities, repository interfaces and the click pipeline
//! independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`analytics`] - Click aggregation
//! - [`clock`] - UTC time source shared by creation and resolution
//! - [`click_event`] - Click tracking event model
//! - [`click_recorder`] - Non-blocking enqueue from handlers
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler resolves a short code
//! 2. [`click_event::ClickEvent`] is handed to [`click_recorder::ClickRecorder`]
//! 3. [`click_worker::run_click_worker`] processes events with retry logic
//! 4. Click data is persisted via [`repositories::ClickRepository`]

pub mod analytics;
pub mod click_event;
pub mod click_recorder;
pub mod click_worker;
pub mod clock;
pub mod entities;
pub mod repositories;
