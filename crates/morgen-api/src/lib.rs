//! morgen-api: Morgen v3 REST client
//!
//! This crate provides a typed async client for the Morgen calendar API.
//!
//! ## Features
//!
//! - Account, calendar, and event endpoints
//! - Typed request/response models matching the JSCalendar-inspired wire format
//! - Rate limit header tracking and typed error mapping
//!
//! ## Usage
//!
//! ```rust,ignore
//! use morgen_api::MorgenClient;
//! use morgen_core::Config;
//!
//! let client = MorgenClient::new(&Config::from_env()?)?;
//! let calendars = client.list_calendars().await?;
//! ```

pub mod client;
pub mod error;
pub mod models;

pub use client::MorgenClient;
pub use error::{ApiError, Result};
pub use models::{
    Account, Calendar, CalendarMetadata, CalendarRights, CalendarUpdateRequest, CreatedEventInfo,
    Event, EventCreateRequest, EventDeleteRequest, EventUpdateRequest, Location, Participant,
    ParticipantRoles, RateLimitInfo, SeriesUpdateMode,
};
