//! Client for the presensi (attendance) HTTP API.
//!
//! Wraps the remote endpoints, owns the session lifecycle, and drives the
//! attendance-submission workflow on top of the platform capabilities
//! (geolocation, camera) it is handed.

pub mod api;
pub mod auth;
pub mod camera;
pub mod config;
pub mod context;
pub mod geolocation;
pub mod report;
pub mod session;
pub mod store;
pub mod submitter;
