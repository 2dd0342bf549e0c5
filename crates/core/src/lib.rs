//! Domain types and pure logic for the presensi (attendance) client.
//!
//! Nothing in this crate performs IO. The HTTP client, platform
//! capabilities and persistence live in `presensi-client`.

pub mod attendance;
pub mod capture;
pub mod display;
pub mod error;
pub mod geo;
pub mod messages;
pub mod report;
pub mod roles;
pub mod types;
pub mod user;
pub mod workflow;
