//! Well-known role name constants.
//!
//! These must match the role values accepted by the registration endpoint.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MAHASISWA: &str = "mahasiswa";

/// Role assigned by the registration form when the user picks nothing.
pub const DEFAULT_ROLE: &str = ROLE_MAHASISWA;

/// All roles a user may register with.
pub const VALID_ROLES: &[&str] = &[ROLE_MAHASISWA, ROLE_ADMIN];

/// Whether the role may open the attendance report.
pub fn can_view_reports(role: &str) -> bool {
    role == ROLE_ADMIN
}
