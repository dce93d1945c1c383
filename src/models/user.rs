use serde::{Deserialize, Serialize};

/// User profile as delivered by the auth backend after OTP verification.
/// Timestamps are epoch milliseconds, the backend's native representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub created_time: i64,
    pub last_login_time: i64,
}
