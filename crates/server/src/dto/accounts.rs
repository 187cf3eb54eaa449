//! # Account Data Transfer Objects
//!
//! Request and response types for registration, login, profile, and the
//! verification and password-reset flows.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request body for account registration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct RegistrationRequest {
    /// Desired username, also the slug source
    #[validate(length(min = 4, max = 32, message = "Username must be between 4 and 32 characters"))]
    pub username: String,

    /// Email address, stored lowercased
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password; strength checks run in the handler
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,

    #[validate(length(max = 64, message = "First name must be at most 64 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 64, message = "Last name must be at most 64 characters"))]
    pub last_name: Option<String>,
}

/// Request body for login. `identifier` accepts a username or an email.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username or email is required"))]
    pub identifier: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for token refresh
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Request body for profile updates. Absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 4, max = 32, message = "Username must be between 4 and 32 characters"))]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 64, message = "First name must be at most 64 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 64, message = "Last name must be at most 64 characters"))]
    pub last_name: Option<String>,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

/// Request body for authenticated password change
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub old_password: String,

    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub new_password: String,
}

/// Request body for starting a password reset
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Request body for completing a password reset
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct PasswordResetConfirmRequest {
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,

    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub new_password: String,
}

/// Public view of a user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id:          Uuid,
    pub email:       String,
    pub username:    String,
    pub slug:        String,
    pub first_name:  Option<String>,
    pub last_name:   Option<String>,
    pub image_url:   Option<String>,
    pub is_verified: bool,
    pub is_staff:    bool,
    pub created_at:  chrono::DateTime<chrono::Utc>,
}

impl From<entity::users::Model> for UserResponse {
    fn from(user: entity::users::Model) -> Self {
        Self {
            id:          user.id,
            email:       user.email,
            username:    user.username,
            slug:        user.slug,
            first_name:  user.first_name,
            last_name:   user.last_name,
            image_url:   user.image_url,
            is_verified: user.is_verified,
            is_staff:    user.is_staff,
            created_at:  user.created_at,
        }
    }
}

/// Token pair returned on registration, login, and refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token:  String,
    pub refresh_token: String,
    pub expires_in:    u64,
    pub token_type:    String,
}

/// Response body for authentication endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user:   UserResponse,
    pub tokens: AuthTokens,
}

/// Issued verification record with the secret code stripped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResponse {
    pub id:         Uuid,
    pub created:    chrono::DateTime<chrono::Utc>,
    pub expiration: chrono::DateTime<chrono::Utc>,
    pub user:       Uuid,
}

impl From<entity::email_verifications::Model> for VerificationResponse {
    fn from(record: entity::email_verifications::Model) -> Self {
        Self {
            id:         record.id,
            created:    record.created_at,
            expiration: record.expiration,
            user:       record.user_id,
        }
    }
}
