//! User API types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::data::types::{AchievementRow, GroupWithRole, UserRow};

/// User DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub created_at: i64,
}

impl From<UserRow> for UserDto {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            created_at: row.created_at,
        }
    }
}

/// Group membership info for the /users/me response
#[derive(Debug, Serialize, ToSchema)]
pub struct UserGroupDto {
    pub id: String,
    pub name: String,
    pub role: String,
}

impl From<GroupWithRole> for UserGroupDto {
    fn from(row: GroupWithRole) -> Self {
        Self {
            id: row.id,
            name: row.name,
            role: row.role,
        }
    }
}

/// An earned achievement
#[derive(Debug, Serialize, ToSchema)]
pub struct AchievementDto {
    pub key: String,
    pub earned_at: i64,
}

impl From<AchievementRow> for AchievementDto {
    fn from(row: AchievementRow) -> Self {
        Self {
            key: row.achievement_key,
            earned_at: row.earned_at,
        }
    }
}

/// Response for GET /users/me
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfileResponse {
    pub user: UserDto,
    pub groups: Vec<UserGroupDto>,
    pub achievements: Vec<AchievementDto>,
}

/// Request body for updating the user profile
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Display name must be 1-100 characters"
    ))]
    pub display_name: String,
}

/// User settings DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct SettingsDto {
    /// IANA timezone defining the user's day boundary
    pub timezone: String,
}

/// Request body for updating user settings
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSettingsRequest {
    #[validate(length(min = 1, max = 64, message = "Timezone must be 1-64 characters"))]
    pub timezone: String,
}
