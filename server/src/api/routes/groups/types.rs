//! Group API types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::data::types::{GroupRow, GroupWithRole, MemberWithUser};

/// Group DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct GroupDto {
    pub id: String,
    pub name: String,
    pub invite_code: String,
    pub owner_id: String,
    pub created_at: i64,
}

impl From<GroupRow> for GroupDto {
    fn from(row: GroupRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            invite_code: row.invite_code,
            owner_id: row.owner_id,
            created_at: row.created_at,
        }
    }
}

/// A group the caller belongs to, with their role
#[derive(Debug, Serialize, ToSchema)]
pub struct GroupWithRoleDto {
    pub id: String,
    pub name: String,
    pub invite_code: String,
    pub owner_id: String,
    pub role: String,
    pub created_at: i64,
}

impl From<GroupWithRole> for GroupWithRoleDto {
    fn from(row: GroupWithRole) -> Self {
        Self {
            id: row.id,
            name: row.name,
            invite_code: row.invite_code,
            owner_id: row.owner_id,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

/// A group member for the detail view
#[derive(Debug, Serialize, ToSchema)]
pub struct MemberDto {
    pub user_id: String,
    pub display_name: Option<String>,
    pub role: String,
    pub joined_at: i64,
}

impl From<MemberWithUser> for MemberDto {
    fn from(row: MemberWithUser) -> Self {
        Self {
            user_id: row.user_id,
            display_name: row.display_name,
            role: row.role,
            joined_at: row.joined_at,
        }
    }
}

/// Response for GET /groups/{group_id}
#[derive(Debug, Serialize, ToSchema)]
pub struct GroupDetailResponse {
    pub group: GroupDto,
    pub members: Vec<MemberDto>,
}

/// Request body for creating a group
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 100, message = "Group name must be 1-100 characters"))]
    pub name: String,
    /// IANA timezone of the creator, captured as the squad's day boundary
    #[validate(length(max = 64, message = "Timezone must be at most 64 characters"))]
    pub timezone: Option<String>,
}

/// Request body for joining a group by invite code
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct JoinGroupRequest {
    #[validate(length(equal = 8, message = "Invite code must be 8 characters"))]
    pub invite_code: String,
}

/// Response for POST /groups/join
#[derive(Debug, Serialize, ToSchema)]
pub struct JoinGroupResponse {
    pub group: GroupDto,
    pub role: String,
}

/// Query parameters for GET /groups/{group_id}/status
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StatusQuery {
    /// Caller's IANA timezone, used as fallback and for owner timezone healing
    #[validate(length(max = 64, message = "Timezone must be at most 64 characters"))]
    pub tz: Option<String>,
}

/// Per-member snapshot in the squad status view
#[derive(Debug, Serialize, ToSchema)]
pub struct MemberStatusDto {
    pub user_id: String,
    pub display_name: Option<String>,
    pub role: String,
    /// Required tasks completed on the squad-local date
    pub completed_today: u32,
    /// Number of required tasks
    pub tasks_total: u32,
    /// Whether every required task is done for the day
    pub day_complete: bool,
    /// Live streak (0 when stale)
    pub streak: u32,
}

/// Response for GET /groups/{group_id}/status
#[derive(Debug, Serialize, ToSchema)]
pub struct GroupStatusResponse {
    pub group_id: String,
    /// The timezone defining the squad's shared day boundary
    pub timezone: String,
    /// Today's date in the squad timezone (YYYY-MM-DD)
    pub date: String,
    /// Challenge day number, 0 when the challenge has not started
    pub day_number: u32,
    pub members: Vec<MemberStatusDto>,
}

/// Request body for creating a custom task
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCustomTaskRequest {
    #[validate(length(min = 1, max = 100, message = "Label must be 1-100 characters"))]
    pub label: String,
}

/// Custom task DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct CustomTaskDto {
    pub id: String,
    pub label: String,
    pub created_at: i64,
}

impl From<crate::data::types::CustomTaskRow> for CustomTaskDto {
    fn from(row: crate::data::types::CustomTaskRow) -> Self {
        Self {
            id: row.id,
            label: row.label,
            created_at: row.created_at,
        }
    }
}
