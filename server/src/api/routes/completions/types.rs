//! Task completion API types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::data::types::CompletionRow;

/// Request body for toggling a task completion
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ToggleCompletionRequest {
    /// A required task key or the label of one of the caller's custom tasks
    #[validate(length(min = 1, max = 100, message = "task_key must be 1-100 characters"))]
    pub task_key: String,
    /// Target date (YYYY-MM-DD); defaults to today in the squad timezone
    #[validate(length(max = 10, message = "date must be YYYY-MM-DD"))]
    pub date: Option<String>,
    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
    /// Caller's IANA timezone, used as fallback for the squad day boundary
    #[validate(length(max = 64, message = "Timezone must be at most 64 characters"))]
    pub timezone: Option<String>,
}

/// Response for POST completions
#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleCompletionResponse {
    pub task_key: String,
    /// The squad-local date the toggle applied to (YYYY-MM-DD)
    pub date: String,
    /// State after the toggle
    pub completed: bool,
    /// Live streak after reconciliation
    pub streak: u32,
    /// Challenge day number, 0 when the challenge has not started
    pub day_number: u32,
}

/// Query parameters for listing completions
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListCompletionsQuery {
    /// Date to view (YYYY-MM-DD); defaults to today in the squad timezone
    #[validate(length(max = 10, message = "date must be YYYY-MM-DD"))]
    pub date: Option<String>,
    /// Caller's IANA timezone, used as fallback for the squad day boundary
    #[validate(length(max = 64, message = "Timezone must be at most 64 characters"))]
    pub tz: Option<String>,
}

/// A single completion in the list view
#[derive(Debug, Serialize, ToSchema)]
pub struct CompletionDto {
    pub id: String,
    pub task_key: String,
    pub note: Option<String>,
    pub completed_at: i64,
}

impl From<CompletionRow> for CompletionDto {
    fn from(row: CompletionRow) -> Self {
        Self {
            id: row.id,
            task_key: row.task_key,
            note: row.note,
            completed_at: row.completed_at,
        }
    }
}

/// Response for GET completions
#[derive(Debug, Serialize, ToSchema)]
pub struct ListCompletionsResponse {
    /// The squad-local date viewed (YYYY-MM-DD)
    pub date: String,
    /// Day number for the viewed date, floored at 1 (there is no day 0 view)
    pub day_number: u32,
    pub completions: Vec<CompletionDto>,
}
