use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: i32,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTeamMemberRequest {
    #[validate(custom(function = "crate::models::not_blank"))]
    pub name: String,
    #[validate(custom(function = "crate::models::not_blank"))]
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct NewTeamMember {
    pub name: String,
    pub role: String,
}

impl From<CreateTeamMemberRequest> for NewTeamMember {
    fn from(req: CreateTeamMemberRequest) -> Self {
        NewTeamMember {
            name: req.name,
            role: req.role,
        }
    }
}
