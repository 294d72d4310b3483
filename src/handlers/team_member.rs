use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::models::team_member::{CreateTeamMemberRequest, TeamMember};
use crate::models::ErrorResponse;
use crate::storage::Store;
use crate::utils::errors::ServiceError;

/// Get all team members
#[utoipa::path(
    get,
    path = "/api/team-members",
    tag = "team-members",
    responses(
        (status = 200, description = "Team members retrieved successfully", body = Vec<TeamMember>)
    )
)]
pub async fn get_team_members(store: web::Data<dyn Store>) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/team-members");

    let members = store.list_team_members().await?;

    log::info!("Retrieved {} team members", members.len());
    Ok(HttpResponse::Ok().json(members))
}

/// Get a team member by ID
#[utoipa::path(
    get,
    path = "/api/team-members/{id}",
    tag = "team-members",
    params(
        ("id" = i32, Path, description = "Team member ID")
    ),
    responses(
        (status = 200, description = "Team member retrieved successfully", body = TeamMember),
        (status = 404, description = "Team member not found", body = ErrorResponse)
    )
)]
pub async fn get_team_member(
    store: web::Data<dyn Store>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let member_id = path.into_inner();
    log::info!("GET /api/team-members/{}", member_id);

    let member = store
        .get_team_member(member_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Team member not found".to_string()))?;

    Ok(HttpResponse::Ok().json(member))
}

/// Add a team member
#[utoipa::path(
    post,
    path = "/api/team-members",
    tag = "team-members",
    request_body = CreateTeamMemberRequest,
    responses(
        (status = 201, description = "Team member created successfully", body = TeamMember),
        (status = 400, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn create_team_member(
    store: web::Data<dyn Store>,
    member_req: web::Json<CreateTeamMemberRequest>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("POST /api/team-members - Creating team member: {}", member_req.name);

    member_req.validate()?;

    let member = store.create_team_member(member_req.into_inner().into()).await?;

    log::info!("Team member created successfully with ID: {}", member.id);
    Ok(HttpResponse::Created().json(member))
}

/// Remove a team member that no task is assigned to
#[utoipa::path(
    delete,
    path = "/api/team-members/{id}",
    tag = "team-members",
    params(
        ("id" = i32, Path, description = "Team member ID")
    ),
    responses(
        (status = 204, description = "Team member deleted"),
        (status = 409, description = "Team member still has tasks", body = ErrorResponse)
    )
)]
pub async fn delete_team_member(
    store: web::Data<dyn Store>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let member_id = path.into_inner();
    log::info!("DELETE /api/team-members/{}", member_id);

    store.delete_team_member(member_id).await?;

    log::info!("Team member deleted: {}", member_id);
    Ok(HttpResponse::NoContent().finish())
}

pub fn team_member_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/team-members")
            .route("", web::get().to(get_team_members))
            .route("", web::post().to(create_team_member))
            .route("/{id}", web::get().to(get_team_member))
            .route("/{id}", web::delete().to(delete_team_member)),
    );
}
