use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::AssignmentService;
use crate::errors::{Result, TycoonError};
use crate::models::teams::{entities::Team, requests::CreateTeamRequest};
use crate::models::users::entities::{UserRole, UserStatus};
use crate::models::{ApiResponse, error_response};
use crate::storage::Storage;

/// 为作业创建团队，成员必须是在读学生
pub async fn create(
    storage: &dyn Storage,
    assignment_id: i64,
    mut req: CreateTeamRequest,
) -> Result<Team> {
    req.name = req.name.trim().to_string();
    if req.name.is_empty() {
        return Err(TycoonError::validation("团队名称不能为空"));
    }

    let mut seen = std::collections::HashSet::new();
    req.member_ids.retain(|id| seen.insert(*id));
    if req.member_ids.is_empty() {
        return Err(TycoonError::validation("团队至少需要一名成员"));
    }

    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| TycoonError::not_found(format!("作业 {assignment_id} 不存在")))?;

    for &member_id in &req.member_ids {
        match storage.get_user_by_id(member_id).await? {
            Some(user) if user.role == UserRole::Student && user.status == UserStatus::Active => {}
            Some(_) => {
                return Err(TycoonError::validation(format!(
                    "用户 {member_id} 不是在读学生"
                )));
            }
            None => {
                return Err(TycoonError::not_found(format!("用户 {member_id} 不存在")));
            }
        }
    }

    let team = storage.create_team(&assignment, req).await?;
    info!(
        assignment_id,
        team_id = team.id,
        members = team.member_ids.len(),
        "团队已创建"
    );

    Ok(team)
}

pub async fn create_team(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    req: CreateTeamRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match create(storage.as_ref(), assignment_id, req).await {
        Ok(team) => Ok(HttpResponse::Created().json(ApiResponse::success(team, "团队创建成功"))),
        Err(e) => {
            warn!(assignment_id, "创建团队失败: {}", e);
            Ok(error_response(&e))
        }
    }
}

pub async fn list_teams(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_teams_by_assignment(assignment_id).await {
        Ok(teams) => Ok(HttpResponse::Ok().json(ApiResponse::success(teams, "查询成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testing::{classroom, create_user};

    #[tokio::test]
    async fn test_team_membership_rules() {
        let room = classroom(&[1]).await;
        let storage = room.storage();
        let carol = create_user(storage, "carol", UserRole::Student).await;

        let team = create(
            storage,
            room.assignment.id,
            CreateTeamRequest {
                name: " unicorn ".to_string(),
                member_ids: vec![carol.id, carol.id],
            },
        )
        .await
        .unwrap();
        assert_eq!(team.name, "unicorn");
        assert_eq!(team.member_ids, vec![carol.id]);
        assert_eq!(team.course_id, room.assignment.course_id);

        // 教师不能作为团队成员
        let err = create(
            storage,
            room.assignment.id,
            CreateTeamRequest {
                name: "staff".to_string(),
                member_ids: vec![room.teacher.id],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TycoonError::Validation(_)));

        let err = create(
            storage,
            room.assignment.id,
            CreateTeamRequest {
                name: "ghost".to_string(),
                member_ids: vec![4242],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TycoonError::NotFound(_)));
    }
}
