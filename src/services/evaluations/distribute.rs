use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use super::EvaluationService;
use super::planner::{TeamEntry, plan_distribution};
use crate::config::{AppConfig, DistributionConfig};
use crate::errors::{Result, TycoonError};
use crate::models::evaluations::{
    requests::DistributeEvaluationsRequest,
    responses::{DistributionResponse, TeamLoad},
};
use crate::models::{ApiResponse, error_response};
use crate::storage::Storage;

/// 为作业分发评审任务
pub async fn distribute<R: Rng>(
    storage: &dyn Storage,
    config: &DistributionConfig,
    assignment_id: i64,
    requested: Option<i32>,
    distributed_by: i64,
    rng: &mut R,
) -> Result<DistributionResponse> {
    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| TycoonError::not_found(format!("作业 {assignment_id} 不存在")))?;

    let per_student = requested.unwrap_or(assignment.evaluations_per_student);
    if per_student < config.min_evaluations_per_student
        || per_student > config.max_evaluations_per_student
    {
        return Err(TycoonError::validation(format!(
            "每名学生的评审数必须在 {} 到 {} 之间",
            config.min_evaluations_per_student, config.max_evaluations_per_student
        )));
    }

    if storage
        .get_evaluation_distribution(assignment_id)
        .await?
        .is_some()
    {
        return Err(TycoonError::already_distributed(format!(
            "作业 {assignment_id} 的评审已分发"
        )));
    }

    let submissions = storage.list_submitted_submissions(assignment_id).await?;
    if submissions.is_empty() {
        return Err(TycoonError::validation("该作业还没有已提交的作品"));
    }

    let teams = storage.list_teams_by_assignment(assignment_id).await?;
    let entries: Vec<TeamEntry> = submissions
        .iter()
        .filter_map(|submission| {
            teams
                .iter()
                .find(|t| t.id == submission.team_id)
                .map(|team| TeamEntry {
                    team_id: team.id,
                    submission_id: submission.id,
                    member_ids: team.member_ids.clone(),
                })
        })
        .collect();

    let plan = plan_distribution(&entries, per_student as usize, rng)?;
    let team_loads = plan
        .loads
        .iter()
        .map(|(&team_id, &evaluations)| TeamLoad {
            team_id,
            evaluations,
        })
        .collect();

    // 唯一的分发标记保证并发请求中只有一个能成功写入
    let distribution = storage
        .create_evaluation_distribution(assignment_id, per_student, distributed_by, plan.rows)
        .await?;

    info!(
        assignment_id,
        per_student,
        total = distribution.total_assignments,
        "评审任务分发完成"
    );

    Ok(DistributionResponse {
        distribution,
        team_loads,
    })
}

pub async fn distribute_evaluations(
    service: &EvaluationService,
    request: &HttpRequest,
    assignment_id: i64,
    distributed_by: i64,
    req: DistributeEvaluationsRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = &AppConfig::get().distribution;
    let mut rng = StdRng::from_os_rng();

    match distribute(
        storage.as_ref(),
        config,
        assignment_id,
        req.evaluations_per_student,
        distributed_by,
        &mut rng,
    )
    .await
    {
        Ok(response) => Ok(HttpResponse::Created().json(ApiResponse::success(response, "评审分发成功"))),
        Err(e) => {
            warn!(assignment_id, "评审分发失败: {}", e);
            Ok(error_response(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::SubmissionStatus;
    use crate::storage::testing::classroom;
    use std::collections::HashSet;

    fn config() -> DistributionConfig {
        DistributionConfig::default()
    }

    #[tokio::test]
    async fn test_distribute_assigns_exactly_k_to_every_student() {
        let room = classroom(&[3, 3, 3, 3, 3, 3]).await;
        let mut rng = StdRng::seed_from_u64(11);

        let response = distribute(
            room.storage(),
            &config(),
            room.assignment.id,
            Some(4),
            room.teacher.id,
            &mut rng,
        )
        .await
        .unwrap();
        assert_eq!(response.distribution.total_assignments, 18 * 4);
        assert_eq!(response.team_loads.len(), 6);

        let rows = room
            .storage()
            .list_evaluation_assignments(room.assignment.id, None)
            .await
            .unwrap();
        for team in &room.teams {
            for &student in &team.member_ids {
                let mine: HashSet<i64> = rows
                    .iter()
                    .filter(|r| r.evaluator_id == student)
                    .map(|r| r.team_id)
                    .collect();
                assert_eq!(mine.len(), 4);
                assert!(!mine.contains(&team.id));
            }
        }
    }

    #[tokio::test]
    async fn test_second_distribution_is_rejected() {
        let room = classroom(&[2, 2, 2]).await;
        let mut rng = StdRng::seed_from_u64(5);

        distribute(room.storage(), &config(), room.assignment.id, Some(2), room.teacher.id, &mut rng)
            .await
            .unwrap();
        let before = room
            .storage()
            .list_evaluation_assignments(room.assignment.id, None)
            .await
            .unwrap()
            .len();

        let err = distribute(room.storage(), &config(), room.assignment.id, Some(2), room.teacher.id, &mut rng)
            .await
            .unwrap_err();
        assert!(matches!(err, TycoonError::AlreadyDistributed(_)));

        let after = room
            .storage()
            .list_evaluation_assignments(room.assignment.id, None)
            .await
            .unwrap()
            .len();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_insufficient_teams_writes_nothing() {
        let room = classroom(&[2, 2, 2]).await;
        let mut rng = StdRng::seed_from_u64(5);

        let err = distribute(room.storage(), &config(), room.assignment.id, Some(3), room.teacher.id, &mut rng)
            .await
            .unwrap_err();
        assert!(matches!(err, TycoonError::InsufficientTeams(_)));
        assert!(
            room.storage()
                .get_evaluation_distribution(room.assignment.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_count_out_of_range() {
        let room = classroom(&[2, 2]).await;
        let mut rng = StdRng::seed_from_u64(5);

        for k in [0, 11] {
            let err = distribute(room.storage(), &config(), room.assignment.id, Some(k), room.teacher.id, &mut rng)
                .await
                .unwrap_err();
            assert!(matches!(err, TycoonError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_draft_teams_are_not_evaluated() {
        let room = classroom(&[2, 2, 2]).await;
        room.storage()
            .upsert_submission(
                room.assignment.id,
                room.teams[2].id,
                room.member(2, 0),
                "wip".to_string(),
                SubmissionStatus::Draft,
            )
            .await
            .unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        distribute(room.storage(), &config(), room.assignment.id, Some(1), room.teacher.id, &mut rng)
            .await
            .unwrap();

        let rows = room
            .storage()
            .list_evaluation_assignments(room.assignment.id, None)
            .await
            .unwrap();
        // 只有两支已提交团队的 4 名学生参与
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.team_id != room.teams[2].id));
        assert!(rows.iter().all(|r| !room.teams[2].member_ids.contains(&r.evaluator_id)));
    }

    #[tokio::test]
    async fn test_missing_assignment() {
        let room = classroom(&[2, 2]).await;
        let mut rng = StdRng::seed_from_u64(5);
        let err = distribute(room.storage(), &config(), 999, None, room.teacher.id, &mut rng)
            .await
            .unwrap_err();
        assert!(matches!(err, TycoonError::NotFound(_)));
    }
}
