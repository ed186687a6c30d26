//! 单元测试用的内存存储与数据构造

use std::sync::Arc;

use super::Storage;
use super::sea_orm_storage::SeaOrmStorage;
use crate::models::{
    assignments::{entities::Assignment, requests::CreateAssignmentRequest},
    submissions::entities::SubmissionStatus,
    teams::{entities::Team, requests::CreateTeamRequest},
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};

pub(crate) struct Classroom {
    pub storage: Arc<SeaOrmStorage>,
    pub teacher: User,
    pub assignment: Assignment,
    pub teams: Vec<Team>,
}

impl Classroom {
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn member(&self, team: usize, index: usize) -> i64 {
        self.teams[team].member_ids[index]
    }
}

pub(crate) async fn memory_storage() -> Arc<SeaOrmStorage> {
    Arc::new(
        SeaOrmStorage::new_in_memory()
            .await
            .expect("in-memory storage"),
    )
}

pub(crate) async fn create_user(storage: &dyn Storage, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            display_name: None,
            role,
        })
        .await
        .expect("create user")
}

/// 创建一个作业及 `team_sizes` 描述的团队，每个团队都已正式提交
pub(crate) async fn classroom(team_sizes: &[usize]) -> Classroom {
    let storage = memory_storage().await;
    let teacher = create_user(storage.as_ref(), "teacher", UserRole::Teacher).await;

    let assignment = storage
        .create_assignment(
            teacher.id,
            CreateAssignmentRequest {
                course_id: 1,
                title: "Pitch Deck".to_string(),
                description: None,
                submission_due_at: None,
                evaluation_due_at: None,
                evaluations_per_student: None,
            },
            5,
        )
        .await
        .expect("create assignment");

    let mut teams = Vec::new();
    for (t, &size) in team_sizes.iter().enumerate() {
        let mut member_ids = Vec::new();
        for m in 0..size {
            let user =
                create_user(storage.as_ref(), &format!("s{t}_{m}"), UserRole::Student).await;
            member_ids.push(user.id);
        }

        let team = storage
            .create_team(
                &assignment,
                CreateTeamRequest {
                    name: format!("team-{t}"),
                    member_ids,
                },
            )
            .await
            .expect("create team");

        storage
            .upsert_submission(
                assignment.id,
                team.id,
                team.member_ids[0],
                format!("https://example.com/{t}"),
                SubmissionStatus::Submitted,
            )
            .await
            .expect("submit");

        teams.push(team);
    }

    Classroom {
        storage,
        teacher,
        assignment,
        teams,
    }
}
