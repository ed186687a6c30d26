//! 评审任务实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluation_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub evaluator_id: i64,
    pub team_id: i64,
    pub submission_id: i64,
    pub status: String,
    pub assigned_at: i64,
    pub completed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::submissions::Column::Id"
    )]
    Submission,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_evaluation_assignment(
        self,
    ) -> crate::models::evaluations::entities::EvaluationAssignment {
        use crate::models::evaluations::entities::{EvaluationAssignment, EvaluationStatus};

        EvaluationAssignment {
            id: self.id,
            assignment_id: self.assignment_id,
            evaluator_id: self.evaluator_id,
            team_id: self.team_id,
            submission_id: self.submission_id,
            status: self
                .status
                .parse::<EvaluationStatus>()
                .unwrap_or(EvaluationStatus::Assigned),
            assigned_at: super::from_ts(self.assigned_at),
            completed_at: self.completed_at.map(super::from_ts),
        }
    }
}
