//! 评审分发标记实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluation_distributions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub assignment_id: i64,
    pub evaluations_per_student: i32,
    pub total_assignments: i32,
    pub distributed_by: i64,
    pub distributed_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_distribution(self) -> crate::models::evaluations::entities::EvaluationDistribution {
        crate::models::evaluations::entities::EvaluationDistribution {
            id: self.id,
            assignment_id: self.assignment_id,
            evaluations_per_student: self.evaluations_per_student,
            total_assignments: self.total_assignments,
            distributed_by: self.distributed_by,
            distributed_at: super::from_ts(self.distributed_at),
        }
    }
}
