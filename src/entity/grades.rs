//! 团队成绩实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub team_id: i64,
    pub submission_id: i64,
    pub average_investment: f64,
    pub letter_grade: String,
    pub percentage: f64,
    pub total_investments: i32,
    pub status: String,
    pub manual_override: bool,
    pub original_letter_grade: Option<String>,
    pub original_percentage: Option<f64>,
    pub reviewed_by: Option<i64>,
    pub overridden_at: Option<i64>,
    pub calculated_at: i64,
    pub published_at: Option<i64>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teams::Entity",
        from = "Column::TeamId",
        to = "super::teams::Column::Id"
    )]
    Team,
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_grade(self) -> crate::models::grades::entities::Grade {
        use crate::models::grades::entities::{Grade, GradeStatus};

        Grade {
            id: self.id,
            assignment_id: self.assignment_id,
            team_id: self.team_id,
            submission_id: self.submission_id,
            average_investment: self.average_investment,
            letter_grade: self.letter_grade,
            percentage: self.percentage,
            total_investments: self.total_investments,
            status: self
                .status
                .parse::<GradeStatus>()
                .unwrap_or(GradeStatus::Draft),
            manual_override: self.manual_override,
            original_letter_grade: self.original_letter_grade,
            original_percentage: self.original_percentage,
            reviewed_by: self.reviewed_by,
            overridden_at: self.overridden_at.map(super::from_ts),
            calculated_at: super::from_ts(self.calculated_at),
            published_at: self.published_at.map(super::from_ts),
            updated_at: super::from_ts(self.updated_at),
        }
    }
}
