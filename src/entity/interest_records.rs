//! 利息记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "interest_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub assignment_id: i64,
    pub team_id: i64,
    pub tokens_invested: i32,
    pub performance_tier: String,
    pub interest_earned: f64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_interest_record(self) -> crate::models::interest::entities::InterestRecord {
        crate::models::interest::entities::InterestRecord {
            id: self.id,
            student_id: self.student_id,
            assignment_id: self.assignment_id,
            team_id: self.team_id,
            tokens_invested: self.tokens_invested,
            performance_tier: self.performance_tier,
            interest_earned: self.interest_earned,
            created_at: super::from_ts(self.created_at),
        }
    }
}
