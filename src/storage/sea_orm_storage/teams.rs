use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::team_members::{
    ActiveModel as TeamMemberActiveModel, Column as TeamMemberColumn, Entity as TeamMembers,
};
use crate::entity::teams::{ActiveModel, Column, Entity as Teams, Model as TeamModel};
use crate::errors::{Result, TycoonError};
use crate::models::{
    assignments::entities::Assignment,
    teams::{entities::Team, requests::CreateTeamRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建团队并写入成员
    pub async fn create_team_impl(
        &self,
        assignment: &Assignment,
        req: CreateTeamRequest,
    ) -> Result<Team> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TycoonError::database_operation(format!("开启事务失败: {e}")))?;

        // 同一作业内学生只能加入一个团队
        let team_ids = Self::team_ids_of_assignment(&txn, assignment.id).await?;
        if !team_ids.is_empty() {
            let taken = TeamMembers::find()
                .filter(TeamMemberColumn::TeamId.is_in(team_ids))
                .filter(TeamMemberColumn::UserId.is_in(req.member_ids.clone()))
                .one(&txn)
                .await
                .map_err(|e| TycoonError::database_operation(format!("查询团队成员失败: {e}")))?;

            if let Some(member) = taken {
                return Err(TycoonError::validation(format!(
                    "学生 {} 已属于该作业的其他团队",
                    member.user_id
                )));
            }
        }

        let now = chrono::Utc::now().timestamp();
        let team = ActiveModel {
            assignment_id: Set(assignment.id),
            course_id: Set(assignment.course_id),
            name: Set(req.name),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| TycoonError::database_operation(format!("创建团队失败: {e}")))?;

        let members = req.member_ids.iter().map(|&user_id| TeamMemberActiveModel {
            team_id: Set(team.id),
            user_id: Set(user_id),
            joined_at: Set(now),
            ..Default::default()
        });
        TeamMembers::insert_many(members)
            .exec(&txn)
            .await
            .map_err(|e| TycoonError::database_operation(format!("添加团队成员失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| TycoonError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(team.into_team(req.member_ids))
    }

    /// 列出作业下的团队（含成员）
    pub async fn list_teams_by_assignment_impl(&self, assignment_id: i64) -> Result<Vec<Team>> {
        let teams = Teams::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("查询团队列表失败: {e}")))?;

        self.attach_members(teams).await
    }

    /// 获取学生在作业中所属的团队
    pub async fn get_user_team_for_assignment_impl(
        &self,
        assignment_id: i64,
        user_id: i64,
    ) -> Result<Option<Team>> {
        let team_ids = Self::team_ids_of_assignment(&self.db, assignment_id).await?;
        if team_ids.is_empty() {
            return Ok(None);
        }

        let membership = TeamMembers::find()
            .filter(TeamMemberColumn::TeamId.is_in(team_ids))
            .filter(TeamMemberColumn::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("查询团队成员失败: {e}")))?;

        let Some(membership) = membership else {
            return Ok(None);
        };

        let team = Teams::find_by_id(membership.team_id)
            .one(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("查询团队失败: {e}")))?;

        match team {
            Some(team) => Ok(self.attach_members(vec![team]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn team_ids_of_assignment<C: ConnectionTrait>(
        conn: &C,
        assignment_id: i64,
    ) -> Result<Vec<i64>> {
        let teams = Teams::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .all(conn)
            .await
            .map_err(|e| TycoonError::database_operation(format!("查询团队列表失败: {e}")))?;

        Ok(teams.into_iter().map(|t| t.id).collect())
    }

    async fn attach_members(&self, teams: Vec<TeamModel>) -> Result<Vec<Team>> {
        if teams.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = teams.iter().map(|t| t.id).collect();
        let members = TeamMembers::find()
            .filter(TeamMemberColumn::TeamId.is_in(ids))
            .order_by_asc(TeamMemberColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| TycoonError::database_operation(format!("查询团队成员失败: {e}")))?;

        let mut by_team: HashMap<i64, Vec<i64>> = HashMap::new();
        for member in members {
            by_team.entry(member.team_id).or_default().push(member.user_id);
        }

        Ok(teams
            .into_iter()
            .map(|t| {
                let member_ids = by_team.remove(&t.id).unwrap_or_default();
                t.into_team(member_ids)
            })
            .collect())
    }
}
