//! 评审分发规划
//!
//! 纯函数，不访问存储；随机源由调用方注入以便测试复现。

use std::collections::{BTreeMap, HashMap, HashSet};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::errors::{Result, TycoonError};
use crate::models::evaluations::entities::NewEvaluationAssignment;

/// 参与分发的团队（必须已正式提交）
#[derive(Debug, Clone)]
pub struct TeamEntry {
    pub team_id: i64,
    pub submission_id: i64,
    pub member_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct DistributionPlan {
    pub rows: Vec<NewEvaluationAssignment>,
    /// 团队 -> 被分配到的评审人数
    pub loads: BTreeMap<i64, i32>,
}

/// 为每名学生挑选 `per_student` 个非本队团队
///
/// 学生按团队轮转顺序依次选择，每次取当前负载最低的候选团队，
/// 负载相同时按本次随机生成的团队排名决定。
pub fn plan_distribution<R: Rng + ?Sized>(
    teams: &[TeamEntry],
    per_student: usize,
    rng: &mut R,
) -> Result<DistributionPlan> {
    if per_student == 0 {
        return Err(TycoonError::validation("每名学生的评审数必须大于 0"));
    }

    let mut own_teams: HashMap<i64, HashSet<i64>> = HashMap::new();
    for team in teams {
        for &member in &team.member_ids {
            own_teams.entry(member).or_default().insert(team.team_id);
        }
    }

    for (student, own) in &own_teams {
        let available = teams.len() - own.len();
        if available < per_student {
            return Err(TycoonError::insufficient_teams(format!(
                "学生 {student} 仅有 {available} 个可评审团队，少于要求的 {per_student} 个"
            )));
        }
    }

    let mut order: Vec<&TeamEntry> = teams.iter().collect();
    order.shuffle(rng);

    let mut rank: HashMap<i64, usize> = HashMap::new();
    let mut ranked: Vec<i64> = teams.iter().map(|t| t.team_id).collect();
    ranked.shuffle(rng);
    for (i, team_id) in ranked.into_iter().enumerate() {
        rank.insert(team_id, i);
    }

    let members: Vec<Vec<i64>> = order
        .iter()
        .map(|team| {
            let mut ids = team.member_ids.clone();
            ids.shuffle(rng);
            ids
        })
        .collect();

    // 每轮从每个团队各取一名成员
    let rounds = members.iter().map(Vec::len).max().unwrap_or(0);
    let mut visited = HashSet::new();
    let mut students = Vec::with_capacity(own_teams.len());
    for round in 0..rounds {
        for ids in &members {
            if let Some(&student) = ids.get(round)
                && visited.insert(student)
            {
                students.push(student);
            }
        }
    }

    let mut plan = DistributionPlan {
        rows: Vec::with_capacity(students.len() * per_student),
        loads: teams.iter().map(|t| (t.team_id, 0)).collect(),
    };

    for student in students {
        let own = &own_teams[&student];
        let mut candidates: Vec<&TeamEntry> = teams
            .iter()
            .filter(|t| !own.contains(&t.team_id))
            .collect();
        candidates.sort_by_key(|t| (plan.loads[&t.team_id], rank[&t.team_id]));

        for team in candidates.into_iter().take(per_student) {
            plan.rows.push(NewEvaluationAssignment {
                evaluator_id: student,
                team_id: team.team_id,
                submission_id: team.submission_id,
            });
            if let Some(load) = plan.loads.get_mut(&team.team_id) {
                *load += 1;
            }
        }
    }

    Ok(plan)
}
