//! 预导入模块，方便使用

pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::evaluation_assignments::{
    ActiveModel as EvaluationAssignmentActiveModel, Entity as EvaluationAssignments,
    Model as EvaluationAssignmentModel,
};
pub use super::evaluation_distributions::{
    ActiveModel as EvaluationDistributionActiveModel, Entity as EvaluationDistributions,
    Model as EvaluationDistributionModel,
};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::interest_records::{
    ActiveModel as InterestRecordActiveModel, Entity as InterestRecords,
    Model as InterestRecordModel,
};
pub use super::investments::{
    ActiveModel as InvestmentActiveModel, Entity as Investments, Model as InvestmentModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::team_members::{
    ActiveModel as TeamMemberActiveModel, Entity as TeamMembers, Model as TeamMemberModel,
};
pub use super::teams::{ActiveModel as TeamActiveModel, Entity as Teams, Model as TeamModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
