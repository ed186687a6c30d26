pub mod assignments;
pub mod evaluations;
pub mod grades;
pub mod interest;
pub mod investments;
pub mod submissions;
pub mod users;

pub use assignments::AssignmentService;
pub use evaluations::EvaluationService;
pub use grades::GradeService;
pub use interest::InterestService;
pub use investments::InvestmentService;
pub use submissions::SubmissionService;
pub use users::UserService;
