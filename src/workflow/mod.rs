pub mod grade_workflow;

pub use grade_workflow::{GradeWorkflow, SubjectGradeStats};
