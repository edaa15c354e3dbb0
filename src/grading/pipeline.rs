//! Approval pipeline: the single authority over grade record status.
//!
//! not_started -> in_progress -> draft_completed -> submitted -> approved | rejected
//!
//! The first two transitions are driven by domain events, never by direct
//! client request. A rejected record re-enters draft_completed through a
//! component write and goes through submit() again; rejection never discards
//! component data.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::GradingError;
use super::types::MilestoneType;
use crate::entities::internship_grade;
use crate::entities::sea_orm_active_enums::GradeStatusEnum;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradeEvent {
    MilestoneCompleted { milestone_type: MilestoneType },
    AllComponentsGraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

/// Event-driven transitions. Returns the new status when the event moves the
/// record, `None` when it is a no-op for the current status.
pub fn advance_on_event(current: GradeStatusEnum, event: &GradeEvent) -> Option<GradeStatusEnum> {
    match (current, event) {
        (
            GradeStatusEnum::NotStarted,
            GradeEvent::MilestoneCompleted {
                milestone_type: MilestoneType::Start,
            },
        ) => Some(GradeStatusEnum::InProgress),
        (GradeStatusEnum::InProgress, GradeEvent::AllComponentsGraded) => {
            Some(GradeStatusEnum::DraftCompleted)
        }
        // Rejected records re-enter the draft stage once fully regraded.
        (GradeStatusEnum::Rejected, GradeEvent::AllComponentsGraded) => {
            Some(GradeStatusEnum::DraftCompleted)
        }
        _ => None,
    }
}

/// The supervisor may mutate milestones and components only before the record
/// enters the approval stage (rejected records are editable again).
pub fn ensure_mutable_by_supervisor(record: &internship_grade::Model) -> Result<(), GradingError> {
    match record.status {
        GradeStatusEnum::Submitted | GradeStatusEnum::Approved => Err(GradingError::InvalidState(
            format!("Grade record is read-only while {:?}", record.status),
        )),
        _ => Ok(()),
    }
}

pub fn ensure_submittable(record: &internship_grade::Model) -> Result<(), GradingError> {
    if record.status != GradeStatusEnum::DraftCompleted {
        return Err(GradingError::InvalidState(format!(
            "Cannot submit a grade record in status {:?}",
            record.status
        )));
    }

    if record.grade_components.0.iter().any(|c| c.score <= 0.0) {
        return Err(GradingError::Validation(
            "All grade components must have a score greater than 0 before submission".to_string(),
        ));
    }

    let has_comment = record
        .supervisor_final_comment
        .as_deref()
        .is_some_and(|c| !c.trim().is_empty());
    if !has_comment {
        return Err(GradingError::Validation(
            "Supervisor final comment is required before submission".to_string(),
        ));
    }

    Ok(())
}

pub fn apply_submit(record: &mut internship_grade::Model, now: NaiveDateTime) {
    record.status = GradeStatusEnum::Submitted;
    record.submitted_to_bcn = true;
    record.submitted_at = Some(now);
}

pub fn ensure_reviewable(record: &internship_grade::Model) -> Result<(), GradingError> {
    if record.status != GradeStatusEnum::Submitted {
        return Err(GradingError::InvalidState(format!(
            "Only submitted grade records can be reviewed, current status is {:?}",
            record.status
        )));
    }
    Ok(())
}

pub fn apply_review(
    record: &mut internship_grade::Model,
    reviewer_id: Uuid,
    decision: ReviewDecision,
    comment: String,
    now: NaiveDateTime,
) {
    record.status = match decision {
        ReviewDecision::Approve => GradeStatusEnum::Approved,
        ReviewDecision::Reject => GradeStatusEnum::Rejected,
    };
    record.approved_by = Some(reviewer_id);
    record.approved_at = Some(now);
    record.bcn_comment = Some(comment);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::record;
    use chrono::NaiveDate;

    fn test_record(status: GradeStatusEnum) -> internship_grade::Model {
        let start = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let now = start.and_hms_opt(8, 0, 0).unwrap();
        let mut model = record::new_model(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            crate::entities::sea_orm_active_enums::WorkTypeEnum::Internship,
            start,
            NaiveDate::from_ymd_opt(2026, 5, 29).unwrap(),
            now,
        );
        model.status = status;
        model
    }

    #[test]
    fn start_milestone_promotes_not_started() {
        let event = GradeEvent::MilestoneCompleted {
            milestone_type: MilestoneType::Start,
        };
        assert_eq!(
            advance_on_event(GradeStatusEnum::NotStarted, &event),
            Some(GradeStatusEnum::InProgress)
        );
        assert_eq!(advance_on_event(GradeStatusEnum::InProgress, &event), None);
    }

    #[test]
    fn custom_milestone_completion_never_promotes() {
        let event = GradeEvent::MilestoneCompleted {
            milestone_type: MilestoneType::Custom,
        };
        assert_eq!(advance_on_event(GradeStatusEnum::NotStarted, &event), None);
    }

    #[test]
    fn all_components_graded_promotes_in_progress_and_rejected() {
        let event = GradeEvent::AllComponentsGraded;
        assert_eq!(
            advance_on_event(GradeStatusEnum::InProgress, &event),
            Some(GradeStatusEnum::DraftCompleted)
        );
        assert_eq!(
            advance_on_event(GradeStatusEnum::Rejected, &event),
            Some(GradeStatusEnum::DraftCompleted)
        );
        assert_eq!(advance_on_event(GradeStatusEnum::NotStarted, &event), None);
        assert_eq!(advance_on_event(GradeStatusEnum::Submitted, &event), None);
    }

    #[test]
    fn submit_requires_draft_completed() {
        let record = test_record(GradeStatusEnum::InProgress);
        assert!(matches!(
            ensure_submittable(&record),
            Err(GradingError::InvalidState(_))
        ));
    }

    #[test]
    fn submit_requires_all_scores_and_comment() {
        let mut record = test_record(GradeStatusEnum::DraftCompleted);
        assert!(matches!(
            ensure_submittable(&record),
            Err(GradingError::Validation(_))
        ));

        for component in &mut record.grade_components.0 {
            component.score = 7.0;
        }
        assert!(matches!(
            ensure_submittable(&record),
            Err(GradingError::Validation(_))
        ));

        record.supervisor_final_comment = Some("Solid work".to_string());
        assert!(ensure_submittable(&record).is_ok());
    }

    #[test]
    fn review_requires_submitted() {
        let record = test_record(GradeStatusEnum::DraftCompleted);
        assert!(matches!(
            ensure_reviewable(&record),
            Err(GradingError::InvalidState(_))
        ));

        let submitted = test_record(GradeStatusEnum::Submitted);
        assert!(ensure_reviewable(&submitted).is_ok());
    }

    #[test]
    fn review_sets_audit_fields() {
        let mut record = test_record(GradeStatusEnum::Submitted);
        let reviewer = Uuid::new_v4();
        let now = NaiveDate::from_ymd_opt(2026, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        apply_review(&mut record, reviewer, ReviewDecision::Approve, "OK".into(), now);
        assert_eq!(record.status, GradeStatusEnum::Approved);
        assert_eq!(record.approved_by, Some(reviewer));
        assert_eq!(record.approved_at, Some(now));
        assert_eq!(record.bcn_comment.as_deref(), Some("OK"));
    }

    #[test]
    fn rejection_keeps_component_data() {
        let mut record = test_record(GradeStatusEnum::Submitted);
        for component in &mut record.grade_components.0 {
            component.score = 8.0;
        }
        let now = NaiveDate::from_ymd_opt(2026, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        apply_review(
            &mut record,
            Uuid::new_v4(),
            ReviewDecision::Reject,
            "Company score unsupported".into(),
            now,
        );
        assert_eq!(record.status, GradeStatusEnum::Rejected);
        assert!(record.grade_components.0.iter().all(|c| c.score == 8.0));
        assert!(ensure_mutable_by_supervisor(&record).is_ok());
    }
}
