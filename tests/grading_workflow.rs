//! End-to-end exercises of the grading domain: defaults, milestone-driven
//! status promotion, component grading, submission and committee review.

use chrono::NaiveDate;
use uuid::Uuid;

use internship_service::entities::internship_grade;
use internship_service::entities::sea_orm_active_enums::{GradeStatusEnum, WorkTypeEnum};
use internship_service::grading::GradingError;
use internship_service::grading::pipeline::{self, GradeEvent, ReviewDecision};
use internship_service::grading::record::{self, ComponentScoreUpdate};
use internship_service::grading::tracker;
use internship_service::grading::types::{GradeComponentType, MilestoneStatus};

fn new_record() -> internship_grade::Model {
    let start = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
    record::new_model(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        WorkTypeEnum::Internship,
        start,
        NaiveDate::from_ymd_opt(2026, 5, 29).unwrap(),
        start.and_hms_opt(8, 0, 0).unwrap(),
    )
}

fn apply_events(record: &mut internship_grade::Model, events: Vec<GradeEvent>) {
    for event in &events {
        if let Some(next) = pipeline::advance_on_event(record.status, event) {
            record.status = next;
        }
    }
}

fn set_score(record: &mut internship_grade::Model, component_type: GradeComponentType, score: f64) {
    let events = record::apply_component_updates(
        record,
        &[ComponentScoreUpdate {
            component_type,
            score,
            weight: None,
            comment: None,
        }],
    )
    .unwrap();
    apply_events(record, events);
}

fn complete_start_milestone(record: &mut internship_grade::Model) {
    let start_id = record.milestones.0[0].milestone_id;
    let now = record.start_date.and_hms_opt(9, 0, 0).unwrap();
    let event = tracker::update_status(
        &mut record.milestones.0,
        start_id,
        MilestoneStatus::Completed,
        None,
        vec![],
        now,
    )
    .unwrap();
    apply_events(record, event.into_iter().collect());
}

#[test]
fn full_grading_cycle_supervisor_to_committee() {
    let mut record = new_record();
    assert_eq!(record.status, GradeStatusEnum::NotStarted);

    // Completing the start milestone moves the record into in_progress.
    complete_start_milestone(&mut record);
    assert_eq!(record.status, GradeStatusEnum::InProgress);

    // One score present: record stays in progress, grade already derived.
    set_score(&mut record, GradeComponentType::SupervisorScore, 8.0);
    assert_eq!(record.status, GradeStatusEnum::InProgress);
    assert_eq!(record.final_grade, Some(5.6));

    // Both scores present: draft is complete, 0.7*8.0 + 0.3*9.0 = 8.3.
    set_score(&mut record, GradeComponentType::CompanyScore, 9.0);
    assert_eq!(record.status, GradeStatusEnum::DraftCompleted);
    assert_eq!(record.final_grade, Some(8.3));
    assert_eq!(record.letter_grade.as_deref(), Some("B+"));

    // Submission needs the final comment.
    assert!(matches!(
        pipeline::ensure_submittable(&record),
        Err(GradingError::Validation(_))
    ));
    record.supervisor_final_comment = Some("Good".to_string());
    pipeline::ensure_submittable(&record).unwrap();

    let submitted_at = NaiveDate::from_ymd_opt(2026, 6, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    pipeline::apply_submit(&mut record, submitted_at);
    assert_eq!(record.status, GradeStatusEnum::Submitted);
    assert!(record.submitted_to_bcn);
    assert_eq!(record.submitted_at, Some(submitted_at));

    // Committee approval closes the pipeline.
    pipeline::ensure_reviewable(&record).unwrap();
    let reviewer = Uuid::new_v4();
    let reviewed_at = submitted_at + chrono::Duration::days(2);
    pipeline::apply_review(
        &mut record,
        reviewer,
        ReviewDecision::Approve,
        "OK".to_string(),
        reviewed_at,
    );
    assert_eq!(record.status, GradeStatusEnum::Approved);
    assert_eq!(record.approved_by, Some(reviewer));
    assert_eq!(record.approved_at, Some(reviewed_at));
    assert_eq!(record.bcn_comment.as_deref(), Some("OK"));
}

#[test]
fn review_before_submission_is_rejected() {
    let mut record = new_record();
    complete_start_milestone(&mut record);

    assert!(matches!(
        pipeline::ensure_reviewable(&record),
        Err(GradingError::InvalidState(_))
    ));
}

#[test]
fn submit_with_zero_score_is_rejected() {
    let mut record = new_record();
    complete_start_milestone(&mut record);
    set_score(&mut record, GradeComponentType::SupervisorScore, 8.0);
    record.supervisor_final_comment = Some("Done".to_string());

    // company_score is still 0: the record never reached draft_completed,
    // so submission is a state error.
    assert_eq!(record.status, GradeStatusEnum::InProgress);
    assert!(matches!(
        pipeline::ensure_submittable(&record),
        Err(GradingError::InvalidState(_))
    ));

    // Zeroing a score after the draft completed trips the score guard.
    set_score(&mut record, GradeComponentType::CompanyScore, 9.0);
    assert_eq!(record.status, GradeStatusEnum::DraftCompleted);
    set_score(&mut record, GradeComponentType::CompanyScore, 0.0);
    assert_eq!(record.status, GradeStatusEnum::DraftCompleted);
    assert!(matches!(
        pipeline::ensure_submittable(&record),
        Err(GradingError::Validation(_))
    ));
}

#[test]
fn rejected_grade_can_be_corrected_and_resubmitted() {
    let mut record = new_record();
    complete_start_milestone(&mut record);
    set_score(&mut record, GradeComponentType::SupervisorScore, 8.0);
    set_score(&mut record, GradeComponentType::CompanyScore, 6.0);
    record.supervisor_final_comment = Some("First attempt".to_string());

    let now = NaiveDate::from_ymd_opt(2026, 6, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    pipeline::apply_submit(&mut record, now);
    pipeline::apply_review(
        &mut record,
        Uuid::new_v4(),
        ReviewDecision::Reject,
        "Company evaluation missing evidence".to_string(),
        now,
    );
    assert_eq!(record.status, GradeStatusEnum::Rejected);

    // Component data survived the rejection; a corrective write re-enters
    // the draft stage and the record can be submitted again.
    assert_eq!(record.final_grade, Some(7.4));
    set_score(&mut record, GradeComponentType::CompanyScore, 7.0);
    assert_eq!(record.status, GradeStatusEnum::DraftCompleted);

    pipeline::ensure_submittable(&record).unwrap();
    pipeline::apply_submit(&mut record, now + chrono::Duration::days(1));
    assert_eq!(record.status, GradeStatusEnum::Submitted);
}

#[test]
fn repeated_component_writes_are_stable() {
    let mut record = new_record();
    complete_start_milestone(&mut record);

    set_score(&mut record, GradeComponentType::SupervisorScore, 7.5);
    set_score(&mut record, GradeComponentType::SupervisorScore, 7.5);

    assert_eq!(record.grade_components.0.len(), 2);
    assert_eq!(record.final_grade, Some(5.25));
}

#[test]
fn default_record_shape_matches_contract() {
    let record = new_record();

    assert_eq!(record.milestones.0.len(), 1);
    assert!(!record.milestones.0[0].is_custom);
    assert_eq!(tracker::progress_percentage(&record.milestones.0), 0);

    let weights: f64 = record.grade_components.0.iter().map(|c| c.weight).sum();
    assert_eq!(weights, 1.0);
    assert!(record.final_grade.is_none());
    assert!(!record.submitted_to_bcn);
}
