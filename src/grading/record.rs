//! Grade record aggregate: default synthesis on first access and the
//! component-write path. All collection mutation funnels through here or
//! through the tracker so the record invariants hold.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::calculator;
use super::error::GradingError;
use super::pipeline::GradeEvent;
use super::types::{
    CompanyInfo, GradeComponent, GradeComponentType, GradeComponents, Milestone, MilestoneStatus,
    MilestoneType, Milestones,
};
use crate::entities::internship_grade;
use crate::entities::sea_orm_active_enums::{GradeStatusEnum, WorkTypeEnum};

pub const SUPERVISOR_SCORE_WEIGHT: f64 = 0.7;
pub const COMPANY_SCORE_WEIGHT: f64 = 0.3;

/// The permanent kickoff milestone every record starts with.
pub fn default_milestones(start_date: NaiveDate) -> Vec<Milestone> {
    vec![Milestone {
        milestone_id: Uuid::new_v4(),
        milestone_type: MilestoneType::Start,
        title: "Start of engagement".to_string(),
        description: Some("Student has started at the host organization".to_string()),
        due_date: start_date,
        status: MilestoneStatus::Pending,
        completed_at: None,
        is_custom: false,
        notes: None,
        submitted_documents: Vec::new(),
    }]
}

/// Default 0.7/0.3 split; weights sum to 1.0 at creation.
pub fn default_components() -> Vec<GradeComponent> {
    vec![
        GradeComponent {
            component_type: GradeComponentType::SupervisorScore,
            score: 0.0,
            weight: SUPERVISOR_SCORE_WEIGHT,
            comment: None,
        },
        GradeComponent {
            component_type: GradeComponentType::CompanyScore,
            score: 0.0,
            weight: COMPANY_SCORE_WEIGHT,
            comment: None,
        },
    ]
}

pub fn new_model(
    student_id: Uuid,
    supervisor_id: Uuid,
    subject_id: Uuid,
    work_type: WorkTypeEnum,
    start_date: NaiveDate,
    end_date: NaiveDate,
    now: NaiveDateTime,
) -> internship_grade::Model {
    internship_grade::Model {
        internship_grade_id: Uuid::new_v4(),
        student_id,
        supervisor_id,
        subject_id,
        work_type,
        company: None,
        project_topic: None,
        start_date,
        end_date,
        milestones: Milestones(default_milestones(start_date)),
        grade_components: GradeComponents(default_components()),
        final_grade: None,
        letter_grade: None,
        status: GradeStatusEnum::NotStarted,
        submitted_to_bcn: false,
        submitted_at: None,
        approved_by: None,
        approved_at: None,
        supervisor_final_comment: None,
        bcn_comment: None,
        version: 0,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ComponentScoreUpdate {
    pub component_type: GradeComponentType,
    pub score: f64,
    pub weight: Option<f64>,
    pub comment: Option<String>,
}

/// Applies component writes, recomputes the derived grade synchronously and
/// reports `AllComponentsGraded` once every component carries a score.
pub fn apply_component_updates(
    record: &mut internship_grade::Model,
    updates: &[ComponentScoreUpdate],
) -> Result<Vec<GradeEvent>, GradingError> {
    if updates.is_empty() {
        return Err(GradingError::Validation(
            "At least one grade component is required".to_string(),
        ));
    }

    for update in updates {
        if !(0.0..=10.0).contains(&update.score) {
            return Err(GradingError::Validation(format!(
                "Score {} is out of range, expected 0 to 10",
                update.score
            )));
        }
        if let Some(weight) = update.weight {
            if !(0.0..=1.0).contains(&weight) {
                return Err(GradingError::Validation(format!(
                    "Weight {} is out of range, expected 0 to 1",
                    weight
                )));
            }
        }

        let component = record
            .grade_components
            .0
            .iter_mut()
            .find(|c| c.component_type == update.component_type)
            .ok_or_else(|| {
                GradingError::NotFound(format!(
                    "Grade component {:?} not found",
                    update.component_type
                ))
            })?;

        component.score = update.score;
        if let Some(weight) = update.weight {
            component.weight = weight;
        }
        if let Some(comment) = &update.comment {
            component.comment = Some(comment.clone());
        }
    }

    recompute_grade(record);

    let all_graded = record.grade_components.0.iter().all(|c| c.score > 0.0);
    Ok(if all_graded {
        vec![GradeEvent::AllComponentsGraded]
    } else {
        vec![]
    })
}

pub fn recompute_grade(record: &mut internship_grade::Model) {
    let computed = calculator::recompute(&record.grade_components.0);
    record.final_grade = Some(computed.final_grade);
    record.letter_grade = Some(computed.letter_grade.to_string());
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EngagementUpdate {
    pub company: Option<CompanyInfo>,
    pub project_topic: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Company details belong to internships, a project topic to theses.
pub fn apply_engagement_update(
    record: &mut internship_grade::Model,
    update: EngagementUpdate,
) -> Result<(), GradingError> {
    if update.company.is_some() && record.work_type != WorkTypeEnum::Internship {
        return Err(GradingError::Validation(
            "Company information only applies to internship records".to_string(),
        ));
    }
    if update.project_topic.is_some() && record.work_type != WorkTypeEnum::Thesis {
        return Err(GradingError::Validation(
            "A project topic only applies to thesis records".to_string(),
        ));
    }

    if let Some(company) = update.company {
        record.company = Some(company);
    }
    if let Some(topic) = update.project_topic {
        record.project_topic = Some(topic);
    }
    if let Some(start_date) = update.start_date {
        record.start_date = start_date;
    }
    if let Some(end_date) = update.end_date {
        record.end_date = end_date;
    }

    if record.end_date < record.start_date {
        return Err(GradingError::Validation(
            "End date cannot precede start date".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_model() -> internship_grade::Model {
        let start = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        new_model(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            WorkTypeEnum::Internship,
            start,
            NaiveDate::from_ymd_opt(2026, 5, 29).unwrap(),
            start.and_hms_opt(8, 0, 0).unwrap(),
        )
    }

    #[test]
    fn defaults_hold_creation_invariants() {
        let record = test_model();
        assert_eq!(record.milestones.0.len(), 1);
        assert_eq!(record.milestones.0[0].milestone_type, MilestoneType::Start);
        assert!(!record.milestones.0[0].is_custom);

        let weight_sum: f64 = record.grade_components.0.iter().map(|c| c.weight).sum();
        assert_eq!(weight_sum, 1.0);
        assert_eq!(record.final_grade, None);
        assert_eq!(record.status, GradeStatusEnum::NotStarted);
    }

    #[test]
    fn component_update_recomputes_and_reports_completeness() {
        let mut record = test_model();

        let events = apply_component_updates(
            &mut record,
            &[ComponentScoreUpdate {
                component_type: GradeComponentType::SupervisorScore,
                score: 8.0,
                weight: None,
                comment: Some("Consistent throughout".to_string()),
            }],
        )
        .unwrap();
        assert!(events.is_empty());
        assert_eq!(record.final_grade, Some(5.6));

        let events = apply_component_updates(
            &mut record,
            &[ComponentScoreUpdate {
                component_type: GradeComponentType::CompanyScore,
                score: 9.0,
                weight: None,
                comment: None,
            }],
        )
        .unwrap();
        assert_eq!(events, vec![GradeEvent::AllComponentsGraded]);
        assert_eq!(record.final_grade, Some(8.3));
        assert_eq!(record.letter_grade.as_deref(), Some("B+"));
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        let mut record = test_model();
        let result = apply_component_updates(
            &mut record,
            &[ComponentScoreUpdate {
                component_type: GradeComponentType::SupervisorScore,
                score: 10.5,
                weight: None,
                comment: None,
            }],
        );
        assert!(matches!(result, Err(GradingError::Validation(_))));
        assert_eq!(record.final_grade, None);
    }

    #[test]
    fn engagement_fields_follow_work_type() {
        let mut record = test_model();
        let result = apply_engagement_update(
            &mut record,
            EngagementUpdate {
                company: None,
                project_topic: Some("Irrelevant".to_string()),
                start_date: None,
                end_date: None,
            },
        );
        assert!(matches!(result, Err(GradingError::Validation(_))));

        apply_engagement_update(
            &mut record,
            EngagementUpdate {
                company: Some(CompanyInfo {
                    name: "FPT Software".to_string(),
                    contact: Some("Ms. Lan".to_string()),
                }),
                project_topic: None,
                start_date: None,
                end_date: None,
            },
        )
        .unwrap();
        assert_eq!(record.company.as_ref().unwrap().name, "FPT Software");
    }
}
