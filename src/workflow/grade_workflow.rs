//! Route-level coordination for the grading workflow: role and relationship
//! checks once at the boundary, domain mutation, version-checked persistence
//! with re-apply on conflict, then best-effort notification of the
//! counterpart actor.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::config::GRADE_SAVE_MAX_RETRIES;
use crate::entities::internship_grade;
use crate::entities::sea_orm_active_enums::GradeStatusEnum;
use crate::grading::pipeline::{self, GradeEvent, ReviewDecision};
use crate::grading::record::{self, ComponentScoreUpdate, EngagementUpdate};
use crate::grading::types::{FileRef, MilestoneStatus, UploaderRole};
use crate::grading::{GradingError, calculator, tracker};
use crate::notification::{Notification, NotificationKind, NotificationPriority, Notifier};
use crate::repositories::{AssignmentRepository, GradeRepository, SubjectRepository};
use crate::structs::token_claims::{TokenClaims, UserRole};

#[derive(Debug, Clone, PartialEq)]
pub struct SubjectGradeStats {
    pub total: u64,
    pub submitted: u64,
    pub graded: u64,
    pub passed: u64,
    pub failed: u64,
    pub average_final_grade: Option<f64>,
}

pub struct GradeWorkflow;

impl GradeWorkflow {
    pub fn new() -> Self {
        Self
    }

    fn actor_id(claims: &TokenClaims) -> Result<Uuid, GradingError> {
        Uuid::parse_str(&claims.user_id)
            .map_err(|e| GradingError::Validation(format!("Invalid user_id claim: {}", e)))
    }

    fn ensure_role(claims: &TokenClaims, role: UserRole, action: &str) -> Result<(), GradingError> {
        if claims.role != role {
            return Err(GradingError::Forbidden(format!(
                "Only {:?} can {}",
                role, action
            )));
        }
        Ok(())
    }

    /// Read-modify-write with an optimistic version check. A lost race
    /// re-reads the record and re-applies the mutation on the fresh copy.
    async fn mutate_with_retry<F>(
        &self,
        grade_id: Uuid,
        mutate: F,
    ) -> Result<internship_grade::Model, GradingError>
    where
        F: Fn(&mut internship_grade::Model) -> Result<Vec<GradeEvent>, GradingError>,
    {
        let repo = GradeRepository::new();

        for attempt in 0..GRADE_SAVE_MAX_RETRIES {
            let mut record = repo
                .find_by_id(grade_id)
                .await?
                .ok_or_else(|| GradingError::NotFound(format!("Grade record {} not found", grade_id)))?;

            let events = mutate(&mut record)?;
            for event in &events {
                if let Some(next) = pipeline::advance_on_event(record.status, event) {
                    record.status = next;
                }
            }

            match repo.save(record).await? {
                Some(saved) => return Ok(saved),
                None => {
                    tracing::warn!(
                        "Version conflict saving grade record {}, attempt {}",
                        grade_id,
                        attempt + 1
                    );
                }
            }
        }

        Err(GradingError::Conflict(
            "Grade record was modified concurrently, please retry".to_string(),
        ))
    }

    fn ensure_supervisor_owns(
        record: &internship_grade::Model,
        supervisor_id: Uuid,
    ) -> Result<(), GradingError> {
        if record.supervisor_id != supervisor_id {
            return Err(GradingError::Forbidden(
                "Grade record belongs to another supervisor".to_string(),
            ));
        }
        Ok(())
    }

    /// Lazily creates the grade record the first time a supervisor opens an
    /// assigned student, seeding the default milestone and component split.
    pub async fn get_or_create_for_student(
        &self,
        claims: &TokenClaims,
        student_id: Uuid,
    ) -> Result<internship_grade::Model, GradingError> {
        Self::ensure_role(claims, UserRole::FACULTY, "open a student's grade record")?;
        let supervisor_id = Self::actor_id(claims)?;

        let assignment = AssignmentRepository::new()
            .find_by_student_and_supervisor(student_id, supervisor_id)
            .await?
            .ok_or_else(|| {
                GradingError::Forbidden("Student is not assigned to this supervisor".to_string())
            })?;

        let repo = GradeRepository::new();
        let existed = repo
            .find_by_student_and_subject(student_id, assignment.subject_id)
            .await?
            .is_some();

        let record = repo
            .get_or_create(
                student_id,
                supervisor_id,
                assignment.subject_id,
                assignment.work_type,
            )
            .await?;

        if !existed {
            Notifier::send(Notification {
                recipient: student_id,
                kind: NotificationKind::GradeRecordCreated,
                title: "Grading started".to_string(),
                message: "Your supervisor opened your internship grading record".to_string(),
                link: format!("/grades/{}", record.internship_grade_id),
                priority: NotificationPriority::Normal,
                metadata: json!({ "grade_id": record.internship_grade_id }),
            });
        }

        Ok(record)
    }

    pub async fn list_for_supervisor(
        &self,
        claims: &TokenClaims,
        status_filter: Option<GradeStatusEnum>,
    ) -> Result<Vec<internship_grade::Model>, GradingError> {
        Self::ensure_role(claims, UserRole::FACULTY, "list their grade records")?;
        let supervisor_id = Self::actor_id(claims)?;

        let records = GradeRepository::new()
            .find_by_supervisor(supervisor_id, status_filter)
            .await?;
        Ok(records)
    }

    pub async fn update_engagement_details(
        &self,
        claims: &TokenClaims,
        grade_id: Uuid,
        update: EngagementUpdate,
    ) -> Result<internship_grade::Model, GradingError> {
        Self::ensure_role(claims, UserRole::FACULTY, "update engagement details")?;
        let supervisor_id = Self::actor_id(claims)?;

        let saved = self
            .mutate_with_retry(grade_id, |record| {
                Self::ensure_supervisor_owns(record, supervisor_id)?;
                pipeline::ensure_mutable_by_supervisor(record)?;
                record::apply_engagement_update(record, update.clone())?;
                Ok(vec![])
            })
            .await?;

        Notifier::send(Notification {
            recipient: saved.student_id,
            kind: NotificationKind::EngagementUpdated,
            title: "Engagement details updated".to_string(),
            message: "Your supervisor updated your engagement details".to_string(),
            link: format!("/grades/{}", saved.internship_grade_id),
            priority: NotificationPriority::Low,
            metadata: json!({ "grade_id": saved.internship_grade_id }),
        });

        Ok(saved)
    }

    pub async fn update_milestone_status(
        &self,
        claims: &TokenClaims,
        grade_id: Uuid,
        milestone_id: Uuid,
        status: MilestoneStatus,
        notes: Option<String>,
        documents: Vec<FileRef>,
    ) -> Result<internship_grade::Model, GradingError> {
        Self::ensure_role(claims, UserRole::FACULTY, "update milestones")?;
        let supervisor_id = Self::actor_id(claims)?;

        let saved = self
            .mutate_with_retry(grade_id, |record| {
                Self::ensure_supervisor_owns(record, supervisor_id)?;
                pipeline::ensure_mutable_by_supervisor(record)?;
                let event = tracker::update_status(
                    &mut record.milestones.0,
                    milestone_id,
                    status,
                    notes.clone(),
                    documents.clone(),
                    Utc::now().naive_utc(),
                )?;
                Ok(event.into_iter().collect())
            })
            .await?;

        Notifier::send(Notification {
            recipient: saved.student_id,
            kind: NotificationKind::MilestoneUpdated,
            title: "Milestone updated".to_string(),
            message: format!("A milestone was moved to {:?}", status),
            link: format!("/grades/{}", saved.internship_grade_id),
            priority: NotificationPriority::Normal,
            metadata: json!({
                "grade_id": saved.internship_grade_id,
                "milestone_id": milestone_id,
                "record_status": saved.status,
            }),
        });

        Ok(saved)
    }

    pub async fn add_custom_milestone(
        &self,
        claims: &TokenClaims,
        grade_id: Uuid,
        title: String,
        description: Option<String>,
        due_date: chrono::NaiveDate,
    ) -> Result<internship_grade::Model, GradingError> {
        Self::ensure_role(claims, UserRole::FACULTY, "add milestones")?;
        let supervisor_id = Self::actor_id(claims)?;

        if title.trim().is_empty() {
            return Err(GradingError::Validation(
                "Milestone title cannot be empty".to_string(),
            ));
        }

        let saved = self
            .mutate_with_retry(grade_id, |record| {
                Self::ensure_supervisor_owns(record, supervisor_id)?;
                pipeline::ensure_mutable_by_supervisor(record)?;
                tracker::add_custom(
                    &mut record.milestones.0,
                    title.clone(),
                    description.clone(),
                    due_date,
                );
                Ok(vec![])
            })
            .await?;

        Notifier::send(Notification {
            recipient: saved.student_id,
            kind: NotificationKind::MilestoneUpdated,
            title: "New milestone".to_string(),
            message: format!("Your supervisor added the milestone \"{}\"", title),
            link: format!("/grades/{}", saved.internship_grade_id),
            priority: NotificationPriority::Normal,
            metadata: json!({ "grade_id": saved.internship_grade_id }),
        });

        Ok(saved)
    }

    pub async fn edit_milestone(
        &self,
        claims: &TokenClaims,
        grade_id: Uuid,
        milestone_id: Uuid,
        title: Option<String>,
        description: Option<String>,
        due_date: Option<chrono::NaiveDate>,
    ) -> Result<internship_grade::Model, GradingError> {
        Self::ensure_role(claims, UserRole::FACULTY, "edit milestones")?;
        let supervisor_id = Self::actor_id(claims)?;

        let saved = self
            .mutate_with_retry(grade_id, |record| {
                Self::ensure_supervisor_owns(record, supervisor_id)?;
                pipeline::ensure_mutable_by_supervisor(record)?;
                tracker::edit(
                    &mut record.milestones.0,
                    milestone_id,
                    title.clone(),
                    description.clone(),
                    due_date,
                )?;
                Ok(vec![])
            })
            .await?;

        Notifier::send(Notification {
            recipient: saved.student_id,
            kind: NotificationKind::MilestoneUpdated,
            title: "Milestone changed".to_string(),
            message: "A milestone of your grading record was edited".to_string(),
            link: format!("/grades/{}", saved.internship_grade_id),
            priority: NotificationPriority::Low,
            metadata: json!({
                "grade_id": saved.internship_grade_id,
                "milestone_id": milestone_id,
            }),
        });

        Ok(saved)
    }

    pub async fn delete_milestone(
        &self,
        claims: &TokenClaims,
        grade_id: Uuid,
        milestone_id: Uuid,
    ) -> Result<internship_grade::Model, GradingError> {
        Self::ensure_role(claims, UserRole::FACULTY, "delete milestones")?;
        let supervisor_id = Self::actor_id(claims)?;

        let saved = self
            .mutate_with_retry(grade_id, |record| {
                Self::ensure_supervisor_owns(record, supervisor_id)?;
                pipeline::ensure_mutable_by_supervisor(record)?;
                tracker::delete(&mut record.milestones.0, milestone_id)?;
                Ok(vec![])
            })
            .await?;

        Notifier::send(Notification {
            recipient: saved.student_id,
            kind: NotificationKind::MilestoneUpdated,
            title: "Milestone removed".to_string(),
            message: "A milestone was removed from your grading record".to_string(),
            link: format!("/grades/{}", saved.internship_grade_id),
            priority: NotificationPriority::Low,
            metadata: json!({ "grade_id": saved.internship_grade_id }),
        });

        Ok(saved)
    }

    /// Either side of the supervision can attach evidence; each upload is
    /// tagged with the uploader's role.
    pub async fn attach_milestone_files(
        &self,
        claims: &TokenClaims,
        grade_id: Uuid,
        milestone_id: Uuid,
        files: Vec<FileRef>,
    ) -> Result<internship_grade::Model, GradingError> {
        let actor_id = Self::actor_id(claims)?;
        let uploader = match claims.role {
            UserRole::FACULTY => UploaderRole::Supervisor,
            UserRole::STUDENT => UploaderRole::Student,
            _ => {
                return Err(GradingError::Forbidden(
                    "Only the supervisor or the student can attach files".to_string(),
                ));
            }
        };

        let saved = self
            .mutate_with_retry(grade_id, |record| {
                match uploader {
                    UploaderRole::Supervisor => Self::ensure_supervisor_owns(record, actor_id)?,
                    UploaderRole::Student => {
                        if record.student_id != actor_id {
                            return Err(GradingError::Forbidden(
                                "Grade record belongs to another student".to_string(),
                            ));
                        }
                    }
                }
                pipeline::ensure_mutable_by_supervisor(record)?;
                tracker::attach_files(
                    &mut record.milestones.0,
                    milestone_id,
                    files.clone(),
                    uploader,
                    Utc::now().naive_utc(),
                )?;
                Ok(vec![])
            })
            .await?;

        let recipient = match uploader {
            UploaderRole::Student => saved.supervisor_id,
            UploaderRole::Supervisor => saved.student_id,
        };
        Notifier::send(Notification {
            recipient,
            kind: NotificationKind::MilestoneDocumentsChanged,
            title: "New milestone documents".to_string(),
            message: format!("{} new document(s) were attached to a milestone", files.len()),
            link: format!("/grades/{}", saved.internship_grade_id),
            priority: NotificationPriority::Normal,
            metadata: json!({
                "grade_id": saved.internship_grade_id,
                "milestone_id": milestone_id,
            }),
        });

        Ok(saved)
    }

    pub async fn remove_milestone_file(
        &self,
        claims: &TokenClaims,
        grade_id: Uuid,
        milestone_id: Uuid,
        file_id: Uuid,
    ) -> Result<internship_grade::Model, GradingError> {
        let actor_id = Self::actor_id(claims)?;
        let caller = match claims.role {
            UserRole::FACULTY => UploaderRole::Supervisor,
            UserRole::STUDENT => UploaderRole::Student,
            _ => {
                return Err(GradingError::Forbidden(
                    "Only the supervisor or the student can remove files".to_string(),
                ));
            }
        };

        let saved = self
            .mutate_with_retry(grade_id, |record| {
                match caller {
                    UploaderRole::Supervisor => Self::ensure_supervisor_owns(record, actor_id)?,
                    UploaderRole::Student => {
                        if record.student_id != actor_id {
                            return Err(GradingError::Forbidden(
                                "Grade record belongs to another student".to_string(),
                            ));
                        }
                    }
                }
                pipeline::ensure_mutable_by_supervisor(record)?;
                tracker::remove_file(&mut record.milestones.0, milestone_id, file_id, caller)?;
                Ok(vec![])
            })
            .await?;

        let recipient = match caller {
            UploaderRole::Student => saved.supervisor_id,
            UploaderRole::Supervisor => saved.student_id,
        };
        Notifier::send(Notification {
            recipient,
            kind: NotificationKind::MilestoneDocumentsChanged,
            title: "Milestone document removed".to_string(),
            message: "A document was removed from a milestone".to_string(),
            link: format!("/grades/{}", saved.internship_grade_id),
            priority: NotificationPriority::Low,
            metadata: json!({
                "grade_id": saved.internship_grade_id,
                "milestone_id": milestone_id,
            }),
        });

        Ok(saved)
    }

    pub async fn update_grade_components(
        &self,
        claims: &TokenClaims,
        grade_id: Uuid,
        updates: Vec<ComponentScoreUpdate>,
    ) -> Result<internship_grade::Model, GradingError> {
        Self::ensure_role(claims, UserRole::FACULTY, "update grade components")?;
        let supervisor_id = Self::actor_id(claims)?;

        let saved = self
            .mutate_with_retry(grade_id, |record| {
                Self::ensure_supervisor_owns(record, supervisor_id)?;
                pipeline::ensure_mutable_by_supervisor(record)?;
                record::apply_component_updates(record, &updates)
            })
            .await?;

        Notifier::send(Notification {
            recipient: saved.student_id,
            kind: NotificationKind::GradeComponentsUpdated,
            title: "Grade components updated".to_string(),
            message: "Your supervisor updated your grade components".to_string(),
            link: format!("/grades/{}", saved.internship_grade_id),
            priority: NotificationPriority::Normal,
            metadata: json!({
                "grade_id": saved.internship_grade_id,
                "record_status": saved.status,
            }),
        });

        Ok(saved)
    }

    /// Hands a completed draft to the department committee.
    pub async fn submit_grade(
        &self,
        claims: &TokenClaims,
        grade_id: Uuid,
        final_comment: Option<String>,
    ) -> Result<internship_grade::Model, GradingError> {
        Self::ensure_role(claims, UserRole::FACULTY, "submit grades")?;
        let supervisor_id = Self::actor_id(claims)?;

        let saved = self
            .mutate_with_retry(grade_id, |record| {
                Self::ensure_supervisor_owns(record, supervisor_id)?;
                if let Some(comment) = &final_comment {
                    record.supervisor_final_comment = Some(comment.clone());
                }
                pipeline::ensure_submittable(record)?;
                pipeline::apply_submit(record, Utc::now().naive_utc());
                Ok(vec![])
            })
            .await?;

        match SubjectRepository::new().find_by_id(saved.subject_id).await? {
            Some(subject) => {
                Notifier::send(Notification {
                    recipient: subject.managed_by,
                    kind: NotificationKind::GradeSubmitted,
                    title: "Grade awaiting review".to_string(),
                    message: format!(
                        "A grade for subject {} was submitted for committee review",
                        subject.code
                    ),
                    link: format!("/reviews/{}", saved.internship_grade_id),
                    priority: NotificationPriority::High,
                    metadata: json!({
                        "grade_id": saved.internship_grade_id,
                        "subject_id": saved.subject_id,
                        "final_grade": saved.final_grade,
                    }),
                });
            }
            None => {
                tracing::error!(
                    "Subject {} of grade record {} has no committee reviewer to notify",
                    saved.subject_id,
                    saved.internship_grade_id
                );
            }
        }

        Ok(saved)
    }

    pub async fn list_pending_for_committee(
        &self,
        claims: &TokenClaims,
        subject_id: Uuid,
    ) -> Result<Vec<internship_grade::Model>, GradingError> {
        let subject = self.ensure_committee_subject(claims, subject_id).await?;

        let records = GradeRepository::new()
            .find_by_subject_and_status(subject.subject_id, vec![GradeStatusEnum::Submitted])
            .await?;
        Ok(records)
    }

    /// Committee decision on a submitted grade. Both sides of the
    /// supervision are told the outcome.
    pub async fn review_grade(
        &self,
        claims: &TokenClaims,
        grade_id: Uuid,
        decision: ReviewDecision,
        comment: String,
    ) -> Result<internship_grade::Model, GradingError> {
        Self::ensure_role(claims, UserRole::COMMITTEE, "review grades")?;
        let reviewer_id = Self::actor_id(claims)?;

        if comment.trim().is_empty() {
            return Err(GradingError::Validation(
                "A review comment is required".to_string(),
            ));
        }

        let record = GradeRepository::new()
            .find_by_id(grade_id)
            .await?
            .ok_or_else(|| GradingError::NotFound(format!("Grade record {} not found", grade_id)))?;
        self.ensure_committee_subject(claims, record.subject_id).await?;

        let saved = self
            .mutate_with_retry(grade_id, |record| {
                pipeline::ensure_reviewable(record)?;
                pipeline::apply_review(
                    record,
                    reviewer_id,
                    decision,
                    comment.clone(),
                    Utc::now().naive_utc(),
                );
                Ok(vec![])
            })
            .await?;

        let outcome = match decision {
            ReviewDecision::Approve => "approved",
            ReviewDecision::Reject => "rejected",
        };
        for recipient in [saved.supervisor_id, saved.student_id] {
            Notifier::send(Notification {
                recipient,
                kind: NotificationKind::GradeReviewed,
                title: format!("Grade {}", outcome),
                message: format!("The committee {} the submitted grade", outcome),
                link: format!("/grades/{}", saved.internship_grade_id),
                priority: NotificationPriority::High,
                metadata: json!({
                    "grade_id": saved.internship_grade_id,
                    "decision": outcome,
                    "final_grade": saved.final_grade,
                }),
            });
        }

        Ok(saved)
    }

    pub async fn get_my_progress(
        &self,
        claims: &TokenClaims,
    ) -> Result<internship_grade::Model, GradingError> {
        Self::ensure_role(claims, UserRole::STUDENT, "view their progress")?;
        let student_id = Self::actor_id(claims)?;

        let record = GradeRepository::new()
            .find_by_student(student_id)
            .await?
            .ok_or_else(|| {
                GradingError::NotFound("No grade record exists for this student yet".to_string())
            })?;
        Ok(record)
    }

    pub async fn subject_stats(
        &self,
        claims: &TokenClaims,
        subject_id: Uuid,
    ) -> Result<SubjectGradeStats, GradingError> {
        let subject = self.ensure_committee_subject(claims, subject_id).await?;

        let records = GradeRepository::new()
            .find_by_subject_and_status(
                subject.subject_id,
                vec![
                    GradeStatusEnum::NotStarted,
                    GradeStatusEnum::InProgress,
                    GradeStatusEnum::DraftCompleted,
                    GradeStatusEnum::Submitted,
                    GradeStatusEnum::Approved,
                    GradeStatusEnum::Rejected,
                ],
            )
            .await?;

        let submitted = records
            .iter()
            .filter(|r| r.status == GradeStatusEnum::Submitted)
            .count() as u64;

        let approved: Vec<&internship_grade::Model> = records
            .iter()
            .filter(|r| r.status == GradeStatusEnum::Approved)
            .collect();
        let passed = approved
            .iter()
            .filter(|r| r.final_grade.is_some_and(calculator::is_passing))
            .count() as u64;

        let final_grades: Vec<f64> = approved.iter().filter_map(|r| r.final_grade).collect();
        let average_final_grade = if final_grades.is_empty() {
            None
        } else {
            Some(final_grades.iter().sum::<f64>() / final_grades.len() as f64)
        };

        Ok(SubjectGradeStats {
            total: records.len() as u64,
            submitted,
            graded: approved.len() as u64,
            passed,
            failed: approved.len() as u64 - passed,
            average_final_grade,
        })
    }

    async fn ensure_committee_subject(
        &self,
        claims: &TokenClaims,
        subject_id: Uuid,
    ) -> Result<crate::entities::subject::Model, GradingError> {
        Self::ensure_role(claims, UserRole::COMMITTEE, "review subject grades")?;
        let reviewer_id = Self::actor_id(claims)?;

        let subject = SubjectRepository::new()
            .find_by_id(subject_id)
            .await?
            .ok_or_else(|| GradingError::NotFound(format!("Subject {} not found", subject_id)))?;

        if subject.managed_by != reviewer_id {
            return Err(GradingError::Forbidden(
                "Subject is managed by another committee member".to_string(),
            ));
        }
        Ok(subject)
    }
}
