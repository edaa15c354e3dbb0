//! Milestone operations, scoped to the milestone list of one grade record.
//! Status side effects on the owning record are reported as events and
//! decided by the approval pipeline, never here.

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use super::error::GradingError;
use super::pipeline::GradeEvent;
use super::types::{
    FileRef, Milestone, MilestoneStatus, MilestoneType, SubmittedDocument, UploaderRole,
};

/// Cumulative evidence-file cap per milestone.
pub const MAX_SUBMITTED_DOCUMENTS: usize = 10;

fn find_mut(
    milestones: &mut [Milestone],
    milestone_id: Uuid,
) -> Result<&mut Milestone, GradingError> {
    milestones
        .iter_mut()
        .find(|m| m.milestone_id == milestone_id)
        .ok_or_else(|| GradingError::NotFound(format!("Milestone {} not found", milestone_id)))
}

/// Updates a milestone's status, optionally recording notes and supervisor
/// documents in the same call. Emits `MilestoneCompleted` on the transition
/// into `completed`.
pub fn update_status(
    milestones: &mut [Milestone],
    milestone_id: Uuid,
    status: MilestoneStatus,
    notes: Option<String>,
    documents: Vec<FileRef>,
    now: NaiveDateTime,
) -> Result<Option<GradeEvent>, GradingError> {
    let milestone = find_mut(milestones, milestone_id)?;

    if milestone.submitted_documents.len() + documents.len() > MAX_SUBMITTED_DOCUMENTS {
        return Err(GradingError::LimitExceeded(format!(
            "A milestone holds at most {} submitted documents",
            MAX_SUBMITTED_DOCUMENTS
        )));
    }

    let was_completed = milestone.status == MilestoneStatus::Completed;
    milestone.status = status;

    if status == MilestoneStatus::Completed && milestone.completed_at.is_none() {
        milestone.completed_at = Some(now);
    }
    if let Some(notes) = notes {
        milestone.notes = Some(notes);
    }
    for file in documents {
        milestone
            .submitted_documents
            .push(to_document(file, UploaderRole::Supervisor, now));
    }

    let event = (!was_completed && status == MilestoneStatus::Completed).then(|| {
        GradeEvent::MilestoneCompleted {
            milestone_type: milestone.milestone_type,
        }
    });
    Ok(event)
}

pub fn add_custom(
    milestones: &mut Vec<Milestone>,
    title: String,
    description: Option<String>,
    due_date: NaiveDate,
) -> Uuid {
    let milestone_id = Uuid::new_v4();
    milestones.push(Milestone {
        milestone_id,
        milestone_type: MilestoneType::Custom,
        title,
        description,
        due_date,
        status: MilestoneStatus::Pending,
        completed_at: None,
        is_custom: true,
        notes: None,
        submitted_documents: Vec::new(),
    });
    milestone_id
}

/// Editable fields; any milestone owned by the record qualifies, not only
/// custom ones.
pub fn edit(
    milestones: &mut [Milestone],
    milestone_id: Uuid,
    title: Option<String>,
    description: Option<String>,
    due_date: Option<NaiveDate>,
) -> Result<(), GradingError> {
    let milestone = find_mut(milestones, milestone_id)?;
    if let Some(title) = title {
        milestone.title = title;
    }
    if let Some(description) = description {
        milestone.description = Some(description);
    }
    if let Some(due_date) = due_date {
        milestone.due_date = due_date;
    }
    Ok(())
}

/// The default start milestone is permanent; only custom milestones go away.
pub fn delete(milestones: &mut Vec<Milestone>, milestone_id: Uuid) -> Result<(), GradingError> {
    let index = milestones
        .iter()
        .position(|m| m.milestone_id == milestone_id)
        .ok_or_else(|| GradingError::NotFound(format!("Milestone {} not found", milestone_id)))?;

    if !milestones[index].is_custom {
        return Err(GradingError::InvalidOperation(
            "Only custom milestones can be deleted".to_string(),
        ));
    }

    milestones.remove(index);
    Ok(())
}

/// Attaches uploaded files as evidence. Rejects the whole call when it would
/// push the milestone past the document cap.
pub fn attach_files(
    milestones: &mut [Milestone],
    milestone_id: Uuid,
    files: Vec<FileRef>,
    uploaded_by: UploaderRole,
    now: NaiveDateTime,
) -> Result<usize, GradingError> {
    if files.is_empty() {
        return Err(GradingError::Validation(
            "At least one file is required".to_string(),
        ));
    }

    let milestone = find_mut(milestones, milestone_id)?;

    if milestone.submitted_documents.len() + files.len() > MAX_SUBMITTED_DOCUMENTS {
        return Err(GradingError::LimitExceeded(format!(
            "A milestone holds at most {} submitted documents",
            MAX_SUBMITTED_DOCUMENTS
        )));
    }

    for file in files {
        milestone
            .submitted_documents
            .push(to_document(file, uploaded_by, now));
    }
    Ok(milestone.submitted_documents.len())
}

/// Students may only remove their own uploads; the supervisor may remove any.
pub fn remove_file(
    milestones: &mut [Milestone],
    milestone_id: Uuid,
    file_id: Uuid,
    caller: UploaderRole,
) -> Result<(), GradingError> {
    let milestone = find_mut(milestones, milestone_id)?;

    let index = milestone
        .submitted_documents
        .iter()
        .position(|d| d.file_id == file_id)
        .ok_or_else(|| GradingError::NotFound(format!("Document {} not found", file_id)))?;

    let document = &milestone.submitted_documents[index];
    if caller == UploaderRole::Student && document.uploaded_by != UploaderRole::Student {
        return Err(GradingError::Forbidden(
            "Students can only remove files they uploaded".to_string(),
        ));
    }

    milestone.submitted_documents.remove(index);
    Ok(())
}

pub fn progress_percentage(milestones: &[Milestone]) -> u32 {
    if milestones.is_empty() {
        return 0;
    }
    let completed = milestones
        .iter()
        .filter(|m| m.status == MilestoneStatus::Completed)
        .count();
    (100.0 * completed as f64 / milestones.len() as f64).round() as u32
}

fn to_document(file: FileRef, uploaded_by: UploaderRole, now: NaiveDateTime) -> SubmittedDocument {
    SubmittedDocument {
        file_id: Uuid::new_v4(),
        file_name: file.file_name,
        file_url: file.file_url,
        file_size: file.file_size,
        uploaded_by,
        uploaded_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::record::default_milestones;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn now() -> NaiveDateTime {
        date(10).and_hms_opt(10, 0, 0).unwrap()
    }

    fn file(name: &str) -> FileRef {
        FileRef {
            file_name: name.to_string(),
            file_url: format!("https://files.example/{}", name),
            file_size: 1024,
        }
    }

    #[test]
    fn completing_start_milestone_emits_event_and_sets_timestamp() {
        let mut milestones = default_milestones(date(1));
        let start_id = milestones[0].milestone_id;

        let event = update_status(
            &mut milestones,
            start_id,
            MilestoneStatus::Completed,
            Some("Kickoff done".to_string()),
            vec![],
            now(),
        )
        .unwrap();

        assert_eq!(
            event,
            Some(GradeEvent::MilestoneCompleted {
                milestone_type: MilestoneType::Start
            })
        );
        assert_eq!(milestones[0].completed_at, Some(now()));
        assert_eq!(milestones[0].notes.as_deref(), Some("Kickoff done"));

        // Already completed: no second event, timestamp untouched.
        let event = update_status(
            &mut milestones,
            start_id,
            MilestoneStatus::Completed,
            None,
            vec![],
            date(20).and_hms_opt(8, 0, 0).unwrap(),
        )
        .unwrap();
        assert_eq!(event, None);
        assert_eq!(milestones[0].completed_at, Some(now()));
    }

    #[test]
    fn unknown_milestone_is_not_found() {
        let mut milestones = default_milestones(date(1));
        let result = update_status(
            &mut milestones,
            Uuid::new_v4(),
            MilestoneStatus::InProgress,
            None,
            vec![],
            now(),
        );
        assert!(matches!(result, Err(GradingError::NotFound(_))));
    }

    #[test]
    fn only_custom_milestones_can_be_deleted() {
        let mut milestones = default_milestones(date(1));
        let start_id = milestones[0].milestone_id;
        assert!(matches!(
            delete(&mut milestones, start_id),
            Err(GradingError::InvalidOperation(_))
        ));

        let custom_id = add_custom(&mut milestones, "Midterm report".to_string(), None, date(15));
        delete(&mut milestones, custom_id).unwrap();
        assert_eq!(milestones.len(), 1);
    }

    #[test]
    fn document_cap_rejects_the_eleventh_file() {
        let mut milestones = default_milestones(date(1));
        let start_id = milestones[0].milestone_id;

        for i in 0..MAX_SUBMITTED_DOCUMENTS {
            attach_files(
                &mut milestones,
                start_id,
                vec![file(&format!("report-{}.pdf", i))],
                UploaderRole::Student,
                now(),
            )
            .unwrap();
        }

        let result = attach_files(
            &mut milestones,
            start_id,
            vec![file("one-too-many.pdf")],
            UploaderRole::Student,
            now(),
        );
        assert!(matches!(result, Err(GradingError::LimitExceeded(_))));
        assert_eq!(
            milestones[0].submitted_documents.len(),
            MAX_SUBMITTED_DOCUMENTS
        );
    }

    #[test]
    fn student_cannot_remove_supervisor_upload() {
        let mut milestones = default_milestones(date(1));
        let start_id = milestones[0].milestone_id;

        attach_files(
            &mut milestones,
            start_id,
            vec![file("feedback.pdf")],
            UploaderRole::Supervisor,
            now(),
        )
        .unwrap();
        let file_id = milestones[0].submitted_documents[0].file_id;

        assert!(matches!(
            remove_file(&mut milestones, start_id, file_id, UploaderRole::Student),
            Err(GradingError::Forbidden(_))
        ));
        remove_file(&mut milestones, start_id, file_id, UploaderRole::Supervisor).unwrap();
        assert!(milestones[0].submitted_documents.is_empty());
    }

    #[test]
    fn progress_percentage_edges() {
        assert_eq!(progress_percentage(&[]), 0);

        let mut milestones = default_milestones(date(1));
        add_custom(&mut milestones, "Report".to_string(), None, date(20));
        add_custom(&mut milestones, "Defense".to_string(), None, date(25));
        assert_eq!(progress_percentage(&milestones), 0);

        let first = milestones[0].milestone_id;
        update_status(
            &mut milestones,
            first,
            MilestoneStatus::Completed,
            None,
            vec![],
            now(),
        )
        .unwrap();
        assert_eq!(progress_percentage(&milestones), 33);

        for id in milestones.iter().map(|m| m.milestone_id).collect::<Vec<_>>() {
            update_status(
                &mut milestones,
                id,
                MilestoneStatus::Completed,
                None,
                vec![],
                now(),
            )
            .unwrap();
        }
        assert_eq!(progress_percentage(&milestones), 100);
    }
}
