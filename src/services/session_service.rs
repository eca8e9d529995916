use chrono::NaiveTime;

use crate::errors::AppError;
use crate::models::dto::CreateSessionRequest;
use crate::models::mentoring_session::{self, NewSession, SessionPatch, SessionStatus};
use crate::models::{assignment, users};
use crate::storage::{Storage, StorageError};

const DEFAULT_DURATION_MINUTES: i32 = 30;

pub struct SessionService;

/// Accepte "H:MM" ou "HH:MM", retourne toujours "HH:MM"
pub fn normalize_time(value: &str) -> Result<String, AppError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| AppError::BadRequest(format!("Invalid scheduledTime '{}' (expected HH:MM)", value)))
}

/// Le mentor possède l'assignation par son uid ou par son inscription liée
fn owns_assignment(mentor: &users::Model, assignment: &assignment::Model) -> bool {
    assignment.mentor_user_id.as_deref() == Some(mentor.id.as_str())
        || mentor.mentor_registration_id == Some(assignment.mentor_id)
}

impl SessionService {
    /// Création par le mentor du binôme. Statut forcé à "scheduled",
    /// cohorte reprise de l'assignation, durée par défaut = celle de la cohorte.
    pub async fn create_session(
        storage: &dyn Storage,
        mentor: &users::Model,
        request: CreateSessionRequest,
    ) -> Result<mentoring_session::Model, AppError> {
        let scheduled_time = normalize_time(&request.scheduled_time)?;

        let assignment = storage
            .get_assignment(request.assignment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;

        if !owns_assignment(mentor, &assignment) {
            log::warn!(
                "Mentor {} tried to schedule a session on assignment #{}",
                mentor.id,
                assignment.id
            );
            return Err(AppError::Forbidden(
                "You can only schedule sessions for your own assignments".to_string(),
            ));
        }

        let duration_minutes = match request.duration_minutes {
            Some(minutes) => minutes,
            None => storage
                .get_cohort(assignment.cohort_id)
                .await?
                .map(|c| c.session_duration_minutes)
                .unwrap_or(DEFAULT_DURATION_MINUTES),
        };

        let session = storage
            .create_session(NewSession {
                assignment_id: assignment.id,
                cohort_id: assignment.cohort_id,
                scheduled_date: request.scheduled_date,
                scheduled_time,
                duration_minutes,
                status: SessionStatus::Scheduled,
                meeting_link: request.meeting_link,
                notes: request.notes,
                created_by: Some(mentor.id.clone()),
            })
            .await?;

        log::info!("Session #{} scheduled on assignment #{}", session.id, assignment.id);
        Ok(session)
    }

    /// PUT et PATCH : fusion partielle sur la session existante
    pub async fn update_session(
        storage: &dyn Storage,
        id: i32,
        mut patch: SessionPatch,
    ) -> Result<mentoring_session::Model, AppError> {
        if let Some(time) = patch.scheduled_time.as_deref() {
            patch.scheduled_time = Some(normalize_time(time)?);
        }
        let session = storage.update_session(id, patch).await?;
        log::debug!("Session #{} updated ({:?})", session.id, session.status);
        Ok(session)
    }

    pub async fn delete_session(storage: &dyn Storage, id: i32) -> Result<(), AppError> {
        if storage.get_session(id).await?.is_none() {
            return Err(StorageError::not_found("session", id).into());
        }
        storage.delete_session(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignment::NewAssignment;
    use crate::models::cohort::NewCohort;
    use crate::models::users::{NewUser, UserRole};
    use crate::storage::DocumentStorage;
    use chrono::NaiveDate;

    async fn setup(storage: &DocumentStorage) -> (users::Model, assignment::Model) {
        let cohort = storage
            .create_cohort(NewCohort {
                name: "Fall".to_string(),
                description: None,
                start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
                sessions_per_month: 2,
                session_duration_minutes: 45,
                is_active: true,
            })
            .await
            .unwrap();
        let assignment = storage
            .create_assignment(NewAssignment {
                cohort_id: cohort.id,
                mentor_id: 1,
                student_id: 1,
                mentor_user_id: None,
                student_user_id: None,
            })
            .await
            .unwrap();
        storage
            .upsert_user(NewUser {
                id: "uid-maya".to_string(),
                email: None,
                full_name: None,
            })
            .await
            .unwrap();
        let mentor = storage
            .update_user_role("uid-maya", UserRole::Mentor, Some(1))
            .await
            .unwrap();
        (mentor, assignment)
    }

    fn request(assignment_id: i32, time: &str) -> CreateSessionRequest {
        CreateSessionRequest {
            assignment_id,
            scheduled_date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            scheduled_time: time.to_string(),
            duration_minutes: None,
            meeting_link: None,
            notes: None,
        }
    }

    #[test]
    fn test_normalize_time() {
        assert_eq!(normalize_time("9:05").unwrap(), "09:05");
        assert_eq!(normalize_time("14:30").unwrap(), "14:30");
        assert!(normalize_time("25:00").is_err());
        assert!(normalize_time("noon").is_err());
    }

    #[tokio::test]
    async fn test_create_session_defaults() {
        let storage = DocumentStorage::new();
        let (mentor, assignment) = setup(&storage).await;

        let session = SessionService::create_session(&storage, &mentor, request(assignment.id, "14:00"))
            .await
            .unwrap();

        assert_eq!(session.status, SessionStatus::Scheduled);
        assert_eq!(session.cohort_id, assignment.cohort_id);
        assert_eq!(session.duration_minutes, 45);
        assert_eq!(session.created_by.as_deref(), Some("uid-maya"));
    }

    #[tokio::test]
    async fn test_create_session_requires_ownership() {
        let storage = DocumentStorage::new();
        let (_, assignment) = setup(&storage).await;
        storage
            .upsert_user(NewUser {
                id: "uid-other".to_string(),
                email: None,
                full_name: None,
            })
            .await
            .unwrap();
        let other = storage
            .update_user_role("uid-other", UserRole::Mentor, Some(2))
            .await
            .unwrap();

        let err = SessionService::create_session(&storage, &other, request(assignment.id, "14:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = SessionService::create_session(&storage, &other, request(999, "14:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_merges_and_completes() {
        let storage = DocumentStorage::new();
        let (mentor, assignment) = setup(&storage).await;
        let session = SessionService::create_session(&storage, &mentor, request(assignment.id, "14:00"))
            .await
            .unwrap();

        let updated = SessionService::update_session(
            &storage,
            session.id,
            SessionPatch {
                status: Some(SessionStatus::Completed),
                notes: Some("Went through the resume".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.status, SessionStatus::Completed);
        assert_eq!(updated.scheduled_time, "14:00");
        assert_eq!(updated.notes.as_deref(), Some("Went through the resume"));
        assert!(updated.updated_at >= session.updated_at);

        SessionService::delete_session(&storage, session.id).await.unwrap();
        let err = SessionService::delete_session(&storage, session.id).await.unwrap_err();
        assert_eq!(
            actix_web::ResponseError::status_code(&err),
            actix_web::http::StatusCode::NOT_FOUND
        );
    }
}
