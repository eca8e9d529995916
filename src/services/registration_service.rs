// Soumission / mise à jour des inscriptions avec unicité par email
use validator::Validate;

use crate::errors::AppError;
use crate::models::mentor_registration::{self, MentorRegistrationPatch, NewMentorRegistration};
use crate::models::student_registration::{self, NewStudentRegistration, StudentRegistrationPatch};
use crate::storage::{Storage, StorageError};
use crate::utils::email::normalize_email;

pub struct RegistrationService;

impl RegistrationService {
    pub async fn submit_mentor(
        storage: &dyn Storage,
        form: NewMentorRegistration,
    ) -> Result<mentor_registration::Model, AppError> {
        let form = form.normalized();
        form.validate()
            .map_err(|e| AppError::validation("mentor registration", e))?;

        if storage.get_mentor_by_email(&form.email).await?.is_some() {
            return Err(AppError::Conflict(
                "A mentor registration already exists for this email".to_string(),
            ));
        }

        let created = storage.create_mentor_registration(form).await?;
        log::info!("Mentor registration #{} submitted", created.id);
        Ok(created)
    }

    pub async fn submit_student(
        storage: &dyn Storage,
        form: NewStudentRegistration,
    ) -> Result<student_registration::Model, AppError> {
        let form = form.normalized();
        form.validate()
            .map_err(|e| AppError::validation("student registration", e))?;

        if storage.get_student_by_email(&form.email).await?.is_some() {
            return Err(AppError::Conflict(
                "A student registration already exists for this email".to_string(),
            ));
        }

        let created = storage.create_student_registration(form).await?;
        log::info!("Student registration #{} submitted", created.id);
        Ok(created)
    }

    pub async fn update_mentor(
        storage: &dyn Storage,
        id: i32,
        patch: MentorRegistrationPatch,
    ) -> Result<mentor_registration::Model, AppError> {
        patch
            .validate()
            .map_err(|e| AppError::validation("mentor registration", e))?;

        if let Some(email) = patch.email.as_deref() {
            let email = normalize_email(email);
            if let Some(other) = storage.get_mentor_by_email(&email).await? {
                if other.id != id {
                    return Err(AppError::Conflict(
                        "A mentor registration already exists for this email".to_string(),
                    ));
                }
            }
        }

        Ok(storage.update_mentor_registration(id, patch).await?)
    }

    pub async fn update_student(
        storage: &dyn Storage,
        id: i32,
        patch: StudentRegistrationPatch,
    ) -> Result<student_registration::Model, AppError> {
        patch
            .validate()
            .map_err(|e| AppError::validation("student registration", e))?;

        if let Some(email) = patch.email.as_deref() {
            let email = normalize_email(email);
            if let Some(other) = storage.get_student_by_email(&email).await? {
                if other.id != id {
                    return Err(AppError::Conflict(
                        "A student registration already exists for this email".to_string(),
                    ));
                }
            }
        }

        Ok(storage.update_student_registration(id, patch).await?)
    }

    pub async fn delete_mentor(storage: &dyn Storage, id: i32) -> Result<(), AppError> {
        if storage.get_mentor_registration(id).await?.is_none() {
            return Err(StorageError::not_found("mentor registration", id).into());
        }
        storage.delete_mentor_registration(id).await?;
        Ok(())
    }

    pub async fn delete_student(storage: &dyn Storage, id: i32) -> Result<(), AppError> {
        if storage.get_student_registration(id).await?.is_none() {
            return Err(StorageError::not_found("student registration", id).into());
        }
        storage.delete_student_registration(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::identity_service::tests::{mentor_form, student_form};
    use crate::storage::DocumentStorage;

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let storage = DocumentStorage::new();
        let first = RegistrationService::submit_mentor(&storage, mentor_form("Maya", " Maya@Example.com"))
            .await
            .unwrap();
        assert_eq!(first.email, "maya@example.com");

        let err = RegistrationService::submit_mentor(&storage, mentor_form("Maya B", "maya@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // même email côté étudiant : autorisé
        assert!(RegistrationService::submit_student(&storage, student_form("Maya", "maya@example.com"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_invalid_form_is_rejected() {
        let storage = DocumentStorage::new();
        let err = RegistrationService::submit_student(&storage, student_form("Sam", "not-an-email"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(storage.list_student_registrations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_active_and_delete() {
        let storage = DocumentStorage::new();
        let reg = RegistrationService::submit_student(&storage, student_form("Sam", "sam@example.com"))
            .await
            .unwrap();
        assert!(reg.is_active);

        let updated = RegistrationService::update_student(&storage, reg.id, StudentRegistrationPatch::active(false))
            .await
            .unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.nominated_by, "Prof. Ortiz");

        RegistrationService::delete_student(&storage, reg.id).await.unwrap();
        let err = RegistrationService::delete_student(&storage, reg.id).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(StorageError::NotFound { .. })));
    }
}
