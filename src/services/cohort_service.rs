// ============================================================================
// SERVICE : COHORTES, MEMBRES, ASSIGNATIONS
// ============================================================================
//
// Description:
//   Opérations admin qui touchent plusieurs collections : création
//   d'assignation (vérifie les références), vue enrichie des membres,
//   mise à jour avec contrôle des dates, suppressions en cascade.
//
// Points d'attention:
//   - Cascade cohorte : sessions -> assignations -> membres -> cohorte
//   - Cascade assignation : sessions -> assignation
//   - Les inscriptions ne sont jamais supprimées par cascade
//
// ============================================================================

use serde::Serialize;
use validator::ValidationErrors;

use crate::errors::AppError;
use crate::models::assignment::{self, NewAssignment};
use crate::models::cohort::{self, check_date_range, CohortPatch};
use crate::models::cohort_member::{self, MemberRole};
use crate::models::{mentor_registration, student_registration, users};
use crate::storage::{Storage, StorageError, StorageResult};

/// Inscription du membre selon son rôle dans la cohorte
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MemberRegistration {
    Mentor(mentor_registration::Model),
    Student(student_registration::Model),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    #[serde(flatten)]
    pub member: cohort_member::Model,
    pub user: Option<users::Model>,
    pub registration: Option<MemberRegistration>,
}

pub struct CohortService;

impl CohortService {
    /// Crée un binôme. Cohorte, inscription mentor et inscription étudiant
    /// doivent exister ; les user_id sont recopiés des inscriptions.
    pub async fn create_assignment(
        storage: &dyn Storage,
        cohort_id: i32,
        mentor_id: i32,
        student_id: i32,
    ) -> StorageResult<assignment::Model> {
        if storage.get_cohort(cohort_id).await?.is_none() {
            return Err(StorageError::not_found("cohort", cohort_id));
        }
        let mentor = storage
            .get_mentor_registration(mentor_id)
            .await?
            .ok_or_else(|| StorageError::not_found("mentor registration", mentor_id))?;
        let student = storage
            .get_student_registration(student_id)
            .await?
            .ok_or_else(|| StorageError::not_found("student registration", student_id))?;

        let created = storage
            .create_assignment(NewAssignment {
                cohort_id,
                mentor_id,
                student_id,
                mentor_user_id: mentor.user_id,
                student_user_id: student.user_id,
            })
            .await?;

        log::info!(
            "Assigned mentor #{} to student #{} in cohort #{}",
            mentor_id,
            student_id,
            cohort_id
        );
        Ok(created)
    }

    /// Membres d'une cohorte avec leur utilisateur et leur inscription
    pub async fn list_members(storage: &dyn Storage, cohort_id: i32) -> StorageResult<Vec<MemberView>> {
        let members = storage.list_cohort_members(cohort_id).await?;

        let mut views = Vec::with_capacity(members.len());
        for member in members {
            let user = storage.get_user(&member.user_id).await?;
            let registration = match member.role {
                MemberRole::Mentor => storage
                    .get_mentor_by_user_id(&member.user_id)
                    .await?
                    .map(MemberRegistration::Mentor),
                MemberRole::Student => storage
                    .get_student_by_user_id(&member.user_id)
                    .await?
                    .map(MemberRegistration::Student),
            };
            views.push(MemberView {
                member,
                user,
                registration,
            });
        }

        Ok(views)
    }

    /// Patch partiel ; les dates fusionnées doivent rester dans l'ordre
    pub async fn update_cohort(
        storage: &dyn Storage,
        id: i32,
        patch: CohortPatch,
    ) -> Result<cohort::Model, AppError> {
        let current = storage
            .get_cohort(id)
            .await?
            .ok_or_else(|| StorageError::not_found("cohort", id))?;

        let mut merged = current.clone();
        merged.apply(patch.clone());
        if let Err(e) = check_date_range(merged.start_date, merged.end_date) {
            let mut errors = ValidationErrors::new();
            errors.add("endDate", e);
            return Err(AppError::validation("cohort", errors));
        }

        Ok(storage.update_cohort(id, patch).await?)
    }

    pub async fn delete_cohort(storage: &dyn Storage, id: i32) -> StorageResult<()> {
        if storage.get_cohort(id).await?.is_none() {
            return Err(StorageError::not_found("cohort", id));
        }

        for session in storage.list_sessions_by_cohort(id).await? {
            storage.delete_session(session.id).await?;
        }
        for assignment in storage.list_assignments_by_cohort(id).await? {
            Self::delete_assignment_cascade(storage, assignment.id).await?;
        }
        for member in storage.list_cohort_members(id).await? {
            storage.remove_cohort_member(id, &member.user_id).await?;
        }
        storage.delete_cohort(id).await?;

        log::info!("Deleted cohort #{} with its sessions, assignments and members", id);
        Ok(())
    }

    pub async fn delete_assignment(storage: &dyn Storage, id: i32) -> StorageResult<()> {
        if storage.get_assignment(id).await?.is_none() {
            return Err(StorageError::not_found("assignment", id));
        }
        Self::delete_assignment_cascade(storage, id).await
    }

    /// Suppression groupée ; les ids inconnus sont ignorés.
    /// Retourne le nombre d'assignations supprimées.
    pub async fn bulk_delete_assignments(storage: &dyn Storage, ids: &[i32]) -> StorageResult<usize> {
        let mut deleted = 0;
        for &id in ids {
            if storage.get_assignment(id).await?.is_some() {
                Self::delete_assignment_cascade(storage, id).await?;
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn delete_assignment_cascade(storage: &dyn Storage, id: i32) -> StorageResult<()> {
        for session in storage.list_sessions_by_assignment(id).await? {
            storage.delete_session(session.id).await?;
        }
        storage.delete_assignment(id).await
    }
}
