// ============================================================================
// STORAGE - INTERFACE COMMUNE
// ============================================================================
//
// Description:
//   Trait unique implémenté par deux adaptateurs :
//     - postgres : SeaORM sur PostgreSQL
//     - document : magasin de documents en mémoire (collections + compteurs)
//   Le backend est choisi UNE fois au démarrage (config) puis injecté dans
//   les handlers via web::Data<dyn Storage>. Pas de singleton global.
//
// Points d'attention:
//   - Aucune transaction : chaque méthode est une lecture/écriture isolée
//   - Les recherches par email attendent un email déjà normalisé
//   - Les listes "all" sont triées par date de création décroissante
//
// ============================================================================

pub mod document;
pub mod postgres;

use async_trait::async_trait;
use sea_orm::DbErr;
use std::fmt::Display;
use std::sync::Arc;
use thiserror::Error;

use crate::config::StorageBackend;
use crate::models::admin_users;
use crate::models::assignment::{self, NewAssignment};
use crate::models::cohort::{self, CohortPatch, NewCohort};
use crate::models::cohort_member::{self, NewCohortMember};
use crate::models::contact::{self, NewContact};
use crate::models::mentor_registration::{self, MentorRegistrationPatch, NewMentorRegistration};
use crate::models::mentoring_session::{self, NewSession, SessionPatch};
use crate::models::student_registration::{self, NewStudentRegistration, StudentRegistrationPatch};
use crate::models::users::{self, NewUser, UserRole};

pub use document::DocumentStorage;
pub use postgres::PostgresStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
}

impl StorageError {
    pub fn not_found(entity: &'static str, id: impl Display) -> Self {
        StorageError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Nom du backend ("postgres" ou "document")
    fn backend(&self) -> &'static str;

    // Utilisateurs
    async fn get_user(&self, id: &str) -> StorageResult<Option<users::Model>>;
    async fn upsert_user(&self, user: NewUser) -> StorageResult<users::Model>;
    async fn update_user_role(
        &self,
        id: &str,
        role: UserRole,
        registration_id: Option<i32>,
    ) -> StorageResult<users::Model>;

    // Formulaire de contact
    async fn create_contact(&self, contact: NewContact) -> StorageResult<contact::Model>;
    async fn list_contacts(&self) -> StorageResult<Vec<contact::Model>>;

    // Inscriptions mentor
    async fn create_mentor_registration(
        &self,
        registration: NewMentorRegistration,
    ) -> StorageResult<mentor_registration::Model>;
    async fn list_mentor_registrations(&self) -> StorageResult<Vec<mentor_registration::Model>>;
    async fn get_mentor_registration(&self, id: i32) -> StorageResult<Option<mentor_registration::Model>>;
    async fn get_mentor_by_user_id(&self, user_id: &str) -> StorageResult<Option<mentor_registration::Model>>;
    async fn get_mentor_by_email(&self, email: &str) -> StorageResult<Option<mentor_registration::Model>>;
    async fn update_mentor_registration(
        &self,
        id: i32,
        patch: MentorRegistrationPatch,
    ) -> StorageResult<mentor_registration::Model>;
    async fn link_mentor_registration(&self, id: i32, user_id: &str) -> StorageResult<mentor_registration::Model>;
    async fn delete_mentor_registration(&self, id: i32) -> StorageResult<()>;

    // Inscriptions étudiant
    async fn create_student_registration(
        &self,
        registration: NewStudentRegistration,
    ) -> StorageResult<student_registration::Model>;
    async fn list_student_registrations(&self) -> StorageResult<Vec<student_registration::Model>>;
    async fn get_student_registration(&self, id: i32) -> StorageResult<Option<student_registration::Model>>;
    async fn get_student_by_user_id(&self, user_id: &str) -> StorageResult<Option<student_registration::Model>>;
    async fn get_student_by_email(&self, email: &str) -> StorageResult<Option<student_registration::Model>>;
    async fn update_student_registration(
        &self,
        id: i32,
        patch: StudentRegistrationPatch,
    ) -> StorageResult<student_registration::Model>;
    async fn link_student_registration(&self, id: i32, user_id: &str) -> StorageResult<student_registration::Model>;
    async fn delete_student_registration(&self, id: i32) -> StorageResult<()>;

    // Liste blanche admin
    async fn get_admin_by_email(&self, email: &str) -> StorageResult<Option<admin_users::Model>>;
    async fn create_admin(&self, email: &str) -> StorageResult<admin_users::Model>;

    // Cohortes
    async fn create_cohort(&self, cohort: NewCohort) -> StorageResult<cohort::Model>;
    async fn list_cohorts(&self) -> StorageResult<Vec<cohort::Model>>;
    async fn get_cohort(&self, id: i32) -> StorageResult<Option<cohort::Model>>;
    async fn update_cohort(&self, id: i32, patch: CohortPatch) -> StorageResult<cohort::Model>;
    async fn delete_cohort(&self, id: i32) -> StorageResult<()>;

    // Membres de cohorte
    async fn add_cohort_member(&self, member: NewCohortMember) -> StorageResult<cohort_member::Model>;
    async fn list_cohort_members(&self, cohort_id: i32) -> StorageResult<Vec<cohort_member::Model>>;
    async fn list_memberships_for_user(&self, user_id: &str) -> StorageResult<Vec<cohort_member::Model>>;
    async fn remove_cohort_member(&self, cohort_id: i32, user_id: &str) -> StorageResult<()>;

    // Assignations
    async fn create_assignment(&self, assignment: NewAssignment) -> StorageResult<assignment::Model>;
    async fn list_assignments(&self) -> StorageResult<Vec<assignment::Model>>;
    async fn get_assignment(&self, id: i32) -> StorageResult<Option<assignment::Model>>;
    async fn list_assignments_by_cohort(&self, cohort_id: i32) -> StorageResult<Vec<assignment::Model>>;
    async fn list_assignments_by_mentor(&self, mentor_id: i32) -> StorageResult<Vec<assignment::Model>>;
    async fn list_assignments_by_student(&self, student_id: i32) -> StorageResult<Vec<assignment::Model>>;
    async fn list_assignments_by_mentor_user(&self, user_id: &str) -> StorageResult<Vec<assignment::Model>>;
    async fn list_assignments_by_student_user(&self, user_id: &str) -> StorageResult<Vec<assignment::Model>>;
    async fn delete_assignment(&self, id: i32) -> StorageResult<()>;

    // Sessions
    async fn create_session(&self, session: NewSession) -> StorageResult<mentoring_session::Model>;
    async fn get_session(&self, id: i32) -> StorageResult<Option<mentoring_session::Model>>;
    async fn list_sessions_by_assignment(&self, assignment_id: i32) -> StorageResult<Vec<mentoring_session::Model>>;
    async fn list_sessions_by_cohort(&self, cohort_id: i32) -> StorageResult<Vec<mentoring_session::Model>>;
    async fn update_session(&self, id: i32, patch: SessionPatch) -> StorageResult<mentoring_session::Model>;
    async fn delete_session(&self, id: i32) -> StorageResult<()>;
}

/// Ouvre le backend configuré
pub async fn connect(backend: &StorageBackend) -> StorageResult<Arc<dyn Storage>> {
    match backend {
        StorageBackend::Postgres { database_url } => {
            let storage = PostgresStorage::connect(database_url).await?;
            storage.sync_schema().await?;
            Ok(Arc::new(storage))
        }
        StorageBackend::Document => Ok(Arc::new(DocumentStorage::new())),
    }
}

/// Ajoute les emails de la config à la liste blanche admin (idempotent)
pub async fn seed_admins(storage: &dyn Storage, emails: &[String]) -> StorageResult<()> {
    for email in emails {
        let email = crate::utils::email::normalize_email(email);
        if storage.get_admin_by_email(&email).await?.is_none() {
            storage.create_admin(&email).await?;
            log::info!("Seeded admin allow-list entry {}", email);
        }
    }
    Ok(())
}
