use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, QueryOrder, Set,
};

use super::{Storage, StorageError, StorageResult};
use crate::db;
use crate::models::admin_users;
use crate::models::assignment::{self, NewAssignment};
use crate::models::cohort::{self, CohortPatch, NewCohort};
use crate::models::cohort_member::{self, NewCohortMember};
use crate::models::contact::{self, NewContact};
use crate::models::mentor_registration::{self, MentorRegistrationPatch, NewMentorRegistration};
use crate::models::mentoring_session::{self, NewSession, SessionPatch};
use crate::models::student_registration::{self, NewStudentRegistration, StudentRegistrationPatch};
use crate::models::users::{self, NewUser, UserRole};

/// Adaptateur PostgreSQL (SeaORM)
pub struct PostgresStorage {
    db: DatabaseConnection,
}

impl PostgresStorage {
    pub async fn connect(database_url: &str) -> StorageResult<Self> {
        let db = db::establish_connection(database_url).await?;
        Ok(Self { db })
    }

    pub async fn sync_schema(&self) -> StorageResult<()> {
        db::sync_schema(&self.db).await?;
        Ok(())
    }

    async fn find_mentor(&self, id: i32) -> StorageResult<mentor_registration::Model> {
        mentor_registration::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| StorageError::not_found("mentor registration", id))
    }

    async fn find_student(&self, id: i32) -> StorageResult<student_registration::Model> {
        student_registration::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| StorageError::not_found("student registration", id))
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    // ------------------------------------------------------------------
    // Utilisateurs
    // ------------------------------------------------------------------

    async fn get_user(&self, id: &str) -> StorageResult<Option<users::Model>> {
        Ok(users::Entity::find_by_id(id.to_string()).one(&self.db).await?)
    }

    async fn upsert_user(&self, user: NewUser) -> StorageResult<users::Model> {
        let now = Utc::now();

        match users::Entity::find_by_id(user.id.clone()).one(&self.db).await? {
            Some(mut existing) => {
                existing.merge_profile(user);
                existing.updated_at = now;
                Ok(users::ActiveModel::from(existing).reset_all().update(&self.db).await?)
            }
            None => {
                let new_user = users::ActiveModel {
                    id: Set(user.id),
                    email: Set(user.email),
                    full_name: Set(user.full_name),
                    role: Set(UserRole::Unassigned),
                    mentor_registration_id: Set(None),
                    student_registration_id: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                Ok(new_user.insert(&self.db).await?)
            }
        }
    }

    async fn update_user_role(
        &self,
        id: &str,
        role: UserRole,
        registration_id: Option<i32>,
    ) -> StorageResult<users::Model> {
        let mut user = users::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| StorageError::not_found("user", id))?;

        user.apply_role(role, registration_id);
        user.updated_at = Utc::now();

        Ok(users::ActiveModel::from(user).reset_all().update(&self.db).await?)
    }

    // ------------------------------------------------------------------
    // Contact
    // ------------------------------------------------------------------

    async fn create_contact(&self, contact: NewContact) -> StorageResult<contact::Model> {
        let new_contact = contact::ActiveModel {
            id: NotSet,
            name: Set(contact.name),
            email: Set(contact.email),
            subject: Set(contact.subject),
            message: Set(contact.message),
            created_at: Set(Utc::now()),
        };
        Ok(new_contact.insert(&self.db).await?)
    }

    async fn list_contacts(&self) -> StorageResult<Vec<contact::Model>> {
        Ok(contact::Entity::find()
            .order_by_desc(contact::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    // ------------------------------------------------------------------
    // Inscriptions mentor
    // ------------------------------------------------------------------

    async fn create_mentor_registration(
        &self,
        registration: NewMentorRegistration,
    ) -> StorageResult<mentor_registration::Model> {
        let model = mentor_registration::Model::from_new(0, registration, Utc::now());
        let mut active = mentor_registration::ActiveModel::from(model).reset_all();
        active.id = NotSet;
        Ok(active.insert(&self.db).await?)
    }

    async fn list_mentor_registrations(&self) -> StorageResult<Vec<mentor_registration::Model>> {
        Ok(mentor_registration::Entity::find()
            .order_by_desc(mentor_registration::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    async fn get_mentor_registration(&self, id: i32) -> StorageResult<Option<mentor_registration::Model>> {
        Ok(mentor_registration::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn get_mentor_by_user_id(&self, user_id: &str) -> StorageResult<Option<mentor_registration::Model>> {
        Ok(mentor_registration::Entity::find()
            .filter(mentor_registration::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?)
    }

    async fn get_mentor_by_email(&self, email: &str) -> StorageResult<Option<mentor_registration::Model>> {
        Ok(mentor_registration::Entity::find()
            .filter(mentor_registration::Column::Email.eq(email))
            .order_by_desc(mentor_registration::Column::CreatedAt)
            .one(&self.db)
            .await?)
    }

    async fn update_mentor_registration(
        &self,
        id: i32,
        patch: MentorRegistrationPatch,
    ) -> StorageResult<mentor_registration::Model> {
        let mut registration = self.find_mentor(id).await?;
        registration.apply(patch);
        Ok(mentor_registration::ActiveModel::from(registration)
            .reset_all()
            .update(&self.db)
            .await?)
    }

    async fn link_mentor_registration(&self, id: i32, user_id: &str) -> StorageResult<mentor_registration::Model> {
        let registration = self.find_mentor(id).await?;
        let mut active: mentor_registration::ActiveModel = registration.into();
        active.user_id = Set(Some(user_id.to_string()));
        Ok(active.update(&self.db).await?)
    }

    async fn delete_mentor_registration(&self, id: i32) -> StorageResult<()> {
        mentor_registration::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Inscriptions étudiant
    // ------------------------------------------------------------------

    async fn create_student_registration(
        &self,
        registration: NewStudentRegistration,
    ) -> StorageResult<student_registration::Model> {
        let model = student_registration::Model::from_new(0, registration, Utc::now());
        let mut active = student_registration::ActiveModel::from(model).reset_all();
        active.id = NotSet;
        Ok(active.insert(&self.db).await?)
    }

    async fn list_student_registrations(&self) -> StorageResult<Vec<student_registration::Model>> {
        Ok(student_registration::Entity::find()
            .order_by_desc(student_registration::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    async fn get_student_registration(&self, id: i32) -> StorageResult<Option<student_registration::Model>> {
        Ok(student_registration::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn get_student_by_user_id(&self, user_id: &str) -> StorageResult<Option<student_registration::Model>> {
        Ok(student_registration::Entity::find()
            .filter(student_registration::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?)
    }

    async fn get_student_by_email(&self, email: &str) -> StorageResult<Option<student_registration::Model>> {
        Ok(student_registration::Entity::find()
            .filter(student_registration::Column::Email.eq(email))
            .order_by_desc(student_registration::Column::CreatedAt)
            .one(&self.db)
            .await?)
    }

    async fn update_student_registration(
        &self,
        id: i32,
        patch: StudentRegistrationPatch,
    ) -> StorageResult<student_registration::Model> {
        let mut registration = self.find_student(id).await?;
        registration.apply(patch);
        Ok(student_registration::ActiveModel::from(registration)
            .reset_all()
            .update(&self.db)
            .await?)
    }

    async fn link_student_registration(&self, id: i32, user_id: &str) -> StorageResult<student_registration::Model> {
        let registration = self.find_student(id).await?;
        let mut active: student_registration::ActiveModel = registration.into();
        active.user_id = Set(Some(user_id.to_string()));
        Ok(active.update(&self.db).await?)
    }

    async fn delete_student_registration(&self, id: i32) -> StorageResult<()> {
        student_registration::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Liste blanche admin
    // ------------------------------------------------------------------

    async fn get_admin_by_email(&self, email: &str) -> StorageResult<Option<admin_users::Model>> {
        Ok(admin_users::Entity::find()
            .filter(admin_users::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    async fn create_admin(&self, email: &str) -> StorageResult<admin_users::Model> {
        let admin = admin_users::ActiveModel {
            id: NotSet,
            email: Set(email.to_string()),
            created_at: Set(Utc::now()),
        };
        Ok(admin.insert(&self.db).await?)
    }

    // ------------------------------------------------------------------
    // Cohortes
    // ------------------------------------------------------------------

    async fn create_cohort(&self, cohort: NewCohort) -> StorageResult<cohort::Model> {
        let model = cohort::Model::from_new(0, cohort, Utc::now());
        let mut active = cohort::ActiveModel::from(model).reset_all();
        active.id = NotSet;
        Ok(active.insert(&self.db).await?)
    }

    async fn list_cohorts(&self) -> StorageResult<Vec<cohort::Model>> {
        Ok(cohort::Entity::find()
            .order_by_desc(cohort::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    async fn get_cohort(&self, id: i32) -> StorageResult<Option<cohort::Model>> {
        Ok(cohort::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn update_cohort(&self, id: i32, patch: CohortPatch) -> StorageResult<cohort::Model> {
        let mut cohort = cohort::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| StorageError::not_found("cohort", id))?;
        cohort.apply(patch);
        Ok(cohort::ActiveModel::from(cohort).reset_all().update(&self.db).await?)
    }

    async fn delete_cohort(&self, id: i32) -> StorageResult<()> {
        cohort::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Membres
    // ------------------------------------------------------------------

    async fn add_cohort_member(&self, member: NewCohortMember) -> StorageResult<cohort_member::Model> {
        let new_member = cohort_member::ActiveModel {
            id: NotSet,
            cohort_id: Set(member.cohort_id),
            user_id: Set(member.user_id),
            role: Set(member.role),
            is_active: Set(true),
            joined_at: Set(Utc::now()),
        };
        Ok(new_member.insert(&self.db).await?)
    }

    async fn list_cohort_members(&self, cohort_id: i32) -> StorageResult<Vec<cohort_member::Model>> {
        Ok(cohort_member::Entity::find()
            .filter(cohort_member::Column::CohortId.eq(cohort_id))
            .order_by_asc(cohort_member::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn list_memberships_for_user(&self, user_id: &str) -> StorageResult<Vec<cohort_member::Model>> {
        Ok(cohort_member::Entity::find()
            .filter(cohort_member::Column::UserId.eq(user_id))
            .order_by_asc(cohort_member::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn remove_cohort_member(&self, cohort_id: i32, user_id: &str) -> StorageResult<()> {
        cohort_member::Entity::delete_many()
            .filter(cohort_member::Column::CohortId.eq(cohort_id))
            .filter(cohort_member::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Assignations
    // ------------------------------------------------------------------

    async fn create_assignment(&self, assignment: NewAssignment) -> StorageResult<assignment::Model> {
        let new_assignment = assignment::ActiveModel {
            id: NotSet,
            cohort_id: Set(assignment.cohort_id),
            mentor_id: Set(assignment.mentor_id),
            student_id: Set(assignment.student_id),
            mentor_user_id: Set(assignment.mentor_user_id),
            student_user_id: Set(assignment.student_user_id),
            is_active: Set(true),
            assigned_at: Set(Utc::now()),
        };
        Ok(new_assignment.insert(&self.db).await?)
    }

    async fn list_assignments(&self) -> StorageResult<Vec<assignment::Model>> {
        Ok(assignment::Entity::find()
            .order_by_desc(assignment::Column::AssignedAt)
            .all(&self.db)
            .await?)
    }

    async fn get_assignment(&self, id: i32) -> StorageResult<Option<assignment::Model>> {
        Ok(assignment::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn list_assignments_by_cohort(&self, cohort_id: i32) -> StorageResult<Vec<assignment::Model>> {
        Ok(assignment::Entity::find()
            .filter(assignment::Column::CohortId.eq(cohort_id))
            .order_by_asc(assignment::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn list_assignments_by_mentor(&self, mentor_id: i32) -> StorageResult<Vec<assignment::Model>> {
        Ok(assignment::Entity::find()
            .filter(assignment::Column::MentorId.eq(mentor_id))
            .order_by_asc(assignment::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn list_assignments_by_student(&self, student_id: i32) -> StorageResult<Vec<assignment::Model>> {
        Ok(assignment::Entity::find()
            .filter(assignment::Column::StudentId.eq(student_id))
            .order_by_asc(assignment::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn list_assignments_by_mentor_user(&self, user_id: &str) -> StorageResult<Vec<assignment::Model>> {
        Ok(assignment::Entity::find()
            .filter(assignment::Column::MentorUserId.eq(user_id))
            .order_by_asc(assignment::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn list_assignments_by_student_user(&self, user_id: &str) -> StorageResult<Vec<assignment::Model>> {
        Ok(assignment::Entity::find()
            .filter(assignment::Column::StudentUserId.eq(user_id))
            .order_by_asc(assignment::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn delete_assignment(&self, id: i32) -> StorageResult<()> {
        assignment::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    async fn create_session(&self, session: NewSession) -> StorageResult<mentoring_session::Model> {
        let model = mentoring_session::Model::from_new(0, session, Utc::now());
        let mut active = mentoring_session::ActiveModel::from(model).reset_all();
        active.id = NotSet;
        Ok(active.insert(&self.db).await?)
    }

    async fn get_session(&self, id: i32) -> StorageResult<Option<mentoring_session::Model>> {
        Ok(mentoring_session::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn list_sessions_by_assignment(&self, assignment_id: i32) -> StorageResult<Vec<mentoring_session::Model>> {
        Ok(mentoring_session::Entity::find()
            .filter(mentoring_session::Column::AssignmentId.eq(assignment_id))
            .order_by_asc(mentoring_session::Column::ScheduledDate)
            .order_by_asc(mentoring_session::Column::ScheduledTime)
            .all(&self.db)
            .await?)
    }

    async fn list_sessions_by_cohort(&self, cohort_id: i32) -> StorageResult<Vec<mentoring_session::Model>> {
        Ok(mentoring_session::Entity::find()
            .filter(mentoring_session::Column::CohortId.eq(cohort_id))
            .order_by_asc(mentoring_session::Column::ScheduledDate)
            .order_by_asc(mentoring_session::Column::ScheduledTime)
            .all(&self.db)
            .await?)
    }

    async fn update_session(&self, id: i32, patch: SessionPatch) -> StorageResult<mentoring_session::Model> {
        let mut session = mentoring_session::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| StorageError::not_found("session", id))?;
        session.apply(patch, Utc::now());
        Ok(mentoring_session::ActiveModel::from(session)
            .reset_all()
            .update(&self.db)
            .await?)
    }

    async fn delete_session(&self, id: i32) -> StorageResult<()> {
        mentoring_session::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
