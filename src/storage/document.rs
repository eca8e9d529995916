// ============================================================================
// STORAGE : MAGASIN DE DOCUMENTS EN MÉMOIRE
// ============================================================================
//
// Description:
//   Collections de documents indexées par id, avec un compteur par
//   collection pour générer les ids entiers (lecture puis écriture du
//   compteur, comme un document "counters/<collection>").
//   Sert de backend "document" (STORAGE_BACKEND=document) et de backend
//   pour les tests.
//
// Points d'attention:
//   - Un seul verrou pour toutes les collections : chaque méthode est
//     atomique, mais deux appels successifs ne le sont pas (comme en SQL
//     sans transaction)
//   - Les données sont perdues à l'arrêt du process
//
// ============================================================================

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use super::{Storage, StorageError, StorageResult};
use crate::models::admin_users;
use crate::models::assignment::{self, NewAssignment};
use crate::models::cohort::{self, CohortPatch, NewCohort};
use crate::models::cohort_member::{self, NewCohortMember};
use crate::models::contact::{self, NewContact};
use crate::models::mentor_registration::{self, MentorRegistrationPatch, NewMentorRegistration};
use crate::models::mentoring_session::{self, NewSession, SessionPatch};
use crate::models::student_registration::{self, NewStudentRegistration, StudentRegistrationPatch};
use crate::models::users::{self, NewUser, UserRole};

#[derive(Default)]
struct Collections {
    counters: HashMap<&'static str, i32>,
    users: BTreeMap<String, users::Model>,
    admins: BTreeMap<i32, admin_users::Model>,
    contacts: BTreeMap<i32, contact::Model>,
    mentors: BTreeMap<i32, mentor_registration::Model>,
    students: BTreeMap<i32, student_registration::Model>,
    cohorts: BTreeMap<i32, cohort::Model>,
    members: BTreeMap<i32, cohort_member::Model>,
    assignments: BTreeMap<i32, assignment::Model>,
    sessions: BTreeMap<i32, mentoring_session::Model>,
}

impl Collections {
    fn next_id(&mut self, collection: &'static str) -> i32 {
        let current = self.counters.get(collection).copied().unwrap_or(0);
        let next = current + 1;
        self.counters.insert(collection, next);
        next
    }
}

/// Trie par date de création décroissante (ordre des listes "all")
fn newest_first<T, K: Ord>(mut docs: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    docs.sort_by(|a, b| key(b).cmp(&key(a)));
    docs
}

fn by_schedule(mut sessions: Vec<mentoring_session::Model>) -> Vec<mentoring_session::Model> {
    sessions.sort_by(|a, b| {
        (a.scheduled_date, &a.scheduled_time).cmp(&(b.scheduled_date, &b.scheduled_time))
    });
    sessions
}

pub struct DocumentStorage {
    inner: RwLock<Collections>,
}

impl DocumentStorage {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Collections::default()),
        }
    }
}

impl Default for DocumentStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for DocumentStorage {
    fn backend(&self) -> &'static str {
        "document"
    }

    async fn get_user(&self, id: &str) -> StorageResult<Option<users::Model>> {
        Ok(self.inner.read().await.users.get(id).cloned())
    }

    async fn upsert_user(&self, user: NewUser) -> StorageResult<users::Model> {
        let now = Utc::now();
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner.users.get_mut(&user.id) {
            existing.merge_profile(user);
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let created = users::Model {
            id: user.id.clone(),
            email: user.email,
            full_name: user.full_name,
            role: UserRole::Unassigned,
            mentor_registration_id: None,
            student_registration_id: None,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, created.clone());
        Ok(created)
    }

    async fn update_user_role(
        &self,
        id: &str,
        role: UserRole,
        registration_id: Option<i32>,
    ) -> StorageResult<users::Model> {
        let mut inner = self.inner.write().await;
        let user = inner
            .users
            .get_mut(id)
            .ok_or_else(|| StorageError::not_found("user", id))?;
        user.apply_role(role, registration_id);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn create_contact(&self, contact: NewContact) -> StorageResult<contact::Model> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id("contacts");
        let created = contact::Model {
            id,
            name: contact.name,
            email: contact.email,
            subject: contact.subject,
            message: contact.message,
            created_at: Utc::now(),
        };
        inner.contacts.insert(id, created.clone());
        Ok(created)
    }

    async fn list_contacts(&self) -> StorageResult<Vec<contact::Model>> {
        let inner = self.inner.read().await;
        Ok(newest_first(inner.contacts.values().cloned().collect(), |c| (c.created_at, c.id)))
    }

    async fn create_mentor_registration(
        &self,
        registration: NewMentorRegistration,
    ) -> StorageResult<mentor_registration::Model> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id("mentorRegistrations");
        let created = mentor_registration::Model::from_new(id, registration, Utc::now());
        inner.mentors.insert(id, created.clone());
        Ok(created)
    }

    async fn list_mentor_registrations(&self) -> StorageResult<Vec<mentor_registration::Model>> {
        let inner = self.inner.read().await;
        Ok(newest_first(inner.mentors.values().cloned().collect(), |m| (m.created_at, m.id)))
    }

    async fn get_mentor_registration(&self, id: i32) -> StorageResult<Option<mentor_registration::Model>> {
        Ok(self.inner.read().await.mentors.get(&id).cloned())
    }

    async fn get_mentor_by_user_id(&self, user_id: &str) -> StorageResult<Option<mentor_registration::Model>> {
        let inner = self.inner.read().await;
        Ok(inner
            .mentors
            .values()
            .find(|m| m.user_id.as_deref() == Some(user_id))
            .cloned())
    }

    async fn get_mentor_by_email(&self, email: &str) -> StorageResult<Option<mentor_registration::Model>> {
        let inner = self.inner.read().await;
        Ok(inner
            .mentors
            .values()
            .filter(|m| m.email == email)
            .max_by_key(|m| (m.created_at, m.id))
            .cloned())
    }

    async fn update_mentor_registration(
        &self,
        id: i32,
        patch: MentorRegistrationPatch,
    ) -> StorageResult<mentor_registration::Model> {
        let mut inner = self.inner.write().await;
        let registration = inner
            .mentors
            .get_mut(&id)
            .ok_or_else(|| StorageError::not_found("mentor registration", id))?;
        registration.apply(patch);
        Ok(registration.clone())
    }

    async fn link_mentor_registration(&self, id: i32, user_id: &str) -> StorageResult<mentor_registration::Model> {
        let mut inner = self.inner.write().await;
        let registration = inner
            .mentors
            .get_mut(&id)
            .ok_or_else(|| StorageError::not_found("mentor registration", id))?;
        registration.user_id = Some(user_id.to_string());
        Ok(registration.clone())
    }

    async fn delete_mentor_registration(&self, id: i32) -> StorageResult<()> {
        self.inner.write().await.mentors.remove(&id);
        Ok(())
    }

    async fn create_student_registration(
        &self,
        registration: NewStudentRegistration,
    ) -> StorageResult<student_registration::Model> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id("studentRegistrations");
        let created = student_registration::Model::from_new(id, registration, Utc::now());
        inner.students.insert(id, created.clone());
        Ok(created)
    }

    async fn list_student_registrations(&self) -> StorageResult<Vec<student_registration::Model>> {
        let inner = self.inner.read().await;
        Ok(newest_first(inner.students.values().cloned().collect(), |s| (s.created_at, s.id)))
    }

    async fn get_student_registration(&self, id: i32) -> StorageResult<Option<student_registration::Model>> {
        Ok(self.inner.read().await.students.get(&id).cloned())
    }

    async fn get_student_by_user_id(&self, user_id: &str) -> StorageResult<Option<student_registration::Model>> {
        let inner = self.inner.read().await;
        Ok(inner
            .students
            .values()
            .find(|s| s.user_id.as_deref() == Some(user_id))
            .cloned())
    }

    async fn get_student_by_email(&self, email: &str) -> StorageResult<Option<student_registration::Model>> {
        let inner = self.inner.read().await;
        Ok(inner
            .students
            .values()
            .filter(|s| s.email == email)
            .max_by_key(|s| (s.created_at, s.id))
            .cloned())
    }

    async fn update_student_registration(
        &self,
        id: i32,
        patch: StudentRegistrationPatch,
    ) -> StorageResult<student_registration::Model> {
        let mut inner = self.inner.write().await;
        let registration = inner
            .students
            .get_mut(&id)
            .ok_or_else(|| StorageError::not_found("student registration", id))?;
        registration.apply(patch);
        Ok(registration.clone())
    }

    async fn link_student_registration(&self, id: i32, user_id: &str) -> StorageResult<student_registration::Model> {
        let mut inner = self.inner.write().await;
        let registration = inner
            .students
            .get_mut(&id)
            .ok_or_else(|| StorageError::not_found("student registration", id))?;
        registration.user_id = Some(user_id.to_string());
        Ok(registration.clone())
    }

    async fn delete_student_registration(&self, id: i32) -> StorageResult<()> {
        self.inner.write().await.students.remove(&id);
        Ok(())
    }

    async fn get_admin_by_email(&self, email: &str) -> StorageResult<Option<admin_users::Model>> {
        let inner = self.inner.read().await;
        Ok(inner.admins.values().find(|a| a.email == email).cloned())
    }

    async fn create_admin(&self, email: &str) -> StorageResult<admin_users::Model> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id("adminUsers");
        let created = admin_users::Model {
            id,
            email: email.to_string(),
            created_at: Utc::now(),
        };
        inner.admins.insert(id, created.clone());
        Ok(created)
    }

    async fn create_cohort(&self, cohort: NewCohort) -> StorageResult<cohort::Model> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id("cohorts");
        let created = cohort::Model::from_new(id, cohort, Utc::now());
        inner.cohorts.insert(id, created.clone());
        Ok(created)
    }

    async fn list_cohorts(&self) -> StorageResult<Vec<cohort::Model>> {
        let inner = self.inner.read().await;
        Ok(newest_first(inner.cohorts.values().cloned().collect(), |c| (c.created_at, c.id)))
    }

    async fn get_cohort(&self, id: i32) -> StorageResult<Option<cohort::Model>> {
        Ok(self.inner.read().await.cohorts.get(&id).cloned())
    }

    async fn update_cohort(&self, id: i32, patch: CohortPatch) -> StorageResult<cohort::Model> {
        let mut inner = self.inner.write().await;
        let cohort = inner
            .cohorts
            .get_mut(&id)
            .ok_or_else(|| StorageError::not_found("cohort", id))?;
        cohort.apply(patch);
        Ok(cohort.clone())
    }

    async fn delete_cohort(&self, id: i32) -> StorageResult<()> {
        self.inner.write().await.cohorts.remove(&id);
        Ok(())
    }

    async fn add_cohort_member(&self, member: NewCohortMember) -> StorageResult<cohort_member::Model> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id("cohortMembers");
        let created = cohort_member::Model {
            id,
            cohort_id: member.cohort_id,
            user_id: member.user_id,
            role: member.role,
            is_active: true,
            joined_at: Utc::now(),
        };
        inner.members.insert(id, created.clone());
        Ok(created)
    }

    async fn list_cohort_members(&self, cohort_id: i32) -> StorageResult<Vec<cohort_member::Model>> {
        let inner = self.inner.read().await;
        Ok(inner
            .members
            .values()
            .filter(|m| m.cohort_id == cohort_id)
            .cloned()
            .collect())
    }

    async fn list_memberships_for_user(&self, user_id: &str) -> StorageResult<Vec<cohort_member::Model>> {
        let inner = self.inner.read().await;
        Ok(inner
            .members
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn remove_cohort_member(&self, cohort_id: i32, user_id: &str) -> StorageResult<()> {
        self.inner
            .write()
            .await
            .members
            .retain(|_, m| !(m.cohort_id == cohort_id && m.user_id == user_id));
        Ok(())
    }

    async fn create_assignment(&self, assignment: NewAssignment) -> StorageResult<assignment::Model> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id("assignments");
        let created = assignment::Model {
            id,
            cohort_id: assignment.cohort_id,
            mentor_id: assignment.mentor_id,
            student_id: assignment.student_id,
            mentor_user_id: assignment.mentor_user_id,
            student_user_id: assignment.student_user_id,
            is_active: true,
            assigned_at: Utc::now(),
        };
        inner.assignments.insert(id, created.clone());
        Ok(created)
    }

    async fn list_assignments(&self) -> StorageResult<Vec<assignment::Model>> {
        let inner = self.inner.read().await;
        Ok(newest_first(inner.assignments.values().cloned().collect(), |a| (a.assigned_at, a.id)))
    }

    async fn get_assignment(&self, id: i32) -> StorageResult<Option<assignment::Model>> {
        Ok(self.inner.read().await.assignments.get(&id).cloned())
    }

    async fn list_assignments_by_cohort(&self, cohort_id: i32) -> StorageResult<Vec<assignment::Model>> {
        let inner = self.inner.read().await;
        Ok(inner
            .assignments
            .values()
            .filter(|a| a.cohort_id == cohort_id)
            .cloned()
            .collect())
    }

    async fn list_assignments_by_mentor(&self, mentor_id: i32) -> StorageResult<Vec<assignment::Model>> {
        let inner = self.inner.read().await;
        Ok(inner
            .assignments
            .values()
            .filter(|a| a.mentor_id == mentor_id)
            .cloned()
            .collect())
    }

    async fn list_assignments_by_student(&self, student_id: i32) -> StorageResult<Vec<assignment::Model>> {
        let inner = self.inner.read().await;
        Ok(inner
            .assignments
            .values()
            .filter(|a| a.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn list_assignments_by_mentor_user(&self, user_id: &str) -> StorageResult<Vec<assignment::Model>> {
        let inner = self.inner.read().await;
        Ok(inner
            .assignments
            .values()
            .filter(|a| a.mentor_user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }

    async fn list_assignments_by_student_user(&self, user_id: &str) -> StorageResult<Vec<assignment::Model>> {
        let inner = self.inner.read().await;
        Ok(inner
            .assignments
            .values()
            .filter(|a| a.student_user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }

    async fn delete_assignment(&self, id: i32) -> StorageResult<()> {
        self.inner.write().await.assignments.remove(&id);
        Ok(())
    }

    async fn create_session(&self, session: NewSession) -> StorageResult<mentoring_session::Model> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id("mentoringSessions");
        let created = mentoring_session::Model::from_new(id, session, Utc::now());
        inner.sessions.insert(id, created.clone());
        Ok(created)
    }

    async fn get_session(&self, id: i32) -> StorageResult<Option<mentoring_session::Model>> {
        Ok(self.inner.read().await.sessions.get(&id).cloned())
    }

    async fn list_sessions_by_assignment(&self, assignment_id: i32) -> StorageResult<Vec<mentoring_session::Model>> {
        let inner = self.inner.read().await;
        Ok(by_schedule(
            inner
                .sessions
                .values()
                .filter(|s| s.assignment_id == assignment_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_sessions_by_cohort(&self, cohort_id: i32) -> StorageResult<Vec<mentoring_session::Model>> {
        let inner = self.inner.read().await;
        Ok(by_schedule(
            inner
                .sessions
                .values()
                .filter(|s| s.cohort_id == cohort_id)
                .cloned()
                .collect(),
        ))
    }

    async fn update_session(&self, id: i32, patch: SessionPatch) -> StorageResult<mentoring_session::Model> {
        let mut inner = self.inner.write().await;
        let session = inner
            .sessions
            .get_mut(&id)
            .ok_or_else(|| StorageError::not_found("session", id))?;
        session.apply(patch, Utc::now());
        Ok(session.clone())
    }

    async fn delete_session(&self, id: i32) -> StorageResult<()> {
        self.inner.write().await.sessions.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cohort_member::MemberRole;
    use chrono::NaiveDate;

    fn cohort(name: &str) -> NewCohort {
        NewCohort {
            name: name.to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
            sessions_per_month: 2,
            session_duration_minutes: 30,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_ids_come_from_per_collection_counters() {
        let storage = DocumentStorage::new();

        let first = storage.create_cohort(cohort("A")).await.unwrap();
        let second = storage.create_cohort(cohort("B")).await.unwrap();
        let admin = storage.create_admin("root@example.com").await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        // compteur indépendant par collection
        assert_eq!(admin.id, 1);

        // un id supprimé n'est pas réutilisé
        storage.delete_cohort(2).await.unwrap();
        let third = storage.create_cohort(cohort("C")).await.unwrap();
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn test_upsert_user_keeps_role() {
        let storage = DocumentStorage::new();
        storage
            .upsert_user(NewUser {
                id: "uid-1".to_string(),
                email: Some("a@example.com".to_string()),
                full_name: None,
            })
            .await
            .unwrap();
        storage.update_user_role("uid-1", UserRole::Admin, None).await.unwrap();

        let user = storage
            .upsert_user(NewUser {
                id: "uid-1".to_string(),
                email: None,
                full_name: Some("Ada Lovelace".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(user.email.as_deref(), Some("a@example.com"));
        assert_eq!(user.full_name.as_deref(), Some("Ada Lovelace"));
    }

    #[tokio::test]
    async fn test_remove_member_only_touches_that_cohort() {
        let storage = DocumentStorage::new();
        for cohort_id in [1, 2] {
            storage
                .add_cohort_member(NewCohortMember {
                    cohort_id,
                    user_id: "uid-1".to_string(),
                    role: MemberRole::Mentor,
                })
                .await
                .unwrap();
        }

        storage.remove_cohort_member(1, "uid-1").await.unwrap();

        let remaining = storage.list_memberships_for_user("uid-1").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].cohort_id, 2);
    }

    #[tokio::test]
    async fn test_update_missing_session_is_not_found() {
        let storage = DocumentStorage::new();
        let err = storage
            .update_session(42, SessionPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { entity: "session", .. }));
    }
}
