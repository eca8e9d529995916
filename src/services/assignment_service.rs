// ============================================================================
// SERVICE : ASSIGNATIONS (vues enrichies)
// ============================================================================
//
// Description:
//   Construit les vues "mes assignations" (mentor ou étudiant) et les
//   résumés admin. Une référence manquante (inscription ou cohorte
//   supprimée) ne fait jamais échouer l'appel : elle devient null ou un
//   nom par défaut.
//
// Points d'attention:
//   - Les assignations sont trouvées par user_id ET par l'id d'inscription
//     lié à l'utilisateur (assignations créées avant la liaison)
//   - Résultat dédupliqué et trié par id
//
// ============================================================================

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::users::{self, UserRole};
use crate::models::{assignment, cohort, mentor_registration, mentoring_session, student_registration};
use crate::storage::{Storage, StorageResult};

pub const UNKNOWN_MENTOR: &str = "Unknown Mentor";
pub const UNKNOWN_STUDENT: &str = "Unknown Student";
pub const UNKNOWN_COHORT: &str = "Unknown Cohort";

/// Côté depuis lequel on regarde les assignations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perspective {
    Mentor,
    Student,
}

impl Perspective {
    pub fn role(self) -> UserRole {
        match self {
            Perspective::Mentor => UserRole::Mentor,
            Perspective::Student => UserRole::Student,
        }
    }
}

/// L'autre membre du binôme (sérialisé à plat : "student"/"studentName"
/// pour un mentor, "mentor"/"mentorName" pour un étudiant)
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Counterpart {
    #[serde(rename_all = "camelCase")]
    Mentor {
        mentor: Option<mentor_registration::Model>,
        mentor_name: String,
    },
    #[serde(rename_all = "camelCase")]
    Student {
        student: Option<student_registration::Model>,
        student_name: String,
    },
}

impl Counterpart {
    pub fn name(&self) -> &str {
        match self {
            Counterpart::Mentor { mentor_name, .. } => mentor_name,
            Counterpart::Student { student_name, .. } => student_name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentView {
    #[serde(flatten)]
    pub assignment: assignment::Model,
    #[serde(flatten)]
    pub counterpart: Counterpart,
    pub cohort: Option<cohort::Model>,
    pub sessions: Vec<mentoring_session::Model>,
}

/// Ligne des listes admin
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSummary {
    #[serde(flatten)]
    pub assignment: assignment::Model,
    pub mentor_name: String,
    pub student_name: String,
    pub cohort_name: String,
}

pub struct AssignmentService;

impl AssignmentService {
    /// Assignations où l'utilisateur est mentor (ou étudiant), enrichies
    pub async fn list_assignments_for_user(
        storage: &dyn Storage,
        user: &users::Model,
        perspective: Perspective,
    ) -> StorageResult<Vec<AssignmentView>> {
        let assignments = Self::find_for_user(storage, user, perspective).await?;

        let mut views = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let counterpart = match perspective {
                Perspective::Mentor => {
                    let student = storage.get_student_registration(assignment.student_id).await?;
                    let student_name = student
                        .as_ref()
                        .map(|s| s.full_name.clone())
                        .unwrap_or_else(|| UNKNOWN_STUDENT.to_string());
                    Counterpart::Student { student, student_name }
                }
                Perspective::Student => {
                    let mentor = storage.get_mentor_registration(assignment.mentor_id).await?;
                    let mentor_name = mentor
                        .as_ref()
                        .map(|m| m.full_name.clone())
                        .unwrap_or_else(|| UNKNOWN_MENTOR.to_string());
                    Counterpart::Mentor { mentor, mentor_name }
                }
            };
            let cohort = storage.get_cohort(assignment.cohort_id).await?;
            let sessions = storage.list_sessions_by_assignment(assignment.id).await?;

            views.push(AssignmentView {
                assignment,
                counterpart,
                cohort,
                sessions,
            });
        }

        Ok(views)
    }

    /// Union (user_id, id d'inscription liée), dédupliquée, triée par id
    pub async fn find_for_user(
        storage: &dyn Storage,
        user: &users::Model,
        perspective: Perspective,
    ) -> StorageResult<Vec<assignment::Model>> {
        let (by_user, by_registration) = match perspective {
            Perspective::Mentor => {
                let by_user = storage.list_assignments_by_mentor_user(&user.id).await?;
                let by_registration = match user.mentor_registration_id {
                    Some(id) => storage.list_assignments_by_mentor(id).await?,
                    None => Vec::new(),
                };
                (by_user, by_registration)
            }
            Perspective::Student => {
                let by_user = storage.list_assignments_by_student_user(&user.id).await?;
                let by_registration = match user.student_registration_id {
                    Some(id) => storage.list_assignments_by_student(id).await?,
                    None => Vec::new(),
                };
                (by_user, by_registration)
            }
        };

        let merged: BTreeMap<i32, assignment::Model> = by_user
            .into_iter()
            .chain(by_registration)
            .map(|a| (a.id, a))
            .collect();

        Ok(merged.into_values().collect())
    }

    /// Cohortes dont l'utilisateur est membre (cohortes disparues ignorées)
    pub async fn list_cohorts_for_user(
        storage: &dyn Storage,
        user_id: &str,
    ) -> StorageResult<Vec<cohort::Model>> {
        let memberships = storage.list_memberships_for_user(user_id).await?;

        let mut seen = HashSet::new();
        let mut cohorts = Vec::new();
        for membership in memberships {
            if !seen.insert(membership.cohort_id) {
                continue;
            }
            if let Some(cohort) = storage.get_cohort(membership.cohort_id).await? {
                cohorts.push(cohort);
            }
        }

        Ok(cohorts)
    }

    /// Ajoute les noms mentor / étudiant / cohorte (listes admin)
    pub async fn summarize(
        storage: &dyn Storage,
        assignments: Vec<assignment::Model>,
    ) -> StorageResult<Vec<AssignmentSummary>> {
        if assignments.is_empty() {
            return Ok(Vec::new());
        }

        let mentors: HashMap<i32, String> = storage
            .list_mentor_registrations()
            .await?
            .into_iter()
            .map(|m| (m.id, m.full_name))
            .collect();
        let students: HashMap<i32, String> = storage
            .list_student_registrations()
            .await?
            .into_iter()
            .map(|s| (s.id, s.full_name))
            .collect();
        let cohorts: HashMap<i32, String> = storage
            .list_cohorts()
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        Ok(assignments
            .into_iter()
            .map(|assignment| AssignmentSummary {
                mentor_name: mentors
                    .get(&assignment.mentor_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_MENTOR.to_string()),
                student_name: students
                    .get(&assignment.student_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_STUDENT.to_string()),
                cohort_name: cohorts
                    .get(&assignment.cohort_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_COHORT.to_string()),
                assignment,
            })
            .collect())
    }
}
