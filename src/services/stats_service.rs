use crate::models::dto::AdminStats;
use crate::storage::{Storage, StorageResult};

pub struct StatsService;

impl StatsService {
    /// Totaux du tableau de bord admin
    pub async fn admin_stats(storage: &dyn Storage) -> StorageResult<AdminStats> {
        let students = storage.list_student_registrations().await?;
        let mentors = storage.list_mentor_registrations().await?;
        let assignments = storage.list_assignments().await?;
        let cohorts = storage.list_cohorts().await?;

        Ok(AdminStats {
            total_students: students.len(),
            total_mentors: mentors.len(),
            active_students: students.iter().filter(|s| s.is_active).count(),
            active_mentors: mentors.iter().filter(|m| m.is_active).count(),
            total_assignments: assignments.len(),
            total_cohorts: cohorts.len(),
            active_cohorts: cohorts.iter().filter(|c| c.is_active).count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::mentor_registration::MentorRegistrationPatch;
    use crate::services::identity_service::tests::{mentor_form, student_form};
    use crate::storage::DocumentStorage;

    #[tokio::test]
    async fn test_admin_stats_counts_active() {
        let storage = DocumentStorage::new();
        let m1 = storage
            .create_mentor_registration(mentor_form("A", "a@example.com"))
            .await
            .unwrap();
        storage
            .create_mentor_registration(mentor_form("B", "b@example.com"))
            .await
            .unwrap();
        storage
            .create_student_registration(student_form("C", "c@example.com"))
            .await
            .unwrap();
        storage
            .update_mentor_registration(m1.id, MentorRegistrationPatch::active(false))
            .await
            .unwrap();

        let stats = StatsService::admin_stats(&storage).await.unwrap();
        assert_eq!(
            stats,
            AdminStats {
                total_students: 1,
                total_mentors: 2,
                active_students: 1,
                active_mentors: 1,
                total_assignments: 0,
                total_cohorts: 0,
                active_cohorts: 0,
            }
        );
    }
}
