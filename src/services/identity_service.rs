// ============================================================================
// SERVICE : LIAISON IDENTITÉ <-> INSCRIPTION
// ============================================================================
//
// Description:
//   Appelé par GET /api/auth/user. Crée l'utilisateur au premier appel,
//   répare un lien d'inscription à moitié écrit, puis attribue le rôle en
//   cherchant l'email dans la liste blanche admin et dans les inscriptions.
//
// Workflow (ordre de priorité):
//   1. Création de l'utilisateur (rôle "none") s'il n'existe pas
//   2. Réparation : rôle mentor/étudiant + inscription sans user_id -> backfill
//   3. Rôle "none" + email connu :
//      a. email dans la liste blanche -> admin (inscriptions ignorées)
//      b. sinon inscriptions étudiant / mentor par email :
//         - les deux : la plus récente gagne (égalité -> étudiant)
//         - une seule : son rôle
//         - aucune : rien n'est écrit
//   4. Retour de l'utilisateur à jour
//
// Points d'attention:
//   - Idempotent : un 2e appel ne fait aucune écriture
//   - Pas de transaction : si le backfill échoue après la mise à jour du
//     rôle, l'étape 2 le refait au prochain appel
//   - Une erreur de stockage pendant une recherche par email est loguée et
//     traitée comme "pas trouvé"
//
// ============================================================================

use crate::middleware::AuthUser;
use crate::models::dto::{CheckEmailResponse, RegistrationKind};
use crate::models::users::{self, NewUser, UserRole};
use crate::models::{mentor_registration, student_registration};
use crate::storage::{Storage, StorageResult};
use crate::utils::email::normalize_email;

pub struct IdentityService;

/// Inscription retenue pour un email
#[derive(Debug)]
enum Candidate {
    Student(student_registration::Model),
    Mentor(mentor_registration::Model),
}

/// Choisit entre inscription étudiant et mentor pour un même email
fn choose_registration(
    student: Option<student_registration::Model>,
    mentor: Option<mentor_registration::Model>,
) -> Option<Candidate> {
    match (student, mentor) {
        (Some(student), Some(mentor)) => {
            log::warn!(
                "Email {} has both a student (#{}) and a mentor (#{}) registration",
                student.email,
                student.id,
                mentor.id
            );
            if mentor.created_at > student.created_at {
                Some(Candidate::Mentor(mentor))
            } else {
                Some(Candidate::Student(student))
            }
        }
        (Some(student), None) => Some(Candidate::Student(student)),
        (None, Some(mentor)) => Some(Candidate::Mentor(mentor)),
        (None, None) => None,
    }
}

fn fail_closed<T>(result: StorageResult<Option<T>>, lookup: &str, email: &str) -> Option<T> {
    match result {
        Ok(found) => found,
        Err(e) => {
            log::warn!("{} lookup failed for {}, treating as not found: {}", lookup, email, e);
            None
        }
    }
}

impl IdentityService {
    /// Résout l'utilisateur courant (création + liaison + rôle)
    pub async fn resolve_current_user(
        storage: &dyn Storage,
        principal: &AuthUser,
    ) -> StorageResult<users::Model> {
        let token_email = principal.email.as_deref().map(normalize_email);

        // 1. Création au premier appel
        let user = match storage.get_user(&principal.uid).await? {
            Some(user) => user,
            None => {
                log::info!("Creating user {}", principal.uid);
                storage
                    .upsert_user(NewUser {
                        id: principal.uid.clone(),
                        email: token_email.clone(),
                        full_name: principal.display_name.clone(),
                    })
                    .await?
            }
        };

        // 2. Réparation d'un lien à moitié écrit
        Self::repair_registration_link(storage, &user).await?;

        if user.role != UserRole::Unassigned {
            return Ok(user);
        }

        // 3. Attribution du rôle
        let Some(email) = token_email.or_else(|| user.email.as_deref().map(normalize_email)) else {
            return Ok(user);
        };

        let admin = fail_closed(storage.get_admin_by_email(&email).await, "Admin allow-list", &email);
        if admin.is_some() {
            log::info!("User {} matched the admin allow-list", user.id);
            return storage.update_user_role(&user.id, UserRole::Admin, None).await;
        }

        let student = fail_closed(storage.get_student_by_email(&email).await, "Student registration", &email);
        let mentor = fail_closed(storage.get_mentor_by_email(&email).await, "Mentor registration", &email);

        match choose_registration(student, mentor) {
            Some(Candidate::Mentor(registration)) => {
                log::info!("Linking user {} to mentor registration #{}", user.id, registration.id);
                let updated = storage
                    .update_user_role(&user.id, UserRole::Mentor, Some(registration.id))
                    .await?;
                if registration.user_id.is_none() {
                    storage.link_mentor_registration(registration.id, &user.id).await?;
                }
                Ok(updated)
            }
            Some(Candidate::Student(registration)) => {
                log::info!("Linking user {} to student registration #{}", user.id, registration.id);
                let updated = storage
                    .update_user_role(&user.id, UserRole::Student, Some(registration.id))
                    .await?;
                if registration.user_id.is_none() {
                    storage.link_student_registration(registration.id, &user.id).await?;
                }
                Ok(updated)
            }
            None => Ok(user),
        }
    }

    /// Backfill du user_id d'une inscription déjà référencée par l'utilisateur
    async fn repair_registration_link(storage: &dyn Storage, user: &users::Model) -> StorageResult<()> {
        match (user.role, user.mentor_registration_id, user.student_registration_id) {
            (UserRole::Mentor, Some(id), _) => {
                if let Some(registration) = storage.get_mentor_registration(id).await? {
                    if registration.user_id.is_none() {
                        log::info!("Repairing link of mentor registration #{} to user {}", id, user.id);
                        storage.link_mentor_registration(id, &user.id).await?;
                    }
                }
            }
            (UserRole::Student, _, Some(id)) => {
                if let Some(registration) = storage.get_student_registration(id).await? {
                    if registration.user_id.is_none() {
                        log::info!("Repairing link of student registration #{} to user {}", id, user.id);
                        storage.link_student_registration(id, &user.id).await?;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Indique si un email est déjà connu (admin, puis étudiant, puis mentor)
    pub async fn check_email_registration(
        storage: &dyn Storage,
        email: &str,
    ) -> StorageResult<CheckEmailResponse> {
        let email = normalize_email(email);

        let found = if storage.get_admin_by_email(&email).await?.is_some() {
            Some((
                RegistrationKind::Admin,
                "Welcome back, Admin! Sign in to access your admin dashboard.",
            ))
        } else if storage.get_student_by_email(&email).await?.is_some() {
            Some((
                RegistrationKind::Student,
                "This email is already registered as a student. Please sign in to access your student dashboard.",
            ))
        } else if storage.get_mentor_by_email(&email).await?.is_some() {
            Some((
                RegistrationKind::Mentor,
                "This email is already registered as a mentor. Please sign in to access your mentor dashboard.",
            ))
        } else {
            None
        };

        Ok(match found {
            Some((kind, message)) => CheckEmailResponse {
                exists: true,
                kind: Some(kind),
                message: Some(message.to_string()),
            },
            None => CheckEmailResponse {
                exists: false,
                kind: None,
                message: None,
            },
        })
    }
}
