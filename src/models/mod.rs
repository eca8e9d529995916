// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL (SeaORM) ; les mêmes
//   structs servent aussi de documents pour le stockage document.
//
// Liste des modules:
//   - health : Health check API
//   - users : Identités (uid du fournisseur d'identité + rôle)
//   - admin_users : Liste blanche des emails admin
//   - mentor_registration / student_registration : Formulaires publics
//   - contact : Formulaire de contact
//   - cohort : Éditions du programme
//   - cohort_member : Appartenance utilisateur <-> cohorte
//   - assignment : Binômes mentor/étudiant
//   - mentoring_session : Sessions planifiées
//   - dto : Data Transfer Objects pour les requêtes / réponses API
//
// Points d'attention:
//   - Sérialisation JSON en camelCase (attendu par le frontend)
//   - Les inscriptions n'ont pas de FK vers users (elles existent avant)
//
// ============================================================================

pub mod health;
pub mod users;
pub mod admin_users;
pub mod mentor_registration;
pub mod student_registration;
pub mod contact;
pub mod cohort;
pub mod cohort_member;
pub mod assignment;
pub mod mentoring_session;
pub mod dto;
