pub mod admin;
pub mod auth;
pub mod cohorts;
pub mod contact;
pub mod dashboard;
pub mod health;
pub mod registration;
pub mod sessions;

use actix_web::web;

use crate::errors::AppError;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Body JSON invalide -> 400 {"error": ...} comme les autres erreurs
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()),
    );

    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(registration::registration_routes)
            .configure(contact::contact_routes)
            .configure(cohorts::cohort_routes)
            .configure(sessions::session_routes)
            .configure(dashboard::dashboard_routes)
            .configure(admin::admin_routes),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    use crate::config::{AdminSettings, AuthSettings};
    use crate::storage::{DocumentStorage, Storage};
    use crate::utils::jwt::issue_token;

    fn auth_settings() -> AuthSettings {
        AuthSettings {
            jwt_secret: "integration-secret".to_string(),
            issuer: None,
            audience: None,
        }
    }

    fn bearer(uid: &str, email: &str) -> (&'static str, String) {
        let token = issue_token(&auth_settings(), uid, Some(email), Some("Test User"));
        ("Authorization", format!("Bearer {}", token))
    }

    macro_rules! init_app {
        ($storage:expr, $admin:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::from($storage.clone()))
                    .app_data(web::Data::new(auth_settings()))
                    .app_data(web::Data::new($admin))
                    .configure(configure_routes),
            )
            .await
        };
    }

    fn mentor_form(email: &str) -> Value {
        json!({
            "fullName": "Maya Chen",
            "email": email,
            "currentJobTitle": "Staff Engineer",
            "skills": ["rust"],
            "agreedToCommitment": true
        })
    }

    fn student_form(email: &str) -> Value {
        json!({
            "fullName": "Sam Park",
            "email": email,
            "nominatedBy": "Prof. Ortiz",
            "professorEmail": "ortiz@uni.example",
            "agreedToCommitment": true
        })
    }

    #[actix_web::test]
    async fn test_health_reports_backend() {
        let storage: Arc<dyn Storage> = Arc::new(DocumentStorage::new());
        let app = init_app!(storage, AdminSettings::default());

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage"], "document");
    }

    #[actix_web::test]
    async fn test_check_email_then_current_user() {
        let storage: Arc<dyn Storage> = Arc::new(DocumentStorage::new());
        let app = init_app!(storage, AdminSettings::default());

        let req = test::TestRequest::post()
            .uri("/api/mentor-registration")
            .set_json(mentor_form("Maya@Example.com"))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created["success"], true);
        let registration_id = created["id"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri("/api/check-email-registration")
            .set_json(json!({ "email": "maya@example.com" }))
            .to_request();
        let check: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(check["exists"], true);
        assert_eq!(check["type"], "mentor");

        let req = test::TestRequest::get()
            .uri("/api/auth/user")
            .insert_header(bearer("uid-maya", "maya@example.com"))
            .to_request();
        let user: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(user["role"], "mentor");
        assert_eq!(user["mentorRegistrationId"].as_i64(), Some(registration_id));

        let linked = storage
            .get_mentor_registration(registration_id as i32)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(linked.user_id.as_deref(), Some("uid-maya"));
    }

    #[actix_web::test]
    async fn test_cohort_assignment_session_flow() {
        let storage: Arc<dyn Storage> = Arc::new(DocumentStorage::new());
        storage.create_admin("admin@example.com").await.unwrap();
        let app = init_app!(storage, AdminSettings::default());

        // Inscriptions publiques
        for (uri, form) in [
            ("/api/mentor-registration", mentor_form("maya@example.com")),
            ("/api/student-registration", student_form("sam@example.com")),
        ] {
            let req = test::TestRequest::post().uri(uri).set_json(form).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        // Premier login de chacun
        for (uid, email) in [
            ("uid-admin", "admin@example.com"),
            ("uid-maya", "maya@example.com"),
            ("uid-sam", "sam@example.com"),
        ] {
            let req = test::TestRequest::get()
                .uri("/api/auth/user")
                .insert_header(bearer(uid, email))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }
        let admin = bearer("uid-admin", "admin@example.com");
        let maya = bearer("uid-maya", "maya@example.com");
        let sam = bearer("uid-sam", "sam@example.com");

        // Cohorte + binôme
        let req = test::TestRequest::post()
            .uri("/api/cohorts")
            .insert_header(admin.clone())
            .set_json(json!({
                "name": "Fall-2025",
                "startDate": "2025-09-01",
                "endDate": "2025-12-15",
                "sessionDurationMinutes": 45
            }))
            .to_request();
        let cohort: Value = test::call_and_read_body_json(&app, req).await;
        let cohort_id = cohort["id"].as_i64().unwrap();
        assert_eq!(cohort["sessionsPerMonth"], 2);

        let req = test::TestRequest::post()
            .uri(&format!("/api/cohorts/{}/assignments", cohort_id))
            .insert_header(admin.clone())
            .set_json(json!({ "mentorId": 1, "studentId": 1 }))
            .to_request();
        let assignment: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(assignment["mentorUserId"], "uid-maya");
        assert_eq!(assignment["studentUserId"], "uid-sam");
        let assignment_id = assignment["id"].as_i64().unwrap();

        // Membres de la cohorte
        for (user_id, role) in [("uid-maya", "mentor"), ("uid-sam", "student")] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/cohorts/{}/members", cohort_id))
                .insert_header(admin.clone())
                .set_json(json!({ "userId": user_id, "role": role }))
                .to_request();
            let member: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(member["userId"], user_id);
            assert_eq!(member["role"], role);
        }

        let req = test::TestRequest::get()
            .uri(&format!("/api/cohorts/{}/members", cohort_id))
            .insert_header(admin.clone())
            .to_request();
        let members: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(members.as_array().map(Vec::len), Some(2));
        let mentor_member = members
            .as_array()
            .and_then(|all| all.iter().find(|m| m["userId"] == "uid-maya"))
            .cloned()
            .unwrap();
        assert_eq!(mentor_member["user"]["role"], "mentor");
        assert_eq!(mentor_member["registration"]["fullName"], "Maya Chen");

        let req = test::TestRequest::get()
            .uri("/api/mentor/cohorts")
            .insert_header(maya.clone())
            .to_request();
        let cohorts: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(cohorts.as_array().map(Vec::len), Some(1));
        assert_eq!(cohorts[0]["name"], "Fall-2025");

        let req = test::TestRequest::get()
            .uri("/api/student/cohorts")
            .insert_header(sam.clone())
            .to_request();
        let cohorts: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(cohorts[0]["id"].as_i64(), Some(cohort_id));

        // Le mentor planifie une session
        let req = test::TestRequest::post()
            .uri("/api/sessions")
            .insert_header(maya.clone())
            .set_json(json!({
                "assignmentId": assignment_id,
                "scheduledDate": "2025-10-01",
                "scheduledTime": "14:00"
            }))
            .to_request();
        let session: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(session["status"], "scheduled");
        assert_eq!(session["cohortId"].as_i64(), Some(cohort_id));
        assert_eq!(session["durationMinutes"], 45);
        let session_id = session["id"].as_i64().unwrap();

        // L'étudiant ne peut pas créer de session
        let req = test::TestRequest::post()
            .uri("/api/sessions")
            .insert_header(sam.clone())
            .set_json(json!({
                "assignmentId": assignment_id,
                "scheduledDate": "2025-10-02",
                "scheduledTime": "10:00"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // Vues mentor / étudiant
        let req = test::TestRequest::get()
            .uri("/api/mentor/assignments")
            .insert_header(maya.clone())
            .to_request();
        let views: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(views.as_array().map(Vec::len), Some(1));
        assert_eq!(views[0]["studentName"], "Sam Park");
        assert_eq!(views[0]["cohort"]["name"], "Fall-2025");
        assert_eq!(views[0]["sessions"][0]["scheduledTime"], "14:00");

        let req = test::TestRequest::get()
            .uri("/api/student/assignments")
            .insert_header(sam.clone())
            .to_request();
        let views: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(views[0]["mentorName"], "Maya Chen");

        // Session terminée via PATCH
        let req = test::TestRequest::patch()
            .uri(&format!("/api/sessions/{}", session_id))
            .insert_header(maya.clone())
            .set_json(json!({ "status": "completed", "notes": "Mock interview" }))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["status"], "completed");
        assert_eq!(updated["scheduledTime"], "14:00");

        let req = test::TestRequest::get()
            .uri("/api/admin/stats")
            .insert_header(admin.clone())
            .to_request();
        let stats: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stats["totalAssignments"], 1);
        assert_eq!(stats["activeCohorts"], 1);

        // Retrait d'un membre
        let req = test::TestRequest::delete()
            .uri(&format!("/api/cohorts/{}/members/uid-sam", cohort_id))
            .insert_header(admin.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/student/cohorts")
            .insert_header(sam.clone())
            .to_request();
        let cohorts: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(cohorts.as_array().map(Vec::len), Some(0));

        // Suppression en cascade
        let req = test::TestRequest::delete()
            .uri(&format!("/api/cohorts/{}", cohort_id))
            .insert_header(admin)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(storage.get_session(session_id as i32).await.unwrap().is_none());
        assert!(storage.get_assignment(assignment_id as i32).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_auth_and_role_gates() {
        let storage: Arc<dyn Storage> = Arc::new(DocumentStorage::new());
        let app = init_app!(storage, AdminSettings::default());

        let req = test::TestRequest::get().uri("/api/auth/user").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/auth/user")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // Compte sans rôle
        let nobody = bearer("uid-x", "x@example.com");
        let req = test::TestRequest::get()
            .uri("/api/auth/user")
            .insert_header(nobody.clone())
            .to_request();
        let user: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(user["role"], "none");

        for uri in ["/api/admin/stats", "/api/cohorts", "/api/mentor/assignments", "/api/contacts"] {
            let req = test::TestRequest::get()
                .uri(uri)
                .insert_header(nobody.clone())
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_admin_role_overwrite() {
        let storage: Arc<dyn Storage> = Arc::new(DocumentStorage::new());
        storage.create_admin("admin@example.com").await.unwrap();
        let app = init_app!(storage, AdminSettings::default());

        let req = test::TestRequest::post()
            .uri("/api/student-registration")
            .set_json(student_form("sam@example.com"))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let registration_id = created["id"].as_i64().unwrap();

        let admin = bearer("uid-admin", "admin@example.com");
        let sam = bearer("uid-sam", "sam@example.com");
        for who in [admin.clone(), sam.clone()] {
            let req = test::TestRequest::get()
                .uri("/api/auth/user")
                .insert_header(who)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        // Un non-admin ne peut pas changer de rôle
        let req = test::TestRequest::put()
            .uri("/api/admin/users/uid-sam/role")
            .insert_header(sam.clone())
            .set_json(json!({ "role": "admin" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::put()
            .uri("/api/admin/users/uid-sam/role")
            .insert_header(admin.clone())
            .set_json(json!({ "role": "mentor" }))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["role"], "mentor");

        // Rôle déjà fixé : pas de nouvelle liaison au login suivant
        let req = test::TestRequest::get()
            .uri("/api/auth/user")
            .insert_header(sam.clone())
            .to_request();
        let user: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(user["role"], "mentor");
        assert_eq!(user["mentorRegistrationId"], Value::Null);

        let registration = storage
            .get_student_registration(registration_id as i32)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(registration.user_id.as_deref(), Some("uid-sam"));

        let req = test::TestRequest::put()
            .uri("/api/admin/users/uid-unknown/role")
            .insert_header(admin)
            .set_json(json!({ "role": "student" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_check_email_rejects_malformed_address() {
        let storage: Arc<dyn Storage> = Arc::new(DocumentStorage::new());
        let app = init_app!(storage, AdminSettings::default());

        let req = test::TestRequest::post()
            .uri("/api/check-email-registration")
            .set_json(json!({ "email": "not-an-email" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["details"]["email"].is_array());

        let req = test::TestRequest::post()
            .uri("/api/check-email-registration")
            .set_json(json!({ "email": "  " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_bad_bodies_and_conflicts() {
        let storage: Arc<dyn Storage> = Arc::new(DocumentStorage::new());
        let app = init_app!(storage, AdminSettings::default());

        let req = test::TestRequest::post()
            .uri("/api/contact")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/contact")
            .set_json(json!({ "name": "Jo", "email": "nope", "message": "Hi" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["details"]["email"].is_array());

        let req = test::TestRequest::post()
            .uri("/api/contact")
            .set_json(json!({ "name": "Jo", "email": "jo@example.com", "message": "Hi" }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created["success"], true);

        for expected in [StatusCode::OK, StatusCode::CONFLICT] {
            let req = test::TestRequest::post()
                .uri("/api/student-registration")
                .set_json(student_form("sam@example.com"))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), expected);
        }
    }

    #[actix_web::test]
    async fn test_seed_admin_requires_configured_secret() {
        let storage: Arc<dyn Storage> = Arc::new(DocumentStorage::new());
        let disabled = init_app!(storage, AdminSettings::default());
        let req = test::TestRequest::post()
            .uri("/api/seed-admin")
            .set_json(json!({ "email": "root@example.com", "secretKey": "anything" }))
            .to_request();
        let resp = test::call_service(&disabled, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let app = init_app!(
            storage,
            AdminSettings {
                emails: Vec::new(),
                seed_secret: Some("seed-me".to_string()),
            }
        );
        let req = test::TestRequest::post()
            .uri("/api/seed-admin")
            .set_json(json!({ "email": "root@example.com", "secretKey": "wrong" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/api/seed-admin")
            .set_json(json!({ "email": "Root@Example.com", "secretKey": "seed-me" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Admin created successfully");
        assert_eq!(body["admin"]["email"], "root@example.com");
        assert!(storage.get_admin_by_email("root@example.com").await.unwrap().is_some());
    }
}
