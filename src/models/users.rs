use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

/// Rôle d'un utilisateur. `Unassigned` = compte créé mais pas encore lié
/// à une inscription (ni à la liste des admins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "mentor")]
    Mentor,
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "none")]
    #[serde(rename = "none")]
    Unassigned,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Mentor => "mentor",
            UserRole::Admin => "admin",
            UserRole::Unassigned => "none",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    // uid du fournisseur d'identité (pas d'auto-incrément)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub mentor_registration_id: Option<i32>,
    pub student_registration_id: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Données pour créer (ou compléter) un utilisateur à partir du token
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl Model {
    /// Applique un changement de rôle. L'id d'inscription n'est stocké que
    /// pour le rôle correspondant (mentor -> mentor_registration_id, etc.)
    pub fn apply_role(&mut self, role: UserRole, registration_id: Option<i32>) {
        self.role = role;
        match (role, registration_id) {
            (UserRole::Mentor, Some(id)) => self.mentor_registration_id = Some(id),
            (UserRole::Student, Some(id)) => self.student_registration_id = Some(id),
            (UserRole::Mentor | UserRole::Student, None) | (UserRole::Admin | UserRole::Unassigned, _) => {}
        }
    }

    /// Fusionne les infos de profil venant du token (upsert)
    pub fn merge_profile(&mut self, new: NewUser) {
        if new.email.is_some() {
            self.email = new.email;
        }
        if new.full_name.is_some() {
            self.full_name = new.full_name;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user() -> Model {
        Model {
            id: "uid-1".to_string(),
            email: Some("a@example.com".to_string()),
            full_name: None,
            role: UserRole::Unassigned,
            mentor_registration_id: None,
            student_registration_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_apply_role_links_only_matching_registration() {
        let mut u = user();
        u.apply_role(UserRole::Mentor, Some(4));
        assert_eq!(u.role, UserRole::Mentor);
        assert_eq!(u.mentor_registration_id, Some(4));
        assert_eq!(u.student_registration_id, None);

        u.apply_role(UserRole::Admin, Some(9));
        assert_eq!(u.role, UserRole::Admin);
        assert_eq!(u.mentor_registration_id, Some(4));
    }

    #[test]
    fn test_role_serializes_unassigned_as_none() {
        let json = serde_json::to_value(UserRole::Unassigned).unwrap();
        assert_eq!(json, serde_json::json!("none"));
        let role: UserRole = serde_json::from_value(serde_json::json!("mentor")).unwrap();
        assert_eq!(role, UserRole::Mentor);
    }
}
