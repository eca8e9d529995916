use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::email::normalize_email;

/// Profil étudiant soumis via le formulaire public (même cycle de vie que
/// les inscriptions mentor : user_id NULL jusqu'au premier login).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student_registrations")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<String>,
    pub full_name: String,
    pub email: String,
    pub linkedin_url: Option<String>,
    pub phone_number: Option<String>,
    pub university_name: Option<String>,
    pub academic_program: Option<String>,
    pub year_of_study: Option<String>,
    pub nominated_by: String,
    pub professor_email: String,
    pub career_interests: Option<String>,
    pub preferred_disciplines: Vec<String>,
    pub mentoring_topics: Vec<String>,
    pub mentorship_goals: Option<String>,
    pub agreed_to_commitment: bool,
    pub consent_to_contact: bool,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewStudentRegistration {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    pub phone_number: Option<String>,
    pub university_name: Option<String>,
    pub academic_program: Option<String>,
    pub year_of_study: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub nominated_by: String,
    #[validate(email)]
    pub professor_email: String,
    #[validate(length(max = 5000))]
    pub career_interests: Option<String>,
    #[serde(default)]
    pub preferred_disciplines: Vec<String>,
    #[serde(default)]
    pub mentoring_topics: Vec<String>,
    #[validate(length(max = 5000))]
    pub mentorship_goals: Option<String>,
    #[serde(default)]
    pub agreed_to_commitment: bool,
    #[serde(default)]
    pub consent_to_contact: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewStudentRegistration {
    pub fn normalized(mut self) -> Self {
        self.email = normalize_email(&self.email);
        self.professor_email = normalize_email(&self.professor_email);
        self.full_name = self.full_name.trim().to_string();
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentRegistrationPatch {
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    pub phone_number: Option<String>,
    pub university_name: Option<String>,
    pub academic_program: Option<String>,
    pub year_of_study: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub nominated_by: Option<String>,
    #[validate(email)]
    pub professor_email: Option<String>,
    pub career_interests: Option<String>,
    pub preferred_disciplines: Option<Vec<String>>,
    pub mentoring_topics: Option<Vec<String>>,
    pub mentorship_goals: Option<String>,
    pub agreed_to_commitment: Option<bool>,
    pub consent_to_contact: Option<bool>,
    pub is_active: Option<bool>,
}

impl StudentRegistrationPatch {
    pub fn active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Default::default()
        }
    }
}

impl Model {
    pub fn from_new(id: i32, new: NewStudentRegistration, created_at: DateTimeUtc) -> Self {
        Self {
            id,
            user_id: None,
            full_name: new.full_name,
            email: new.email,
            linkedin_url: new.linkedin_url,
            phone_number: new.phone_number,
            university_name: new.university_name,
            academic_program: new.academic_program,
            year_of_study: new.year_of_study,
            nominated_by: new.nominated_by,
            professor_email: new.professor_email,
            career_interests: new.career_interests,
            preferred_disciplines: new.preferred_disciplines,
            mentoring_topics: new.mentoring_topics,
            mentorship_goals: new.mentorship_goals,
            agreed_to_commitment: new.agreed_to_commitment,
            consent_to_contact: new.consent_to_contact,
            is_active: new.is_active,
            created_at,
        }
    }

    pub fn apply(&mut self, patch: StudentRegistrationPatch) {
        if let Some(v) = patch.full_name { self.full_name = v; }
        if let Some(v) = patch.email { self.email = normalize_email(&v); }
        if let Some(v) = patch.linkedin_url { self.linkedin_url = Some(v); }
        if let Some(v) = patch.phone_number { self.phone_number = Some(v); }
        if let Some(v) = patch.university_name { self.university_name = Some(v); }
        if let Some(v) = patch.academic_program { self.academic_program = Some(v); }
        if let Some(v) = patch.year_of_study { self.year_of_study = Some(v); }
        if let Some(v) = patch.nominated_by { self.nominated_by = v; }
        if let Some(v) = patch.professor_email { self.professor_email = normalize_email(&v); }
        if let Some(v) = patch.career_interests { self.career_interests = Some(v); }
        if let Some(v) = patch.preferred_disciplines { self.preferred_disciplines = v; }
        if let Some(v) = patch.mentoring_topics { self.mentoring_topics = v; }
        if let Some(v) = patch.mentorship_goals { self.mentorship_goals = Some(v); }
        if let Some(v) = patch.agreed_to_commitment { self.agreed_to_commitment = v; }
        if let Some(v) = patch.consent_to_contact { self.consent_to_contact = v; }
        if let Some(v) = patch.is_active { self.is_active = v; }
    }
}
