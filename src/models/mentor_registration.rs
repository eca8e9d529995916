// ============================================================================
// MODÈLE : MENTOR REGISTRATIONS
// ============================================================================
//
// Description:
//   Profil mentor soumis via le formulaire public, AVANT que la personne
//   n'ait un compte. user_id reste NULL jusqu'au premier login, où le
//   service d'identité fait le lien par email.
//
// Points d'attention:
//   - Une seule inscription mentor par email (vérifié côté application)
//   - L'email est normalisé (trim + minuscules) à l'écriture
//   - Pas de FK vers users : une inscription vit sans compte
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::email::normalize_email;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mentor_registrations")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<String>,
    pub full_name: String,
    pub email: String,
    pub linkedin_url: Option<String>,
    pub current_job_title: Option<String>,
    pub company: Option<String>,
    pub years_experience: Option<i32>,
    pub education: Option<String>,
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub time_zone: Option<String>,
    pub profile_summary: Option<String>,
    pub phone_number: Option<String>,
    pub preferred_disciplines: Vec<String>,
    pub mentoring_topics: Vec<String>,
    pub availability: Vec<String>,
    pub motivation: Option<String>,
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

/// Payload du formulaire mentor (public) et de la création côté admin
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewMentorRegistration {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    pub current_job_title: Option<String>,
    pub company: Option<String>,
    #[validate(range(min = 0, max = 80))]
    pub years_experience: Option<i32>,
    pub education: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub time_zone: Option<String>,
    #[validate(length(max = 5000))]
    pub profile_summary: Option<String>,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub preferred_disciplines: Vec<String>,
    #[serde(default)]
    pub mentoring_topics: Vec<String>,
    #[serde(default)]
    pub availability: Vec<String>,
    #[validate(length(max = 5000))]
    pub motivation: Option<String>,
    #[serde(default)]
    pub agreed_to_commitment: bool,
    #[serde(default)]
    pub consent_to_contact: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewMentorRegistration {
    pub fn normalized(mut self) -> Self {
        self.email = normalize_email(&self.email);
        self.full_name = self.full_name.trim().to_string();
        self
    }
}

/// Mise à jour partielle (admin). Les champs absents ne sont pas touchés.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MentorRegistrationPatch {
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    pub current_job_title: Option<String>,
    pub company: Option<String>,
    #[validate(range(min = 0, max = 80))]
    pub years_experience: Option<i32>,
    pub education: Option<String>,
    pub skills: Option<Vec<String>>,
    pub location: Option<String>,
    pub time_zone: Option<String>,
    pub profile_summary: Option<String>,
    pub phone_number: Option<String>,
    pub preferred_disciplines: Option<Vec<String>>,
    pub mentoring_topics: Option<Vec<String>>,
    pub availability: Option<Vec<String>>,
    pub motivation: Option<String>,
    pub agreed_to_commitment: Option<bool>,
    pub consent_to_contact: Option<bool>,
    pub is_active: Option<bool>,
}

impl MentorRegistrationPatch {
    pub fn active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Default::default()
        }
    }
}

impl Model {
    pub fn from_new(id: i32, new: NewMentorRegistration, created_at: DateTimeUtc) -> Self {
        Self {
            id,
            user_id: None,
            full_name: new.full_name,
            email: new.email,
            linkedin_url: new.linkedin_url,
            current_job_title: new.current_job_title,
            company: new.company,
            years_experience: new.years_experience,
            education: new.education,
            skills: new.skills,
            location: new.location,
            time_zone: new.time_zone,
            profile_summary: new.profile_summary,
            phone_number: new.phone_number,
            preferred_disciplines: new.preferred_disciplines,
            mentoring_topics: new.mentoring_topics,
            availability: new.availability,
            motivation: new.motivation,
            agreed_to_commitment: new.agreed_to_commitment,
            consent_to_contact: new.consent_to_contact,
            is_active: new.is_active,
            created_at,
        }
    }

    pub fn apply(&mut self, patch: MentorRegistrationPatch) {
        if let Some(v) = patch.full_name { self.full_name = v; }
        if let Some(v) = patch.email { self.email = normalize_email(&v); }
        if let Some(v) = patch.linkedin_url { self.linkedin_url = Some(v); }
        if let Some(v) = patch.current_job_title { self.current_job_title = Some(v); }
        if let Some(v) = patch.company { self.company = Some(v); }
        if let Some(v) = patch.years_experience { self.years_experience = Some(v); }
        if let Some(v) = patch.education { self.education = Some(v); }
        if let Some(v) = patch.skills { self.skills = v; }
        if let Some(v) = patch.location { self.location = Some(v); }
        if let Some(v) = patch.time_zone { self.time_zone = Some(v); }
        if let Some(v) = patch.profile_summary { self.profile_summary = Some(v); }
        if let Some(v) = patch.phone_number { self.phone_number = Some(v); }
        if let Some(v) = patch.preferred_disciplines { self.preferred_disciplines = v; }
        if let Some(v) = patch.mentoring_topics { self.mentoring_topics = v; }
        if let Some(v) = patch.availability { self.availability = v; }
        if let Some(v) = patch.motivation { self.motivation = Some(v); }
        if let Some(v) = patch.agreed_to_commitment { self.agreed_to_commitment = v; }
        if let Some(v) = patch.consent_to_contact { self.consent_to_contact = v; }
        if let Some(v) = patch.is_active { self.is_active = v; }
    }
}
