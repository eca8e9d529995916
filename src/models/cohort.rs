// ============================================================================
// MODÈLE : COHORTS
// ============================================================================
//
// Description:
//   Une cohorte = une édition du programme de mentorat (dates + cadence des
//   sessions). Elle possède des membres, des assignations mentor/étudiant
//   et, à travers elles, des sessions.
//
// Points d'attention:
//   - end_date >= start_date (validé à la création ET après un patch)
//   - La suppression d'une cohorte passe par CohortService::delete_cohort
//     qui supprime d'abord sessions, assignations et membres
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cohorts")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    pub sessions_per_month: i32,
    pub session_duration_minutes: i32,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cohort_member::Entity")]
    CohortMember,

    #[sea_orm(has_many = "super::assignment::Entity")]
    Assignment,

    #[sea_orm(has_many = "super::mentoring_session::Entity")]
    MentoringSession,
}

impl Related<super::cohort_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CohortMember.def()
    }
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::mentoring_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MentoringSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn default_sessions_per_month() -> i32 {
    2
}

fn default_session_duration() -> i32 {
    30
}

fn default_true() -> bool {
    true
}

fn validate_date_range(cohort: &NewCohort) -> Result<(), ValidationError> {
    check_date_range(cohort.start_date, cohort.end_date)
}

pub fn check_date_range(start: Date, end: Date) -> Result<(), ValidationError> {
    if end < start {
        let mut err = ValidationError::new("date_range");
        err.message = Some("endDate must not be before startDate".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_date_range"))]
pub struct NewCohort {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    #[serde(default = "default_sessions_per_month")]
    #[validate(range(min = 1, max = 31))]
    pub sessions_per_month: i32,
    #[serde(default = "default_session_duration")]
    #[validate(range(min = 5, max = 480))]
    pub session_duration_minutes: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CohortPatch {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    #[validate(range(min = 1, max = 31))]
    pub sessions_per_month: Option<i32>,
    #[validate(range(min = 5, max = 480))]
    pub session_duration_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

impl Model {
    pub fn from_new(id: i32, new: NewCohort, created_at: DateTimeUtc) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            start_date: new.start_date,
            end_date: new.end_date,
            sessions_per_month: new.sessions_per_month,
            session_duration_minutes: new.session_duration_minutes,
            is_active: new.is_active,
            created_at,
        }
    }

    pub fn apply(&mut self, patch: CohortPatch) {
        if let Some(v) = patch.name { self.name = v; }
        if let Some(v) = patch.description { self.description = Some(v); }
        if let Some(v) = patch.start_date { self.start_date = v; }
        if let Some(v) = patch.end_date { self.end_date = v; }
        if let Some(v) = patch.sessions_per_month { self.sessions_per_month = v; }
        if let Some(v) = patch.session_duration_minutes { self.session_duration_minutes = v; }
        if let Some(v) = patch.is_active { self.is_active = v; }
    }
}
