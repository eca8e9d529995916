// ============================================================================
// MODÈLE : MENTORING SESSIONS
// ============================================================================
//
// Description:
//   Rendez-vous mentor/étudiant rattaché à une assignation (et à sa cohorte).
//
// Workflow:
//   1. Le mentor crée la session (POST /api/sessions) -> status = scheduled
//   2. Replanification / notes / statut via PUT ou PATCH /api/sessions/{id}
//   3. Suppression définitive via DELETE (pas d'historique)
//
// Points d'attention:
//   - Pas de machine à états : n'importe lequel des 4 statuts peut être écrit
//   - scheduled_time est stocké au format "HH:MM"
//   - updated_at est rafraîchi à chaque patch
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "rescheduled")]
    Rescheduled,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mentoring_sessions")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub assignment_id: i32,
    pub cohort_id: i32,
    pub scheduled_date: Date,
    pub scheduled_time: String,
    pub duration_minutes: i32,
    pub status: SessionStatus,
    pub meeting_link: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignment::Entity",
        from = "Column::AssignmentId",
        to = "super::assignment::Column::Id"
    )]
    Assignment,

    #[sea_orm(
        belongs_to = "super::cohort::Entity",
        from = "Column::CohortId",
        to = "super::cohort::Column::Id"
    )]
    Cohort,
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::cohort::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cohort.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Session prête à être insérée (statut déjà forcé par le service)
#[derive(Debug, Clone)]
pub struct NewSession {
    pub assignment_id: i32,
    pub cohort_id: i32,
    pub scheduled_date: Date,
    pub scheduled_time: String,
    pub duration_minutes: i32,
    pub status: SessionStatus,
    pub meeting_link: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

/// Patch partiel (replanification, notes, statut)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SessionPatch {
    pub scheduled_date: Option<Date>,
    pub scheduled_time: Option<String>,
    #[validate(range(min = 5, max = 480))]
    pub duration_minutes: Option<i32>,
    pub status: Option<SessionStatus>,
    #[validate(url)]
    pub meeting_link: Option<String>,
    #[validate(length(max = 10000))]
    pub notes: Option<String>,
}

impl Model {
    pub fn from_new(id: i32, new: NewSession, now: DateTimeUtc) -> Self {
        Self {
            id,
            assignment_id: new.assignment_id,
            cohort_id: new.cohort_id,
            scheduled_date: new.scheduled_date,
            scheduled_time: new.scheduled_time,
            duration_minutes: new.duration_minutes,
            status: new.status,
            meeting_link: new.meeting_link,
            notes: new.notes,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: SessionPatch, now: DateTimeUtc) {
        if let Some(v) = patch.scheduled_date { self.scheduled_date = v; }
        if let Some(v) = patch.scheduled_time { self.scheduled_time = v; }
        if let Some(v) = patch.duration_minutes { self.duration_minutes = v; }
        if let Some(v) = patch.status { self.status = v; }
        if let Some(v) = patch.meeting_link { self.meeting_link = Some(v); }
        if let Some(v) = patch.notes { self.notes = Some(v); }
        self.updated_at = now;
    }
}
