use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Binôme mentor/étudiant dans une cohorte.
/// mentor_id / student_id pointent vers les inscriptions ; les user_id sont
/// recopiés depuis les inscriptions au moment de la création (peuvent être
/// NULL si l'inscription n'était pas encore liée).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mentor_student_assignments")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cohort_id: i32,
    pub mentor_id: i32,
    pub student_id: i32,
    pub mentor_user_id: Option<String>,
    pub student_user_id: Option<String>,
    pub is_active: bool,
    pub assigned_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cohort::Entity",
        from = "Column::CohortId",
        to = "super::cohort::Column::Id"
    )]
    Cohort,

    #[sea_orm(has_many = "super::mentoring_session::Entity")]
    MentoringSession,
}

impl Related<super::cohort::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cohort.def()
    }
}

impl Related<super::mentoring_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MentoringSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub cohort_id: i32,
    pub mentor_id: i32,
    pub student_id: i32,
    pub mentor_user_id: Option<String>,
    pub student_user_id: Option<String>,
}
