// connexion BD + création des tables manquantes

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema};

use crate::models::{
    admin_users, assignment, cohort, cohort_member, contact, mentor_registration,
    mentoring_session, student_registration, users,
};

pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}

/// Crée les tables à partir des entités SeaORM (si absentes).
/// L'ordre compte : les cohortes avant les tables qui les référencent.
pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, users::Entity).await?;
    create_table(db, admin_users::Entity).await?;
    create_table(db, contact::Entity).await?;
    create_table(db, mentor_registration::Entity).await?;
    create_table(db, student_registration::Entity).await?;
    create_table(db, cohort::Entity).await?;
    create_table(db, cohort_member::Entity).await?;
    create_table(db, assignment::Entity).await?;
    create_table(db, mentoring_session::Entity).await?;
    Ok(())
}
