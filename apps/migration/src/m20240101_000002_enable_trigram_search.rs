use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("CREATE EXTENSION IF NOT EXISTS pg_trgm")
            .await?;
        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS \"idx-posts-title-trgm\" \
             ON posts USING gin (title gin_trgm_ops)",
        )
        .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Leaves the pg_trgm extension installed.
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS \"idx-posts-title-trgm\"")
            .await?;
        Ok(())
    }
}
