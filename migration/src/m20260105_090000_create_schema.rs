use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared("CREATE SCHEMA IF NOT EXISTS ai_router")
            .await?;

        // gen_random_uuid() is built in from PostgreSQL 13; older servers need pgcrypto
        db.execute_unprepared("CREATE EXTENSION IF NOT EXISTS pgcrypto")
            .await?;

        db.execute_unprepared(
            "CREATE TYPE ai_router.ai_provider AS ENUM ('gemini', 'groq')",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS ai_router.ai_provider")
            .await?;

        Ok(())
    }
}
