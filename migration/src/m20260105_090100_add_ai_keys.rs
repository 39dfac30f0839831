use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Keys are encrypted at the application layer via domain::encryption (AES-256-GCM).
        // error_count and last_used are rewritten on every generation attempt.
        let create_table_sql = r#"
            CREATE TABLE IF NOT EXISTS ai_router.ai_keys (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                provider ai_router.ai_provider NOT NULL,
                key TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                error_count INTEGER NOT NULL DEFAULT 0 CHECK (error_count >= 0),
                last_used TIMESTAMPTZ,

                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_table_sql)
            .await?;

        // Matches the candidate selection query: provider + active, healthiest first
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_ai_keys_selection
                 ON ai_router.ai_keys(provider, is_active, error_count, last_used NULLS FIRST)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS ai_router.ai_keys")
            .await?;

        Ok(())
    }
}
