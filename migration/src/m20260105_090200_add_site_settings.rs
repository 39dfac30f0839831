use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r#"
            CREATE TABLE IF NOT EXISTS ai_router.site_settings (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                ai_provider ai_router.ai_provider NOT NULL DEFAULT 'gemini',
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            "INSERT INTO ai_router.site_settings (ai_provider)
             SELECT 'gemini' WHERE NOT EXISTS (SELECT 1 FROM ai_router.site_settings)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS ai_router.site_settings")
            .await?;

        Ok(())
    }
}
