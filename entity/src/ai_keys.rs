//! SeaORM Entity for the ai_keys table.
//! One row per provider API key. The key itself is stored encrypted by
//! `domain::encryption::SecretCodec` and is never serialized back out.

use crate::ai_provider::AiProvider;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(schema_name = "ai_router", table_name = "ai_keys")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    pub provider: AiProvider,
    /// Encrypted API key
    #[serde(skip_serializing)]
    pub key: String,
    pub is_active: bool,
    /// Failed attempts since creation or the last reset
    pub error_count: i32,
    pub last_used: Option<DateTimeWithTimeZone>,
    #[serde(skip_deserializing)]
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_deserializing)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
