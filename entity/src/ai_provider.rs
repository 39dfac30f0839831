use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// External text-generation services that API keys can be registered for.
///
/// The set is closed: supporting another service means adding a variant here,
/// a value to the `ai_provider` database enum, and an adapter in `domain::gateway`.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    EnumIter,
    Deserialize,
    Serialize,
    DeriveActiveEnum,
    Default,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ai_provider")]
pub enum AiProvider {
    #[sea_orm(string_value = "gemini")]
    #[default]
    Gemini,
    #[sea_orm(string_value = "groq")]
    Groq,
}

impl AiProvider {
    pub const ALL: [AiProvider; 2] = [AiProvider::Gemini, AiProvider::Groq];

    /// Identifier used in storage, configuration and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "gemini",
            AiProvider::Groq => "groq",
        }
    }

    /// Human readable name for messages shown to administrators.
    pub fn display_name(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "Gemini",
            AiProvider::Groq => "Groq",
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct AiProviderParseError(pub String);

impl fmt::Display for AiProviderParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid provider '{}'. Must be 'gemini' or 'groq'",
            self.0
        )
    }
}

impl std::error::Error for AiProviderParseError {}

impl FromStr for AiProvider {
    type Err = AiProviderParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "gemini" => Ok(AiProvider::Gemini),
            "groq" => Ok(AiProvider::Groq),
            _ => Err(AiProviderParseError(value.to_string())),
        }
    }
}
