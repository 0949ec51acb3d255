// src/core/database.rs
//! SQLite record store: append-only profile history, newest by creation time

use anyhow::{Context, Result as AnyResult};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::path::Path;

use crate::app_log;
use crate::core::profile_store::ProfileStore;
use crate::core::FsOps;
use crate::error::{CoachError, Result};
use crate::types::Profile;

// ===== Connection Management =====

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect (creating the file if needed) and run migrations.
    pub async fn new(database_path: &Path) -> AnyResult<Self> {
        if let Some(parent) = database_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            FsOps::ensure_dir_exists(parent).await?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url).await.with_context(|| {
            format!("Failed to connect to database: {}", database_path.display())
        })?;

        app_log!(
            info,
            "Database connection established: {}",
            database_path.display()
        );

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn migrate(&self) -> AnyResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cv_profiles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                current_location TEXT,
                hard_skills TEXT NOT NULL,
                soft_skills TEXT NOT NULL,
                education TEXT NOT NULL,
                total_years_experience INTEGER NOT NULL DEFAULT 0,
                current_branch TEXT NOT NULL,
                years_in_branch INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create cv_profiles table")?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_cv_profiles_created_at ON cv_profiles(created_at);",
        )
        .execute(&self.pool)
        .await?;

        app_log!(info, "Database migrations completed");
        Ok(())
    }
}

// ===== Profile Records =====

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRecord {
    pub id: i64,
    pub current_location: Option<String>,
    pub hard_skills: String,
    pub soft_skills: String,
    pub education: String,
    pub total_years_experience: i64,
    pub current_branch: String,
    pub years_in_branch: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    pub fn into_profile(self) -> Result<Profile> {
        let skills = |raw: &str| -> Result<Vec<String>> {
            serde_json::from_str(raw)
                .map_err(|e| CoachError::persistence("Corrupt skill list in cv_profiles", e))
        };
        let years = |value: i64| -> Result<u32> {
            u32::try_from(value)
                .map_err(|e| CoachError::persistence("Invalid years value in cv_profiles", e))
        };

        Ok(Profile {
            current_location: self.current_location,
            hard_skills: skills(&self.hard_skills)?,
            soft_skills: skills(&self.soft_skills)?,
            education: self.education,
            total_years_experience: years(self.total_years_experience)?,
            current_branch: self.current_branch,
            years_in_branch: years(self.years_in_branch)?,
        })
    }
}

// ===== Profile Repository =====

pub struct ProfileRepository {
    db: Database,
}

impl ProfileRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new row; returns its id.
    pub async fn insert(&self, profile: &Profile) -> Result<i64> {
        let now = Utc::now();
        let encode = |skills: &Vec<String>| {
            serde_json::to_string(skills)
                .map_err(|e| CoachError::persistence("Failed to encode skills", e))
        };

        let result = sqlx::query(
            r#"
            INSERT INTO cv_profiles (
                current_location, hard_skills, soft_skills, education,
                total_years_experience, current_branch, years_in_branch,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&profile.current_location)
        .bind(encode(&profile.hard_skills)?)
        .bind(encode(&profile.soft_skills)?)
        .bind(&profile.education)
        .bind(i64::from(profile.total_years_experience))
        .bind(&profile.current_branch)
        .bind(i64::from(profile.years_in_branch))
        .bind(now)
        .bind(now)
        .execute(self.db.pool())
        .await
        .map_err(|e| CoachError::persistence("Failed to save CV data", e))?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_latest(&self) -> Result<Option<ProfileRecord>> {
        sqlx::query_as::<_, ProfileRecord>(
            r#"
            SELECT id, current_location, hard_skills, soft_skills, education,
                   total_years_experience, current_branch, years_in_branch,
                   created_at, updated_at
            FROM cv_profiles
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| CoachError::persistence("Failed to load CV data", e))
    }
}

#[rocket::async_trait]
impl ProfileStore for ProfileRepository {
    async fn save(&self, profile: &Profile) -> Result<()> {
        let id = self.insert(profile).await?;
        app_log!(info, "CV data saved to database with ID: {}", id);
        Ok(())
    }

    async fn latest(&self) -> Result<Option<Profile>> {
        match self.find_latest().await? {
            Some(record) => {
                app_log!(debug, "Found CV data with ID: {}", record.id);
                record.into_profile().map(Some)
            }
            None => Ok(None),
        }
    }

    fn location(&self) -> String {
        "database table cv_profiles".to_string()
    }
}
