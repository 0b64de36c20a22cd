//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, the concrete implementation of the
//! `PortfolioRepository` and `LivenessProbe` ports from the core crate. It owns the
//! PostgreSQL connection pool and handles all interactions with it using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use portfolio_core::domain::{
    Achievement, BottomHeadline, Certification, Education, Experience, Language,
    PortfolioAggregate, Project, RepoData, ScanReport, Skill, User,
};
use portfolio_core::ports::{LivenessProbe, PortError, PortResult, PortfolioInclude, PortfolioRepository};
use serde_json::Value;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::DatabaseSettings;
use crate::retry::retry_with_backoff;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the portfolio ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Wraps an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens the connection pool, retrying with exponential backoff.
    ///
    /// Gives up after `connect_max_attempts` failures and returns the last error.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, sqlx::Error> {
        let options = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(10));

        let pool = retry_with_backoff(
            "Database connection",
            settings.connect_max_attempts,
            settings.connect_base_delay,
            || options.clone().connect(&settings.url),
        )
        .await?;

        info!("Database connection established");
        Ok(Self { pool })
    }

    /// Closes every pooled connection. Safe to call more than once.
    pub async fn disconnect(&self) {
        if !self.pool.is_closed() {
            self.pool.close().await;
            info!("Database connection closed");
        }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    async fn fetch_owned<'a, R>(&'a self, sql: &'a str, user_id: i32) -> PortResult<Vec<R>>
    where
        R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        sqlx::query_as::<_, R>(sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(to_port_error)
    }
}

/// Connection-level failures mean the database is unreachable; everything else is unexpected.
fn to_port_error(e: sqlx::Error) -> PortError {
    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => PortError::Unavailable(e.to_string()),
        _ => PortError::Unexpected(e.to_string()),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: i32,
    name: String,
    email: String,
    headline: Option<String>,
    summary: Option<String>,
    copyrights: Option<String>,
    location: Option<String>,
    phone: Option<String>,
    socials: Option<Value>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            headline: self.headline,
            summary: self.summary,
            copyrights: self.copyrights,
            location: self.location,
            phone: self.phone,
            socials: self.socials,
        }
    }
}

#[derive(FromRow)]
struct SkillRecord {
    id: i32,
    user_id: i32,
    name: String,
    category: String,
    level: Option<String>,
}
impl SkillRecord {
    fn to_domain(self) -> Skill {
        Skill {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            category: self.category,
            level: self.level,
        }
    }
}

#[derive(FromRow)]
struct ExperienceRecord {
    id: i32,
    user_id: i32,
    title: String,
    company: String,
    location: Option<String>,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    description: Option<String>,
    bullets: Option<Vec<String>>,
    tech_stack: Option<Vec<String>>,
    sort_order: Option<i32>,
}
impl ExperienceRecord {
    fn to_domain(self) -> Experience {
        Experience {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            company: self.company,
            location: self.location,
            start_date: self.start_date,
            end_date: self.end_date,
            description: self.description,
            bullets: self.bullets,
            tech_stack: self.tech_stack,
            order: self.sort_order,
        }
    }
}

#[derive(FromRow)]
struct ProjectRecord {
    id: i32,
    user_id: i32,
    title: String,
    description: String,
    repo_url: Option<String>,
    live_url: Option<String>,
    tech: Option<Vec<String>>,
    highlights: Option<Vec<String>>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    sort_order: Option<i32>,
}
impl ProjectRecord {
    fn to_domain(self) -> Project {
        Project {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            repo_url: self.repo_url,
            live_url: self.live_url,
            tech: self.tech,
            highlights: self.highlights,
            start_date: self.start_date,
            end_date: self.end_date,
            order: self.sort_order,
        }
    }
}

#[derive(FromRow)]
struct EducationRecord {
    id: i32,
    user_id: i32,
    institution: String,
    degree: String,
    field: Option<String>,
    location: Option<String>,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    description: Option<String>,
}
impl EducationRecord {
    fn to_domain(self) -> Education {
        Education {
            id: self.id,
            user_id: self.user_id,
            institution: self.institution,
            degree: self.degree,
            field: self.field,
            location: self.location,
            start_date: self.start_date,
            end_date: self.end_date,
            description: self.description,
        }
    }
}

#[derive(FromRow)]
struct CertificationRecord {
    id: i32,
    user_id: i32,
    title: String,
    issuer: String,
    date: DateTime<Utc>,
    link: Option<String>,
}
impl CertificationRecord {
    fn to_domain(self) -> Certification {
        Certification {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            issuer: self.issuer,
            date: self.date,
            link: self.link,
        }
    }
}

#[derive(FromRow)]
struct AchievementRecord {
    id: i32,
    user_id: i32,
    title: String,
    date: Option<DateTime<Utc>>,
    link: Option<String>,
}
impl AchievementRecord {
    fn to_domain(self) -> Achievement {
        Achievement {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            date: self.date,
            link: self.link,
        }
    }
}

#[derive(FromRow)]
struct LanguageRecord {
    id: i32,
    user_id: i32,
    name: String,
    level: String,
}
impl LanguageRecord {
    fn to_domain(self) -> Language {
        Language {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            level: self.level,
        }
    }
}

#[derive(FromRow)]
struct ScanReportRecord {
    id: i32,
    user_id: i32,
    kind: String,
    commit_sha: Option<String>,
    run_at: DateTime<Utc>,
    artifact_url: Option<String>,
    summary: Option<Value>,
}
impl ScanReportRecord {
    fn to_domain(self) -> ScanReport {
        ScanReport {
            id: self.id,
            user_id: self.user_id,
            kind: self.kind,
            commit_sha: self.commit_sha,
            run_at: self.run_at,
            artifact_url: self.artifact_url,
            summary: self.summary,
        }
    }
}

#[derive(FromRow)]
struct BottomHeadlineRecord {
    id: i32,
    user_id: i32,
    text: String,
    sort_order: i32,
}
impl BottomHeadlineRecord {
    fn to_domain(self) -> BottomHeadline {
        BottomHeadline {
            id: self.id,
            user_id: self.user_id,
            text: self.text,
            order: self.sort_order,
        }
    }
}

#[derive(FromRow)]
struct RepoDataRecord {
    backend_repo: Option<String>,
    backend_deployed_server: Option<String>,
    backend_swagger_url: Option<String>,
    frontend_repo: Option<String>,
    frontend_deployed_server: Option<String>,
    database_deployed_server: Option<String>,
}
impl RepoDataRecord {
    fn to_domain(self) -> RepoData {
        RepoData {
            backend_repo: self.backend_repo,
            backend_deployed_server: self.backend_deployed_server,
            backend_swagger_url: self.backend_swagger_url,
            frontend_repo: self.frontend_repo,
            frontend_deployed_server: self.frontend_deployed_server,
            database_deployed_server: self.database_deployed_server,
        }
    }
}

//=========================================================================================
// SQL
//=========================================================================================

const FIRST_USER_SQL: &str = "SELECT id, name, email, headline, summary, copyrights, location, phone, socials \
     FROM users ORDER BY id ASC LIMIT 1";
const SKILLS_SQL: &str =
    "SELECT id, user_id, name, category, level FROM skills WHERE user_id = $1 ORDER BY id ASC";
const EXPERIENCES_SQL: &str = "SELECT id, user_id, title, company, location, start_date, end_date, description, \
     bullets, tech_stack, sort_order FROM experiences WHERE user_id = $1 ORDER BY id ASC";
const PROJECTS_SQL: &str = "SELECT id, user_id, title, description, repo_url, live_url, tech, highlights, \
     start_date, end_date, sort_order FROM projects WHERE user_id = $1 ORDER BY id ASC";
const EDUCATION_SQL: &str = "SELECT id, user_id, institution, degree, field, location, start_date, end_date, \
     description FROM education WHERE user_id = $1 ORDER BY id ASC";
const CERTIFICATIONS_SQL: &str =
    "SELECT id, user_id, title, issuer, date, link FROM certifications WHERE user_id = $1 ORDER BY id ASC";
const ACHIEVEMENTS_SQL: &str =
    "SELECT id, user_id, title, date, link FROM achievements WHERE user_id = $1 ORDER BY id ASC";
const LANGUAGES_SQL: &str =
    "SELECT id, user_id, name, level FROM languages WHERE user_id = $1 ORDER BY id ASC";
const SCAN_REPORTS_SQL: &str = "SELECT id, user_id, kind, commit_sha, run_at, artifact_url, summary \
     FROM scan_reports WHERE user_id = $1 ORDER BY id ASC";
const BOTTOM_HEADLINES_SQL: &str = "SELECT id, user_id, text, sort_order FROM bottom_headlines \
     WHERE user_id = $1 ORDER BY sort_order ASC, id ASC";
const REPO_DATA_SQL: &str = "SELECT backend_repo, backend_deployed_server, backend_swagger_url, frontend_repo, \
     frontend_deployed_server, database_deployed_server FROM repo_data WHERE user_id = $1";

//=========================================================================================
// Port Implementations
//=========================================================================================

#[async_trait]
impl PortfolioRepository for DbAdapter {
    async fn find_first_portfolio(
        &self,
        include: PortfolioInclude,
    ) -> PortResult<Option<PortfolioAggregate>> {
        let Some(user) = sqlx::query_as::<_, UserRecord>(FIRST_USER_SQL)
            .fetch_optional(&self.pool)
            .await
            .map_err(to_port_error)?
        else {
            debug!("No user row found");
            return Ok(None);
        };
        let user_id = user.id;

        let (
            skills,
            experiences,
            projects,
            education,
            certifications,
            achievements,
            languages,
            scan_reports,
            bottom_headlines,
        ) = tokio::try_join!(
            self.fetch_owned::<SkillRecord>(SKILLS_SQL, user_id),
            self.fetch_owned::<ExperienceRecord>(EXPERIENCES_SQL, user_id),
            self.fetch_owned::<ProjectRecord>(PROJECTS_SQL, user_id),
            self.fetch_owned::<EducationRecord>(EDUCATION_SQL, user_id),
            self.fetch_owned::<CertificationRecord>(CERTIFICATIONS_SQL, user_id),
            self.fetch_owned::<AchievementRecord>(ACHIEVEMENTS_SQL, user_id),
            self.fetch_owned::<LanguageRecord>(LANGUAGES_SQL, user_id),
            self.fetch_owned::<ScanReportRecord>(SCAN_REPORTS_SQL, user_id),
            self.fetch_owned::<BottomHeadlineRecord>(BOTTOM_HEADLINES_SQL, user_id),
        )?;

        let repo_data = if include.repo_data {
            sqlx::query_as::<_, RepoDataRecord>(REPO_DATA_SQL)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(to_port_error)?
                .map(RepoDataRecord::to_domain)
        } else {
            None
        };

        Ok(Some(PortfolioAggregate {
            user: user.to_domain(),
            skills: skills.into_iter().map(SkillRecord::to_domain).collect(),
            experiences: experiences.into_iter().map(ExperienceRecord::to_domain).collect(),
            projects: projects.into_iter().map(ProjectRecord::to_domain).collect(),
            education: education.into_iter().map(EducationRecord::to_domain).collect(),
            certifications: certifications
                .into_iter()
                .map(CertificationRecord::to_domain)
                .collect(),
            achievements: achievements.into_iter().map(AchievementRecord::to_domain).collect(),
            languages: languages.into_iter().map(LanguageRecord::to_domain).collect(),
            scan_reports: scan_reports.into_iter().map(ScanReportRecord::to_domain).collect(),
            bottom_headlines: bottom_headlines
                .into_iter()
                .map(BottomHeadlineRecord::to_domain)
                .collect(),
            repo_data,
        }))
    }
}

#[async_trait]
impl LivenessProbe for DbAdapter {
    async fn query_liveness(&self) -> PortResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(to_port_error)?;
        Ok(())
    }
}
