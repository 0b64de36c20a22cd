//! crates/portfolio_core/src/view.rs
//!
//! The client-facing ("v2") portfolio shape produced by the mapper.
//!
//! Absent top-level profile fields, social links and repo links are omitted
//! from the JSON entirely. Nullable fields inside collection entries are kept
//! and emitted as `null`, which is what the frontend expects.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Number;

use crate::tool_docs::ToolDoc;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Socials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SkillView {
    pub name: String,
    pub category: String,
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ExperienceView {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub bullets: Vec<String>,
    pub tech_stack: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub title: String,
    pub description: String,
    pub repo_url: Option<String>,
    pub live_url: Option<String>,
    pub tech: Vec<String>,
    pub highlights: Vec<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct EducationView {
    pub institution: String,
    pub degree: String,
    pub field: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CertificationView {
    pub title: String,
    pub issuer: String,
    pub date: DateTime<Utc>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AchievementView {
    pub title: String,
    pub date: Option<DateTime<Utc>>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LanguageView {
    pub name: String,
    pub level: String,
}

/// The recognised subset of a scan report's metrics bag.
///
/// Numbers keep their original JSON representation, so `2` stays `2`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub bugs: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub code_smells: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub coverage: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub low: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub medium: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub high: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub vulnerabilities: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_gate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ScanReportView {
    #[serde(rename = "type")]
    pub kind: String,
    pub commit_sha: Option<String>,
    pub run_at: DateTime<Utc>,
    pub artifact_url: Option<String>,
    pub summary: Option<ScanSummary>,
}

/// The mapped portfolio returned by version 2 of the portfolio route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PortfolioView {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyrights: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socials: Option<Socials>,

    // Repo links, hoisted from the 1:1 repo data row.
    #[serde(rename = "nestJSGitRepo", skip_serializing_if = "Option::is_none")]
    pub backend_repo: Option<String>,
    #[serde(rename = "nestJSDeployedServer", skip_serializing_if = "Option::is_none")]
    pub backend_deployed_server: Option<String>,
    #[serde(rename = "nestJSSwaggerUrl", skip_serializing_if = "Option::is_none")]
    pub backend_swagger_url: Option<String>,
    #[serde(rename = "nextJSGitRepo", skip_serializing_if = "Option::is_none")]
    pub frontend_repo: Option<String>,
    #[serde(rename = "nextJSDeployedServer", skip_serializing_if = "Option::is_none")]
    pub frontend_deployed_server: Option<String>,
    #[serde(rename = "postgresDeployedServer", skip_serializing_if = "Option::is_none")]
    pub database_deployed_server: Option<String>,

    pub skills: Vec<SkillView>,
    pub experiences: Vec<ExperienceView>,
    pub projects: Vec<ProjectView>,
    pub education: Vec<EducationView>,
    pub certifications: Vec<CertificationView>,
    pub achievements: Vec<AchievementView>,
    pub languages: Vec<LanguageView>,
    pub scan_reports: Vec<ScanReportView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_headline: Option<Vec<String>>,
    pub tool_docs: Vec<ToolDoc>,
}
