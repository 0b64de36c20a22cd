//! crates/portfolio_core/src/domain.rs
//!
//! The persisted portfolio records, exactly as they come out of the database.
//! Serialising these structs yields the raw ("v1") response shape, so field
//! names follow the stored column names in camelCase.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// The single profile row every other record hangs off.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub copyrights: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    /// Stored as JSON. Older rows hold a JSON-encoded string instead of an object.
    pub socials: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub category: String,
    pub level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub bullets: Option<Vec<String>>,
    pub tech_stack: Option<Vec<String>>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub repo_url: Option<String>,
    pub live_url: Option<String>,
    pub tech: Option<Vec<String>>,
    pub highlights: Option<Vec<String>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: i32,
    pub user_id: i32,
    pub institution: String,
    pub degree: String,
    pub field: Option<String>,
    pub location: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub issuer: String,
    pub date: DateTime<Utc>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub date: Option<DateTime<Utc>>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub level: String,
}

/// Output of one CI analysis run (static analysis, coverage, security scan).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub id: i32,
    pub user_id: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub commit_sha: Option<String>,
    pub run_at: DateTime<Utc>,
    pub artifact_url: Option<String>,
    /// Loosely typed metrics bag, either a JSON object or a JSON-encoded string.
    pub summary: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BottomHeadline {
    pub id: i32,
    pub user_id: i32,
    pub text: String,
    pub order: i32,
}

/// Deployment and repository links, stored 1:1 with the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepoData {
    #[serde(rename = "nestJSGitRepo")]
    pub backend_repo: Option<String>,
    #[serde(rename = "nestJSDeployedServer")]
    pub backend_deployed_server: Option<String>,
    #[serde(rename = "nestJSSwaggerUrl")]
    pub backend_swagger_url: Option<String>,
    #[serde(rename = "nextJSGitRepo")]
    pub frontend_repo: Option<String>,
    #[serde(rename = "nextJSDeployedServer")]
    pub frontend_deployed_server: Option<String>,
    #[serde(rename = "postgresDeployedServer")]
    pub database_deployed_server: Option<String>,
}

/// The user row with every owned collection loaded.
///
/// Serialises to the raw ("v1") shape: user columns at the top level followed
/// by one array per collection. `repo_data` only appears when it was loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAggregate {
    #[serde(flatten)]
    pub user: User,
    pub skills: Vec<Skill>,
    pub experiences: Vec<Experience>,
    pub projects: Vec<Project>,
    pub education: Vec<Education>,
    pub certifications: Vec<Certification>,
    pub achievements: Vec<Achievement>,
    pub languages: Vec<Language>,
    pub scan_reports: Vec<ScanReport>,
    pub bottom_headlines: Vec<BottomHeadline>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_data: Option<RepoData>,
}

impl PortfolioAggregate {
    /// An aggregate with no owned records, used as a starting point by adapters.
    pub fn empty(user: User) -> Self {
        Self {
            user,
            skills: Vec::new(),
            experiences: Vec::new(),
            projects: Vec::new(),
            education: Vec::new(),
            certifications: Vec::new(),
            achievements: Vec::new(),
            languages: Vec::new(),
            scan_reports: Vec::new(),
            bottom_headlines: Vec::new(),
            repo_data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> User {
        User {
            id: 1,
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            headline: None,
            summary: None,
            copyrights: None,
            location: None,
            phone: None,
            socials: Some(json!({ "github": "johndoe" })),
        }
    }

    #[test]
    fn raw_shape_flattens_user_columns_and_omits_unloaded_repo_data() {
        let aggregate = PortfolioAggregate::empty(user());
        let value = serde_json::to_value(&aggregate).unwrap();

        assert_eq!(value["id"], 1);
        assert_eq!(value["email"], "john@example.com");
        assert_eq!(value["headline"], Value::Null);
        assert_eq!(value["socials"], json!({ "github": "johndoe" }));
        assert_eq!(value["scanReports"], json!([]));
        assert_eq!(value["bottomHeadlines"], json!([]));
        assert!(value.get("repoData").is_none());
    }

    #[test]
    fn scan_report_kind_serialises_as_type() {
        let report = ScanReport {
            id: 7,
            user_id: 1,
            kind: "sonar".to_string(),
            commit_sha: None,
            run_at: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
            artifact_url: None,
            summary: None,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["type"], "sonar");
        assert_eq!(value["userId"], 1);
        assert!(value.get("kind").is_none());
    }
}
