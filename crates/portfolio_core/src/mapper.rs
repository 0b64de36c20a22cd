//! crates/portfolio_core/src/mapper.rs
//!
//! Pure transformation from the persisted aggregate to the client-facing view.
//! Nothing in here fails: malformed JSON columns decode to "absent".

use serde_json::{Map, Number, Value};

use crate::domain::{
    Achievement, Certification, Education, Experience, Language, PortfolioAggregate, Project,
    ScanReport, Skill,
};
use crate::tool_docs::get_ordered_tool_docs;
use crate::view::{
    AchievementView, CertificationView, EducationView, ExperienceView, LanguageView,
    PortfolioView, ProjectView, ScanReportView, ScanSummary, SkillView, Socials,
};

const DEFAULT_SKILL_LEVEL: &str = "beginner";

/// A JSON column after decoding: either a plain object or nothing usable.
#[derive(Debug, PartialEq)]
enum JsonRecord {
    Object(Map<String, Value>),
    Absent,
}

impl JsonRecord {
    /// Accepts an object, or a string holding an encoded object.
    /// Arrays, primitives, null and unparseable strings all become `Absent`.
    fn decode(value: Option<Value>) -> Self {
        let value = match value {
            Some(Value::String(raw)) => match serde_json::from_str::<Value>(&raw) {
                Ok(parsed) => parsed,
                Err(_) => return Self::Absent,
            },
            Some(value) => value,
            None => return Self::Absent,
        };
        match value {
            Value::Object(map) => Self::Object(map),
            _ => Self::Absent,
        }
    }

    fn into_object(self) -> Option<Map<String, Value>> {
        match self {
            Self::Object(map) => Some(map),
            Self::Absent => None,
        }
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn number_field(map: &Map<String, Value>, key: &str) -> Option<Number> {
    match map.get(key) {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Keeps the three recognised social links whose values are strings.
pub fn map_socials(value: Option<Value>) -> Option<Socials> {
    let map = JsonRecord::decode(value).into_object()?;
    Some(Socials {
        github: string_field(&map, "github"),
        linkedin: string_field(&map, "linkedin"),
        portfolio: string_field(&map, "portfolio"),
    })
}

/// Keeps the recognised scan metrics; mistyped values are dropped, not coerced.
pub fn map_summary(value: Option<Value>) -> Option<ScanSummary> {
    let map = JsonRecord::decode(value).into_object()?;
    Some(ScanSummary {
        bugs: number_field(&map, "bugs"),
        code_smells: number_field(&map, "codeSmells"),
        coverage: number_field(&map, "coverage"),
        low: number_field(&map, "low"),
        medium: number_field(&map, "medium"),
        high: number_field(&map, "high"),
        vulnerabilities: number_field(&map, "vulnerabilities"),
        quality_gate: string_field(&map, "qualityGate"),
    })
}

impl From<Skill> for SkillView {
    fn from(s: Skill) -> Self {
        Self {
            name: s.name,
            category: s.category,
            level: non_empty(s.level).unwrap_or_else(|| DEFAULT_SKILL_LEVEL.to_string()),
        }
    }
}

impl From<Experience> for ExperienceView {
    fn from(e: Experience) -> Self {
        Self {
            title: e.title,
            company: e.company,
            location: e.location,
            start_date: e.start_date,
            end_date: e.end_date,
            description: e.description,
            bullets: e.bullets.unwrap_or_default(),
            tech_stack: e.tech_stack.unwrap_or_default(),
        }
    }
}

impl From<Project> for ProjectView {
    fn from(p: Project) -> Self {
        Self {
            title: p.title,
            description: p.description,
            repo_url: p.repo_url,
            live_url: p.live_url,
            tech: p.tech.unwrap_or_default(),
            highlights: p.highlights.unwrap_or_default(),
            start_date: p.start_date,
            end_date: p.end_date,
        }
    }
}

impl From<Education> for EducationView {
    fn from(e: Education) -> Self {
        Self {
            institution: e.institution,
            degree: e.degree,
            field: e.field,
            start_date: e.start_date,
            end_date: e.end_date,
            description: non_empty(e.description),
        }
    }
}

impl From<Certification> for CertificationView {
    fn from(c: Certification) -> Self {
        Self {
            title: c.title,
            issuer: c.issuer,
            date: c.date,
            link: non_empty(c.link),
        }
    }
}

impl From<Achievement> for AchievementView {
    fn from(a: Achievement) -> Self {
        Self {
            title: a.title,
            date: a.date,
            link: non_empty(a.link),
        }
    }
}

impl From<Language> for LanguageView {
    fn from(l: Language) -> Self {
        Self {
            name: l.name,
            level: l.level,
        }
    }
}

impl From<ScanReport> for ScanReportView {
    fn from(r: ScanReport) -> Self {
        Self {
            kind: r.kind,
            commit_sha: r.commit_sha,
            run_at: r.run_at,
            artifact_url: r.artifact_url,
            summary: map_summary(r.summary),
        }
    }
}

fn map_all<T, U: From<T>>(items: Vec<T>) -> Vec<U> {
    items.into_iter().map(U::from).collect()
}

/// Reshapes a loaded aggregate into the version 2 response.
pub fn map_portfolio(aggregate: PortfolioAggregate) -> PortfolioView {
    let PortfolioAggregate {
        user,
        skills,
        experiences,
        projects,
        education,
        certifications,
        achievements,
        languages,
        scan_reports,
        mut bottom_headlines,
        repo_data,
    } = aggregate;

    // Empty means absent here, unlike the list fields inside each entry.
    let bottom_headline = if bottom_headlines.is_empty() {
        None
    } else {
        bottom_headlines.sort_by_key(|h| h.order);
        Some(bottom_headlines.into_iter().map(|h| h.text).collect())
    };

    let repo = repo_data.unwrap_or_default();

    PortfolioView {
        name: user.name,
        email: user.email,
        headline: user.headline,
        summary: user.summary,
        copyrights: user.copyrights,
        location: user.location,
        phone: user.phone,
        socials: map_socials(user.socials),
        backend_repo: repo.backend_repo,
        backend_deployed_server: repo.backend_deployed_server,
        backend_swagger_url: repo.backend_swagger_url,
        frontend_repo: repo.frontend_repo,
        frontend_deployed_server: repo.frontend_deployed_server,
        database_deployed_server: repo.database_deployed_server,
        skills: map_all(skills),
        experiences: map_all(experiences),
        projects: map_all(projects),
        education: map_all(education),
        certifications: map_all(certifications),
        achievements: map_all(achievements),
        languages: map_all(languages),
        scan_reports: map_all(scan_reports),
        bottom_headline,
        tool_docs: get_ordered_tool_docs(),
    }
}
