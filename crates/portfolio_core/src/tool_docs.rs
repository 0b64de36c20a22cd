//! crates/portfolio_core/src/tool_docs.rs
//!
//! The static catalog of tooling documentation shown next to the portfolio.
//! Entries are compiled into the binary and never touch the database.

use serde::Serialize;

/// One documentation entry. `content` is markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ToolDoc {
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub key: &'static str,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub title: &'static str,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub summary: Option<&'static str>,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub content: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

macro_rules! tool_doc {
    ($key:literal, $title:literal, $icon:literal, $summary:literal, $order:literal) => {
        ToolDoc {
            key: $key,
            title: $title,
            icon: $icon,
            summary: Some($summary),
            content: include_str!(concat!("../docs/tools/", $key, ".md")),
            order: Some($order),
        }
    };
}

/// Declaration order is the tie-breaker when two entries share an `order`.
pub static TOOL_DOCS: &[ToolDoc] = &[
    tool_doc!("openapi", "API / OpenAPI Tools", "FileCode",
        "Export, lint, diff and generate Postman collections from OpenAPI.", 10),
    tool_doc!("nestjs", "Portfolio Backend – Codebase Summary", "ServerCog",
        "NestJS + Prisma stack, modules, versioning, and API overview.", 11),
    tool_doc!("code-docs", "Code and Documentation Tools", "BookText",
        "Generate docs and dependency reports from codebase.", 12),
    tool_doc!("prisma", "Database / Prisma Tools", "Database",
        "ERD, Prisma docs generator, and migrate status.", 13),
    tool_doc!("docker", "Docker (Local) – Compose Summary", "Boxes",
        "Local Postgres and pgAdmin with docker-compose.", 14),
    tool_doc!("docs", "Documentation and Reporting Tools", "FileText",
        "One-stop list of commands to generate docs and reports.", 15),
    tool_doc!("eslint", "ESLint – Project Linting Summary", "ShieldCheck",
        "Flat config with TypeScript and Prettier integration.", 16),
    tool_doc!("nextjs", "Portfolio Frontend – Codebase Summary", "Monitor",
        "Next.js + Tailwind with animated profile and tools pages.", 17),
    tool_doc!("postman", "Postman Collections and Newman", "Send",
        "Build and run Postman collections and reports from OpenAPI.", 18),
    tool_doc!("prettier", "Prettier – Formatting Summary", "Sparkles",
        "Formatting setup and scripts.", 19),
    tool_doc!("project-stats", "Project Stats Tools", "BarChart3",
        "cloc for LOC and Jest coverage reports.", 20),
    tool_doc!("quality-security-tools", "Quality and Security Tools", "Shield",
        "ESLint, npm audit, and dependency license reports.", 21),
    tool_doc!("swagger", "Swagger / OpenAPI – App Setup and Tips", "BookOpenCheck",
        "Swagger UI/JSON endpoints and suggested annotations.", 22),
    tool_doc!("framer-motion", "Framer Motion – Project Usage Overview", "Rocket",
        "Where and how animations are used in the frontend.", 23),
    tool_doc!("lucide", "lucide-react – Project Usage Overview", "Shapes",
        "SVG icon usage, styling, and accessibility notes.", 24),
    tool_doc!("neondb", "NeonDB – Overview and Setup", "Cloud",
        "Serverless Postgres with pooled connection and Prisma tips.", 25),
    tool_doc!("postgres-prisma", "PostgreSQL + Prisma Implementation", "DatabaseZap",
        "Schema, migrations, seeding, and Prisma usage in NestJS.", 26),
    tool_doc!("render", "Render – Deployment Overview (Backend)", "CloudCog",
        "Render web service settings, env vars, and build/start commands.", 27),
    tool_doc!("tailwind", "Tailwind CSS – Project Usage Overview", "Wind",
        "How Tailwind is configured and used.", 28),
    tool_doc!("vercel", "Vercel – Deployment Overview (Frontend)", "Triangle",
        "Next.js on Vercel: envs, caching, and troubleshooting.", 29),
];

/// Returns the catalog sorted by `order`, missing orders counting as 0.
pub fn get_ordered_tool_docs() -> Vec<ToolDoc> {
    sort_tool_docs(TOOL_DOCS)
}

fn sort_tool_docs(docs: &[ToolDoc]) -> Vec<ToolDoc> {
    let mut ordered = docs.to_vec();
    // `sort_by_key` is stable, so equal orders keep declaration order.
    ordered.sort_by_key(|doc| doc.order.unwrap_or(0));
    ordered
}
