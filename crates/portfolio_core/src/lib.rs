pub mod domain;
pub mod mapper;
pub mod ports;
pub mod service;
pub mod tool_docs;
pub mod view;

pub use domain::{
    Achievement, BottomHeadline, Certification, Education, Experience, Language,
    PortfolioAggregate, Project, RepoData, ScanReport, Skill, User,
};
pub use mapper::{map_portfolio, map_socials, map_summary};
pub use ports::{LivenessProbe, PortError, PortResult, PortfolioInclude, PortfolioRepository};
pub use service::PortfolioService;
pub use tool_docs::{get_ordered_tool_docs, ToolDoc, TOOL_DOCS};
pub use view::PortfolioView;
