#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod exam_workflow;
pub mod insight_service;
pub mod progress_service;
pub mod queries;

pub use mastery_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, ExamWorkflowError, InsightError, ProgressServiceError};
pub use exam_workflow::ExamWorkflowService;
pub use insight_service::{InsightConfig, InsightService};
pub use progress_service::ProgressService;
pub use queries::{DomainOverviewRow, domain_overview, search_tasks};
