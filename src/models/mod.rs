//! Data models for transcript search.
//!
//! - [`Message`] / [`Role`] / [`ContentBlock`] - one decoded transcript line
//! - [`SessionHeader`] / [`SessionMeta`] / [`ProjectInfo`] - discovery metadata
//! - [`report`] - response payloads returned across the tool boundary

pub mod message;
pub mod report;
pub mod session;

pub use message::{ContentBlock, Message, Role};
pub use report::{
    AnalysisReport, AnalysisSummary, ContextMessage, MessageDetail, MessageDetailReport,
    MessageRecord, RoleBreakdown, SearchReport, SearchResult, SummaryReport,
};
pub use session::{ProjectInfo, SessionHeader, SessionMeta};
