// ==========================================
// 日报驾驶舱 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 日报文件库 + 操作日志（SQLite）
// 约束: 所有 SQL 使用参数化
// ==========================================

pub mod action_log_repo;
pub mod error;
pub mod report_store;

// 重导出核心仓储
pub use action_log_repo::ActionLogRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use report_store::ReportStore;
