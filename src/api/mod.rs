// ==========================================
// 日报驾驶舱 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行前端调用
// ==========================================

pub mod config_api;
pub mod dashboard_api;
pub mod error;
pub mod import_api;

// 重导出核心类型
pub use config_api::{ConfigApi, ConfigItem};
pub use dashboard_api::{
    build_dashboard_view, ComparisonSection, DashboardApi, DashboardRequest, DashboardSettings,
    DashboardView, ReportPanel,
};
pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, ImportPreview, SaveReportResponse};
