// ==========================================
// 日报驾驶舱 - 核心库
// ==========================================
// 职责: 日报导入 → 按日期存档 → 计划/实际图表 → 日环比分析
// 技术栈: Rust + CSV/Excel + SQLite(配置/操作日志)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "es");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 日报/图表/对比实体
pub mod domain;

// 数据仓储层 - 日报文件库 + 操作日志
pub mod repository;

// 引擎层 - 图表构建/日环比对比
pub mod engine;

// 导入层 - Excel/CSV 解析与校验
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 请求/响应处理
pub mod api;

// 应用层 - 状态装配/命令行/文本渲染
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    ActionLog, ActionType, ChartSpec, ComparisonResult, ComparisonRow, DailyReport, DeltaTrend,
    PairingMode, ReportRow, ReportSchema,
};

pub use engine::{ChartBuilder, Comparator};

pub use repository::{ActionLogRepository, ReportStore};

pub use api::{ConfigApi, DashboardApi, ImportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Informe Operacional Diario";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
