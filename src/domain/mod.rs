// ==========================================
// 日报驾驶舱 - 领域模型层
// ==========================================
// 职责: 定义日报、图表规格、对比结果、操作日志
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod chart;
pub mod comparison;
pub mod report;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use chart::{ChartLabels, ChartSpec, ChartTrace, TraceKind};
pub use comparison::{ComparisonResult, ComparisonRow, DeltaTrend, PairingMode};
pub use report::{format_tonnage, DailyReport, ReportRow, ReportSchema};
