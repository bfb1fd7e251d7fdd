// ==========================================
// 日报驾驶舱 - 引擎层
// ==========================================
// 职责: 图表汇总与日环比对比，不访问存储
// 红线: Engine 不读写文件、不拼 SQL
// ==========================================

pub mod chart_builder;
pub mod comparator;

// 重导出核心引擎
pub use chart_builder::{group_by_equipment, ChartBuilder, EquipmentTotals};
pub use comparator::{Comparator, DEFAULT_UNCHANGED_TOLERANCE_T};
