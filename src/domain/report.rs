// ==========================================
// 日报驾驶舱 - 日报领域模型
// ==========================================
// 职责: 日报（每设备计划/实际吨位）与列名 schema
// 红线: 不含数据访问逻辑
// ==========================================

use serde::{Deserialize, Serialize};

/// 源文件默认列名（西班牙语源表头）
pub const DEFAULT_EQUIPMENT_COLUMN: &str = "Equipo";
pub const DEFAULT_PLANNED_COLUMN: &str = "Tonelaje Planificado";
pub const DEFAULT_ACTUAL_COLUMN: &str = "Tonelaje Real";

// ==========================================
// ReportSchema - 日报必需列
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSchema {
    pub equipment_column: String, // 设备编号列
    pub planned_column: String,   // 计划吨位列
    pub actual_column: String,    // 实际吨位列
}

impl Default for ReportSchema {
    fn default() -> Self {
        Self {
            equipment_column: DEFAULT_EQUIPMENT_COLUMN.to_string(),
            planned_column: DEFAULT_PLANNED_COLUMN.to_string(),
            actual_column: DEFAULT_ACTUAL_COLUMN.to_string(),
        }
    }
}

impl ReportSchema {
    /// 必需列（设备、计划、实际）
    pub fn required_columns(&self) -> [&str; 3] {
        [
            self.equipment_column.as_str(),
            self.planned_column.as_str(),
            self.actual_column.as_str(),
        ]
    }
}

// ==========================================
// ReportRow - 日报行
// ==========================================
// cells 按 DailyReport.columns 顺序保存原始单元格文本，落盘时原样写出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub equipment: String, // 设备编号（非唯一，实践中唯一）
    pub planned_t: f64,    // 计划吨位
    pub actual_t: f64,     // 实际吨位
    pub cells: Vec<String>,
}

// ==========================================
// DailyReport - 日报
// ==========================================
// 外部以日期标识（同一日期只保留一份）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub columns: Vec<String>, // 原始表头顺序
    pub rows: Vec<ReportRow>,
}

impl DailyReport {
    /// 由 (设备, 计划, 实际) 三元组构造日报，列顺序为 schema 必需列
    pub fn from_rows<I, S>(schema: &ReportSchema, rows: I) -> Self
    where
        I: IntoIterator<Item = (S, f64, f64)>,
        S: Into<String>,
    {
        let columns = schema
            .required_columns()
            .iter()
            .map(|c| c.to_string())
            .collect();

        let rows = rows
            .into_iter()
            .map(|(equipment, planned_t, actual_t)| {
                let equipment = equipment.into();
                ReportRow {
                    cells: vec![
                        equipment.clone(),
                        format_tonnage(planned_t),
                        format_tonnage(actual_t),
                    ],
                    equipment,
                    planned_t,
                    actual_t,
                }
            })
            .collect();

        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 各行设备编号（保持行顺序）
    pub fn equipment_ids(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.equipment.as_str()).collect()
    }

    pub fn total_planned_t(&self) -> f64 {
        self.rows.iter().map(|r| r.planned_t).sum()
    }

    pub fn total_actual_t(&self) -> f64 {
        self.rows.iter().map(|r| r.actual_t).sum()
    }
}

/// 吨位格式化（整数不带小数点: 100 → "100", 72.5 → "72.5"）
pub fn format_tonnage(value: f64) -> String {
    format!("{}", value)
}
