// ==========================================
// 日报驾驶舱 - 字段映射器实现
// ==========================================
// 职责: 必需列校验 + 源字段 → 日报行类型转换
// 约束: 列名在 schema 中显式配置，不在代码中散落魔法字符串
// ==========================================

use crate::domain::report::{DailyReport, ReportRow, ReportSchema};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawTable;
use crate::importer::report_importer_trait::FieldMapper as FieldMapperTrait;

pub struct ReportFieldMapper {
    schema: ReportSchema,
}

/// 必需列在原始表中的下标
struct ColumnIndex {
    equipment: usize,
    planned: usize,
    actual: usize,
}

impl ReportFieldMapper {
    pub fn new(schema: ReportSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &ReportSchema {
        &self.schema
    }

    /// 查找列: 先精确匹配（已 trim），再忽略大小写匹配
    pub(crate) fn find_column(headers: &[String], name: &str) -> Option<usize> {
        let name = name.trim();
        headers
            .iter()
            .position(|h| h.trim() == name)
            .or_else(|| {
                let lower = name.to_lowercase();
                headers.iter().position(|h| h.trim().to_lowercase() == lower)
            })
    }

    fn resolve_columns(&self, headers: &[String]) -> ImportResult<ColumnIndex> {
        let [equipment, planned, actual] = self
            .schema
            .required_columns()
            .map(|name| Self::find_column(headers, name));

        match (equipment, planned, actual) {
            (Some(equipment), Some(planned), Some(actual)) => Ok(ColumnIndex {
                equipment,
                planned,
                actual,
            }),
            _ => {
                let missing = self
                    .schema
                    .required_columns()
                    .iter()
                    .filter(|name| Self::find_column(headers, name).is_none())
                    .map(|name| name.to_string())
                    .collect();
                Err(ImportError::MissingColumns {
                    missing,
                    found: headers.to_vec(),
                })
            }
        }
    }

    /// 解析吨位
    ///
    /// - 空值按 0 处理（与按设备汇总时忽略缺失值的结果一致）
    /// - 仅含一个逗号且无小数点时按小数逗号处理（"90,5" → 90.5）
    /// - 逗号后恰好三位数字（"1,234"）既可能是千位分隔也可能是小数逗号，拒绝
    fn parse_tonnage(value: &str, field: &str, row_number: usize) -> ImportResult<f64> {
        let conversion_error = |message: String| ImportError::TypeConversionError {
            row: row_number,
            field: field.to_string(),
            message,
        };

        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(0.0);
        }

        let normalized = match trimmed.split_once(',') {
            Some((int_part, frac_part)) if !trimmed.contains('.') && !frac_part.contains(',') => {
                if is_thousands_group(int_part, frac_part) {
                    return Err(conversion_error(format!(
                        "吨位含歧义的逗号（千位分隔或小数逗号）: {}",
                        value
                    )));
                }
                format!("{}.{}", int_part, frac_part)
            }
            _ => trimmed.to_string(),
        };

        match normalized.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(conversion_error(format!("无法解析为吨位: {}", value))),
        }
    }
}

/// "1,234" / "-12,500": 整数部分 1-3 位，逗号后恰好 3 位数字
fn is_thousands_group(int_part: &str, frac_part: &str) -> bool {
    let digits = int_part.strip_prefix(&['-', '+'][..]).unwrap_or(int_part);
    (1..=3).contains(&digits.len())
        && digits.bytes().all(|b| b.is_ascii_digit())
        && frac_part.len() == 3
        && frac_part.bytes().all(|b| b.is_ascii_digit())
}

impl FieldMapperTrait for ReportFieldMapper {
    fn map_to_report(&self, table: RawTable) -> ImportResult<DailyReport> {
        let index = self.resolve_columns(&table.headers)?;

        let mut rows = Vec::with_capacity(table.records.len());
        for record in table.records {
            let equipment = record.cells[index.equipment].trim().to_string();
            if equipment.is_empty() {
                return Err(ImportError::EquipmentMissing(record.row_number));
            }

            let planned_t = Self::parse_tonnage(
                &record.cells[index.planned],
                &self.schema.planned_column,
                record.row_number,
            )?;
            let actual_t = Self::parse_tonnage(
                &record.cells[index.actual],
                &self.schema.actual_column,
                record.row_number,
            )?;

            rows.push(ReportRow {
                equipment,
                planned_t,
                actual_t,
                cells: record.cells,
            });
        }

        Ok(DailyReport {
            columns: table.headers,
            rows,
        })
    }
}
