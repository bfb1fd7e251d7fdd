// ==========================================
// 日报驾驶舱 - 日报导入 Trait
// ==========================================
// 职责: 定义导入管道两个阶段的接口（不包含实现）
// 阶段 0: 文件读取与解析 → RawTable
// 阶段 1: schema 校验 + 类型转换 → DailyReport
// ==========================================

use crate::domain::report::DailyReport;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::RawTable;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表（表头 + 行，保持列顺序）
    ///
    /// # 返回
    /// - Ok(RawTable): 已跳过完全空白的行
    /// - Err: 文件不存在、格式不支持、解析失败
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 实现者: ReportFieldMapper
pub trait FieldMapper: Send + Sync {
    /// 校验必需列并转换为日报
    ///
    /// # 返回
    /// - Ok(DailyReport): 保留全部列及原始单元格文本
    /// - Err(MissingColumns / TypeConversionError / EquipmentMissing)
    fn map_to_report(&self, table: RawTable) -> ImportResult<DailyReport>;
}
