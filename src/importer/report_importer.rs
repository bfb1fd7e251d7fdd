// ==========================================
// 日报驾驶舱 - 日报导入器
// ==========================================
// 流程: 文件解析（阶段 0） → schema 校验与类型转换（阶段 1）
// 用途: 上传文件导入 + 文件库中已存日报的回读
// ==========================================

use crate::domain::report::{DailyReport, ReportSchema};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::ReportFieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::report_importer_trait::{FieldMapper, FileParser};
use std::path::Path;

pub struct ReportImporter {
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
}

impl ReportImporter {
    /// 默认组件: 按扩展名选择解析器 + schema 字段映射
    pub fn new(schema: ReportSchema) -> Self {
        Self::with_components(
            Box::new(UniversalFileParser),
            Box::new(ReportFieldMapper::new(schema)),
        )
    }

    pub fn with_components(
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
    ) -> Self {
        Self {
            file_parser,
            field_mapper,
        }
    }

    /// 导入文件为日报
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<DailyReport> {
        let path = file_path.as_ref();
        tracing::debug!(path = %path.display(), "开始解析日报文件");

        let table = self.file_parser.parse_to_raw_table(path)?;
        let record_count = table.records.len();

        let report = self.field_mapper.map_to_report(table)?;

        tracing::info!(
            path = %path.display(),
            records = record_count,
            columns = report.columns.len(),
            "日报文件解析完成"
        );
        Ok(report)
    }
}
