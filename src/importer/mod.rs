// ==========================================
// 日报驾驶舱 - 导入层
// ==========================================
// 职责: 外部日报文件解析 + schema 校验
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod report_importer;
pub mod report_importer_trait;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::ReportFieldMapper;
pub use file_parser::{CsvParser, ExcelParser, RawRecord, RawTable, UniversalFileParser};
pub use report_importer::ReportImporter;

// 重导出 Trait 接口
pub use report_importer_trait::{FieldMapper, FileParser};
