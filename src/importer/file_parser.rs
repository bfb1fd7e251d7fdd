// ==========================================
// 日报驾驶舱 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xls, 第一个工作表) / CSV (.csv)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::report_importer_trait::FileParser;
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

// ==========================================
// RawTable - 原始表
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

/// 原始行（cells 与 headers 等长）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 源文件行号（表头为第 1 行）
    pub row_number: usize,
    pub cells: Vec<String>,
}

impl RawTable {
    /// 追加一行: 短行补空串，超出表头的单元格丢弃，完全空白的行跳过
    fn push_row(&mut self, row_number: usize, values: impl Iterator<Item = String>) {
        let mut cells: Vec<String> = values.take(self.headers.len()).collect();
        cells.resize(self.headers.len(), String::new());

        if cells.iter().all(|v| v.is_empty()) {
            return;
        }

        self.records.push(RawRecord { row_number, cells });
    }
}

fn check_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let path = file_path;

        // 检查文件存在
        check_exists(path)?;

        // 检查扩展名
        let ext = extension_of(path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头（去掉可能残留的 UTF-8 BOM）
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut table = RawTable {
            headers,
            records: Vec::new(),
        };

        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let row_number = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);
            table.push_row(row_number, record.iter().map(|v| v.trim().to_string()));
        }

        Ok(table)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let path = file_path;

        // 检查文件存在
        check_exists(path)?;

        // 检查扩展名
        let ext = extension_of(path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(path)?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无表头行".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut table = RawTable {
            headers,
            records: Vec::new(),
        };

        // range 起始行不一定是第 1 行
        let first_row = range.start().map(|(r, _)| r as usize + 1).unwrap_or(1);
        for (idx, data_row) in rows.enumerate() {
            table.push_row(
                first_row + idx + 1,
                data_row.iter().map(|cell| cell.to_string().trim().to_string()),
            );
        }

        Ok(table)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        match extension_of(file_path).as_str() {
            "csv" => CsvParser.parse_to_raw_table(file_path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_table(file_path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn temp_csv(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(temp_file, "{}", line).unwrap();
        }
        temp_file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let temp_file = temp_csv(&[
            "Equipo,Tonelaje Planificado,Tonelaje Real",
            "PALA-01,100,90",
            "CAMION-07, 50 ,55.5",
        ]);

        let table = CsvParser.parse_to_raw_table(temp_file.path()).unwrap();

        assert_eq!(
            table.headers,
            vec!["Equipo", "Tonelaje Planificado", "Tonelaje Real"]
        );
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].row_number, 2);
        assert_eq!(table.records[0].cells, vec!["PALA-01", "100", "90"]);
        assert_eq!(table.records[1].cells, vec!["CAMION-07", "50", "55.5"]);
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_to_raw_table(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_csv_parser_skip_empty_rows_and_pad_short_rows() {
        let temp_file = temp_csv(&["Equipo,Tonelaje Planificado,Tonelaje Real", "PALA-01,100", ",,", "PALA-02,1,2"]);

        let table = CsvParser.parse_to_raw_table(temp_file.path()).unwrap();

        // 应跳过空行
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].cells, vec!["PALA-01", "100", ""]);
        assert_eq!(table.records[1].row_number, 4);
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let temp_file = Builder::new().suffix(".txt").tempfile().unwrap();
        let result = UniversalFileParser.parse_to_raw_table(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"));
    }

    #[test]
    fn test_excel_parser_rejects_csv_extension() {
        let temp_file = temp_csv(&["Equipo"]);
        let result = ExcelParser.parse_to_raw_table(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    fn xlsx_fixture() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("informe_dos_hojas.xlsx")
    }

    #[test]
    fn test_excel_parser_reads_first_sheet() {
        let table = ExcelParser.parse_to_raw_table(&xlsx_fixture()).unwrap();

        // 第一个工作表 "Hoy"；第二个工作表 "Ayer" 被忽略
        assert_eq!(
            table.headers,
            vec!["Equipo", "Tonelaje Planificado", "Tonelaje Real", "Turno"]
        );
        assert_eq!(table.records.len(), 2);
        // 数值单元格: 100.0 → "100"
        assert_eq!(table.records[0].cells, vec!["PALA-01", "100", "90", "A"]);
        assert_eq!(table.records[1].cells, vec!["PALA-02", "50", "55.5", "B"]);
    }

    #[test]
    fn test_excel_row_numbers_follow_range_start() {
        // 表头位于第 2 行（第 1 行为空）
        let table = UniversalFileParser.parse_to_raw_table(&xlsx_fixture()).unwrap();
        assert_eq!(table.records[0].row_number, 3);
        assert_eq!(table.records[1].row_number, 4);
    }
}
