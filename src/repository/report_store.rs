// ==========================================
// 日报驾驶舱 - 日报文件库
// ==========================================
// 存储: 单层目录，每个日期一个 CSV 文件: <前缀>_<YYYY-MM-DD>.csv
// 内容: 表头 + 原始单元格，无索引列
// 约束: 同一日期重复保存即覆盖；系统从不删除日报
// 约束: 无并发写保护（同日期并发保存以最后写入为准）
// 回读: 先按当前列名 schema 解析，缺列时再按默认 schema 解析
//       （改列名配置后，旧表头的已存日报仍可读）
// ==========================================

use crate::domain::report::{DailyReport, ReportSchema};
use crate::importer::error::ImportError;
use crate::importer::field_mapper::ReportFieldMapper;
use crate::importer::file_parser::CsvParser;
use crate::importer::ReportImporter;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// 文件名中的日期格式（零填充，字典序即时间序）
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const FILE_EXTENSION: &str = "csv";

// ==========================================
// ReportStore - 日报文件库
// ==========================================
pub struct ReportStore {
    data_dir: PathBuf,
    file_prefix: String,
    schema: ReportSchema,
    // 回读解析器，按尝试顺序排列
    readers: Vec<ReportImporter>,
}

fn csv_reader(schema: ReportSchema) -> ReportImporter {
    ReportImporter::with_components(
        Box::new(CsvParser),
        Box::new(ReportFieldMapper::new(schema)),
    )
}

impl ReportStore {
    /// 打开日报文件库（目录不存在时创建）
    ///
    /// # 参数
    /// - data_dir: 存储目录
    /// - file_prefix: 文件名前缀（不能为空，不能含路径分隔符）
    /// - schema: 保存时的必需列；回读时优先使用
    pub fn new<P: Into<PathBuf>>(
        data_dir: P,
        file_prefix: &str,
        schema: ReportSchema,
    ) -> RepositoryResult<Self> {
        let data_dir = data_dir.into();
        let file_prefix = file_prefix.trim().to_string();

        if file_prefix.is_empty() || file_prefix.contains(|c: char| c == '/' || c == '\\') {
            return Err(RepositoryError::ValidationError(format!(
                "无效的文件前缀: '{}'",
                file_prefix
            )));
        }

        let mut readers = vec![csv_reader(schema.clone())];
        if schema != ReportSchema::default() {
            readers.push(csv_reader(ReportSchema::default()));
        }

        let store = Self {
            readers,
            data_dir,
            file_prefix,
            schema,
        };
        store.ensure_dir()?;

        tracing::debug!(data_dir = %store.data_dir.display(), "日报文件库已就绪");
        Ok(store)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn schema(&self) -> &ReportSchema {
        &self.schema
    }

    fn ensure_dir(&self) -> RepositoryResult<()> {
        fs::create_dir_all(&self.data_dir).map_err(|e| io_error(&self.data_dir, e))
    }

    /// 日期对应的文件路径
    pub fn file_path(&self, date: NaiveDate) -> PathBuf {
        self.data_dir.join(format!(
            "{}_{}.{}",
            self.file_prefix,
            date.format(DATE_FORMAT),
            FILE_EXTENSION
        ))
    }

    /// 从文件名解析日期；不符合 <前缀>_<YYYY-MM-DD>.csv 的返回 None
    fn parse_file_name(&self, file_name: &str) -> Option<NaiveDate> {
        let date_part = file_name
            .strip_prefix(self.file_prefix.as_str())?
            .strip_prefix('_')?
            .strip_suffix(".csv")?;

        if date_part.len() != 10 {
            return None;
        }
        NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.file_path(date).is_file()
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 保存日报（覆盖同日期已有日报）
    ///
    /// # 返回
    /// - Ok(PathBuf): 写入的文件路径
    /// - Err(ValidationError): 缺少必需列或行列数不一致
    pub fn save(&self, report: &DailyReport, date: NaiveDate) -> RepositoryResult<PathBuf> {
        self.validate_for_save(report)?;
        self.ensure_dir()?;

        let path = self.file_path(date);
        let replaced = path.is_file();

        let mut writer = csv::Writer::from_path(&path).map_err(|e| csv_error(&path, e))?;
        writer
            .write_record(&report.columns)
            .map_err(|e| csv_error(&path, e))?;
        for row in &report.rows {
            writer
                .write_record(&row.cells)
                .map_err(|e| csv_error(&path, e))?;
        }
        writer.flush().map_err(|e| io_error(&path, e))?;

        tracing::info!(
            date = %date,
            path = %path.display(),
            rows = report.len(),
            replaced,
            "日报已保存"
        );
        Ok(path)
    }

    fn validate_for_save(&self, report: &DailyReport) -> RepositoryResult<()> {
        let missing: Vec<&str> = self
            .schema
            .required_columns()
            .into_iter()
            .filter(|name| ReportFieldMapper::find_column(&report.columns, name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(RepositoryError::ValidationError(format!(
                "日报缺少必需列: {:?}",
                missing
            )));
        }

        if let Some((idx, row)) = report
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.cells.len() != report.columns.len())
        {
            return Err(RepositoryError::ValidationError(format!(
                "第 {} 行单元格数 {} 与列数 {} 不一致",
                idx + 1,
                row.cells.len(),
                report.columns.len()
            )));
        }

        Ok(())
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 已存日期（升序）
    pub fn list_dates(&self) -> RepositoryResult<Vec<NaiveDate>> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&self.data_dir, e)),
        };

        let mut dates = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error(&self.data_dir, e))?;
            if !entry.path().is_file() {
                continue;
            }

            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            match self.parse_file_name(&file_name) {
                Some(date) => dates.push(date),
                None => {
                    tracing::warn!(file = %file_name, "跳过不符合命名规则的文件");
                }
            }
        }

        dates.sort();
        Ok(dates)
    }

    /// 读取指定日期的日报（不存在返回 None）
    pub fn load(&self, date: NaiveDate) -> RepositoryResult<Option<DailyReport>> {
        let path = self.file_path(date);
        if !path.is_file() {
            return Ok(None);
        }
        self.read_file(&path).map(Some)
    }

    /// 读取全部日报（按日期升序，全部载入内存）
    ///
    /// 任一文件解析失败即返回错误
    pub fn load_all(&self) -> RepositoryResult<BTreeMap<NaiveDate, DailyReport>> {
        let mut reports = BTreeMap::new();
        for date in self.list_dates()? {
            let report = self.read_file(&self.file_path(date))?;
            reports.insert(date, report);
        }

        tracing::debug!(count = reports.len(), "已载入全部日报");
        Ok(reports)
    }

    fn read_file(&self, path: &Path) -> RepositoryResult<DailyReport> {
        let mut first_err = None;

        for reader in &self.readers {
            match reader.import_file(path) {
                Ok(report) => return Ok(report),
                // 仅缺列时换下一个 schema；其他错误与表头无关
                Err(e @ ImportError::MissingColumns { .. }) => {
                    first_err.get_or_insert(e);
                }
                Err(e) => return Err(corrupt(path, e)),
            }
        }

        match first_err {
            Some(e) => Err(corrupt(path, e)),
            None => Err(RepositoryError::ValidationError("无可用的日报解析器".to_string())),
        }
    }
}

fn corrupt(path: &Path, source: ImportError) -> RepositoryError {
    RepositoryError::CorruptReport {
        path: path.display().to_string(),
        source,
    }
}

fn io_error(path: &Path, err: std::io::Error) -> RepositoryError {
    RepositoryError::StorageIoError {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

fn csv_error(path: &Path, err: csv::Error) -> RepositoryError {
    RepositoryError::StorageIoError {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
