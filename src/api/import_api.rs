// ==========================================
// 日报驾驶舱 - 日报导入 API
// ==========================================
// 职责: 上传文件预览、按日期存档
// 红线: 每次存档必须写操作日志
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::report::DailyReport;
use crate::i18n;
use crate::importer::ReportImporter;
use crate::repository::{ActionLogRepository, ReportStore};

/// 上传文件预览
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPreview {
    /// 源文件路径
    pub source_path: String,
    /// 解析后的日报
    pub report: DailyReport,
    /// 行数
    pub row_count: usize,
    pub total_planned_t: f64,
    pub total_actual_t: f64,
}

/// 存档响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveReportResponse {
    pub report_date: NaiveDate,
    /// 实际写入的文件路径
    pub path: String,
    pub row_count: usize,
    /// 是否覆盖了同日期的已有日报
    pub replaced_existing: bool,
    /// 面向用户的提示
    pub message: String,
}

/// 日报导入API
pub struct ImportApi {
    report_store: Arc<ReportStore>,
    action_log_repo: Arc<ActionLogRepository>,
    importer: ReportImporter,
    locale: String,
}

impl ImportApi {
    /// 创建新的ImportApi实例（解析 schema 与文件库一致）
    pub fn new(
        report_store: Arc<ReportStore>,
        action_log_repo: Arc<ActionLogRepository>,
        locale: &str,
    ) -> Self {
        let importer = ReportImporter::new(report_store.schema().clone());
        Self {
            report_store,
            action_log_repo,
            importer,
            locale: i18n::normalize_locale(locale).to_string(),
        }
    }

    /// 解析上传文件并返回预览（不落盘）
    ///
    /// # 返回
    /// - Ok(ImportPreview): 解析结果
    /// - Err(ApiError::ImportError): 文件不存在/格式不支持/缺列/类型错误
    pub fn preview_file(&self, file_path: &str) -> ApiResult<ImportPreview> {
        if file_path.trim().is_empty() {
            return Err(ApiError::InvalidInput("文件路径不能为空".to_string()));
        }

        let report = self.importer.import_file(Path::new(file_path))?;

        Ok(ImportPreview {
            source_path: file_path.to_string(),
            row_count: report.len(),
            total_planned_t: report.total_planned_t(),
            total_actual_t: report.total_actual_t(),
            report,
        })
    }

    /// 将日报按日期存档（同日期覆盖）
    ///
    /// # 参数
    /// - report: 日报
    /// - report_date: 日报日期
    /// - actor: 操作人
    pub fn save_report(
        &self,
        report: &DailyReport,
        report_date: NaiveDate,
        actor: &str,
    ) -> ApiResult<SaveReportResponse> {
        if actor.trim().is_empty() {
            return Err(ApiError::InvalidInput("操作人不能为空".to_string()));
        }

        let replaced_existing = self.report_store.contains(report_date);
        let path = self.report_store.save(report, report_date)?;
        let path_str = path.display().to_string();

        if replaced_existing {
            tracing::warn!(date = %report_date, path = %path_str, "覆盖同日期已存日报");
        }

        // 记录ActionLog
        let action_log = ActionLog::new(ActionType::SaveReport, actor.trim())
            .with_report_date(report_date)
            .with_payload(serde_json::json!({
                "path": path_str,
                "row_count": report.len(),
                "replaced_existing": replaced_existing,
                "total_planned_t": report.total_planned_t(),
                "total_actual_t": report.total_actual_t(),
            }))
            .with_detail(format!("保存日报: {}", report_date));

        self.action_log_repo.insert(&action_log)?;

        let message = i18n::t_with_args(&self.locale, "report.saved", &[("path", &path_str)]);

        Ok(SaveReportResponse {
            report_date,
            path: path_str,
            row_count: report.len(),
            replaced_existing,
            message,
        })
    }

    /// 解析上传文件并存档
    pub fn import_and_save(
        &self,
        file_path: &str,
        report_date: NaiveDate,
        actor: &str,
    ) -> ApiResult<SaveReportResponse> {
        let preview = self.preview_file(file_path)?;
        self.save_report(&preview.report, report_date, actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::ReportSchema;
    use rusqlite::Connection;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn setup(dir: &TempDir) -> (ImportApi, Arc<ActionLogRepository>) {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        let repo = Arc::new(ActionLogRepository::new(Arc::new(Mutex::new(conn))));
        let store = Arc::new(
            ReportStore::new(dir.path().join("informes"), "informe", ReportSchema::default())
                .unwrap(),
        );
        (ImportApi::new(store, repo.clone(), "es"), repo)
    }

    #[test]
    fn test_save_report_writes_file_and_action_log() {
        let dir = TempDir::new().unwrap();
        let (api, repo) = setup(&dir);

        let report = DailyReport::from_rows(&ReportSchema::default(), vec![("EquipA", 100.0, 90.0)]);
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();

        let first = api.save_report(&report, date, "operador").unwrap();
        assert!(!first.replaced_existing);
        assert!(first.path.ends_with("informe_2026-03-05.csv"));
        assert!(first.message.starts_with("Informe guardado como"));

        let second = api.save_report(&report, date, "operador").unwrap();
        assert!(second.replaced_existing);

        let logs = repo.find_by_report_date(date).unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].action_type, "SAVE_REPORT");
        assert_eq!(logs[0].payload_json.as_ref().unwrap()["row_count"], 1);
    }

    #[test]
    fn test_empty_actor_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (api, _) = setup(&dir);

        let report = DailyReport::from_rows(&ReportSchema::default(), vec![("EquipA", 1.0, 1.0)]);
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();

        assert!(matches!(
            api.save_report(&report, date, "  "),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_preview_missing_file() {
        let dir = TempDir::new().unwrap();
        let (api, _) = setup(&dir);

        let missing = dir.path().join("nope.csv");
        let err = api.preview_file(missing.to_str().unwrap()).unwrap_err();
        assert_eq!(err.code(), "IMPORT_ERROR");
    }
}
