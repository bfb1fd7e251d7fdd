// ==========================================
// 日报驾驶舱 - 配置管理 API
// ==========================================
// 职责: 配置查询、更新（带校验与操作日志）
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::{
    config_keys, validate_config_value, ConfigManager, DEFAULT_FILE_PREFIX,
};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::comparison::PairingMode;
use crate::domain::report::{DEFAULT_ACTUAL_COLUMN, DEFAULT_EQUIPMENT_COLUMN, DEFAULT_PLANNED_COLUMN};
use crate::engine::DEFAULT_UNCHANGED_TOLERANCE_T;
use crate::i18n;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::{RepositoryError, ReportStore};

/// 配置项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub key: String,
    /// 已写入 config_kv 的值；None 表示使用默认值
    pub value: Option<String>,
    pub default_value: String,
}

impl ConfigItem {
    /// 生效值
    pub fn effective_value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.default_value)
    }
}

// ==========================================
// ConfigApi - 配置管理 API
// ==========================================

/// 配置管理API
///
/// 职责：
/// 1. 配置查询（全部已知键 + 默认值）
/// 2. 配置更新（校验 + ActionLog记录）
pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
    action_log_repo: Arc<ActionLogRepository>,
    default_data_dir: PathBuf,
}

impl ConfigApi {
    /// 创建新的ConfigApi实例
    ///
    /// # 参数
    /// - default_data_dir: 未配置 report.data_dir 时的日报目录
    pub fn new(
        config_manager: Arc<ConfigManager>,
        action_log_repo: Arc<ActionLogRepository>,
        default_data_dir: PathBuf,
    ) -> Self {
        Self {
            config_manager,
            action_log_repo,
            default_data_dir,
        }
    }

    fn default_value(&self, key: &str) -> String {
        match key {
            config_keys::DATA_DIR => self.default_data_dir.display().to_string(),
            config_keys::FILE_PREFIX => DEFAULT_FILE_PREFIX.to_string(),
            config_keys::EQUIPMENT_COLUMN => DEFAULT_EQUIPMENT_COLUMN.to_string(),
            config_keys::PLANNED_COLUMN => DEFAULT_PLANNED_COLUMN.to_string(),
            config_keys::ACTUAL_COLUMN => DEFAULT_ACTUAL_COLUMN.to_string(),
            config_keys::LOCALE => i18n::DEFAULT_LOCALE.to_string(),
            config_keys::PAIRING_MODE => PairingMode::default().to_string(),
            config_keys::UNCHANGED_TOLERANCE_T => DEFAULT_UNCHANGED_TOLERANCE_T.to_string(),
            _ => String::new(),
        }
    }

    /// 查询所有已知配置
    pub fn list_configs(&self) -> ApiResult<Vec<ConfigItem>> {
        let stored = self
            .config_manager
            .list_global_configs()
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let items = config_keys::ALL
            .iter()
            .map(|key| ConfigItem {
                key: key.to_string(),
                value: stored
                    .iter()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.clone()),
                default_value: self.default_value(key),
            })
            .collect();

        Ok(items)
    }

    /// 改列名前检查: 当前可读的已存日报，改后必须仍可读
    fn ensure_stored_reports_readable(&self, key: &str, value: &str) -> ApiResult<()> {
        let current = self
            .config_manager
            .get_report_schema()
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let mut candidate = current.clone();
        match key {
            config_keys::EQUIPMENT_COLUMN => candidate.equipment_column = value.to_string(),
            config_keys::PLANNED_COLUMN => candidate.planned_column = value.to_string(),
            config_keys::ACTUAL_COLUMN => candidate.actual_column = value.to_string(),
            _ => return Ok(()),
        }

        let data_dir = self
            .config_manager
            .get_data_dir(&self.default_data_dir)
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        let prefix = self
            .config_manager
            .get_file_prefix()
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let current_store = ReportStore::new(&data_dir, &prefix, current)?;
        let candidate_store = ReportStore::new(&data_dir, &prefix, candidate)?;

        for date in candidate_store.list_dates()? {
            match candidate_store.load(date) {
                Err(RepositoryError::CorruptReport { path, .. })
                    if current_store.load(date).is_ok() =>
                {
                    tracing::warn!(key, value, path = %path, "改列名后已存日报将无法读取，拒绝修改");
                    return Err(ApiError::ValidationError(format!(
                        "已存日报使用的表头与新列名不兼容 ({}): {}={}",
                        path, key, value
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// 更新配置
    ///
    /// # 参数
    /// - key: 配置键
    /// - value: 配置值
    /// - actor: 操作人
    ///
    /// # 返回
    /// - Ok(String): 面向用户的提示
    /// - Err(ApiError): 键未知/值非法/数据库错误/改列名会使已存日报不可读
    pub fn update_config(&self, key: &str, value: &str, actor: &str) -> ApiResult<String> {
        let key = key.trim();
        let value = value.trim();

        if key.is_empty() {
            return Err(ApiError::InvalidInput("配置键不能为空".to_string()));
        }
        if actor.trim().is_empty() {
            return Err(ApiError::InvalidInput("操作人不能为空".to_string()));
        }
        validate_config_value(key, value).map_err(ApiError::ValidationError)?;
        self.ensure_stored_reports_readable(key, value)?;

        let previous = self
            .config_manager
            .get_global_config_value(key)
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        self.config_manager
            .set_global_config_value(key, value)
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        tracing::info!(key, value, previous = ?previous, "配置已更新");

        // 记录ActionLog
        let action_log = ActionLog::new(ActionType::UpdateConfig, actor.trim())
            .with_payload(serde_json::json!({
                "key": key,
                "value": value,
                "previous": previous,
            }))
            .with_detail(format!("更新配置: {}={}", key, value));

        self.action_log_repo.insert(&action_log)?;

        let locale = self
            .config_manager
            .get_locale()
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        Ok(i18n::t_with_args(
            &locale,
            "config.updated",
            &[("key", key), ("value", value)],
        ))
    }
}
