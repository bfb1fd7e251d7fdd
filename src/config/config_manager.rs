// ==========================================
// 日报驾驶舱 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::comparison::PairingMode;
use crate::domain::report::{
    ReportSchema, DEFAULT_ACTUAL_COLUMN, DEFAULT_EQUIPMENT_COLUMN, DEFAULT_PLANNED_COLUMN,
};
use crate::engine::comparator::DEFAULT_UNCHANGED_TOLERANCE_T;
use crate::i18n;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// 全局作用域
pub const GLOBAL_SCOPE: &str = "global";

/// 默认日报目录名（位于数据库文件所在目录下）
pub const DEFAULT_DATA_DIR_NAME: &str = "informes_historicos";

/// 默认日报文件名前缀
pub const DEFAULT_FILE_PREFIX: &str = "informe";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 并建表（均幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            crate::db::ensure_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;

        Ok(())
    }

    /// 列出 global scope 下所有已写入的配置（按 key 排序）
    pub fn list_global_configs(&self) -> Result<Vec<(String, String)>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let rows = stmt
            .query_map(params![GLOBAL_SCOPE], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有配置的快照（JSON格式，写入操作日志用）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let config_map: BTreeMap<String, String> = self.list_global_configs()?.into_iter().collect();
        Ok(serde_json::to_string(&json!(config_map))?)
    }

    // ===== 日报文件库 =====

    /// 日报目录；未配置时为 default_dir
    pub fn get_data_dir(&self, default_dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
        Ok(self
            .get_config_value(config_keys::DATA_DIR)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_dir.to_path_buf()))
    }

    pub fn get_file_prefix(&self) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_or_default(config_keys::FILE_PREFIX, DEFAULT_FILE_PREFIX)?
            .trim()
            .to_string())
    }

    /// 日报列名 schema
    pub fn get_report_schema(&self) -> Result<ReportSchema, Box<dyn Error>> {
        Ok(ReportSchema {
            equipment_column: self
                .get_config_or_default(config_keys::EQUIPMENT_COLUMN, DEFAULT_EQUIPMENT_COLUMN)?,
            planned_column: self
                .get_config_or_default(config_keys::PLANNED_COLUMN, DEFAULT_PLANNED_COLUMN)?,
            actual_column: self
                .get_config_or_default(config_keys::ACTUAL_COLUMN, DEFAULT_ACTUAL_COLUMN)?,
        })
    }

    // ===== 界面 =====

    /// 界面语言（未知值回退为默认语言）
    pub fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::LOCALE, i18n::DEFAULT_LOCALE)?;
        Ok(i18n::normalize_locale(&value).to_string())
    }

    // ===== 日环比对比 =====

    /// 行配对方式；非法值回退为按位置配对
    pub fn get_pairing_mode(&self) -> Result<PairingMode, Box<dyn Error>> {
        let value = self.get_config_or_default(
            config_keys::PAIRING_MODE,
            PairingMode::default().as_str(),
        )?;

        match value.parse::<PairingMode>() {
            Ok(mode) => Ok(mode),
            Err(e) => {
                tracing::warn!(value = %value, error = %e, "配对方式配置无效，使用默认值");
                Ok(PairingMode::default())
            }
        }
    }

    /// 持平容差（吨）；非法值回退为默认容差
    pub fn get_unchanged_tolerance(&self) -> Result<f64, Box<dyn Error>> {
        let value = self.get_config_value(config_keys::UNCHANGED_TOLERANCE_T)?;

        Ok(value
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(DEFAULT_UNCHANGED_TOLERANCE_T))
    }
}

// ==========================================
// 配置值校验
// ==========================================

/// 校验配置键与值
///
/// # 返回
/// - Ok(()): 合法
/// - Err(String): 不合法的原因
pub fn validate_config_value(key: &str, value: &str) -> Result<(), String> {
    let value = value.trim();

    match key {
        config_keys::DATA_DIR => {
            if value.is_empty() {
                return Err("日报目录不能为空".to_string());
            }
        }
        config_keys::FILE_PREFIX => {
            if value.is_empty() {
                return Err("文件名前缀不能为空".to_string());
            }
            if value.contains(|c: char| c == '/' || c == '\\') {
                return Err(format!("文件名前缀不能包含路径分隔符: {}", value));
            }
        }
        config_keys::EQUIPMENT_COLUMN
        | config_keys::PLANNED_COLUMN
        | config_keys::ACTUAL_COLUMN => {
            if value.is_empty() {
                return Err("列名不能为空".to_string());
            }
        }
        config_keys::LOCALE => {
            if !i18n::is_supported_locale(value) {
                return Err(format!(
                    "不支持的语言: {}（可选: {}）",
                    value,
                    i18n::SUPPORTED_LOCALES.join(" / ")
                ));
            }
        }
        config_keys::PAIRING_MODE => {
            value.parse::<PairingMode>()?;
        }
        config_keys::UNCHANGED_TOLERANCE_T => {
            let parsed = value
                .parse::<f64>()
                .map_err(|_| format!("容差必须是数字: {}", value))?;
            if !parsed.is_finite() || parsed < 0.0 {
                return Err(format!("容差必须是非负有限数: {}", value));
            }
        }
        other => return Err(format!("未知的配置键: {}", other)),
    }

    Ok(())
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 日报文件库
    pub const DATA_DIR: &str = "report.data_dir";
    pub const FILE_PREFIX: &str = "report.file_prefix";

    // 列名
    pub const EQUIPMENT_COLUMN: &str = "schema.equipment_column";
    pub const PLANNED_COLUMN: &str = "schema.planned_column";
    pub const ACTUAL_COLUMN: &str = "schema.actual_column";

    // 界面
    pub const LOCALE: &str = "ui.locale";

    // 日环比
    pub const PAIRING_MODE: &str = "compare.pairing_mode";
    pub const UNCHANGED_TOLERANCE_T: &str = "compare.unchanged_tolerance_t";

    /// 全部已知配置键
    pub const ALL: &[&str] = &[
        DATA_DIR,
        FILE_PREFIX,
        EQUIPMENT_COLUMN,
        PLANNED_COLUMN,
        ACTUAL_COLUMN,
        LOCALE,
        PAIRING_MODE,
        UNCHANGED_TOLERANCE_T,
    ];
}
