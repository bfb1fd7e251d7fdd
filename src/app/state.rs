// ==========================================
// 日报驾驶舱 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享资源和API实例
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::api::{ConfigApi, DashboardApi, DashboardSettings, ImportApi};
use crate::config::config_manager::{ConfigManager, DEFAULT_DATA_DIR_NAME};
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::repository::{ActionLogRepository, ReportStore};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "DAILY_OPS_REPORT_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源（每次命令执行装配一次）
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 界面语言（取自配置）
    pub locale: String,

    /// 日报导入API
    pub import_api: Arc<ImportApi>,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,

    /// 配置管理API
    pub config_api: Arc<ConfigApi>,

    /// 日报文件库
    pub report_store: Arc<ReportStore>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 操作日志仓储（用于审计追踪）
    pub action_log_repo: Arc<ActionLogRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并建表
    /// 2. 读取配置，打开日报文件库
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 配置与Repository层
        // ==========================================

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let action_log_repo = Arc::new(ActionLogRepository::new(conn));

        let default_data_dir = default_data_dir(&db_path);
        let data_dir = config_manager
            .get_data_dir(&default_data_dir)
            .map_err(|e| format!("读取日报目录配置失败: {}", e))?;
        let file_prefix = config_manager
            .get_file_prefix()
            .map_err(|e| format!("读取文件名前缀配置失败: {}", e))?;
        let schema = config_manager
            .get_report_schema()
            .map_err(|e| format!("读取列名配置失败: {}", e))?;

        let report_store = Arc::new(
            ReportStore::new(data_dir, &file_prefix, schema)
                .map_err(|e| format!("无法打开日报文件库: {}", e))?,
        );

        // ==========================================
        // API层
        // ==========================================

        let settings = DashboardSettings {
            locale: config_manager
                .get_locale()
                .map_err(|e| format!("读取语言配置失败: {}", e))?,
            pairing_mode: config_manager
                .get_pairing_mode()
                .map_err(|e| format!("读取配对方式配置失败: {}", e))?,
            unchanged_tolerance_t: config_manager
                .get_unchanged_tolerance()
                .map_err(|e| format!("读取容差配置失败: {}", e))?,
        };
        let locale = settings.locale.clone();

        let import_api = Arc::new(ImportApi::new(
            report_store.clone(),
            action_log_repo.clone(),
            &locale,
        ));
        let dashboard_api = Arc::new(DashboardApi::new(
            report_store.clone(),
            action_log_repo.clone(),
            settings,
        ));
        let config_api = Arc::new(ConfigApi::new(
            config_manager.clone(),
            action_log_repo.clone(),
            default_data_dir,
        ));

        tracing::info!(
            data_dir = %report_store.data_dir().display(),
            locale = %locale,
            "AppState初始化成功"
        );

        Ok(Self {
            db_path,
            locale,
            import_api,
            dashboard_api,
            config_api,
            report_store,
            config_manager,
            action_log_repo,
        })
    }
}

/// 默认日报目录: 数据库文件所在目录下的 informes_historicos
pub fn default_data_dir(db_path: &str) -> PathBuf {
    match Path::new(db_path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(DEFAULT_DATA_DIR_NAME),
        _ => PathBuf::from(DEFAULT_DATA_DIR_NAME),
    }
}

/// 获取默认数据库路径
///
/// 顺序: 环境变量 DAILY_OPS_REPORT_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./daily_ops_report.db");

    if let Some(data_dir) = dirs::data_dir() {
        let app_dir = data_dir.join("daily-ops-report");
        // 确保目录存在；失败时回退到当前目录
        if std::fs::create_dir_all(&app_dir).is_ok() {
            path = app_dir.join("daily_ops_report.db");
        }
    }

    path.to_string_lossy().to_string()
}
