// ==========================================
// 日报驾驶舱 - 配置层
// ==========================================
// 职责: 系统配置管理（日报目录、列名、语言、对比方式）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, validate_config_value, ConfigManager};
