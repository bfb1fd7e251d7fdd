// ==========================================
// 日报驾驶舱 - 应用层
// ==========================================
// 职责: 状态装配、命令行解析与执行、终端文本渲染
// ==========================================

pub mod cli;
pub mod render;
pub mod state;

// 重导出
pub use cli::{execute, format_error, Cli, Command, ConfigCommand};
pub use state::{get_default_db_path, AppState};
