// ==========================================
// 日报驾驶舱 - 命令行主入口
// ==========================================
// 退出码: 0 成功 / 1 执行失败 / 2 参数错误（clap）
// ==========================================

use clap::Parser;
use daily_ops_report::app::{execute, format_error, get_default_db_path, AppState, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    // 初始化日志系统
    daily_ops_report::logging::init();

    // 参数错误时由 clap 打印用法并以 2 退出
    let args = Cli::parse();

    tracing::debug!(
        "{} v{}",
        daily_ops_report::APP_NAME,
        daily_ops_report::VERSION
    );

    // 获取数据库路径
    let db_path = args.db_path.clone().unwrap_or_else(get_default_db_path);

    let state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("INIT_ERROR: {}", e);
            return ExitCode::from(1);
        }
    };

    match execute(&state, &args.command) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(code = err.code(), error = %err, "命令执行失败");
            eprintln!("{}", format_error(&err));
            ExitCode::from(1)
        }
    }
}
