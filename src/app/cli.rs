// ==========================================
// 日报驾驶舱 - 命令行
// ==========================================
// 命令: preview / save / dates / show / history / config list|set
// 参数解析: clap derive；帮助文本即各字段文档注释
// ==========================================

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::api::{ApiError, ApiResult, DashboardRequest};
use crate::app::render;
use crate::app::state::AppState;

/// 默认操作人
const DEFAULT_ACTOR: &str = "operador";

/// 默认操作日志条数
const DEFAULT_HISTORY_LIMIT: i32 = 20;

/// Daily operational report: import, archive and compare planned vs actual tonnage
#[derive(Debug, Parser)]
#[command(name = "daily-ops-report")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database path (default: $DAILY_OPS_REPORT_DB_PATH or the user data dir)
    #[arg(long = "db", value_name = "PATH", global = true)]
    pub db_path: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Parse an .xlsx/.xls/.csv report and print it
    Preview {
        file: String,
    },

    /// Import and store the report (default date: today)
    Save {
        file: String,

        #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date)]
        date: Option<NaiveDate>,

        #[arg(long, value_name = "NAME", default_value = DEFAULT_ACTOR)]
        actor: String,
    },

    /// List stored report dates
    Dates,

    /// Render the dashboard (default: latest date)
    Show {
        #[arg(value_name = "YYYY-MM-DD", value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// Write the chart as Plotly JSON
        #[arg(long, value_name = "PATH")]
        chart_json: Option<PathBuf>,

        /// Print the dashboard view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recent action log
    History {
        #[arg(
            value_name = "LIMIT",
            default_value_t = DEFAULT_HISTORY_LIMIT,
            value_parser = clap::value_parser!(i32).range(1..=1000)
        )]
        limit: i32,
    },

    /// Show or update configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum ConfigCommand {
    /// Show configuration
    List,

    /// Update a configuration key
    Set {
        key: String,
        value: String,

        #[arg(long, value_name = "NAME", default_value = DEFAULT_ACTOR)]
        actor: String,
    },
}

/// 解析日期字符串
pub fn parse_date(date_str: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|e| format!("日期格式错误（应为YYYY-MM-DD）: {}: {}", date_str, e))
}

/// 执行命令，返回写到 stdout 的文本
pub fn execute(state: &AppState, command: &Command) -> ApiResult<String> {
    let locale = state.locale.as_str();

    match command {
        Command::Preview { file } => {
            let preview = state.import_api.preview_file(file)?;
            Ok(render::render_preview(&preview, locale))
        }

        Command::Save { file, date, actor } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let response = state.import_api.import_and_save(file, date, actor)?;
            Ok(format!("{}\n", response.message))
        }

        Command::Dates => {
            let dates = state.dashboard_api.list_report_dates()?;
            if dates.is_empty() {
                return Ok(format!("{}\n", crate::i18n::t(locale, "report.no_reports")));
            }
            Ok(dates.iter().map(|d| format!("{}\n", d)).collect())
        }

        Command::Show {
            date,
            chart_json,
            json,
        } => {
            let view = state
                .dashboard_api
                .render_dashboard(&DashboardRequest { selected_date: *date })?;

            if let (Some(path), Some(panel)) = (chart_json, view.panel.as_ref()) {
                let figure = serde_json::to_string_pretty(&panel.chart.to_plotly_json())
                    .map_err(|e| ApiError::InternalError(e.to_string()))?;
                std::fs::write(path, figure).map_err(|e| {
                    ApiError::StorageError(format!("写入图表文件失败 ({}): {}", path.display(), e))
                })?;
                tracing::info!(path = %path.display(), "图表 JSON 已写出");
            }

            if *json {
                let mut text = serde_json::to_string_pretty(&view)
                    .map_err(|e| ApiError::InternalError(e.to_string()))?;
                text.push('\n');
                Ok(text)
            } else {
                Ok(render::render_dashboard(&view, locale))
            }
        }

        Command::History { limit } => {
            let logs = state.dashboard_api.list_recent_actions(*limit)?;
            Ok(render::render_action_logs(&logs))
        }

        Command::Config(ConfigCommand::List) => {
            let items = state.config_api.list_configs()?;
            Ok(render::render_configs(&items))
        }

        Command::Config(ConfigCommand::Set { key, value, actor }) => {
            let message = state.config_api.update_config(key, value, actor)?;
            Ok(format!("{}\n", message))
        }
    }
}

/// 错误输出行: `CODE: message`（附结构化细节）
pub fn format_error(err: &ApiError) -> String {
    match err.details() {
        Some(details) => format!("{}: {} {}", err.code(), err, details),
        None => format!("{}: {}", err.code(), err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(list: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("daily-ops-report").chain(list.iter().copied()))
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_show() {
        let cli = parse(&["--db", "x.db", "show", "2026-03-05", "--json"]).unwrap();
        assert_eq!(cli.db_path.as_deref(), Some("x.db"));
        assert_eq!(
            cli.command,
            Command::Show {
                date: NaiveDate::from_ymd_opt(2026, 3, 5),
                chart_json: None,
                json: true,
            }
        );

        // --db 为全局参数，可放在子命令之后
        let cli = parse(&["show", "--db", "y.db", "--chart-json", "chart.json"]).unwrap();
        assert_eq!(cli.db_path.as_deref(), Some("y.db"));
        assert_eq!(
            cli.command,
            Command::Show {
                date: None,
                chart_json: Some(PathBuf::from("chart.json")),
                json: false,
            }
        );
    }

    #[test]
    fn test_parse_save_defaults() {
        let cli = parse(&["save", "hoy.xlsx"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Save {
                file: "hoy.xlsx".to_string(),
                date: None,
                actor: "operador".to_string(),
            }
        );

        let cli = parse(&["save", "hoy.csv", "--date", "2026-03-05", "--actor", "ana"]).unwrap();
        match cli.command {
            Command::Save { date, actor, .. } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2026, 3, 5));
                assert_eq!(actor, "ana");
            }
            other => panic!("Expected Save, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_config_and_history() {
        assert_eq!(
            parse(&["config", "list"]).unwrap().command,
            Command::Config(ConfigCommand::List)
        );
        assert_eq!(
            parse(&["config", "set", "ui.locale", "en"]).unwrap().command,
            Command::Config(ConfigCommand::Set {
                key: "ui.locale".to_string(),
                value: "en".to_string(),
                actor: "operador".to_string(),
            })
        );
        assert_eq!(
            parse(&["history", "5"]).unwrap().command,
            Command::History { limit: 5 }
        );
        assert_eq!(
            parse(&["history"]).unwrap().command,
            Command::History { limit: 20 }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["preview"]).is_err());
        assert!(parse(&["show", "05/03/2026"]).is_err());
        assert!(parse(&["dates", "extra"]).is_err());
        assert!(parse(&["--verbose", "dates"]).is_err());
        assert!(parse(&["history", "many"]).is_err());
        assert!(parse(&["save", "x.csv", "--date"]).is_err());
        assert!(parse(&["save", "x.csv", "--date", "2026-13-01"]).is_err());
    }

    #[test]
    fn test_history_limit_bounds() {
        assert!(parse(&["history", "0"]).is_err());
        assert!(parse(&["history", "1001"]).is_err());
        assert_eq!(
            parse(&["history", "1000"]).unwrap().command,
            Command::History { limit: 1000 }
        );
    }

    #[test]
    fn test_format_error() {
        let err = ApiError::NotFound("日报(date=2026-03-05)不存在".to_string());
        assert_eq!(format_error(&err), "NOT_FOUND: 资源未找到: 日报(date=2026-03-05)不存在");
    }
}
