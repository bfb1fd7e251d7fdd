// ==========================================
// 日报驾驶舱 - 文本渲染
// ==========================================
// 职责: 将 API 视图模型渲染为终端文本（表格 + 横向柱状图）
// ==========================================

use comfy_table::presets::ASCII_FULL;
use comfy_table::{Cell, CellAlignment, Table};

use crate::api::{ComparisonSection, ConfigItem, DashboardView, ImportPreview, ReportPanel};
use crate::domain::action_log::ActionLog;
use crate::domain::chart::ChartSpec;
use crate::domain::comparison::ComparisonResult;
use crate::domain::report::DailyReport;
use crate::i18n;

/// 柱状图最大宽度（字符）
const BAR_WIDTH: usize = 40;

/// 终端表格（ASCII 边框，数值列右对齐）
fn render_table(headers: &[String], rows: Vec<Vec<Cell>>) -> String {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(headers.iter().map(Cell::new).collect::<Vec<_>>());
    for row in rows {
        table.add_row(row);
    }
    format!("{}\n", table)
}

fn num_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn fmt_t(value: f64) -> String {
    format!("{:.2}", value)
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(fmt_t).unwrap_or_else(|| "-".to_string())
}

/// 日报原样表格（全部列）
pub fn render_report(report: &DailyReport) -> String {
    let rows = report
        .rows
        .iter()
        .map(|r| {
            r.cells
                .iter()
                .map(|cell| {
                    if cell.trim().parse::<f64>().is_ok() {
                        num_cell(cell.clone())
                    } else {
                        Cell::new(cell)
                    }
                })
                .collect()
        })
        .collect();
    render_table(&report.columns, rows)
}

/// 导入预览
pub fn render_preview(preview: &ImportPreview, locale: &str) -> String {
    let mut out = String::new();
    out.push_str(&i18n::t(locale, "import.loaded"));
    out.push('\n');
    out.push_str(&render_report(&preview.report));
    out
}

/// 横向柱状图 + 均值
pub fn render_chart(chart: &ChartSpec) -> String {
    let mut out = String::new();
    out.push_str(&chart.labels.title);
    out.push('\n');

    let max = chart
        .planned
        .iter()
        .chain(chart.actual.iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let name_width = chart
        .equipment
        .iter()
        .map(|e| e.chars().count())
        .max()
        .unwrap_or(0);
    let label_width = chart
        .labels
        .planned
        .chars()
        .count()
        .max(chart.labels.actual.chars().count());

    let bar = |value: f64| -> String {
        if max <= 0.0 {
            return String::new();
        }
        let len = ((value.abs() / max) * BAR_WIDTH as f64).round() as usize;
        "#".repeat(len)
    };

    for (i, equipment) in chart.equipment.iter().enumerate() {
        for (label, value) in [
            (&chart.labels.planned, chart.planned[i]),
            (&chart.labels.actual, chart.actual[i]),
        ] {
            out.push_str(&format!(
                "{:<nw$}  {:<lw$} {} {}\n",
                equipment,
                label,
                bar(value),
                fmt_t(value),
                nw = name_width,
                lw = label_width,
            ));
        }
    }

    out.push_str(&format!(
        "{}: {}\n{}: {}\n",
        chart.labels.mean_planned,
        fmt_t(chart.mean_planned),
        chart.labels.mean_actual,
        fmt_t(chart.mean_actual),
    ));
    out
}

/// 日环比明细表
pub fn render_comparison(result: &ComparisonResult, locale: &str) -> String {
    let headers: Vec<String> = [
        "compare.col_equipment",
        "compare.col_planned_today",
        "compare.col_planned_yesterday",
        "compare.col_diff_planned",
        "compare.col_actual_today",
        "compare.col_actual_yesterday",
        "compare.col_diff_actual",
    ]
    .iter()
    .map(|key| i18n::t(locale, key))
    .collect();

    let rows = result
        .rows
        .iter()
        .map(|r| {
            vec![
                Cell::new(&r.equipment),
                num_cell(fmt_t(r.planned_today_t)),
                num_cell(fmt_opt(r.planned_yesterday_t)),
                num_cell(fmt_opt(r.diff_planned_t)),
                num_cell(fmt_t(r.actual_today_t)),
                num_cell(fmt_opt(r.actual_yesterday_t)),
                num_cell(fmt_opt(r.diff_actual_t)),
            ]
        })
        .collect();

    render_table(&headers, rows)
}

fn render_panel(panel: &ReportPanel, locale: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("== {} ==\n", panel.heading));
    out.push_str(&render_report(&panel.report));
    out.push('\n');
    out.push_str(&render_chart(&panel.chart));
    out.push('\n');
    out.push_str(&format!("== {} ==\n", i18n::t(locale, "compare.title")));

    match &panel.comparison {
        ComparisonSection::Compared {
            previous_date,
            result,
            narrative,
            warnings,
        } => {
            out.push_str(&format!("{} -> {}\n", previous_date, panel.report_date));
            out.push_str(&render_comparison(result, locale));
            for warning in warnings {
                out.push_str(warning);
                out.push('\n');
            }
            out.push_str(narrative);
            out.push('\n');
        }
        ComparisonSection::NoPreviousDay { notice } => {
            out.push_str(notice);
            out.push('\n');
        }
    }
    out
}

/// 驾驶舱
pub fn render_dashboard(view: &DashboardView, locale: &str) -> String {
    let mut out = String::new();

    if let Some(notice) = &view.notice {
        out.push_str(notice);
        out.push('\n');
    }

    if let Some(panel) = &view.panel {
        let dates = view
            .available_dates
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("{}: {}\n\n", i18n::t(locale, "report.select_date"), dates));
        out.push_str(&render_panel(panel, locale));
    }

    out
}

/// 操作日志列表
pub fn render_action_logs(logs: &[ActionLog]) -> String {
    let headers: Vec<String> = ["action_ts", "action_type", "actor", "report_date", "detail"]
        .iter()
        .map(|h| h.to_string())
        .collect();

    let rows = logs
        .iter()
        .map(|log| {
            vec![
                Cell::new(log.action_ts.format("%Y-%m-%d %H:%M:%S")),
                Cell::new(&log.action_type),
                Cell::new(&log.actor),
                Cell::new(log.report_date.map(|d| d.to_string()).unwrap_or_default()),
                Cell::new(log.detail.as_deref().unwrap_or_default()),
            ]
        })
        .collect();

    render_table(&headers, rows)
}

/// 配置列表（* 标记为已覆写）
pub fn render_configs(items: &[ConfigItem]) -> String {
    let headers: Vec<String> = ["key", "value", ""].iter().map(|h| h.to_string()).collect();
    let rows = items
        .iter()
        .map(|item| {
            vec![
                Cell::new(&item.key),
                Cell::new(item.effective_value()),
                Cell::new(if item.value.is_some() { "*" } else { "" }),
            ]
        })
        .collect();

    render_table(&headers, rows)
}
