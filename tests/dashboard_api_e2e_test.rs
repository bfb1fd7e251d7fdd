// ==========================================
// 驾驶舱 API 端到端测试
// ==========================================
// 流程: 多日存档 → 选择日期 → 图表 + 日环比
// ==========================================

use daily_ops_report::api::{ApiError, ComparisonSection, DashboardRequest};
use daily_ops_report::app::{execute, Command};
use daily_ops_report::domain::comparison::DeltaTrend;

mod test_helpers;
use test_helpers::{date, TestWorkspace};

fn save(ws: &TestWorkspace, day: &str, rows: &[(&str, f64, f64)]) {
    let state = ws.state();
    let file = ws.write_report_csv(&format!("upload_{}.csv", day), rows);
    state
        .import_api
        .import_and_save(&file, date(day), "operador")
        .unwrap();
}

#[test]
fn test_no_reports_shows_notice() {
    let ws = TestWorkspace::new();
    let state = ws.state();

    let view = state
        .dashboard_api
        .render_dashboard(&DashboardRequest::default())
        .unwrap();

    assert!(view.available_dates.is_empty());
    assert!(view.panel.is_none());
    assert_eq!(view.notice.as_deref(), Some("No hay informes guardados todavía."));
}

#[test]
fn test_decrease_against_previous_day() {
    let ws = TestWorkspace::new();
    save(&ws, "2026-03-04", &[("EquipA", 100.0, 95.0), ("EquipB", 50.0, 60.0)]);
    save(&ws, "2026-03-05", &[("EquipA", 100.0, 90.0), ("EquipB", 50.0, 55.0)]);

    let state = ws.state();
    let view = state
        .dashboard_api
        .render_dashboard(&DashboardRequest::default())
        .unwrap();

    assert_eq!(view.available_dates, vec![date("2026-03-04"), date("2026-03-05")]);

    let panel = view.panel.unwrap();
    assert_eq!(panel.report_date, date("2026-03-05"));
    assert_eq!(panel.chart.equipment, vec!["EquipA", "EquipB"]);
    assert_eq!(panel.chart.planned, vec![100.0, 50.0]);
    assert_eq!(panel.chart.actual, vec![90.0, 55.0]);
    assert_eq!(panel.chart.mean_planned_line(), vec![75.0, 75.0]);
    assert_eq!(panel.chart.mean_actual_line(), vec![72.5, 72.5]);

    match panel.comparison {
        ComparisonSection::Compared {
            previous_date,
            result,
            narrative,
            ..
        } => {
            assert_eq!(previous_date, date("2026-03-04"));
            assert_eq!(result.rows.len(), 2);
            assert_eq!(result.rows[0].diff_actual_t, Some(-5.0));
            assert_eq!(result.rows[1].diff_actual_t, Some(-5.0));
            assert_eq!(result.total_actual_delta_t, -10.0);
            assert_eq!(result.trend, DeltaTrend::Decrease);
            assert_eq!(
                narrative,
                "La producción disminuyó 10.00 toneladas respecto al día anterior."
            );
        }
        other => panic!("Expected Compared, got {:?}", other),
    }
}

#[test]
fn test_identical_days_are_unchanged() {
    let ws = TestWorkspace::new();
    save(&ws, "2026-03-04", &[("EquipA", 100.0, 90.0), ("EquipB", 50.0, 55.0)]);
    save(&ws, "2026-03-05", &[("EquipA", 100.0, 90.0), ("EquipB", 50.0, 55.0)]);

    let view = ws
        .state()
        .dashboard_api
        .render_dashboard(&DashboardRequest::default())
        .unwrap();

    match view.panel.unwrap().comparison {
        ComparisonSection::Compared { result, narrative, .. } => {
            assert_eq!(result.total_actual_delta_t, 0.0);
            assert_eq!(result.trend, DeltaTrend::Unchanged);
            assert_eq!(
                narrative,
                "La producción se mantuvo igual respecto al día anterior."
            );
        }
        other => panic!("Expected Compared, got {:?}", other),
    }
}

#[test]
fn test_previous_day_skips_calendar_gaps() {
    let ws = TestWorkspace::new();
    save(&ws, "2026-03-01", &[("EquipA", 100.0, 80.0)]);
    save(&ws, "2026-03-05", &[("EquipA", 100.0, 100.0)]);

    let view = ws
        .state()
        .dashboard_api
        .render_dashboard(&DashboardRequest::default())
        .unwrap();

    match view.panel.unwrap().comparison {
        ComparisonSection::Compared {
            previous_date,
            narrative,
            ..
        } => {
            assert_eq!(previous_date, date("2026-03-01"));
            assert_eq!(
                narrative,
                "La producción aumentó 20.00 toneladas respecto al día anterior."
            );
        }
        other => panic!("Expected Compared, got {:?}", other),
    }
}

#[test]
fn test_earliest_date_and_unknown_date() {
    let ws = TestWorkspace::new();
    save(&ws, "2026-03-04", &[("EquipA", 100.0, 95.0)]);
    save(&ws, "2026-03-05", &[("EquipA", 100.0, 90.0)]);
    let state = ws.state();

    let view = state
        .dashboard_api
        .render_dashboard(&DashboardRequest {
            selected_date: Some(date("2026-03-04")),
        })
        .unwrap();
    assert!(matches!(
        view.panel.unwrap().comparison,
        ComparisonSection::NoPreviousDay { .. }
    ));

    let err = state
        .dashboard_api
        .render_dashboard(&DashboardRequest {
            selected_date: Some(date("2026-03-06")),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(err.code(), "NOT_FOUND");
}

#[test]
fn test_positional_misalignment_is_flagged() {
    let ws = TestWorkspace::new();
    save(&ws, "2026-03-04", &[("EquipB", 50.0, 60.0), ("EquipA", 100.0, 95.0)]);
    save(&ws, "2026-03-05", &[("EquipA", 100.0, 90.0), ("EquipB", 50.0, 55.0)]);

    let view = ws
        .state()
        .dashboard_api
        .render_dashboard(&DashboardRequest::default())
        .unwrap();

    match view.panel.unwrap().comparison {
        ComparisonSection::Compared { result, warnings, .. } => {
            assert_eq!(result.misaligned_rows, vec![0, 1]);
            assert_eq!(result.rows[0].diff_actual_t, Some(30.0));
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].contains("1, 2"));
        }
        other => panic!("Expected Compared, got {:?}", other),
    }
}

#[test]
fn test_show_command_writes_chart_json() {
    let ws = TestWorkspace::new();
    save(&ws, "2026-03-05", &[("EquipA", 100.0, 90.0), ("EquipB", 50.0, 55.0)]);
    let state = ws.state();

    let chart_path = ws.dir.path().join("chart.json");
    let output = execute(
        &state,
        &Command::Show {
            date: None,
            chart_json: Some(chart_path.clone()),
            json: false,
        },
    )
    .unwrap();

    assert!(output.contains("Informe del 2026-03-05"));
    assert!(output.contains("No hay datos del día anterior para comparar."));

    let figure: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(chart_path).unwrap()).unwrap();
    assert_eq!(figure["data"].as_array().unwrap().len(), 4);
    assert_eq!(figure["data"][0]["x"][1], "EquipB");
    assert_eq!(figure["data"][3]["y"][0], 72.5);

    let json = execute(
        &state,
        &Command::Show {
            date: Some(date("2026-03-05")),
            chart_json: None,
            json: true,
        },
    )
    .unwrap();
    let view: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(view["panel"]["comparison"]["status"], "no_previous_day");
    assert_eq!(view["available_dates"][0], "2026-03-05");
}
