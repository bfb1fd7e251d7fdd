// ==========================================
// 配置集成测试
// ==========================================
// 覆盖: 配置更新后重新装配 AppState 生效（语言、配对方式、列名、前缀）
//       改列名后已存日报仍可读
// ==========================================

use daily_ops_report::api::{ApiError, ComparisonSection, DashboardRequest};
use daily_ops_report::config::config_keys;
use daily_ops_report::domain::comparison::PairingMode;

mod test_helpers;
use test_helpers::{date, TestWorkspace};

#[test]
fn test_defaults() {
    let ws = TestWorkspace::new();
    let state = ws.state();

    assert_eq!(state.locale, "es");
    assert_eq!(state.dashboard_api.settings().pairing_mode, PairingMode::Positional);
    assert_eq!(state.dashboard_api.settings().unchanged_tolerance_t, 0.0);
    assert_eq!(state.report_store.data_dir(), ws.data_dir().as_path());

    let items = state.config_api.list_configs().unwrap();
    assert!(items.iter().all(|item| item.value.is_none()));
}

#[test]
fn test_locale_and_pairing_mode_take_effect() {
    let ws = TestWorkspace::new();
    {
        let state = ws.state();
        state
            .config_api
            .update_config(config_keys::LOCALE, "en", "supervisor")
            .unwrap();
        state
            .config_api
            .update_config(config_keys::PAIRING_MODE, "by_equipment", "supervisor")
            .unwrap();

        let day1 = ws.write_report_csv("d1.csv", &[("EquipB", 50.0, 60.0), ("EquipA", 100.0, 95.0)]);
        let day2 = ws.write_report_csv("d2.csv", &[("EquipA", 100.0, 90.0), ("EquipB", 50.0, 55.0)]);
        state.import_api.import_and_save(&day1, date("2026-03-04"), "operador").unwrap();
        state.import_api.import_and_save(&day2, date("2026-03-05"), "operador").unwrap();
    }

    // 配置在装配时读取
    let state = ws.state();
    assert_eq!(state.locale, "en");

    let view = state
        .dashboard_api
        .render_dashboard(&DashboardRequest::default())
        .unwrap();
    let panel = view.panel.unwrap();
    assert_eq!(panel.heading, "Report of 2026-03-05");
    assert_eq!(panel.chart.labels.planned, "Planned");

    match panel.comparison {
        ComparisonSection::Compared { result, narrative, warnings, .. } => {
            assert_eq!(result.pairing_mode, PairingMode::ByEquipment);
            assert_eq!(result.rows[0].diff_actual_t, Some(-5.0));
            assert!(warnings.is_empty());
            assert_eq!(
                narrative,
                "Production decreased by 10.00 tonnes compared to the previous day."
            );
        }
        other => panic!("Expected Compared, got {:?}", other),
    }

    let logs = state.dashboard_api.list_recent_actions(10).unwrap();
    assert_eq!(
        logs.iter().filter(|l| l.action_type == "UPDATE_CONFIG").count(),
        2
    );
}

#[test]
fn test_custom_columns_and_prefix() {
    let ws = TestWorkspace::new();
    {
        let state = ws.state();
        for (key, value) in [
            (config_keys::EQUIPMENT_COLUMN, "Equipment"),
            (config_keys::PLANNED_COLUMN, "Planned"),
            (config_keys::ACTUAL_COLUMN, "Actual"),
            (config_keys::FILE_PREFIX, "report"),
        ] {
            state.config_api.update_config(key, value, "supervisor").unwrap();
        }
    }

    let state = ws.state();
    let upload = ws.write_upload("hoy.csv", "equipment,planned,actual\nM1,10,12\n");
    let response = state
        .import_api
        .import_and_save(&upload, date("2026-03-05"), "operador")
        .unwrap();

    assert!(response.path.ends_with("report_2026-03-05.csv"));
    let stored = state.report_store.load(date("2026-03-05")).unwrap().unwrap();
    assert_eq!(stored.rows[0].actual_t, 12.0);

    // 默认列名的文件不再满足 schema
    let legacy = ws.write_report_csv("legacy.csv", &[("M1", 1.0, 1.0)]);
    assert!(matches!(
        state.import_api.preview_file(&legacy),
        Err(ApiError::ImportError(_))
    ));
}

#[test]
fn test_renaming_a_column_keeps_stored_reports_readable() {
    let ws = TestWorkspace::new();
    {
        let state = ws.state();
        let day1 = ws.write_report_csv("d1.csv", &[("EquipA", 100.0, 90.0), ("EquipB", 50.0, 55.0)]);
        state.import_api.import_and_save(&day1, date("2026-03-04"), "operador").unwrap();
        state
            .config_api
            .update_config(config_keys::EQUIPMENT_COLUMN, "Equipment", "supervisor")
            .unwrap();
    }

    let state = ws.state();
    let view = state
        .dashboard_api
        .render_dashboard(&DashboardRequest::default())
        .unwrap();
    assert_eq!(view.available_dates, vec![date("2026-03-04")]);
    assert_eq!(view.panel.unwrap().chart.equipment, vec!["EquipA", "EquipB"]);

    // 新表头的日报与旧表头的日报可以对比
    let day2 = ws.write_upload(
        "d2.csv",
        "Equipment,Tonelaje Planificado,Tonelaje Real\nEquipA,100,95\nEquipB,50,55\n",
    );
    state.import_api.import_and_save(&day2, date("2026-03-05"), "operador").unwrap();

    let view = state
        .dashboard_api
        .render_dashboard(&DashboardRequest::default())
        .unwrap();
    match view.panel.unwrap().comparison {
        ComparisonSection::Compared { result, .. } => {
            assert_eq!(result.total_actual_delta_t, 5.0);
        }
        other => panic!("Expected Compared, got {:?}", other),
    }
}

#[test]
fn test_column_rename_that_orphans_stored_reports_is_rejected() {
    let ws = TestWorkspace::new();
    let state = ws.state();
    state
        .config_api
        .update_config(config_keys::EQUIPMENT_COLUMN, "Equipment", "supervisor")
        .unwrap();
    drop(state);

    let state = ws.state();
    let upload = ws.write_upload(
        "hoy.csv",
        "Equipment,Tonelaje Planificado,Tonelaje Real\nEquipA,10,12\n",
    );
    state.import_api.import_and_save(&upload, date("2026-03-05"), "operador").unwrap();

    // 既非当前列名也非默认列名
    assert!(matches!(
        state
            .config_api
            .update_config(config_keys::EQUIPMENT_COLUMN, "Unit", "supervisor"),
        Err(ApiError::ValidationError(_))
    ));

    let state = ws.state();
    assert_eq!(state.report_store.schema().equipment_column, "Equipment");
    assert!(state
        .dashboard_api
        .render_dashboard(&DashboardRequest::default())
        .is_ok());
}

#[test]
fn test_custom_data_dir() {
    let ws = TestWorkspace::new();
    let custom = ws.dir.path().join("archivo");
    ws.state()
        .config_api
        .update_config(config_keys::DATA_DIR, custom.to_str().unwrap(), "supervisor")
        .unwrap();

    let state = ws.state();
    assert_eq!(state.report_store.data_dir(), custom.as_path());
    assert!(custom.is_dir());
}

#[test]
fn test_invalid_updates_are_rejected() {
    let ws = TestWorkspace::new();
    let state = ws.state();

    assert!(matches!(
        state
            .config_api
            .update_config(config_keys::UNCHANGED_TOLERANCE_T, "-0.5", "supervisor"),
        Err(ApiError::ValidationError(_))
    ));
    assert!(matches!(
        state.config_api.update_config(config_keys::LOCALE, "fr", "supervisor"),
        Err(ApiError::ValidationError(_))
    ));
    assert!(state.dashboard_api.list_recent_actions(10).unwrap().is_empty());
}
