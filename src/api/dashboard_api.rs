// ==========================================
// 日报驾驶舱 - 驾驶舱 API
// ==========================================
// 职责: 选定日期的日报展示、计划/实际图表、日环比分析、操作日志查询
// 架构: API 层 → ReportStore（每次请求全量读取）→ Engine 层
// ==========================================
// 无会话状态: 选定日期由请求显式传入，返回完整视图模型
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::ActionLog;
use crate::domain::chart::ChartSpec;
use crate::domain::comparison::{ComparisonResult, PairingMode};
use crate::domain::report::DailyReport;
use crate::engine::{ChartBuilder, Comparator, DEFAULT_UNCHANGED_TOLERANCE_T};
use crate::i18n;
use crate::repository::{ActionLogRepository, ReportStore};

// ==========================================
// 请求 / 视图模型
// ==========================================

/// 驾驶舱渲染参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSettings {
    pub locale: String,
    pub pairing_mode: PairingMode,
    pub unchanged_tolerance_t: f64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            locale: i18n::DEFAULT_LOCALE.to_string(),
            pairing_mode: PairingMode::default(),
            unchanged_tolerance_t: DEFAULT_UNCHANGED_TOLERANCE_T,
        }
    }
}

/// 驾驶舱请求
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardRequest {
    /// 选定日期；None 时取最近一天
    pub selected_date: Option<NaiveDate>,
}

/// 驾驶舱视图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    /// 可选日期（升序）
    pub available_dates: Vec<NaiveDate>,
    /// 选定日期的面板；无已存日报时为 None
    pub panel: Option<ReportPanel>,
    /// 提示文案（无已存日报时）
    pub notice: Option<String>,
}

/// 单日面板
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPanel {
    pub report_date: NaiveDate,
    /// "Informe del YYYY-MM-DD"
    pub heading: String,
    pub report: DailyReport,
    pub chart: ChartSpec,
    pub comparison: ComparisonSection,
}

/// 日环比区块
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonSection {
    /// 存在更早的已存日报
    Compared {
        previous_date: NaiveDate,
        result: ComparisonResult,
        narrative: String,
        warnings: Vec<String>,
    },
    /// 选定日期是最早一天
    NoPreviousDay { notice: String },
}

// ==========================================
// 视图构建（纯函数）
// ==========================================

/// 由已存日报快照与选定日期构建驾驶舱视图
///
/// # 规则
/// - 无已存日报: 不渲染面板，只给提示
/// - 选定日期缺省: 取最近一天
/// - 选定日期不存在: NotFound
/// - 前一日 = 选定日期之前最近的已存日期（不要求日历上相邻）
pub fn build_dashboard_view(
    reports: &BTreeMap<NaiveDate, DailyReport>,
    selected_date: Option<NaiveDate>,
    settings: &DashboardSettings,
) -> ApiResult<DashboardView> {
    let locale = settings.locale.as_str();
    let available_dates: Vec<NaiveDate> = reports.keys().copied().collect();

    let selected_date = match selected_date.or_else(|| available_dates.last().copied()) {
        Some(date) => date,
        None => {
            return Ok(DashboardView {
                available_dates,
                panel: None,
                notice: Some(i18n::t(locale, "report.no_reports")),
            })
        }
    };

    let report = reports
        .get(&selected_date)
        .ok_or_else(|| ApiError::NotFound(format!("日报(date={})不存在", selected_date)))?;

    let chart = ChartBuilder::new(locale).build(report);

    let comparison = match reports.range(..selected_date).next_back() {
        Some((previous_date, previous)) => {
            let result = Comparator::new(settings.unchanged_tolerance_t).compare_with_mode(
                report,
                previous,
                settings.pairing_mode,
            );
            ComparisonSection::Compared {
                previous_date: *previous_date,
                narrative: result.narrative(locale),
                warnings: result.warnings(locale),
                result,
            }
        }
        None => ComparisonSection::NoPreviousDay {
            notice: i18n::t(locale, "compare.no_previous_day"),
        },
    };

    let date_str = selected_date.format("%Y-%m-%d").to_string();

    Ok(DashboardView {
        available_dates,
        panel: Some(ReportPanel {
            report_date: selected_date,
            heading: i18n::t_with_args(locale, "report.report_of", &[("date", &date_str)]),
            report: report.clone(),
            chart,
            comparison,
        }),
        notice: None,
    })
}

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================

/// 驾驶舱API
///
/// 职责：
/// 1. 日期列表
/// 2. 单日面板（日报 + 图表 + 日环比）
/// 3. 操作日志查询
pub struct DashboardApi {
    report_store: Arc<ReportStore>,
    action_log_repo: Arc<ActionLogRepository>,
    settings: DashboardSettings,
}

impl DashboardApi {
    /// 创建新的DashboardApi实例
    pub fn new(
        report_store: Arc<ReportStore>,
        action_log_repo: Arc<ActionLogRepository>,
        settings: DashboardSettings,
    ) -> Self {
        Self {
            report_store,
            action_log_repo,
            settings,
        }
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    /// 已存日报日期（升序）
    pub fn list_report_dates(&self) -> ApiResult<Vec<NaiveDate>> {
        Ok(self.report_store.list_dates()?)
    }

    /// 渲染驾驶舱
    ///
    /// 每次调用都重新读取文件库
    pub fn render_dashboard(&self, request: &DashboardRequest) -> ApiResult<DashboardView> {
        let reports = self.report_store.load_all()?;
        tracing::debug!(
            stored = reports.len(),
            selected = ?request.selected_date,
            "渲染驾驶舱"
        );

        build_dashboard_view(&reports, request.selected_date, &self.settings)
    }

    /// 查询最近操作
    ///
    /// # 参数
    /// - limit: 返回记录数上限
    pub fn list_recent_actions(&self, limit: i32) -> ApiResult<Vec<ActionLog>> {
        if limit <= 0 || limit > 1000 {
            return Err(ApiError::InvalidInput("limit必须在1-1000之间".to_string()));
        }

        self.action_log_repo
            .find_recent(limit)
            .map_err(|e| ApiError::DatabaseError(e.to_string()))
    }

    /// 查询指定日报日期的操作日志
    pub fn list_actions_for_date(&self, report_date: NaiveDate) -> ApiResult<Vec<ActionLog>> {
        self.action_log_repo
            .find_by_report_date(report_date)
            .map_err(|e| ApiError::DatabaseError(e.to_string()))
    }
}
