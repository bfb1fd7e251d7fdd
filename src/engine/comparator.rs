// ==========================================
// 日报驾驶舱 - 日环比对比引擎
// ==========================================
// 职责: 当日 vs 前一日逐行差值、总差值与趋势分类
// 输入: 当日 DailyReport + 前一日 DailyReport
// 输出: ComparisonResult
// ==========================================
// 默认按行位置配对：第 i 行与第 i 行相减，不做设备关联。
// 位置配对下设备不一致的行只告警，不纠正。
// ==========================================

use crate::domain::comparison::{ComparisonResult, ComparisonRow, DeltaTrend, PairingMode};
use crate::domain::report::DailyReport;
use crate::engine::chart_builder::group_by_equipment;
use std::collections::{HashMap, HashSet};
use tracing::{instrument, warn};

/// 默认持平容差（吨）: 总差值严格为 0 才算持平；浮点噪声容差需显式配置
pub const DEFAULT_UNCHANGED_TOLERANCE_T: f64 = 0.0;

// ==========================================
// Comparator - 日环比对比引擎
// ==========================================
pub struct Comparator {
    unchanged_tolerance_t: f64,
}

impl Comparator {
    /// 创建对比引擎；负数或非有限容差按 0 处理
    pub fn new(unchanged_tolerance_t: f64) -> Self {
        let tolerance = if unchanged_tolerance_t.is_finite() && unchanged_tolerance_t > 0.0 {
            unchanged_tolerance_t
        } else {
            0.0
        };
        Self {
            unchanged_tolerance_t: tolerance,
        }
    }

    pub fn unchanged_tolerance_t(&self) -> f64 {
        self.unchanged_tolerance_t
    }

    /// 按指定方式对比
    pub fn compare_with_mode(
        &self,
        today: &DailyReport,
        yesterday: &DailyReport,
        mode: PairingMode,
    ) -> ComparisonResult {
        match mode {
            PairingMode::Positional => self.compare(today, yesterday),
            PairingMode::ByEquipment => self.compare_by_equipment(today, yesterday),
        }
    }

    /// 按行位置对比
    ///
    /// - 结果行数 = 当日行数，设备编号取自当日
    /// - 前一日行数不足时，多出的当日行差值为 None，不计入总差值
    /// - 前一日多出的行丢弃，设备编号记入 unmatched_yesterday
    #[instrument(skip(self, today, yesterday), fields(today_rows = today.len(), yesterday_rows = yesterday.len()))]
    pub fn compare(&self, today: &DailyReport, yesterday: &DailyReport) -> ComparisonResult {
        let mut rows = Vec::with_capacity(today.len());
        let mut misaligned_rows = Vec::new();

        for (i, t) in today.rows.iter().enumerate() {
            match yesterday.rows.get(i) {
                Some(y) => {
                    if y.equipment != t.equipment {
                        misaligned_rows.push(i);
                    }
                    rows.push(ComparisonRow {
                        equipment: t.equipment.clone(),
                        planned_today_t: t.planned_t,
                        planned_yesterday_t: Some(y.planned_t),
                        diff_planned_t: Some(t.planned_t - y.planned_t),
                        actual_today_t: t.actual_t,
                        actual_yesterday_t: Some(y.actual_t),
                        diff_actual_t: Some(t.actual_t - y.actual_t),
                    });
                }
                None => rows.push(unpaired_today_row(&t.equipment, t.planned_t, t.actual_t)),
            }
        }

        let unmatched_yesterday: Vec<String> = yesterday
            .rows
            .iter()
            .skip(today.len())
            .map(|r| r.equipment.clone())
            .collect();

        if !misaligned_rows.is_empty() || today.len() != yesterday.len() {
            warn!(
                misaligned = misaligned_rows.len(),
                today_rows = today.len(),
                yesterday_rows = yesterday.len(),
                "两日设备行未对齐，按位置配对的差值可能无意义"
            );
        }

        self.finish(
            PairingMode::Positional,
            rows,
            misaligned_rows,
            Vec::new(),
            unmatched_yesterday,
        )
    }

    /// 按设备编号关联对比
    ///
    /// - 两日各自按设备汇总（重复设备求和），行顺序为当日设备首次出现顺序
    /// - 仅当日存在的设备差值为 None
    /// - 仅前一日存在的设备记入 unmatched_yesterday
    #[instrument(skip(self, today, yesterday), fields(today_rows = today.len(), yesterday_rows = yesterday.len()))]
    pub fn compare_by_equipment(
        &self,
        today: &DailyReport,
        yesterday: &DailyReport,
    ) -> ComparisonResult {
        let today_groups = group_by_equipment(today);
        let yesterday_groups = group_by_equipment(yesterday);

        let yesterday_index: HashMap<&str, (f64, f64)> = yesterday_groups
            .iter()
            .map(|g| (g.equipment.as_str(), (g.planned_t, g.actual_t)))
            .collect();

        let mut rows = Vec::with_capacity(today_groups.len());
        let mut unmatched_today = Vec::new();

        for t in &today_groups {
            match yesterday_index.get(t.equipment.as_str()) {
                Some(&(planned_y, actual_y)) => rows.push(ComparisonRow {
                    equipment: t.equipment.clone(),
                    planned_today_t: t.planned_t,
                    planned_yesterday_t: Some(planned_y),
                    diff_planned_t: Some(t.planned_t - planned_y),
                    actual_today_t: t.actual_t,
                    actual_yesterday_t: Some(actual_y),
                    diff_actual_t: Some(t.actual_t - actual_y),
                }),
                None => {
                    unmatched_today.push(t.equipment.clone());
                    rows.push(unpaired_today_row(&t.equipment, t.planned_t, t.actual_t));
                }
            }
        }

        let today_ids: HashSet<&str> = today_groups.iter().map(|g| g.equipment.as_str()).collect();
        let unmatched_yesterday: Vec<String> = yesterday_groups
            .iter()
            .filter(|g| !today_ids.contains(g.equipment.as_str()))
            .map(|g| g.equipment.clone())
            .collect();

        if !unmatched_today.is_empty() || !unmatched_yesterday.is_empty() {
            warn!(
                unmatched_today = unmatched_today.len(),
                unmatched_yesterday = unmatched_yesterday.len(),
                "存在未配对设备"
            );
        }

        self.finish(
            PairingMode::ByEquipment,
            rows,
            Vec::new(),
            unmatched_today,
            unmatched_yesterday,
        )
    }

    fn finish(
        &self,
        pairing_mode: PairingMode,
        rows: Vec<ComparisonRow>,
        misaligned_rows: Vec<usize>,
        unmatched_today: Vec<String>,
        unmatched_yesterday: Vec<String>,
    ) -> ComparisonResult {
        let total_planned_delta_t: f64 = rows.iter().filter_map(|r| r.diff_planned_t).sum();
        let total_actual_delta_t: f64 = rows.iter().filter_map(|r| r.diff_actual_t).sum();
        let trend = DeltaTrend::classify(total_actual_delta_t, self.unchanged_tolerance_t);

        tracing::debug!(
            mode = %pairing_mode,
            total_actual_delta_t,
            ?trend,
            "日环比对比完成"
        );

        ComparisonResult {
            pairing_mode,
            rows,
            total_planned_delta_t,
            total_actual_delta_t,
            trend,
            misaligned_rows,
            unmatched_today,
            unmatched_yesterday,
        }
    }
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new(DEFAULT_UNCHANGED_TOLERANCE_T)
    }
}

fn unpaired_today_row(equipment: &str, planned_t: f64, actual_t: f64) -> ComparisonRow {
    ComparisonRow {
        equipment: equipment.to_string(),
        planned_today_t: planned_t,
        planned_yesterday_t: None,
        diff_planned_t: None,
        actual_today_t: actual_t,
        actual_yesterday_t: None,
        diff_actual_t: None,
    }
}
