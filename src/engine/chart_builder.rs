// ==========================================
// 日报驾驶舱 - 图表构建引擎
// ==========================================
// 职责: 按设备汇总计划/实际吨位，生成分组柱状图 + 均值线规格
// 输入: DailyReport
// 输出: ChartSpec
// ==========================================

use crate::domain::chart::{ChartLabels, ChartSpec};
use crate::domain::report::DailyReport;
use crate::i18n;
use std::collections::HashMap;
use tracing::instrument;

/// 按设备汇总后的一组
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentTotals {
    pub equipment: String,
    pub planned_t: f64,
    pub actual_t: f64,
}

/// 按设备编号分组求和（保持设备首次出现顺序）
pub fn group_by_equipment(report: &DailyReport) -> Vec<EquipmentTotals> {
    let mut groups: Vec<EquipmentTotals> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in &report.rows {
        match index.get(row.equipment.as_str()) {
            Some(&i) => {
                groups[i].planned_t += row.planned_t;
                groups[i].actual_t += row.actual_t;
            }
            None => {
                index.insert(row.equipment.as_str(), groups.len());
                groups.push(EquipmentTotals {
                    equipment: row.equipment.clone(),
                    planned_t: row.planned_t,
                    actual_t: row.actual_t,
                });
            }
        }
    }

    groups
}

/// 算术平均；空序列返回 0
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

// ==========================================
// ChartBuilder - 图表构建引擎
// ==========================================
pub struct ChartBuilder {
    labels: ChartLabels,
}

impl ChartBuilder {
    /// 按语言生成图表文案
    pub fn new(locale: &str) -> Self {
        Self {
            labels: ChartLabels {
                title: i18n::t(locale, "chart.title"),
                planned: i18n::t(locale, "chart.planned"),
                actual: i18n::t(locale, "chart.actual"),
                mean_planned: i18n::t(locale, "chart.mean_planned"),
                mean_actual: i18n::t(locale, "chart.mean_actual"),
            },
        }
    }

    pub fn with_labels(labels: ChartLabels) -> Self {
        Self { labels }
    }

    /// 构建图表规格
    ///
    /// - 柱: 每设备计划/实际吨位之和
    /// - 线: 各设备汇总值的均值，覆盖整个设备轴
    #[instrument(skip(self, report), fields(rows = report.len()))]
    pub fn build(&self, report: &DailyReport) -> ChartSpec {
        let groups = group_by_equipment(report);

        let equipment: Vec<String> = groups.iter().map(|g| g.equipment.clone()).collect();
        let planned: Vec<f64> = groups.iter().map(|g| g.planned_t).collect();
        let actual: Vec<f64> = groups.iter().map(|g| g.actual_t).collect();

        let mean_planned = mean(&planned);
        let mean_actual = mean(&actual);

        tracing::debug!(
            equipment_count = equipment.len(),
            mean_planned,
            mean_actual,
            "图表规格已生成"
        );

        ChartSpec {
            labels: self.labels.clone(),
            equipment,
            planned,
            actual,
            mean_planned,
            mean_actual,
        }
    }
}

impl Default for ChartBuilder {
    fn default() -> Self {
        Self::new(i18n::DEFAULT_LOCALE)
    }
}
