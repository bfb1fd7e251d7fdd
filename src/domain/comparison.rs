// ==========================================
// 日报驾驶舱 - 日环比对比结果
// ==========================================
// 职责: 当日 vs 前一日的逐行差值、总差值与趋势分类
// ==========================================

use crate::i18n;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// PairingMode - 行配对方式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingMode {
    /// 按行位置配对（两日设备集合与顺序必须一致，否则结果无意义）
    #[default]
    Positional,
    /// 按设备编号关联，未配对设备单独列出
    ByEquipment,
}

impl PairingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairingMode::Positional => "positional",
            PairingMode::ByEquipment => "by_equipment",
        }
    }
}

impl fmt::Display for PairingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PairingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positional" => Ok(PairingMode::Positional),
            "by_equipment" => Ok(PairingMode::ByEquipment),
            other => Err(format!(
                "未知的配对方式: {}（可选: positional / by_equipment）",
                other
            )),
        }
    }
}

// ==========================================
// DeltaTrend - 实际吨位总差值趋势
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeltaTrend {
    Increase,
    Decrease,
    Unchanged,
}

impl DeltaTrend {
    /// |total| <= tolerance 视为持平
    pub fn classify(total_actual_delta: f64, tolerance: f64) -> Self {
        if total_actual_delta.abs() <= tolerance {
            DeltaTrend::Unchanged
        } else if total_actual_delta > 0.0 {
            DeltaTrend::Increase
        } else {
            DeltaTrend::Decrease
        }
    }
}

// ==========================================
// ComparisonRow - 对比行
// ==========================================
// 前一日缺行时 *_yesterday / diff_* 为 None，不计入总差值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub equipment: String,
    pub planned_today_t: f64,
    pub planned_yesterday_t: Option<f64>,
    pub diff_planned_t: Option<f64>,
    pub actual_today_t: f64,
    pub actual_yesterday_t: Option<f64>,
    pub diff_actual_t: Option<f64>,
}

// ==========================================
// ComparisonResult - 对比结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub pairing_mode: PairingMode,
    pub rows: Vec<ComparisonRow>,
    pub total_planned_delta_t: f64,
    pub total_actual_delta_t: f64,
    pub trend: DeltaTrend,
    /// 按位置配对时设备编号不一致的行下标（0 起）
    pub misaligned_rows: Vec<usize>,
    /// 按设备关联时仅当日存在的设备
    pub unmatched_today: Vec<String>,
    /// 按设备关联时仅前一日存在的设备（按位置配对时为前一日多出的行）
    pub unmatched_yesterday: Vec<String>,
}

impl ComparisonResult {
    /// 日环比结论文案（减少时报告绝对值，保留两位小数）
    pub fn narrative(&self, locale: &str) -> String {
        let tons = format!("{:.2}", self.total_actual_delta_t.abs());
        match self.trend {
            DeltaTrend::Increase => {
                i18n::t_with_args(locale, "compare.increase", &[("tons", &tons)])
            }
            DeltaTrend::Decrease => {
                i18n::t_with_args(locale, "compare.decrease", &[("tons", &tons)])
            }
            DeltaTrend::Unchanged => i18n::t(locale, "compare.unchanged"),
        }
    }

    /// 对齐告警文案（无告警时为空）
    pub fn warnings(&self, locale: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.misaligned_rows.is_empty() {
            // 面向用户的行号从 1 开始
            let rows = self
                .misaligned_rows
                .iter()
                .map(|i| (i + 1).to_string())
                .collect::<Vec<_>>()
                .join(", ");
            warnings.push(i18n::t_with_args(locale, "compare.misaligned", &[("rows", &rows)]));
        }

        if !self.unmatched_today.is_empty() || !self.unmatched_yesterday.is_empty() {
            warnings.push(i18n::t_with_args(
                locale,
                "compare.unmatched",
                &[
                    ("today", &self.unmatched_today.join(", ")),
                    ("yesterday", &self.unmatched_yesterday.join(", ")),
                ],
            ));
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_total(total: f64, trend: DeltaTrend) -> ComparisonResult {
        ComparisonResult {
            pairing_mode: PairingMode::Positional,
            rows: vec![],
            total_planned_delta_t: 0.0,
            total_actual_delta_t: total,
            trend,
            misaligned_rows: vec![],
            unmatched_today: vec![],
            unmatched_yesterday: vec![],
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(DeltaTrend::classify(5.0, 1e-9), DeltaTrend::Increase);
        assert_eq!(DeltaTrend::classify(-0.5, 1e-9), DeltaTrend::Decrease);
        assert_eq!(DeltaTrend::classify(0.0, 1e-9), DeltaTrend::Unchanged);
        assert_eq!(DeltaTrend::classify(-0.0, 0.0), DeltaTrend::Unchanged);
        // 浮点累加噪声
        assert_eq!(
            DeltaTrend::classify(0.1 + 0.2 - 0.3, 1e-9),
            DeltaTrend::Unchanged
        );
    }

    #[test]
    fn test_narrative_reports_absolute_magnitude() {
        let result = result_with_total(-12.345, DeltaTrend::Decrease);
        assert_eq!(
            result.narrative("es"),
            "La producción disminuyó 12.35 toneladas respecto al día anterior."
        );

        let result = result_with_total(3.0, DeltaTrend::Increase);
        assert_eq!(
            result.narrative("en"),
            "Production increased by 3.00 tonnes compared to the previous day."
        );

        let result = result_with_total(0.0, DeltaTrend::Unchanged);
        assert_eq!(
            result.narrative("es"),
            "La producción se mantuvo igual respecto al día anterior."
        );
    }

    #[test]
    fn test_warnings_use_one_based_rows() {
        let mut result = result_with_total(0.0, DeltaTrend::Unchanged);
        assert!(result.warnings("en").is_empty());

        result.misaligned_rows = vec![0, 2];
        let warnings = result.warnings("en");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("1, 3"));
    }

    #[test]
    fn test_pairing_mode_parse() {
        assert_eq!("positional".parse::<PairingMode>().unwrap(), PairingMode::Positional);
        assert_eq!(" BY_EQUIPMENT ".parse::<PairingMode>().unwrap(), PairingMode::ByEquipment);
        assert!("nearest".parse::<PairingMode>().is_err());
        assert_eq!(PairingMode::default().to_string(), "positional");
    }
}
