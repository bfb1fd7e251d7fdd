// ==========================================
// 日报驾驶舱 - 图表规格
// ==========================================
// 职责: 计划/实际分组柱状图 + 均值线的渲染模型
// 输出: 可直接交给 Plotly 的 JSON（data + layout）
// ==========================================

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

// ==========================================
// ChartLabels - 图表文案（按语言生成）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartLabels {
    pub title: String,
    pub planned: String,
    pub actual: String,
    pub mean_planned: String,
    pub mean_actual: String,
}

// ==========================================
// ChartSpec - 图表规格
// ==========================================
// 不变量: equipment / planned / actual 等长
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub labels: ChartLabels,
    pub equipment: Vec<String>, // X 轴（设备，首次出现顺序）
    pub planned: Vec<f64>,      // 计划吨位柱
    pub actual: Vec<f64>,       // 实际吨位柱
    pub mean_planned: f64,      // 计划均值线
    pub mean_actual: f64,       // 实际均值线
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    Bar,
    Line,
}

/// 单条数据序列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTrace {
    pub kind: TraceKind,
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
}

impl ChartSpec {
    /// 均值线（与设备轴等长的常量序列）
    pub fn mean_planned_line(&self) -> Vec<f64> {
        vec![self.mean_planned; self.equipment.len()]
    }

    pub fn mean_actual_line(&self) -> Vec<f64> {
        vec![self.mean_actual; self.equipment.len()]
    }

    /// 全部序列: 计划柱、实际柱、计划均值线、实际均值线
    pub fn traces(&self) -> Vec<ChartTrace> {
        vec![
            ChartTrace {
                kind: TraceKind::Bar,
                name: self.labels.planned.clone(),
                x: self.equipment.clone(),
                y: self.planned.clone(),
            },
            ChartTrace {
                kind: TraceKind::Bar,
                name: self.labels.actual.clone(),
                x: self.equipment.clone(),
                y: self.actual.clone(),
            },
            ChartTrace {
                kind: TraceKind::Line,
                name: self.labels.mean_planned.clone(),
                x: self.equipment.clone(),
                y: self.mean_planned_line(),
            },
            ChartTrace {
                kind: TraceKind::Line,
                name: self.labels.mean_actual.clone(),
                x: self.equipment.clone(),
                y: self.mean_actual_line(),
            },
        ]
    }

    /// 导出 Plotly figure JSON（barmode=group）
    pub fn to_plotly_json(&self) -> JsonValue {
        let data: Vec<JsonValue> = self
            .traces()
            .into_iter()
            .map(|trace| match trace.kind {
                TraceKind::Bar => json!({
                    "type": "bar",
                    "name": trace.name,
                    "x": trace.x,
                    "y": trace.y,
                }),
                TraceKind::Line => json!({
                    "type": "scatter",
                    "mode": "lines",
                    "name": trace.name,
                    "x": trace.x,
                    "y": trace.y,
                }),
            })
            .collect();

        json!({
            "data": data,
            "layout": {
                "barmode": "group",
                "title": { "text": self.labels.title },
            },
        })
    }
}
