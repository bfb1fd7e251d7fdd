// ==========================================
// 日报驾驶舱 - 操作日志领域模型
// ==========================================
// 红线: 所有写入（保存日报/修改配置）必须记录
// 对齐: db.rs action_log 表
// ==========================================

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,               // 日志ID (UUID v4)
    pub action_type: String,             // 操作类型 (存储为字符串)
    pub action_ts: NaiveDateTime,        // 操作时间戳
    pub actor: String,                   // 操作人
    pub report_date: Option<NaiveDate>,  // 关联日报日期（配置修改为 None）
    pub payload_json: Option<JsonValue>, // 操作参数 (JSON)
    pub detail: Option<String>,          // 详细描述
}

impl ActionLog {
    /// 以当前本地时间创建日志
    pub fn new(action_type: ActionType, actor: &str) -> Self {
        // 截断到秒，与落库格式一致
        let now = Local::now().naive_local();
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            action_type: action_type.to_string(),
            action_ts: now.with_nanosecond(0).unwrap_or(now),
            actor: actor.to_string(),
            report_date: None,
            payload_json: None,
            detail: None,
        }
    }

    pub fn with_report_date(mut self, report_date: NaiveDate) -> Self {
        self.report_date = Some(report_date);
        self
    }

    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload_json = Some(payload);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    SaveReport,   // 保存日报
    UpdateConfig, // 修改配置
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::SaveReport => write!(f, "SAVE_REPORT"),
            ActionType::UpdateConfig => write!(f, "UPDATE_CONFIG"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_action_log() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let log = ActionLog::new(ActionType::SaveReport, "operador")
            .with_report_date(date)
            .with_detail("guardado");

        assert_eq!(log.action_type, "SAVE_REPORT");
        assert_eq!(log.actor, "operador");
        assert_eq!(log.report_date, Some(date));
        assert_eq!(log.detail.as_deref(), Some("guardado"));
        assert_eq!(log.action_ts.nanosecond(), 0);
        assert!(uuid::Uuid::parse_str(&log.action_id).is_ok());
    }
}
