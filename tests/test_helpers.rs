// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供临时工作目录、测试数据库、日报文件生成等功能
// ==========================================

#![allow(dead_code)]

use daily_ops_report::app::AppState;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 默认表头
pub const HEADER: &str = "Equipo,Tonelaje Planificado,Tonelaje Real";

/// 测试工作区（临时目录 + 数据库路径）
///
/// TempDir 需要保持存活，离开作用域时目录被删除
pub struct TestWorkspace {
    pub dir: TempDir,
    pub db_path: String,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("创建临时目录失败");
        let db_path = dir
            .path()
            .join("daily_ops_report.db")
            .to_string_lossy()
            .to_string();
        Self { dir, db_path }
    }

    /// 装配 AppState（每次调用都重新读取配置）
    pub fn state(&self) -> AppState {
        AppState::new(self.db_path.clone()).expect("初始化AppState失败")
    }

    /// 默认日报目录
    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("informes_historicos")
    }

    /// 在工作区写一个上传文件
    pub fn write_upload(&self, name: &str, content: &str) -> String {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("写入上传文件失败");
        path.to_string_lossy().to_string()
    }

    /// 以 (设备, 计划, 实际) 生成 CSV 上传文件
    pub fn write_report_csv(&self, name: &str, rows: &[(&str, f64, f64)]) -> String {
        let mut content = String::from(HEADER);
        content.push('\n');
        for (equipment, planned, actual) in rows {
            content.push_str(&format!("{},{},{}\n", equipment, planned, actual));
        }
        self.write_upload(name, &content)
    }
}

/// 测试夹具路径
pub fn fixture(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .to_string()
}

pub fn date(s: &str) -> chrono::NaiveDate {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("日期格式错误")
}
