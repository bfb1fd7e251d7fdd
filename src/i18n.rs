// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持西班牙语（默认，日报源语言）、英文、中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 注意: 所有翻译函数显式传入 locale，不依赖全局语言设置
// ==========================================

/// 默认语言（日报源文件的语言）
pub const DEFAULT_LOCALE: &str = "es";

/// 支持的语言列表
pub const SUPPORTED_LOCALES: &[&str] = &["es", "en", "zh-CN"];

/// 判断语言代码是否受支持
pub fn is_supported_locale(locale: &str) -> bool {
    SUPPORTED_LOCALES.contains(&locale)
}

/// 规范化语言代码，不支持的语言回退到默认语言
pub fn normalize_locale(locale: &str) -> &'static str {
    let trimmed = locale.trim();
    SUPPORTED_LOCALES
        .iter()
        .find(|l| l.eq_ignore_ascii_case(trimmed))
        .copied()
        .unwrap_or(DEFAULT_LOCALE)
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use daily_ops_report::i18n::t;
/// let msg = t("es", "common.success");
/// ```
pub fn t(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = normalize_locale(locale)).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use daily_ops_report::i18n::t_with_args;
/// let msg = t_with_args("en", "import.file_not_found", &[("path", "/tmp/test.csv")]);
/// ```
pub fn t_with_args(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    let mut result = t(locale, key);
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
