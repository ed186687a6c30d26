use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid username regex"));

/// 用户名校验（学号或邮箱前缀）
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：3 <= x <= 32
    if username.len() < 3 || username.len() > 32 {
        return Err("用户名长度必须在 3 到 32 个字符之间");
    }
    // 只能包含字母、数字、下划线、点或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("用户名只能包含字母、数字、下划线、点或连字符");
    }
    Ok(())
}

/// 显示名称校验
pub fn validate_display_name(name: &str) -> Result<(), &'static str> {
    let len = name.trim().chars().count();
    if len == 0 || len > 64 {
        return Err("显示名称长度必须在 1 到 64 个字符之间");
    }
    Ok(())
}
