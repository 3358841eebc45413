use chrono::{DateTime, Utc};

/// 规范化请求路径。
///
/// 保证以 `/` 开头，按词法规则折叠重复分隔符、`.` 与 `..`（越过根目录的 `..` 直接丢弃）。
/// 原路径以 `/` 结尾且结果不是根目录时保留结尾的 `/`。
pub fn clean_path(p: &str) -> String {
    if p.is_empty() {
        return "/".to_string();
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in p.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut cleaned = String::with_capacity(p.len() + 1);
    for segment in &segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    if cleaned.is_empty() {
        return "/".to_string();
    }
    if p.ends_with('/') {
        cleaned.push('/');
    }
    cleaned
}

/// 将 `:port` 形式的监听地址补全为监听所有 IPv4 地址，其他形式原样返回
pub fn resolve_listen_addr(addr: &str) -> String {
    let addr = addr.trim();
    match addr.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{}", port),
        None => addr.to_string(),
    }
}

/// RFC 1123 格式的 HTTP 日期，例如 `Mon, 02 Jan 2006 15:04:05 GMT`
pub fn format_http_date(date: &DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn test_clean_path_basic() {
        assert_eq!(clean_path(""), "/");
        assert_eq!(clean_path("/"), "/");
        assert_eq!(clean_path("restconf"), "/restconf");
        assert_eq!(clean_path("/restconf/"), "/restconf/");
        assert_eq!(clean_path("//restconf///data"), "/restconf/data");
    }

    #[test]
    fn test_clean_path_dots() {
        assert_eq!(clean_path("/restconf/./data"), "/restconf/data");
        assert_eq!(clean_path("/restconf/data/../operations"), "/restconf/operations");
        assert_eq!(clean_path("/../../restconf"), "/restconf");
        assert_eq!(clean_path("/restconf/.."), "/");
        assert_eq!(clean_path("/restconf/../"), "/");
        assert_eq!(clean_path("/a/b/../../c/"), "/c/");
    }

    #[test]
    fn test_clean_path_keeps_dotted_names() {
        assert_eq!(clean_path("/.well-known/host-meta"), "/.well-known/host-meta");
        assert_eq!(clean_path("/a/...b/"), "/a/...b/");
    }

    #[test]
    fn test_resolve_listen_addr() {
        assert_eq!(resolve_listen_addr(":408"), "0.0.0.0:408");
        assert_eq!(resolve_listen_addr("127.0.0.1:8080"), "127.0.0.1:8080");
        assert_eq!(resolve_listen_addr(" localhost:1 "), "localhost:1");
    }

    #[test]
    fn test_format_http_date() {
        let date = Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap();
        assert_eq!(format_http_date(&date), "Mon, 02 Jan 2006 15:04:05 GMT");
    }

    proptest! {
        #[test]
        fn prop_clean_path_is_rooted_and_idempotent(p in "[a-z./]{0,24}") {
            let cleaned = clean_path(&p);
            prop_assert!(cleaned.starts_with('/'));
            prop_assert!(!cleaned.contains("//"));
            prop_assert_eq!(clean_path(&cleaned), cleaned.clone());
            for segment in cleaned.split('/') {
                prop_assert!(segment != "." && segment != "..");
            }
        }
    }
}
