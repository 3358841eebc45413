// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # RESTCONF 协议参数与常量模块
//!
//! 该模块定义了服务器遵循的 HTTP / RESTCONF 协议相关常量和数据结构，包括：
//! - RESTCONF 资源路径、XML 命名空间以及 yang-library 版本号。
//! - 内容协商所使用的媒体类型（Media Type）。
//! - 常见的 HTTP 状态码及其原因短语（Reason Phrase）。
//! - HTTP 方法与版本的强类型枚举。

use lazy_static::lazy_static;
use std::collections::HashMap;

/// 服务器名称标识，用于 HTTP 响应头的 `Server` 字段
pub const SERVER_NAME: &str = "RESTCONF";

/// 程序版本，用于 `-v` 输出
pub const SERVER_VERSION: &str = "restconf/0.1.0";

/// HTTP 协议规定的换行符（Carriage Return Line Feed）
pub const CRLF: &str = "\r\n";

/// RESTCONF 根资源的默认路径
pub const RESTCONF_PREFIX: &str = "/restconf";

/// host-meta 发现文档的固定路径（RFC 6415）
pub const HOST_META_PATH: &str = "/.well-known/host-meta";

/// `ietf-restconf` 模块的 XML 命名空间
pub const PUBLIC_XMLNS: &str = "urn:ietf:params:xml:ns:yang:ietf-restconf";

/// XRD 文档的 XML 命名空间
pub const XRD_XMLNS: &str = "http://docs.oasis-open.org/ns/xri/xrd-1.0";

/// JSON 编码中根容器的键名（模块名:容器名）
pub const RESTCONF_JSON_ROOT: &str = "ietf-restconf:restconf";

/// 服务器实现的 yang-library 版本（RFC 7895 修订日期）
pub const YANG_LIBRARY_VERSION: &str = "2016-06-21";

/// 默认监听地址，省略主机部分表示监听所有地址
pub const DEFAULT_LISTEN_ADDR: &str = ":408";

pub const APPLICATION_XRD_XML: &str = "application/xrd+xml";
pub const APPLICATION_DATA_XML: &str = "application/yang-data+xml";
pub const APPLICATION_DATA_JSON: &str = "application/yang-data+json";

/// 纯文本错误响应使用的类型
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

lazy_static! {
    /// HTTP 状态码与其对应的标准原因短语映射表。
    ///
    /// 参考标准：[RFC 9110: HTTP Semantics](https://www.rfc-editor.org/rfc/rfc9110.html)。
    /// 只收录本服务器可能产生的状态码。
    pub static ref STATUS_CODES: HashMap<u16, &'static str> = {
        let mut map = HashMap::new();
        map.insert(200, "OK");
        map.insert(204, "No Content");
        map.insert(400, "Bad Request");
        map.insert(404, "Not Found");
        map.insert(405, "Method Not Allowed");
        map.insert(406, "Not Acceptable");
        map.insert(413, "Content Too Large");
        map.insert(415, "Unsupported Media Type");
        map.insert(417, "Expectation Failed");
        map.insert(431, "Request Header Fields Too Large");
        map.insert(500, "Internal Server Error");
        map.insert(501, "Not Implemented");
        map.insert(505, "HTTP Version Not Supported");
        map
    };
}

/// 支持的 HTTP 协议版本
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HttpVersion {
    /// HTTP/1.0 版本
    V1_0,
    /// HTTP/1.1 版本
    V1_1,
}

/// HTTP 请求方法。
///
/// RESTCONF（RFC 8040 第 4 节）用到的方法各有一个变体，其余合法的方法记号保存在 `Other` 中，
/// 交给具体资源决定是否接受。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpRequestMethod {
    Get,
    Head,
    Options,
    Post,
    Put,
    Patch,
    Delete,
    Other(String),
}

impl HttpRequestMethod {
    /// 已知方法不区分大小写；其他记号必须符合 RFC 9110 的 `token` 语法
    pub fn parse(token: &str) -> Option<Self> {
        let method = match token.to_uppercase().as_str() {
            "GET" => HttpRequestMethod::Get,
            "HEAD" => HttpRequestMethod::Head,
            "OPTIONS" => HttpRequestMethod::Options,
            "POST" => HttpRequestMethod::Post,
            "PUT" => HttpRequestMethod::Put,
            "PATCH" => HttpRequestMethod::Patch,
            "DELETE" => HttpRequestMethod::Delete,
            _ if is_token(token) => HttpRequestMethod::Other(token.to_string()),
            _ => return None,
        };
        Some(method)
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

/// 内容协商得到的媒体类型。
///
/// 每个请求单独协商，生命周期不超过一次请求/响应。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// `application/xrd+xml`，仅 host-meta 资源接受
    XrdXml,
    /// `application/yang-data+xml`
    YangDataXml,
    /// `application/yang-data+json`
    YangDataJson,
}

impl MediaType {
    /// 精确匹配 `Accept` 头部的取值，不做 q 值解析或通配符回退。
    pub fn from_accept(accept: &str) -> Option<Self> {
        match accept.trim() {
            APPLICATION_XRD_XML => Some(MediaType::XrdXml),
            APPLICATION_DATA_XML => Some(MediaType::YangDataXml),
            APPLICATION_DATA_JSON => Some(MediaType::YangDataJson),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::XrdXml => APPLICATION_XRD_XML,
            MediaType::YangDataXml => APPLICATION_DATA_XML,
            MediaType::YangDataJson => APPLICATION_DATA_JSON,
        }
    }
}

use std::fmt;

impl fmt::Display for HttpVersion {
    /// 将枚举格式化为 HTTP 报文中的版本字符串
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            HttpVersion::V1_0 => write!(f, "HTTP/1.0"),
            HttpVersion::V1_1 => write!(f, "HTTP/1.1"),
        }
    }
}

impl fmt::Display for HttpRequestMethod {
    /// 将枚举格式化为 HTTP 标准大写方法名
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            HttpRequestMethod::Get => write!(f, "GET"),
            HttpRequestMethod::Head => write!(f, "HEAD"),
            HttpRequestMethod::Options => write!(f, "OPTIONS"),
            HttpRequestMethod::Post => write!(f, "POST"),
            HttpRequestMethod::Put => write!(f, "PUT"),
            HttpRequestMethod::Patch => write!(f, "PATCH"),
            HttpRequestMethod::Delete => write!(f, "DELETE"),
            HttpRequestMethod::Other(ref token) => f.write_str(token),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_exact_match() {
        assert_eq!(
            MediaType::from_accept("application/yang-data+json"),
            Some(MediaType::YangDataJson)
        );
        assert_eq!(
            MediaType::from_accept("application/yang-data+xml"),
            Some(MediaType::YangDataXml)
        );
        assert_eq!(
            MediaType::from_accept(" application/xrd+xml "),
            Some(MediaType::XrdXml)
        );
    }

    #[test]
    fn test_media_type_rejects_lists_and_wildcards() {
        assert_eq!(MediaType::from_accept("*/*"), None);
        assert_eq!(MediaType::from_accept("application/json"), None);
        assert_eq!(
            MediaType::from_accept("application/yang-data+json, application/yang-data+xml"),
            None
        );
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(HttpRequestMethod::parse("get"), Some(HttpRequestMethod::Get));
        assert_eq!(
            HttpRequestMethod::parse("TRACE"),
            Some(HttpRequestMethod::Other("TRACE".to_string()))
        );
        assert_eq!(
            HttpRequestMethod::parse("PROPFIND").map(|m| m.to_string()),
            Some("PROPFIND".to_string())
        );
        for bad in ["", "GE T", "G{ET", "GET/", "\u{4e2d}"] {
            assert_eq!(HttpRequestMethod::parse(bad), None, "{:?}", bad);
        }
    }

    #[test]
    fn test_media_type_display_round_trip() {
        for media in [
            MediaType::XrdXml,
            MediaType::YangDataXml,
            MediaType::YangDataJson,
        ] {
            assert_eq!(MediaType::from_accept(&media.to_string()), Some(media));
        }
    }
}
