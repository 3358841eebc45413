use crate::{exception::Exception, param::*, util::format_http_date};

use bytes::Bytes;
use chrono::prelude::*;
use log::error;

/// 一次 HTTP 响应。
///
/// `Server` 与 `Date` 只能通过 [`Response::stamp`] 写入且无法清除，
/// 路由分发器在调用任何处理器之前都会先盖上这两个标头。
#[derive(Debug, Clone)]
pub struct Response {
    version: HttpVersion,
    status_code: u16,
    information: String,
    content_type: Option<String>,
    content_length: u64,
    date: Option<DateTime<Utc>>,
    server_name: Option<String>,
    nosniff: bool,
    content: Option<Bytes>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// 空响应：`200 OK`，无正文。处理器什么都不做时客户端收到的就是它。
    pub fn new() -> Self {
        Self {
            version: HttpVersion::V1_1,
            status_code: 200,
            information: "OK".to_string(),
            content_type: None,
            content_length: 0,
            date: None,
            server_name: None,
            nosniff: false,
            content: None,
        }
    }

    /// 写入服务器标识与当前时间
    pub fn stamp(&mut self) -> &mut Self {
        self.date = Some(Utc::now());
        self.server_name = Some(SERVER_NAME.to_string());
        self
    }

    pub fn set_code(&mut self, code: u16) -> &mut Self {
        self.status_code = code;
        self.information = match STATUS_CODES.get(&code) {
            Some(&info) => info.to_string(),
            None => {
                error!("非法的状态码：{}。这条错误说明代码编写出现了错误。", code);
                "Unknown".to_string()
            }
        };
        self
    }

    pub fn set_content_type(&mut self, content_type: &str) -> &mut Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    /// 设置正文，字节原样写出
    pub fn set_body(&mut self, body: impl Into<Bytes>) -> &mut Self {
        let bytes = body.into();
        self.content_length = bytes.len() as u64;
        self.content = Some(bytes);
        self
    }

    /// 以纯文本形式返回错误，正文为一行错误信息
    pub fn error(&mut self, message: &str, code: u16) -> &mut Self {
        self.nosniff = true;
        self.set_code(code)
            .set_content_type(TEXT_PLAIN)
            .set_body(format!("{}\n", message))
    }

    /// 将异常转换为对应状态码的错误响应
    pub fn exception(&mut self, e: &Exception) -> &mut Self {
        self.error(&e.message(), e.status_code())
    }

    pub fn not_found(&mut self) -> &mut Self {
        self.error("404 page not found", 404)
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        [self.header_bytes().as_slice(), self.body()].concat()
    }

    /// 只有状态行与标头，用于 HEAD 请求
    pub fn header_bytes(&self) -> Vec<u8> {
        let mut header = format!(
            "{} {} {}{}",
            self.version, self.status_code, self.information, CRLF
        );
        if let Some(t) = &self.content_type {
            header.push_str(&["Content-Type: ", t, CRLF].concat());
        }
        if self.nosniff {
            header.push_str(&["X-Content-Type-Options: nosniff", CRLF].concat());
        }
        header.push_str(&["Content-Length: ", &self.content_length.to_string(), CRLF].concat());
        if let Some(date) = &self.date {
            header.push_str(&["Date: ", &format_http_date(date), CRLF].concat());
        }
        if let Some(server) = &self.server_name {
            header.push_str(&["Server: ", server, CRLF].concat());
        }
        header.push_str(CRLF);
        header.into_bytes()
    }
}

impl Response {
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn information(&self) -> &str {
        &self.information
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }

    pub fn date(&self) -> Option<&DateTime<Utc>> {
        self.date.as_ref()
    }

    pub fn body(&self) -> &[u8] {
        match &self.content {
            Some(c) => c,
            None => b"",
        }
    }

    pub fn get_content_length(&self) -> u64 {
        self.content_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_new() {
        let response = Response::new();

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.information(), "OK");
        assert!(response.body().is_empty());
        assert!(response.server_name().is_none());
    }

    #[test]
    fn test_response_as_bytes_basic() {
        let response = Response::new().stamp().to_owned();
        let response_str = String::from_utf8(response.as_bytes()).unwrap();

        assert!(response_str.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response_str.contains("Content-Length: 0\r\n"));
        assert!(response_str.contains("Server: RESTCONF\r\n"));
        assert!(response_str.contains("Date: "));
        assert!(response_str.contains(" GMT\r\n"));
        assert!(!response_str.contains("Content-Type"));
        assert!(response_str.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_response_as_bytes_with_content() {
        let mut response = Response::new();
        response
            .set_content_type(APPLICATION_DATA_JSON)
            .set_body(r#"{"a":1}"#);

        let response_str = String::from_utf8(response.as_bytes()).unwrap();

        assert!(response_str.contains("Content-Type: application/yang-data+json\r\n"));
        assert!(response_str.contains("Content-Length: 7\r\n"));
        assert!(response_str.ends_with("\r\n\r\n{\"a\":1}"));
    }

    #[test]
    fn test_header_bytes_keep_length() {
        let mut response = Response::new();
        response.set_body("hello");
        let head = String::from_utf8(response.header_bytes()).unwrap();
        assert!(head.contains("Content-Length: 5\r\n"));
        assert!(head.ends_with("\r\n\r\n"));
        assert!(!head.contains("hello"));
    }

    #[test]
    fn test_response_error() {
        let mut response = Response::new();
        response.exception(&Exception::AcceptIncorrect);

        assert_eq!(response.status_code(), 400);
        assert_eq!(response.information(), "Bad Request");
        assert_eq!(response.content_type(), Some(TEXT_PLAIN));
        assert_eq!(response.body(), b"Accept is incorrect!\n");
        let response_str = String::from_utf8(response.as_bytes()).unwrap();
        assert!(response_str.contains("X-Content-Type-Options: nosniff\r\n"));
    }

    #[test]
    fn test_response_not_found() {
        let mut response = Response::new();
        response.not_found();
        assert_eq!(response.status_code(), 404);
        assert_eq!(response.body(), b"404 page not found\n");
    }

    #[test]
    fn test_response_status_code_various() {
        for (code, expected_info) in [
            (200, "OK"),
            (400, "Bad Request"),
            (404, "Not Found"),
            (417, "Expectation Failed"),
            (500, "Internal Server Error"),
        ] {
            let mut response = Response::new();
            response.set_code(code);
            assert_eq!(response.status_code(), code);
            assert_eq!(response.information(), expected_info);
        }
    }

    #[test]
    fn test_stamp_survives_later_changes() {
        let mut response = Response::new();
        response.stamp();
        response.error("x", 417).set_body("");
        assert_eq!(response.server_name(), Some(SERVER_NAME));
        assert!(response.date().is_some());
    }
}
