// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HTTP 请求处理模块
//!
//! 负责将 TCP 流中读取的原始字节解析为强类型的 `Request` 结构体：
//! 1. 请求行（Request-Line）的解析（方法、路径、版本）。
//! 2. 内容协商及日志需要的标头（`Accept`, `User-Agent`, `Host`）的提取。
//!
//! 请求体不参与路由与内容协商，因此不做解析。

use crate::{exception::Exception, param::*};
use log::error;

/// 表示一个 HTTP 请求的头部元数据。
#[derive(Debug, Clone)]
pub struct Request {
    /// 连接 ID
    id: u128,
    /// HTTP 请求方法
    method: HttpRequestMethod,
    /// 请求目标（包含查询字符串）
    path: String,
    /// 去掉查询字符串并解码后的路径
    uri_path: String,
    /// HTTP 协议版本
    version: HttpVersion,
    /// 客户端标识字符串
    user_agent: String,
    /// `Host` 标头
    host: Option<String>,
    /// 客户端声明可接受的媒体类型，原样保存
    accept: Option<String>,
}

impl Request {
    /// 从原始字节缓冲区尝试构建 `Request` 实例。
    ///
    /// # 参数
    /// * `buffer` - 从网络 Socket 读取的请求头部数据。
    /// * `id` - 连接 ID，用于在多任务环境下追踪日志。
    ///
    /// # 错误处理
    /// 报文不是 UTF-8、请求行不完整、方法或版本不受支持时返回相应的 `Exception`。
    pub fn try_from(buffer: &[u8], id: u128) -> Result<Self, Exception> {
        let request_string = match std::str::from_utf8(buffer) {
            Ok(string) => string,
            Err(_) => {
                error!("[ID{}]无法解析HTTP请求", id);
                return Err(Exception::RequestIsNotUtf8);
            }
        };

        let mut request_lines = request_string.split(CRLF);

        // 1. 请求行 (e.g., "GET /restconf HTTP/1.1")
        let first_line = request_lines.next().unwrap_or_default();
        let first_line_parts: Vec<&str> = first_line.split(' ').filter(|s| !s.is_empty()).collect();
        if first_line_parts.len() != 3 {
            error!("[ID{}]HTTP请求行格式不正确：{}", id, first_line);
            return Err(Exception::MalformedRequestLine);
        }

        let method = match HttpRequestMethod::parse(first_line_parts[0]) {
            Some(method) => method,
            None => {
                error!("[ID{}]非法的HTTP请求方法：{}", id, first_line_parts[0]);
                return Err(Exception::InvalidRequestMethod);
            }
        };

        let version_str = first_line_parts[2].to_uppercase();
        let version = match version_str.as_str() {
            "HTTP/1.1" => HttpVersion::V1_1,
            "HTTP/1.0" => HttpVersion::V1_0,
            _ => {
                error!("[ID{}]不支持的HTTP协议版本：{}", id, &version_str);
                return Err(Exception::UnsupportedHttpVersion);
            }
        };

        let path = first_line_parts[1].to_string();
        let uri_path = match decode_path(&path) {
            Some(decoded) => decoded,
            None => {
                error!("[ID{}]请求路径的百分号编码无法还原为 UTF-8：{}", id, path);
                return Err(Exception::MalformedRequestLine);
            }
        };

        // 2. 迭代各行解析 Headers，空行之后即为请求体
        let mut user_agent = String::new();
        let mut host = None;
        let mut accept = None;
        for line in request_lines {
            if line.is_empty() {
                break;
            }
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match name.trim().to_lowercase().as_str() {
                "user-agent" => user_agent = value.to_string(),
                "host" => host = Some(value.to_string()),
                // 重复的 Accept 只取第一个
                "accept" if accept.is_none() => accept = Some(value.to_string()),
                _ => {}
            }
        }

        Ok(Self {
            id,
            method,
            path,
            uri_path,
            version,
            user_agent,
            host,
            accept,
        })
    }
}

/// 去掉查询字符串与片段后做百分号解码，结果不是 UTF-8 时返回 `None`
fn decode_path(target: &str) -> Option<String> {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    urlencoding::decode(&target[..end])
        .ok()
        .map(|decoded| decoded.into_owned())
}

// --- Getter 访问器实现 ---

impl Request {
    pub fn id(&self) -> u128 {
        self.id
    }

    /// 获取 HTTP 协议版本
    pub fn version(&self) -> &HttpVersion {
        &self.version
    }

    /// 获取请求目标（含查询参数）
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 获取去掉查询字符串与片段、并做过百分号解码的路径，路由以它为准
    pub fn uri_path(&self) -> &str {
        &self.uri_path
    }

    /// 获取请求方法
    pub fn method(&self) -> &HttpRequestMethod {
        &self.method
    }

    /// 获取用户代理字符串
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// 获取客户端声明的 `Accept`
    pub fn accept(&self) -> Option<&str> {
        self.accept.as_deref()
    }
}
