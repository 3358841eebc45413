// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # Exception 模块
//!
//! 该模块定义了 RESTCONF 服务器在启动与请求处理生命周期中可能出现的各类异常情况。
//!
//! ## 分类
//! - **配置错误**：重复注册路由，只会在启动阶段出现，服务器不会开始监听。
//! - **客户端错误**：报文无法解析、方法不符、`Accept` 不受支持，对应 `400`；头部过大对应 `431`。
//! - **编码错误**：固定数据序列化失败，对应 `417`。

use std::fmt;

/// 服务器处理请求或构建路由表时发生的异常类型。
#[derive(Debug, Clone, PartialEq)]
pub enum Exception {
    /// 客户端发送的请求字节流无法解析为合法的 UTF-8 字符串。
    RequestIsNotUtf8,
    /// 请求行格式错误（字段数量不足等）。
    MalformedRequestLine,
    /// 请求方法不是合法的 HTTP 方法记号。
    InvalidRequestMethod,
    /// 客户端使用了服务器不支持的 HTTP 协议版本。
    UnsupportedHttpVersion,
    /// 请求头部超出了允许的最大长度。
    RequestTooLarge,
    /// 同一路径被注册了两次。这是编程错误，必须在启动时暴露。
    DuplicateRoute(String),
    /// host-meta 只接受 GET。
    MethodNotGet,
    /// `Accept` 缺失或不是该资源支持的媒体类型。
    AcceptIncorrect,
    /// 资源序列化失败，携带底层错误文本。
    MarshalFailed(String),
}

use Exception::*;

impl Exception {
    /// 该异常映射到的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            RequestTooLarge => 431,
            MarshalFailed(_) => 417,
            DuplicateRoute(_) => 500,
            _ => 400,
        }
    }

    /// 返回给客户端的错误正文
    pub fn message(&self) -> String {
        match self {
            MethodNotGet => "method is not GET!".to_string(),
            AcceptIncorrect => "Accept is incorrect!".to_string(),
            MarshalFailed(e) => format!("Marshal failed!{}", e),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestIsNotUtf8 => write!(f, "Request bytes can't be parsed in UTF-8"),
            MalformedRequestLine => write!(f, "Malformed request line"),
            InvalidRequestMethod => write!(f, "Invalid request method"),
            UnsupportedHttpVersion => write!(f, "Unsupported HTTP version"),
            RequestTooLarge => write!(f, "Request header too large"),
            DuplicateRoute(path) => write!(f, "this handler {} exist!", path),
            MethodNotGet => write!(f, "method is not GET"),
            AcceptIncorrect => write!(f, "Accept is incorrect"),
            MarshalFailed(e) => write!(f, "Marshal failed: {}", e),
        }
    }
}

impl std::error::Error for Exception {}
