// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 连接处理与监听循环
//!
//! 每个 TCP 连接由一个独立的 Tokio 任务处理：读取请求头部、解析、分发、写回响应后关闭连接。
//! 路由表以 `Arc<Router>` 共享，只读。

use crate::{
    config::Config, exception::Exception, param::HttpRequestMethod, request::Request,
    response::Response, router::Router,
};

use log::{debug, error, info, warn};
use std::{
    future::Future,
    io,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::TcpListener,
    time::timeout,
};

/// 单个连接的资源上限
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    /// 请求头部的最大字节数，超出返回 `431`
    pub max_request_size: usize,
    /// 读取完整请求头部的期限，超时直接关闭连接
    pub read_timeout: Duration,
}

impl Default for Limits {
    fn default() -> Self {
        Self::from(&Config::new())
    }
}

impl From<&Config> for Limits {
    fn from(config: &Config) -> Self {
        Self {
            max_request_size: config.max_request_size(),
            read_timeout: config.read_timeout(),
        }
    }
}

/// 请求头部的读取结果
#[derive(Debug, PartialEq)]
enum Head {
    Complete(Vec<u8>),
    /// 客户端在发送完整头部之前关闭了连接
    Closed,
    TooLarge,
}

/// 读取直到空行（`\r\n\r\n`）为止
async fn read_head<S>(stream: &mut S, limit: usize) -> io::Result<Head>
where
    S: AsyncRead + Unpin,
{
    let mut buffer = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(Head::Closed);
        }
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(end) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            buffer.truncate(end + 4);
            return Ok(Head::Complete(buffer));
        }
        if buffer.len() > limit {
            return Ok(Head::TooLarge);
        }
    }
}

/// 由服务器自身产生的错误响应，同样带上 `Server` 与 `Date`
fn rejection(e: &Exception) -> Response {
    let mut response = Response::new();
    response.stamp().exception(e);
    response
}

/// # 连接处理器
///
/// 负责单个连接的生命周期：读取解析请求、路由分发、发送响应。
pub async fn handle_connection<S>(stream: &mut S, id: u128, router: &Router, limits: Limits)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let head = match timeout(limits.read_timeout, read_head(stream, limits.max_request_size)).await
    {
        Ok(Ok(head)) => head,
        Ok(Err(e)) => {
            error!("[ID{}]读取TCPStream时遇到错误: {}", id, e);
            return;
        }
        Err(_) => {
            warn!(
                "[ID{}]{}ms内未收到完整的请求头部，关闭连接",
                id,
                limits.read_timeout.as_millis()
            );
            return;
        }
    };

    let start_time = Instant::now();
    let (response, headonly) = match head {
        Head::Closed => {
            debug!("[ID{}]客户端在请求完成前关闭了连接", id);
            return;
        }
        Head::TooLarge => {
            warn!("[ID{}]请求头部超过{}字节，返回431", id, limits.max_request_size);
            (rejection(&Exception::RequestTooLarge), false)
        }
        Head::Complete(buffer) => match Request::try_from(&buffer, id) {
            Ok(request) => {
                debug!("[ID{}]成功解析HTTP请求", id);
                let response = router.dispatch(&request);
                info!(
                    "[ID{}] {}, {}, {}, {}, {}, {}",
                    id,
                    request.version(),
                    request.path(),
                    request.method(),
                    response.status_code(),
                    response.information(),
                    request.user_agent(),
                );
                (response, *request.method() == HttpRequestMethod::Head)
            }
            Err(e) => {
                warn!("[ID{}]解析HTTP请求失败: {}，返回{}", id, e, e.status_code());
                (rejection(&e), false)
            }
        },
    };

    debug!(
        "[ID{}]HTTP响应构建完成，服务端用时{}ms。",
        id,
        start_time.elapsed().as_millis()
    );

    let bytes = match headonly {
        true => response.header_bytes(),
        false => response.as_bytes(),
    };
    debug!("[ID{}]发送响应，长度: {}", id, bytes.len());
    if let Err(e) = stream.write_all(&bytes).await {
        error!("[ID{}]发送响应失败: {}", id, e);
        return;
    }
    let _ = stream.flush().await;
    let _ = stream.shutdown().await;
}

/// # 主事件循环 (Accept Loop)
///
/// 持续接收新连接并分发给独立任务，`shutdown` 完成后停止接收。
pub async fn serve<F>(
    listener: TcpListener,
    router: Arc<Router>,
    limits: Limits,
    shutdown: F,
) where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut id: u128 = 0;

    loop {
        let (mut stream, addr) = tokio::select! {
            _ = &mut shutdown => {
                info!("主循环接收到停机指令，正在退出...");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    error!("接受连接失败：{}", e);
                    continue;
                }
            },
        };
        debug!("[ID{}]新的连接：{}", id, addr);

        let router = Arc::clone(&router);
        tokio::spawn(async move {
            handle_connection(&mut stream, id, &router, limits).await;
        });
        id += 1;
    }
}
