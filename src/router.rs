// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 路由注册表与分发器
//!
//! 路由表在启动时构建一次，之后只读，以 `Arc<Router>` 在各连接任务之间共享，无需加锁。
//!
//! ## 匹配规则
//! 1. 百分号解码后规范化请求路径（见 [`clean_path`]）。
//! 2. 精确匹配。
//! 3. 前缀匹配：按路径长度从长到短（等长按字典序）扫描，取第一个是请求路径字符串前缀的路由。
//! 4. 都不匹配时返回 404。
//!
//! 无论命中哪个处理器，响应都会先盖上 `Server` 与 `Date`。

use crate::{exception::Exception, request::Request, response::Response, util::clean_path};

use log::{debug, warn};
use std::{collections::HashMap, sync::Arc};

/// 资源处理器。处理器只能写入状态码、类型与正文。
pub type Handler = Arc<dyn Fn(&Request, &mut Response) + Send + Sync>;

#[derive(Default)]
pub struct Router {
    routes: HashMap<String, Handler>,
    /// 前缀扫描顺序：长度降序，等长按字典序
    prefixes: Vec<String>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一条路由。同一路径重复注册返回 `Exception::DuplicateRoute`。
    pub fn register<F>(&mut self, path: &str, handler: F) -> Result<(), Exception>
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        if self.routes.contains_key(path) {
            return Err(Exception::DuplicateRoute(path.to_string()));
        }
        self.routes.insert(path.to_string(), Arc::new(handler));
        self.prefixes.push(path.to_string());
        self.prefixes
            .sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        debug!("路由已注册：{}", path);
        Ok(())
    }

    /// 为规范化后的路径查找处理器，返回命中的路由路径与处理器
    pub fn resolve(&self, path: &str) -> Option<(&str, &Handler)> {
        if let Some((route, handler)) = self.routes.get_key_value(path) {
            return Some((route.as_str(), handler));
        }
        self.prefixes
            .iter()
            .find(|prefix| path.starts_with(prefix.as_str()))
            .and_then(|prefix| self.routes.get_key_value(prefix))
            .map(|(route, handler)| (route.as_str(), handler))
    }

    /// 分发一个请求并返回完整的响应
    pub fn dispatch(&self, request: &Request) -> Response {
        let id = request.id();
        let path = clean_path(request.uri_path());

        let mut response = Response::new();
        response.stamp();

        match self.resolve(&path) {
            Some((route, handler)) => {
                debug!("[ID{}]路径 {} 命中路由 {}", id, path, route);
                handler(request, &mut response);
            }
            None => {
                warn!("[ID{}]请求的路径：{} 不存在，返回404", id, path);
                response.not_found();
            }
        }
        response
    }

    /// 按扫描顺序列出已注册的路径
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
