// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # RESTCONF 资源处理器
//!
//! | 路径 | 处理器 |
//! |---|---|
//! | `/.well-known/host-meta` | [`host_meta`] |
//! | `{root}` | [`root`] |
//! | `{root}/data` | [`data`]（未实现） |
//! | `{root}/operations` | [`operations`]（未实现） |
//! | `{root}/yang-library-version` | [`yang_library_version`] |

use crate::{
    exception::Exception,
    param::*,
    request::Request,
    resource::{negotiate, respond, HostMeta, RestconfRoot, YangLibraryVersion},
    response::Response,
    router::Router,
};

use log::{debug, info, warn};

/// 构建完整的 RESTCONF 路由表。
///
/// 任何重复注册都会让构建失败，调用方应在开始监听之前终止进程。
pub fn build_router(root: &str) -> Result<Router, Exception> {
    let mut router = Router::new();
    let host_meta_doc = HostMeta::new(root);

    router.register(HOST_META_PATH, move |req: &Request, rsp: &mut Response| {
        host_meta(&host_meta_doc, req, rsp)
    })?;
    router.register(root, self::root)?;
    router.register(&child(root, "data"), data)?;
    router.register(&child(root, "operations"), operations)?;
    router.register(&child(root, "yang-library-version"), yang_library_version)?;

    info!("RESTCONF 路由表构建完成，共{}条路由", router.len());
    Ok(router)
}

/// 根路径下的子资源路径，根为 `/` 时不产生 `//`
fn child(root: &str, name: &str) -> String {
    format!("{}/{}", root.trim_end_matches('/'), name)
}

/// host-meta 发现文档：只接受 GET 与 `application/xrd+xml`
pub fn host_meta(doc: &HostMeta, request: &Request, response: &mut Response) {
    let id = request.id();
    if *request.method() != HttpRequestMethod::Get {
        warn!("[ID{}]host-meta 收到 {} 请求", id, request.method());
        response.exception(&Exception::MethodNotGet);
        return;
    }

    if let Err(e) = negotiate(request, &[MediaType::XrdXml]) {
        warn!("[ID{}]host-meta 的Accept不受支持：{:?}", id, request.accept());
        response.exception(&e);
        return;
    }

    response
        .set_code(200)
        .set_content_type(APPLICATION_XRD_XML)
        .set_body(doc.to_xrd());
}

/// RESTCONF 根资源
pub fn root(request: &Request, response: &mut Response) {
    respond(request, response, &RestconfRoot::default());
}

/// 数据存储资源，尚未实现：返回空的 `200` 响应。
pub fn data(request: &Request, _response: &mut Response) {
    debug!("[ID{}]data 资源尚未实现", request.id());
}

/// 操作资源，尚未实现：返回空的 `200` 响应。
pub fn operations(request: &Request, _response: &mut Response) {
    debug!("[ID{}]operations 资源尚未实现", request.id());
}

pub fn yang_library_version(request: &Request, response: &mut Response) {
    respond(request, response, &YangLibraryVersion::default());
}
