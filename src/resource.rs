// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # RESTCONF 资源表示与编码模块
//!
//! 每种资源先构建一个与格式无关的规范表示，再通过两个显式的映射函数
//! （表示 → XML 字节、表示 → JSON 字节）完成序列化：
//! - XML 由 `quick-xml` 的事件写入器生成，顶层元素带 `xmlns` 属性。
//! - JSON 由 `serde_json` 生成，不携带任何命名空间属性。
//!
//! host-meta 是例外：它的 XRD 正文是手写的固定片段。

use crate::{exception::Exception, param::*, request::Request, response::Response};

use log::{debug, warn};
use quick_xml::{
    events::{BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use serde_json::{json, Map, Value};

/// 可在 XML 与 JSON 之间无损切换的资源表示。
pub trait Representation {
    /// XML 元素名
    fn name(&self) -> &'static str;

    /// 顶层 JSON 键，默认与元素名相同
    fn json_key(&self) -> &'static str {
        self.name()
    }

    /// 写出元素内部的内容（子元素或文本），不含元素自身的起止标签
    fn write_xml_content(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), Exception>;

    /// 键值对应的 JSON 值
    fn json_content(&self) -> Value;

    fn to_xml(&self) -> Result<Vec<u8>, Exception> {
        let mut writer = Writer::new(Vec::new());
        write_element(&mut writer, self, Some(PUBLIC_XMLNS))?;
        Ok(writer.into_inner())
    }

    fn to_json(&self) -> Result<Vec<u8>, Exception> {
        let mut object = Map::new();
        object.insert(self.json_key().to_string(), self.json_content());
        serde_json::to_vec(&Value::Object(object)).map_err(marshal_failed)
    }

    /// 按协商结果选择映射函数
    fn encode(&self, media: MediaType) -> Result<Vec<u8>, Exception> {
        match media {
            MediaType::YangDataXml => self.to_xml(),
            MediaType::YangDataJson => self.to_json(),
            MediaType::XrdXml => Err(Exception::AcceptIncorrect),
        }
    }
}

fn marshal_failed<E: std::fmt::Display>(e: E) -> Exception {
    Exception::MarshalFailed(e.to_string())
}

/// 写出一个完整元素，`xmlns` 只出现在调用方指定的位置
fn write_element<R: Representation + ?Sized>(
    writer: &mut Writer<Vec<u8>>,
    resource: &R,
    xmlns: Option<&str>,
) -> Result<(), Exception> {
    let mut start = BytesStart::new(resource.name());
    if let Some(ns) = xmlns {
        start.push_attribute(("xmlns", ns));
    }
    writer.write_event(Event::Start(start)).map_err(marshal_failed)?;
    resource.write_xml_content(writer)?;
    writer
        .write_event(Event::End(BytesEnd::new(resource.name())))
        .map_err(marshal_failed)?;
    Ok(())
}

/// `data` 资源，目前没有内容
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Data;

/// `operations` 资源，目前没有内容
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Operations;

impl Representation for Data {
    fn name(&self) -> &'static str {
        "data"
    }

    fn write_xml_content(&self, _writer: &mut Writer<Vec<u8>>) -> Result<(), Exception> {
        Ok(())
    }

    fn json_content(&self) -> Value {
        json!({})
    }
}

impl Representation for Operations {
    fn name(&self) -> &'static str {
        "operations"
    }

    fn write_xml_content(&self, _writer: &mut Writer<Vec<u8>>) -> Result<(), Exception> {
        Ok(())
    }

    fn json_content(&self) -> Value {
        json!({})
    }
}

/// yang-library 版本资源（RFC 8040 3.3.3）
#[derive(Debug, Clone, PartialEq)]
pub struct YangLibraryVersion {
    pub version: String,
}

impl Default for YangLibraryVersion {
    fn default() -> Self {
        Self {
            version: YANG_LIBRARY_VERSION.to_string(),
        }
    }
}

impl Representation for YangLibraryVersion {
    fn name(&self) -> &'static str {
        "yang-library-version"
    }

    fn write_xml_content(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), Exception> {
        writer
            .write_event(Event::Text(BytesText::new(&self.version)))
            .map_err(marshal_failed)
    }

    fn json_content(&self) -> Value {
        Value::String(self.version.clone())
    }
}

/// RESTCONF 根资源，由三个可独立序列化的子资源组成。
///
/// JSON 形式按 RFC 8040 的约定嵌套在 `ietf-restconf:restconf` 键下，
/// XML 形式是带命名空间的 `<restconf>` 元素。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestconfRoot {
    pub data: Data,
    pub operations: Operations,
    pub yang_library_version: YangLibraryVersion,
}

impl Representation for RestconfRoot {
    fn name(&self) -> &'static str {
        "restconf"
    }

    fn json_key(&self) -> &'static str {
        RESTCONF_JSON_ROOT
    }

    fn write_xml_content(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), Exception> {
        write_element(writer, &self.data, None)?;
        write_element(writer, &self.operations, None)?;
        write_element(writer, &self.yang_library_version, None)
    }

    fn json_content(&self) -> Value {
        let mut object = Map::new();
        for (key, value) in [
            (self.data.json_key(), self.data.json_content()),
            (self.operations.json_key(), self.operations.json_content()),
            (
                self.yang_library_version.json_key(),
                self.yang_library_version.json_content(),
            ),
        ] {
            object.insert(key.to_string(), value);
        }
        Value::Object(object)
    }
}

/// host-meta 发现文档（RFC 6415），指向 RESTCONF 根路径
#[derive(Debug, Clone, PartialEq)]
pub struct HostMeta {
    pub root: String,
}

impl HostMeta {
    pub fn new(root: &str) -> Self {
        Self {
            root: root.to_string(),
        }
    }

    /// 手写的 XRD 正文
    pub fn to_xrd(&self) -> Vec<u8> {
        format!(
            "<XRD xmlns='{}'>\n    <Link rel='restconf' href='{}'/>\n</XRD>",
            XRD_XMLNS, self.root
        )
        .into_bytes()
    }
}

/// 从请求的 `Accept` 中协商出该资源支持的媒体类型
pub fn negotiate(request: &Request, supported: &[MediaType]) -> Result<MediaType, Exception> {
    request
        .accept()
        .and_then(MediaType::from_accept)
        .filter(|media| supported.contains(media))
        .ok_or(Exception::AcceptIncorrect)
}

/// 统一的资源编码流程：协商、构建、序列化、写出。
///
/// 任何一步失败都会就地转为错误响应，不会有部分输出。
pub fn respond<R: Representation>(request: &Request, response: &mut Response, resource: &R) {
    let id = request.id();
    let media = match negotiate(request, &[MediaType::YangDataXml, MediaType::YangDataJson]) {
        Ok(media) => media,
        Err(e) => {
            warn!("[ID{}]{} 的Accept不受支持：{:?}", id, resource.name(), request.accept());
            response.exception(&e);
            return;
        }
    };

    match resource.encode(media) {
        Ok(body) => {
            debug!("[ID{}]{} 以 {} 编码，长度 {}", id, resource.name(), media, body.len());
            response
                .set_code(200)
                .set_content_type(media.as_str())
                .set_body(body);
        }
        Err(e) => {
            warn!("[ID{}]{} 序列化失败：{}", id, resource.name(), e);
            response.exception(&e);
        }
    }
}
