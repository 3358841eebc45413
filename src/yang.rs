// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # YANG 模块加载
//!
//! 路由与内容协商并不依赖 YANG 模型的内容，这里只负责启动阶段的模型加载：
//! 1. 把搜索目录（及其包含 `.yang` 文件的子目录）加入搜索路径。
//! 2. 按名字加载模块，由 libyang 完成解析、导入与编译。
//! 3. 汇总加载失败的模块，任何一个失败都会让启动失败。
//! 4. 把已实现的模块转换为 [`SchemaEntry`]。
//!
//! [`ModuleLoader`] 是加载器的接缝，[`DirectoryLoader`] 基于 `yang2` 实现。

use log::{debug, error, info, warn};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};
use yang2::{
    context::{Context, ContextFlags},
    schema::SchemaModule,
};

/// 一个已加载的 YANG 模块
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub namespace: String,
    pub prefix: String,
    /// 最新的修订日期
    pub revision: Option<String>,
}

impl From<&SchemaModule<'_>> for Module {
    fn from(module: &SchemaModule<'_>) -> Self {
        Self {
            name: module.name().to_string(),
            namespace: module.namespace().to_string(),
            prefix: module.prefix().to_string(),
            revision: module.revision().map(str::to_string),
        }
    }
}

/// 模块在模式树中的入口
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    pub name: String,
    pub namespace: String,
    pub prefix: String,
    pub revision: Option<String>,
}

impl From<&Module> for SchemaEntry {
    fn from(module: &Module) -> Self {
        Self {
            name: module.name.clone(),
            namespace: module.namespace.clone(),
            prefix: module.prefix.clone(),
            revision: module.revision.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum YangError {
    /// 搜索路径中没有该模块的文件
    ModuleNotFound(String),
    /// 读取目录失败
    Io { path: PathBuf, message: String },
    /// libyang 上下文无法创建或配置
    Context(String),
    /// 模块文件存在但无法解析、导入或编译
    Load { module: String, reason: String },
}

impl fmt::Display for YangError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YangError::ModuleNotFound(name) => write!(f, "no such module: {}", name),
            YangError::Io { path, message } => write!(f, "{}: {}", path.display(), message),
            YangError::Context(message) => write!(f, "yang context: {}", message),
            YangError::Load { module, reason } => write!(f, "{}: {}", module, reason),
        }
    }
}

impl std::error::Error for YangError {}

/// YANG 模型加载器
#[cfg_attr(test, mockall::automock)]
pub trait ModuleLoader {
    /// 追加一个搜索目录
    fn add_path(&mut self, dir: &Path);

    /// 按名字加载模块（连同它的导入与包含）
    fn load_module(&mut self, name: &str) -> Result<Module, YangError>;

    /// 取出加载过程中积累的全部错误
    fn process(&mut self) -> Vec<YangError>;

    /// 当前已实现的模块，按名字排序
    fn modules(&self) -> Vec<Module>;

    fn to_entry(&self, module: &Module) -> SchemaEntry;
}

/// 基于 libyang 上下文与文件系统搜索路径的加载器
pub struct DirectoryLoader {
    context: Context,
    paths: Vec<PathBuf>,
    failures: Vec<YangError>,
}

impl DirectoryLoader {
    pub fn new() -> Result<Self, YangError> {
        let context = Context::new(ContextFlags::NO_YANGLIBRARY)
            .map_err(|e| YangError::Context(e.to_string()))?;
        Ok(Self {
            context,
            paths: Vec::new(),
            failures: Vec::new(),
        })
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// 搜索路径中是否有 `name.yang` 或 `name@revision.yang`
    fn has_file(&self, name: &str) -> bool {
        let revised_prefix = format!("{}@", name);
        self.paths.iter().any(|dir| {
            if dir.join(format!("{}.yang", name)).is_file() {
                return true;
            }
            let Ok(entries) = fs::read_dir(dir) else {
                return false;
            };
            entries.filter_map(|entry| entry.ok()).any(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .map_or(false, |n| n.starts_with(&revised_prefix) && n.ends_with(".yang"))
            })
        })
    }
}

impl ModuleLoader for DirectoryLoader {
    fn add_path(&mut self, dir: &Path) {
        if self.paths.iter().any(|p| p == dir) {
            return;
        }
        match self.context.set_searchdir(dir) {
            Ok(()) => {
                debug!("YANG 搜索路径：{}", dir.display());
                self.paths.push(dir.to_path_buf());
            }
            Err(e) => warn!("无法添加 YANG 搜索路径 {}：{}", dir.display(), e),
        }
    }

    fn load_module(&mut self, name: &str) -> Result<Module, YangError> {
        if !self.has_file(name) {
            return Err(YangError::ModuleNotFound(name.to_string()));
        }

        let loaded = self
            .context
            .load_module(name, None, &[])
            .map(|module| Module::from(&module));
        match loaded {
            Ok(module) => {
                debug!("已加载 YANG 模块 {}@{}", module.name, module.revision.as_deref().unwrap_or("-"));
                Ok(module)
            }
            Err(e) => {
                let error = YangError::Load {
                    module: name.to_string(),
                    reason: e.to_string(),
                };
                self.failures.push(error.clone());
                Err(error)
            }
        }
    }

    fn process(&mut self) -> Vec<YangError> {
        std::mem::take(&mut self.failures)
    }

    fn modules(&self) -> Vec<Module> {
        let mut modules: Vec<Module> = self
            .context
            .modules(true)
            .filter(|module| module.is_implemented())
            .map(|module| Module::from(&module))
            .collect();
        modules.sort_by(|a, b| a.name.cmp(&b.name));
        modules
    }

    fn to_entry(&self, module: &Module) -> SchemaEntry {
        SchemaEntry::from(module)
    }
}

/// 返回 `root` 及其子目录中所有直接包含 `.yang` 文件的目录，按路径排序
pub fn paths_with_modules(root: &Path) -> Result<Vec<PathBuf>, YangError> {
    let mut found = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = fs::read_dir(&dir).map_err(|e| YangError::Io {
            path: dir.clone(),
            message: e.to_string(),
        })?;
        let mut has_module = false;
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().map_or(false, |ext| ext == "yang") {
                has_module = true;
            }
        }
        if has_module {
            found.push(dir);
        }
    }
    found.sort();
    Ok(found)
}

/// 把每个根目录展开后加入加载器的搜索路径，无法读取的根目录只记录警告
pub fn configure_paths<L: ModuleLoader + ?Sized>(loader: &mut L, roots: &[String]) {
    for root in roots {
        match paths_with_modules(Path::new(root)) {
            Ok(dirs) => {
                for dir in dirs {
                    loader.add_path(&dir);
                }
            }
            Err(e) => warn!("跳过 YANG 搜索路径 {}：{}", root, e),
        }
    }
}

/// 启动阶段的模型加载。
///
/// 单个模块读取失败只记录日志；依赖解析结束后仍有错误则整体失败。
pub fn load_schema<L: ModuleLoader + ?Sized>(
    loader: &mut L,
    names: &[String],
) -> Result<Vec<SchemaEntry>, Vec<YangError>> {
    for name in names {
        if let Err(e) = loader.load_module(name) {
            error!("{}", e);
        }
    }

    let errors = loader.process();
    if !errors.is_empty() {
        for e in &errors {
            error!("{}", e);
        }
        return Err(errors);
    }

    let entries = loader
        .modules()
        .iter()
        .map(|module| {
            info!("models: {}", module.name);
            loader.to_entry(module)
        })
        .collect();
    Ok(entries)
}
