use num_cpus;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use log::{error, warn};
use std::{fs, time::Duration};

use crate::param::{DEFAULT_LISTEN_ADDR, RESTCONF_PREFIX};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_addr")]
    addr: String,
    #[serde(default)]
    worker_threads: usize,
    #[serde(default = "default_restconf_root")]
    restconf_root: String,
    #[serde(default = "default_yang_path")]
    yang_path: Vec<String>,
    #[serde(default = "default_yang_modules")]
    yang_modules: Vec<String>,
    #[serde(default = "default_max_request_size")]
    max_request_size: usize,
    #[serde(default = "default_read_timeout_secs")]
    read_timeout_secs: u64,
}

fn default_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

fn default_restconf_root() -> String {
    RESTCONF_PREFIX.to_string()
}

fn default_yang_path() -> Vec<String> {
    vec!["./models".to_string()]
}

fn default_yang_modules() -> Vec<String> {
    vec!["base".to_string()]
}

fn default_max_request_size() -> usize {
    8192 // 8KB
}

fn default_read_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            addr: default_addr(),
            worker_threads: 0,
            restconf_root: default_restconf_root(),
            yang_path: default_yang_path(),
            yang_modules: default_yang_modules(),
            max_request_size: default_max_request_size(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }

    /// 从 TOML 文件读取配置。文件缺失或格式错误时使用默认配置。
    pub fn from_toml(filename: &str) -> Self {
        let raw_config = match fs::read_to_string(filename) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) => {
                warn!("无法读取配置文件{}：{}，使用默认配置", filename, e);
                Config::new()
            }
        };
        raw_config.normalized()
    }

    pub fn from_toml_str(text: &str) -> Self {
        match toml::from_str::<Config>(text) {
            Ok(config) => config.normalized(),
            Err(e) => {
                error!("无法成功从配置文件构建配置对象，使用默认配置：{}", e);
                Config::new().normalized()
            }
        }
    }

    fn normalized(mut self) -> Self {
        if self.worker_threads == 0 {
            self.worker_threads = num_cpus::get();
        }
        if !self.restconf_root.starts_with('/') {
            self.restconf_root.insert(0, '/');
        }
        while self.restconf_root.len() > 1 && self.restconf_root.ends_with('/') {
            self.restconf_root.pop();
        }
        if self.max_request_size < 1024 {
            warn!("max_request_size过小，将被改为1024。");
            self.max_request_size = 1024;
        }
        if self.read_timeout_secs == 0 {
            warn!("read_timeout_secs不能为0，将被改为{}。", default_read_timeout_secs());
            self.read_timeout_secs = default_read_timeout_secs();
        }
        self
    }

    /// 命令行指定的监听地址优先于配置文件
    pub fn with_addr(mut self, addr: Option<String>) -> Self {
        if let Some(addr) = addr {
            self.addr = addr;
        }
        self
    }
}

impl Config {
    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    pub fn restconf_root(&self) -> &str {
        &self.restconf_root
    }

    pub fn yang_path(&self) -> &[String] {
        &self.yang_path
    }

    pub fn yang_modules(&self) -> &[String] {
        &self.yang_modules
    }

    pub fn max_request_size(&self) -> usize {
        self.max_request_size
    }

    /// 读取完整请求头部的期限
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("");
        assert_eq!(config.addr(), ":408");
        assert_eq!(config.restconf_root(), "/restconf");
        assert_eq!(config.yang_path(), ["./models".to_string()]);
        assert_eq!(config.yang_modules(), ["base".to_string()]);
        assert_eq!(config.max_request_size(), 8192);
        assert_eq!(config.read_timeout(), Duration::from_secs(30));
        assert!(config.worker_threads() > 0);
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
addr = "127.0.0.1:8408"
worker_threads = 2
restconf_root = "api/restconf/"
yang_path = ["./models", "/usr/share/yang"]
yang_modules = ["base", "ietf-interfaces"]
"#
        )
        .unwrap();

        let config = Config::from_toml(file.path().to_str().unwrap());
        assert_eq!(config.addr(), "127.0.0.1:8408");
        assert_eq!(config.worker_threads(), 2);
        assert_eq!(config.restconf_root(), "/api/restconf");
        assert_eq!(config.yang_path().len(), 2);
        assert_eq!(config.yang_modules()[1], "ietf-interfaces");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::from_toml("/definitely/not/here.toml");
        assert_eq!(config.addr(), ":408");
    }

    #[test]
    fn test_malformed_toml_uses_defaults() {
        let config = Config::from_toml_str("addr = [");
        assert_eq!(config.restconf_root(), "/restconf");
    }

    #[test]
    fn test_cli_addr_overrides() {
        let config = Config::new().with_addr(Some(":9000".to_string()));
        assert_eq!(config.addr(), ":9000");
        let config = config.with_addr(None);
        assert_eq!(config.addr(), ":9000");
    }

    #[test]
    fn test_small_request_size_is_raised() {
        let config = Config::from_toml_str("max_request_size = 10");
        assert_eq!(config.max_request_size(), 1024);
    }

    #[test]
    fn test_zero_read_timeout_uses_default() {
        let config = Config::from_toml_str("read_timeout_secs = 0");
        assert_eq!(config.read_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_slash_root_is_kept() {
        let config = Config::from_toml_str("restconf_root = \"///\"");
        assert_eq!(config.restconf_root(), "/");
    }
}
