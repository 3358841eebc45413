// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # RESTCONF 服务器
//!
//! 启动流程：
//! - 解析命令行参数（`-h`, `-v`, `--addr`, `-c`）
//! - 初始化 log4rs 日志
//! - 加载 TOML 配置
//! - 加载 YANG 模型，有未解析的错误时退出
//! - 构建只读路由表，重复注册时退出
//! - 启动 Tokio 多线程运行时并进入监听循环，Ctrl-C 停止

use restconf::{
    config::Config,
    param::SERVER_VERSION,
    restconf::build_router,
    server::{serve, Limits},
    util::resolve_listen_addr,
    yang::{self, DirectoryLoader},
};

use clap::{ArgAction, Parser};
use log::{error, info, warn, LevelFilter};
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Config as LogConfig, Root},
    encode::pattern::PatternEncoder,
};
use tokio::{net::TcpListener, runtime::Builder};

use std::{process::ExitCode, sync::Arc};

const LOG_CONFIG: &str = "config/log4rs.yaml";

#[derive(Parser, Debug)]
#[command(name = "restconf", version, disable_version_flag = true)]
struct Cli {
    /// restconf listen address, overrides the config file
    #[arg(long, value_name = "ip:port")]
    addr: Option<String>,

    /// configuration file
    #[arg(short, long, default_value = "config/development.toml")]
    config: String,

    /// show version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: (),
}

/// 优先使用 YAML 配置；加载失败时退回到控制台输出，不因日志而中止启动
fn init_logging(path: &str) {
    let Err(e) = log4rs::init_file(path, Default::default()) else {
        return;
    };

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {h({l:<5})} {m}{n}",
        )))
        .build();
    let fallback = LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info));
    match fallback {
        Ok(config) => {
            if log4rs::init_config(config).is_ok() {
                warn!("无法加载日志配置{}：{}，使用控制台输出", path, e);
            }
        }
        Err(e) => eprintln!("无法初始化日志系统：{}", e),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // 1. 日志
    init_logging(LOG_CONFIG);
    info!("{} 启动", SERVER_VERSION);

    // 2. 配置：命令行参数优先
    let config = Config::from_toml(&cli.config).with_addr(cli.addr);
    info!("配置文件已载入");

    // 3. YANG 模型
    let mut loader = match DirectoryLoader::new() {
        Ok(loader) => loader,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    yang::configure_paths(&mut loader, config.yang_path());
    let entries = match yang::load_schema(&mut loader, config.yang_modules()) {
        Ok(entries) => entries,
        Err(errors) => {
            error!("YANG 模型加载失败，共{}个错误", errors.len());
            return ExitCode::FAILURE;
        }
    };
    info!("已加载{}个YANG模块", entries.len());

    // 4. 路由表：启动后只读
    let router = match build_router(config.restconf_root()) {
        Ok(router) => Arc::new(router),
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // 5. 异步运行时
    let runtime = match Builder::new_multi_thread()
        .worker_threads(config.worker_threads())
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("无法创建Tokio运行时：{}", e);
            return ExitCode::FAILURE;
        }
    };

    let addr = resolve_listen_addr(config.addr());
    runtime.block_on(async move {
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("无法绑定地址：{}，错误：{}", addr, e);
                return ExitCode::FAILURE;
            }
        };
        info!("restconf start and listen {}", addr);

        serve(listener, router, Limits::from(&config), async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("无法监听停机信号：{}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;
        ExitCode::SUCCESS
    })
}
