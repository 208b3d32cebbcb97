//! Source Tree Documentation Generator
//!
//! 扫描项目目录，为每个目标源文件调用 LLM 生成 Markdown 文档，
//! 按原目录结构写入输出目录。

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod llm;
mod services;

use config::AppConfig;
use llm::LlmClient;
use services::doc_generator::{DocGenService, RunSummary};

/// 在 Windows 上设置控制台代码页为 UTF-8
#[cfg(windows)]
fn setup_console_encoding() {
    unsafe {
        // 设置控制台输出代码页为 UTF-8 (65001)
        extern "system" {
            fn SetConsoleOutputCP(code_page: u32) -> i32;
            fn SetConsoleCP(code_page: u32) -> i32;
        }
        SetConsoleOutputCP(65001);
        SetConsoleCP(65001);
    }
}

#[cfg(not(windows))]
fn setup_console_encoding() {}

/// 初始化日志，RUST_LOG 优先
fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "code_doc_gen=debug"
    } else {
        "code_doc_gen=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn report(summary: &RunSummary, dry_run: bool) {
    if dry_run {
        info!(
            "Dry run finished: {} documents planned in {} ms",
            summary.planned_count(),
            summary.elapsed_ms()
        );
    } else {
        info!(
            "Generation finished: {} generated, {} failed, {} ms",
            summary.generated_count(),
            summary.failed_count(),
            summary.elapsed_ms()
        );
        for outcome in summary.outcomes.iter().filter(|o| o.is_failed()) {
            warn!("Not generated: {}", outcome.source().display());
        }
    }
    info!("Docs located at: {}", summary.docs_root.display());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_console_encoding();

    let config = AppConfig::parse();
    init_tracing(config.verbose);

    config.validate()?;
    info!("Starting documentation generation...");
    tracing::debug!("Configuration: {:?}", config);

    let service = DocGenService::new(config.doc_gen_config());

    let summary = if config.dry_run {
        service.plan(&config.source_root, &config.output_root)?
    } else {
        let api_key = config.api_key().unwrap_or_default();
        let client = LlmClient::new(api_key, config.base_url.as_str(), config.request_timeout())
            .context("failed to initialise LLM client")?
            .with_options(config.chat_options());

        service
            .run(&config.source_root, &config.output_root, &client)
            .await?
    };

    report(&summary, config.dry_run);
    Ok(())
}
