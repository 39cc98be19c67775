use anyhow::Result;
use clap::Parser;

use msgpost_bridge::pipeline::BridgePipelineBuilder;
use msgpost_core::pipeline::Pipeline;
use msgpost_core::MsgpostConfig;

mod cli;
mod logging;

use cli::DaemonCli;

#[tokio::main]
async fn main() -> Result<()> {
    let args = DaemonCli::parse();

    // 설정 로드: 파일 + 환경 변수는 load()가, CLI는 여기서 덮어씁니다.
    let mut config = MsgpostConfig::load(&args.config)
        .await
        .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;
    if let Some(level) = args.log_level {
        config.general.log_level = level;
    }
    if let Some(format) = args.log_format {
        config.general.log_format = format;
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    if args.validate {
        println!("configuration OK: {}", args.config.display());
        return Ok(());
    }

    logging::init_tracing(&config.general)?;
    tracing::info!("msgpost-daemon starting");

    // 브리지 파이프라인 빌드
    let (mut pipeline, mut tell_rx) = BridgePipelineBuilder::new(config)
        .config_path(&args.config)
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build bridge pipeline: {}", e))?;

    pipeline
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("failed to start bridge pipeline: {}", e))?;
    tracing::info!("bridge pipeline started");

    // 게임 내 응답은 서버 콘솔 명령 형태로 stdout에 씁니다.
    let tell_handle = tokio::spawn(async move {
        while let Some(msg) = tell_rx.recv().await {
            println!("tell {} {}", msg.player, msg.text);
        }
    });

    // 종료 시그널 대기
    tracing::info!("msgpost-daemon running");
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");

    // 우아한 종료
    if let Err(e) = pipeline.stop().await {
        tracing::error!(error = %e, "failed to stop bridge pipeline");
    }
    tell_handle.abort();

    tracing::info!("msgpost-daemon shut down");
    Ok(())
}
