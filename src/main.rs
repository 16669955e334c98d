use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info};

use polly_triage::app_config::log::setup_logging;
use polly_triage::app_config::settings::TriageSettings;
use polly_triage::error::AppError;
use polly_triage::triage::session::{AnalysisRequest, TriageSession};
use polly_triage::Environment;

/// Polly API 排查工具
#[derive(Parser, Debug)]
#[command(name = "polly_triage", version)]
struct Cli {
    /// Bearer token，未传时读取 TRIAGE_BEARER_TOKEN
    #[arg(long)]
    token: Option<String>,

    /// prod | stage，未知值按 stage 处理
    #[arg(long, short, default_value = "stage")]
    environment: String,

    /// LOS 贷款 id，如 TESTREFI_12345
    #[arg(long)]
    loan_id: Option<String>,

    /// 获取贷款详情
    #[arg(long)]
    loan_service: bool,

    /// 获取锁价请求、定价场景并比较差异
    #[arg(long)]
    lock_requests: bool,

    /// 格式化输出
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    setup_logging()?;

    let cli = Cli::parse();
    let settings = TriageSettings::from_env();

    let token = cli
        .token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| settings.bearer_token.clone())
        .ok_or_else(|| AppError::ConfigError("缺少 bearer token (--token 或 TRIAGE_BEARER_TOKEN)".to_string()))?;

    let request = AnalysisRequest {
        environment: Environment::parse_or_stage(&cli.environment),
        token,
        loan_id: cli.loan_id,
        loan_service: cli.loan_service,
        lock_requests: cli.lock_requests,
    };

    let session = TriageSession::from_settings(&settings)?;
    let report = session.analyze(&request).await;

    if let Some(err) = &report.changesets.error {
        error!("变更集获取失败: {}", err);
    }
    info!("排查完成，共 {} 次接口调用", report.api_log.len());

    let output = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", output);
    Ok(())
}
