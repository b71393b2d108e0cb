//! CLI binary for tavily-tools.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tavily_report::{
    BatchReport, FormatOptions, LedgerError, SearchOutcome, SearchProvider, SessionLedger,
    TavilyClient,
};
use tavily_tools::AppConfig;
use tavily_tools::logging::{self, Verbosity};

/// Tavily web search with structured JSON and HTML reports.
#[derive(Parser)]
#[command(name = "tavily-tools", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Save results as a JSON file.
    #[arg(long, global = true)]
    save_json: bool,

    /// Generate an HTML report.
    #[arg(long, global = true)]
    save_html: bool,

    /// Also save the raw API response as JSON.
    #[arg(long, global = true)]
    save_raw: bool,

    /// Do not print results to the console.
    #[arg(long, global = true)]
    no_print: bool,

    /// Directory for saved reports.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Maximum number of results per query.
    #[arg(long, global = true)]
    max_results: Option<usize>,

    /// Search timeout in seconds.
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Minimal output.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Detailed output, including debug logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Export the session history after searching, optionally to FILE.
    #[arg(long, global = true, value_name = "FILE")]
    export_history: Option<Option<String>>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Run one search. Without a subcommand the configured default query is searched.
    Search {
        /// Query text.
        query: String,
    },

    /// Run several searches one after another.
    Batch {
        /// Queries to run.
        #[arg(required = true)]
        queries: Vec<String>,
    },

    /// Show the current configuration.
    Config,

    /// Check that the environment is configured correctly.
    ValidateEnv,
}

impl Cli {
    fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.output_dir {
            config.output.results_dir = dir.clone();
        }
        if let Some(n) = self.max_results {
            config.tavily.max_results = n;
        }
        if let Some(secs) = self.timeout {
            config.tavily.timeout_seconds = secs;
        }
    }

    fn format_options(&self) -> FormatOptions {
        FormatOptions {
            save_json: self.save_json,
            save_html: self.save_html,
            save_raw: self.save_raw,
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_to(&mut config);

    let _log_guard = logging::init(&config.logging, cli.verbosity())?;

    match &cli.command {
        Some(Command::Config) => {
            show_config(&config, cli.verbose);
            Ok(())
        }
        Some(Command::ValidateEnv) => validate_env(&config, cli.verbose),
        Some(Command::Search { query }) => run_search(&cli, &config, query).await,
        None => {
            let query = config.tavily.default_query.clone();
            run_search(&cli, &config, &query).await
        }
        Some(Command::Batch { queries }) => run_batch(&cli, &config, queries).await,
    }
}

fn build_ledger(config: &AppConfig) -> anyhow::Result<SessionLedger<TavilyClient>> {
    for warning in config.validate().context("invalid configuration")? {
        eprintln!("警告: {warning}");
    }
    let client = TavilyClient::new(config.tavily_config())?;
    Ok(SessionLedger::new(client, config.report_config())
        .with_search_options(config.search_options()))
}

async fn run_search(cli: &Cli, config: &AppConfig, query: &str) -> anyhow::Result<()> {
    let mut ledger = build_ledger(config)?;
    if cli.verbose {
        println!("执行搜索: {query}");
    }

    let outcome = ledger
        .search_and_format(query, &cli.format_options())
        .await
        .with_context(|| format!("搜索失败: {query}"))?;

    if !cli.no_print {
        print!("{}", ledger.renderer().console_summary(&outcome.record));
    }
    if !cli.quiet {
        println!(
            "\n搜索质量: {:.3} | 结果数: {}",
            outcome.quality.average_score, outcome.quality.result_count
        );
        if cli.verbose {
            print!("{}", ledger.renderer().quality_summary(&outcome.quality));
        }
    }
    report_artifacts(cli, &outcome);
    export_history(cli, &ledger);
    Ok(())
}

async fn run_batch(cli: &Cli, config: &AppConfig, queries: &[String]) -> anyhow::Result<()> {
    let mut ledger = build_ledger(config)?;
    if !cli.quiet {
        println!("开始批量搜索，共 {} 个查询", queries.len());
    }

    let report = ledger.batch(queries, &cli.format_options()).await;

    for outcome in &report.successes {
        if !cli.no_print {
            print!("{}", ledger.renderer().console_summary(&outcome.record));
        }
        if !cli.quiet {
            println!(
                "完成: {} | 结果数: {} | 平均评分: {:.3}",
                outcome.record.query, outcome.quality.result_count, outcome.quality.average_score
            );
        }
        report_artifacts(cli, outcome);
    }
    for failure in &report.failures {
        eprintln!("[{}] 搜索失败: {}: {}", failure.index + 1, failure.query, failure.error);
    }
    if !cli.quiet {
        print_batch_summary(&report);
    }

    export_history(cli, &ledger);
    Ok(())
}

fn print_batch_summary(report: &BatchReport) {
    println!("\n批量搜索完成:");
    println!("   成功查询: {}", report.successes.len());
    println!("   失败查询: {}", report.failures.len());
    println!("   总结果数: {}", report.total_results());
    println!("   平均评分: {:.3}", report.average_score());
}

fn report_artifacts(cli: &Cli, outcome: &SearchOutcome) {
    if !cli.quiet {
        if let Some(path) = &outcome.artifacts.json {
            println!("JSON已保存: {}", path.display());
        }
        if let Some(path) = &outcome.artifacts.html {
            println!("HTML报告已保存: {}", path.display());
        }
        if let Some(path) = &outcome.artifacts.raw {
            println!("原始响应已保存: {}", path.display());
        }
    }
    for failure in &outcome.artifacts.failures {
        eprintln!("保存{}失败: {}", failure.kind.label(), failure.error);
    }
}

fn export_history<P: SearchProvider>(cli: &Cli, ledger: &SessionLedger<P>) {
    let Some(requested) = &cli.export_history else {
        return;
    };
    match ledger.export_history(requested.as_deref()) {
        Ok(path) => {
            if !cli.quiet {
                println!("搜索历史已导出: {}", path.display());
            }
        }
        Err(LedgerError::EmptyHistory) => {
            if !cli.quiet {
                println!("没有搜索历史可导出");
            }
        }
        Err(e) => eprintln!("导出搜索历史失败: {e}"),
    }
}

fn show_config(config: &AppConfig, show_sensitive: bool) {
    println!("当前配置:");
    for line in config.display_lines(show_sensitive) {
        println!("   {line}");
    }
    if show_sensitive {
        println!("   配置文件: {}", tavily_tools::app_dirs::config_file().display());
    }
}

fn validate_env(config: &AppConfig, verbose: bool) -> anyhow::Result<()> {
    println!("验证环境配置...");
    let warnings = match config.validate() {
        Ok(warnings) => warnings,
        Err(e) => {
            eprintln!("环境配置有问题: {e}");
            bail!("invalid configuration");
        }
    };
    for warning in &warnings {
        println!("警告: {warning}");
    }
    println!("环境配置正确");

    if verbose {
        match TavilyClient::new(config.tavily_config()) {
            Ok(client) => println!("Tavily客户端初始化成功: {}", client.endpoint()),
            Err(e) => println!("客户端初始化警告: {e}"),
        }
    }
    Ok(())
}
