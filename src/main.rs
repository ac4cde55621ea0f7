mod batch;
mod catalog;
mod config;
mod content;
mod db;
mod emit;
mod export;
mod keywords;
mod pipeline;
mod sitemap;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing::warn;

use config::PipelineConfig;
use keywords::dataforseo::DataForSeoClient;
use keywords::research::ResearchReport;
use pipeline::PublishReport;

#[derive(Parser)]
#[command(name = "review_seo", about = "Keyword research and SEO review page generator")]
struct Cli {
    #[command(flatten)]
    opts: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalOpts {
    /// Tool catalog JSON
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Directory for generated page components
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,
    /// Directory for keyword reports
    #[arg(long, global = true)]
    report_dir: Option<PathBuf>,
    /// SQLite run store
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Tools researched concurrently per batch
    #[arg(long, global = true)]
    concurrency: Option<usize>,
    /// Pause between batches, in milliseconds
    #[arg(long, global = true)]
    delay_ms: Option<u64>,
    /// Keyword variations looked up per tool
    #[arg(long, global = true)]
    max_keywords: Option<usize>,
    /// Secondary keywords kept per tool
    #[arg(long, global = true)]
    secondary: Option<usize>,
    #[arg(long, env = "DATAFORSEO_LOGIN", hide_env_values = true, global = true)]
    login: Option<String>,
    #[arg(long, env = "DATAFORSEO_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Research keywords, write reports and generate review pages
    Run {
        /// Max tools to process (default: whole catalog)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Research keywords and write reports only
    Keywords {
        /// Max tools to research (default: whole catalog)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Generate review pages from the latest stored keyword selections
    Generate,
    /// Top keyword opportunities of the latest run
    Top {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
    /// Show run store statistics
    Stats,
}

impl GlobalOpts {
    fn into_config(self) -> PipelineConfig {
        let mut cfg = PipelineConfig::default();
        if let Some(p) = self.catalog {
            cfg.catalog_path = p;
        }
        if let Some(p) = self.out_dir {
            cfg.output_dir = p;
        }
        if let Some(p) = self.report_dir {
            cfg.report_dir = p;
        }
        if let Some(p) = self.db {
            cfg.db_path = p;
        }
        if let Some(n) = self.concurrency {
            cfg.limits.concurrency = n;
        }
        if let Some(ms) = self.delay_ms {
            cfg.limits.delay = Duration::from_millis(ms);
        }
        if let Some(n) = self.max_keywords {
            cfg.limits.max_keywords_per_tool = n;
        }
        if let Some(n) = self.secondary {
            cfg.limits.secondary_keywords = n;
        }
        cfg.api.login = self.login.filter(|s| !s.is_empty());
        cfg.api.password = self.password.filter(|s| !s.is_empty());
        cfg.limits = cfg.limits.normalized();
        cfg
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let cfg = cli.opts.into_config();

    let result = match cli.command {
        Commands::Run { limit } => {
            let tools = pipeline::load_catalog(&cfg, limit)?;
            let conn = db::connect(&cfg.db_path)?;
            db::init_schema(&conn)?;
            let client = api_client(&cfg)?;

            let started = Utc::now();
            let run_id = db::start_run(&conn, started, tools.len())?;
            println!("Pipeline: {} tools, {} keywords each...", tools.len(), cfg.limits.max_keywords_per_tool);

            let report = pipeline::run(&cfg, &client, &tools, started).await?;
            db::save_selections(&conn, run_id, &report.research.selections)?;
            db::save_components(&conn, run_id, &report.publish.emit.entries)?;
            db::finish_run(
                &conn,
                run_id,
                Utc::now(),
                report.research.total_cost,
                report.publish.emit.entries.len(),
            )?;

            print_research(&report.research, tools.len());
            match &report.reports {
                Some(paths) => println!("Reports:    {}", paths.csv.display()),
                None => println!("Reports:    not written (see log)"),
            }
            print_publish(&report.publish);
            Ok(())
        }
        Commands::Keywords { limit } => {
            let tools = pipeline::load_catalog(&cfg, limit)?;
            let conn = db::connect(&cfg.db_path)?;
            db::init_schema(&conn)?;
            let client = api_client(&cfg)?;

            let started = Utc::now();
            let run_id = db::start_run(&conn, started, tools.len())?;
            let (research, paths) = pipeline::keywords(&cfg, &client, &tools, started).await?;
            db::save_selections(&conn, run_id, &research.selections)?;
            db::finish_run(&conn, run_id, Utc::now(), research.total_cost, 0)?;

            print_research(&research, tools.len());
            println!("CSV:        {}", paths.csv.display());
            println!("JSON:       {}", paths.json.display());
            println!("Clusters:   {}", paths.clusters.display());
            Ok(())
        }
        Commands::Generate => {
            let tools = pipeline::load_catalog(&cfg, None)?;
            let conn = db::connect(&cfg.db_path)?;
            db::init_schema(&conn)?;

            let stored = db::fetch_latest_selections(&conn)?;
            if stored.is_empty() {
                println!("No stored keyword selections. Run 'keywords' first.");
                return Ok(());
            }
            let selections = pipeline::join_catalog(stored, &tools);
            println!("Generating {} review pages from stored keywords...", selections.len());

            let started = Utc::now();
            let run_id = db::start_run(&conn, started, selections.len())?;
            let publish = pipeline::publish(&cfg, &selections, started)?;
            db::save_components(&conn, run_id, &publish.emit.entries)?;
            db::finish_run(&conn, run_id, Utc::now(), 0.0, publish.emit.entries.len())?;

            print_publish(&publish);
            Ok(())
        }
        Commands::Top { limit } => {
            let conn = db::connect(&cfg.db_path)?;
            db::init_schema(&conn)?;
            let rows = db::fetch_top_opportunities(&conn, limit)?;
            if rows.is_empty() {
                println!("No keyword selections stored yet.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<24} | {:<16} | {:<32} | {:>8} | {:>8} | {:>6} | {:>10}",
                "#", "Tool", "Category", "Primary keyword", "Volume", "Total", "CPC", "Score"
            );
            println!("{}", "-".repeat(128));
            for (i, r) in rows.iter().enumerate() {
                println!(
                    "{:>3} | {:<24} | {:<16} | {:<32} | {:>8} | {:>8} | {:>6.2} | {:>10}",
                    i + 1,
                    truncate(&r.tool_name, 24),
                    truncate(&r.category, 16),
                    truncate(&r.primary_keyword, 32),
                    r.primary_volume,
                    r.total_volume,
                    r.avg_cpc,
                    r.opportunity
                );
            }
            println!("\n{} tools | score = volume x (1 - competition) x 100", rows.len());
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&cfg.db_path)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Runs:       {} ({} finished)", s.runs, s.finished_runs);
            println!("Selections: {}", s.selections);
            println!("Components: {}", s.components);
            println!("API cost:   ${:.2}", s.total_cost);
            println!("Last run:   {}", s.last_finished.as_deref().unwrap_or("-"));
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn api_client(cfg: &PipelineConfig) -> anyhow::Result<DataForSeoClient> {
    if !cfg.api.has_credentials() {
        warn!("DATAFORSEO_LOGIN / DATAFORSEO_PASSWORD not set, every lookup will use fallback metrics");
    }
    DataForSeoClient::new(cfg.api.clone())
}

fn print_research(report: &ResearchReport, total_tools: usize) {
    println!(
        "Keywords:   {}/{} tools researched, {} lookup failures",
        report.selections.len(),
        total_tools,
        report.failed_tools.len()
    );
    println!("Volume:     {} monthly searches", report.total_volume());
    println!("API cost:   ${:.2}", report.total_cost);
    if !report.failed_tools.is_empty() {
        println!("Fallbacks:  {}", truncate(&report.failed_tools.join(", "), 80));
    }
}

fn print_publish(publish: &PublishReport) {
    let emit = &publish.emit;
    println!(
        "Components: {}/{} written ({} failed)",
        emit.entries.len(),
        emit.attempted,
        emit.failures.len()
    );
    println!(
        "Words:      {} total, {} avg per page",
        emit.total_words(),
        emit.average_words()
    );
    for f in &emit.failures {
        println!("  failed {}: {}", f.slug, truncate(&f.error, 100));
    }
    println!("Summary:    {}", publish.summary_path.display());
    match &publish.sitemap_path {
        Some(path) => println!("Sitemap:    {}", path.display()),
        None => println!("Sitemap:    not written (see log)"),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
