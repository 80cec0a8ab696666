use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use lead_scout::config::{Config, ExportFormat};
use lead_scout::leads::{dedup_leads, ScoredLead};
use lead_scout::outreach::{build_campaign, export_campaign, CampaignKind, TemplateKind};
use lead_scout::pipeline::{audit_leads, qualify_batch, sort_for_report};
use lead_scout::qualify::{average_score, filter_high_quality, filter_opportunities, tier_distribution};
use lead_scout::scoring::{calculate_score, ScoringConfig};
use lead_scout::sources::{create_client, ApolloSource, HttpPolicy};

const EXIT_SUCCESS: i32 = 0;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_INPUT: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a leads file (default if no subcommand)
    Score {
        #[command(flatten)]
        args: ScoreArgs,
    },
    /// Fetch funded companies from Apollo.io and score them
    Fetch {
        /// Number of result pages to request
        #[arg(long, default_value_t = 1)]
        pages: u32,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// Write the default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone)]
struct ScoreArgs {
    /// Leads file (JSON array or YAML sequence)
    leads: Option<PathBuf>,

    #[command(flatten)]
    report: ReportArgs,
}

#[derive(Args, Debug, Clone, Default)]
struct ReportArgs {
    /// Export format (overrides config)
    #[arg(long, value_enum)]
    format: Option<ExportFormat>,

    /// Directory for export files (overrides config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print results only, write no export files
    #[arg(long)]
    no_export: bool,

    /// Audit company websites before scoring
    #[arg(long)]
    audit: bool,

    /// Only report and export high-quality leads
    #[arg(long)]
    high_quality_only: bool,

    /// Only report local businesses with no site and strong reviews
    #[arg(long)]
    opportunities: bool,

    /// Print tab-separated values instead of the table
    #[arg(long)]
    tsv: bool,

    /// Also write an email campaign CSV for the reported leads
    #[arg(long, conflicts_with = "no_export")]
    campaign: bool,

    /// Use one template for every campaign email instead of picking per lead
    #[arg(long, value_enum, requires = "campaign")]
    template: Option<TemplateKind>,

    /// Mutual connection named by the referral template (overrides config)
    #[arg(long, requires = "campaign")]
    referrer: Option<String>,

    /// Write follow-ups for a first email sent this many days ago
    #[arg(long, value_name = "DAYS", requires = "campaign", conflicts_with = "template")]
    follow_up: Option<u32>,
}

#[derive(Parser, Debug)]
#[command(name = "lead-scout")]
#[command(about = "Score and qualify sales leads", long_about = None)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/lead-scout/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    score: ScoreArgs,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "lead_scout=debug" } else { "lead_scout=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print every config error and exit
fn exit_config_errors(errors: Vec<String>) -> ! {
    eprintln!("Scoring config errors:");
    for error in errors {
        eprintln!("  - {}", error);
    }
    std::process::exit(EXIT_CONFIG);
}

fn http_setup(config: &Config) -> (reqwest::Client, HttpPolicy) {
    let fetch = config.fetch.clone().unwrap_or_default();
    let policy = match HttpPolicy::from_config(&fetch) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    match create_client(&policy) {
        Ok(client) => (client, policy),
        Err(e) => {
            eprintln!("Failed to create HTTP client: {:#}", e);
            std::process::exit(EXIT_NETWORK);
        }
    }
}

fn load_validated_config(path: Option<PathBuf>) -> (Config, ScoringConfig) {
    let config = match lead_scout::config::resolve_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config before touching any lead
    let scoring = config.scoring.clone().unwrap_or_default();
    if let Err(errors) = lead_scout::scoring::validate_scoring(&scoring) {
        exit_config_errors(errors);
    }
    (config, scoring)
}

#[tokio::main]
async fn main() {
    // reqwest's rustls backend needs a process-wide crypto provider
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Instant::now();

    let command = cli.command.unwrap_or(Commands::Score { args: cli.score });

    let (config, scoring, leads, report) = match command {
        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(lead_scout::config::get_config_path);
            if let Err(e) = lead_scout::config::write_default_config(&path, force) {
                eprintln!("{:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
            println!("Wrote default config to {}", path.display());
            std::process::exit(EXIT_SUCCESS);
        }
        Commands::Score { args } => {
            let (config, scoring) = load_validated_config(cli.config);
            let Some(path) = args.leads else {
                eprintln!("No leads file given. Usage: lead-scout score <LEADS>");
                std::process::exit(EXIT_INPUT);
            };
            match lead_scout::leads::load_leads(&path) {
                Ok(leads) => (config, scoring, leads, args.report),
                Err(e) => {
                    eprintln!("Input error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            }
        }
        Commands::Fetch { pages, report } => {
            let (config, scoring) = load_validated_config(cli.config);
            let api_key = match lead_scout::credentials::get_apollo_key() {
                Ok(k) => k,
                Err(e) => {
                    eprintln!("Credential error: {}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };
            let (client, policy) = http_setup(&config);
            let apollo = ApolloSource::new(
                client,
                api_key,
                config.apollo.clone().unwrap_or_default(),
                policy,
            );
            match apollo.search_pages(pages).await {
                Ok(leads) => (config, scoring, leads, report),
                Err(e) => {
                    eprintln!("Apollo fetch failed: {:#}", e);
                    std::process::exit(EXIT_NETWORK);
                }
            }
        }
    };

    let before = leads.len();
    let mut leads = dedup_leads(leads);
    if leads.len() < before {
        tracing::info!("Removed {} duplicate leads", before - leads.len());
    }

    if report.audit {
        let (client, policy) = http_setup(&config);
        let batch = audit_leads(&client, leads, &policy).await;
        if !batch.failures.is_empty() {
            eprintln!("{} leads dropped after failed website audits:", batch.failures.len());
            for failure in &batch.failures {
                eprintln!("  - {} (#{}): {}", failure.name, failure.index + 1, failure.reason);
            }
        }
        leads = batch.leads;
    }

    let today = Local::now().date_naive();
    let scored = qualify_batch(leads, &scoring, today);
    let export_settings = config.export.clone().unwrap_or_default();

    let selected = if report.opportunities {
        let opportunity = scoring
            .local
            .as_ref()
            .and_then(|l| l.opportunity.clone())
            .unwrap_or_default();
        filter_opportunities(&scored, &opportunity)
    } else if report.high_quality_only || export_settings.high_quality_only {
        filter_high_quality(scored.clone())
    } else {
        scored.clone()
    };

    print_report(&selected, &scoring, &report, cli.verbose, today);

    if !report.no_export {
        let format = report.format.unwrap_or(export_settings.format);
        let dir = report
            .output_dir
            .clone()
            .or(export_settings.output_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        let stamp = Local::now().naive_local();
        match lead_scout::output::export_leads(&selected, format, &dir, stamp) {
            Ok(paths) => {
                for path in paths {
                    eprintln!("Saved {}", path.display());
                }
            }
            Err(e) => {
                eprintln!("Export failed: {:#}", e);
                std::process::exit(EXIT_INPUT);
            }
        }

        if report.campaign {
            let mut sender = config.outreach.clone().unwrap_or_default();
            if report.referrer.is_some() {
                sender.referrer = report.referrer.clone();
            }
            let kind = match (report.follow_up, report.template) {
                (Some(days), _) => CampaignKind::FollowUp(days),
                (None, Some(template)) => CampaignKind::Template(template),
                (None, None) => CampaignKind::Auto,
            };
            let issues = scoring.company.as_ref().and_then(|c| c.website_issues.as_ref());
            let rows = build_campaign(&selected, kind, &sender, issues);
            match export_campaign(&rows, &dir, stamp) {
                Ok(path) => eprintln!("Saved {}", path.display()),
                Err(e) => {
                    eprintln!("Campaign export failed: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            }
        }
    }

    // Summary covers the whole batch, not just the selection
    let distribution = tier_distribution(&scored);
    let high_quality = scored.iter().filter(|s| s.high_quality).count();
    eprintln!();
    eprintln!(
        "{}",
        lead_scout::output::format_tier_summary(
            &distribution,
            average_score(&scored),
            high_quality,
            lead_scout::output::should_use_colors(),
        )
    );

    tracing::debug!("Done in {:?}", start_time.elapsed());
    std::process::exit(EXIT_SUCCESS);
}

fn print_report(
    selected: &[ScoredLead],
    scoring: &ScoringConfig,
    report: &ReportArgs,
    verbose: bool,
    today: chrono::NaiveDate,
) {
    let mut ordered = selected.to_vec();
    sort_for_report(&mut ordered);

    if report.tsv {
        println!("{}", lead_scout::output::format_tsv(&ordered));
        return;
    }

    let use_colors = lead_scout::output::should_use_colors();
    if verbose && !ordered.is_empty() {
        // Detailed output with the factor breakdown behind each score
        for scored in &ordered {
            let result = calculate_score(&scored.lead, scoring, today);
            println!(
                "{}",
                lead_scout::output::format_lead_detail(scored, &result.breakdown, use_colors)
            );
            println!();
        }
    } else {
        println!("{}", lead_scout::output::format_scored_table(&ordered, use_colors));
    }
}
