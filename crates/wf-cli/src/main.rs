//! webfence CLI
//!
//! Developer tool for compiling filter/asset configurations and evaluating
//! synthetic requests against them.

use std::fs;

use clap::{Parser, Subcommand};
use serde::Serialize;

use wf_compiler::{parse_asset_list, parse_filter_list};
use wf_core::types::ResourceType;
use wf_core::{RuleSet, Verdict};

#[derive(Parser)]
#[command(name = "wf-cli")]
#[command(about = "webfence filter compiler and tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile filter list files and report what they contain
    Compile {
        /// Input filter list files
        #[arg(short, long, required = true)]
        input: Vec<String>,

        /// Verbose per-file output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate an asset file
    Assets {
        /// Asset file to inspect
        #[arg(short, long)]
        input: String,
    },

    /// Evaluate one request against a configuration
    Check {
        /// Filter list file
        #[arg(short, long)]
        filters: String,

        /// Optional asset file for redirect resolution
        #[arg(short, long)]
        assets: Option<String>,

        /// Requester (document) URL
        #[arg(short, long)]
        requester: String,

        /// Destination URL
        #[arg(short, long)]
        url: String,

        /// Resource type tag (script, image, main_frame, ...)
        #[arg(short = 't', long, default_value = "other")]
        resource_type: String,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile { input, verbose } => cmd_compile(&input, verbose),
        Commands::Assets { input } => cmd_assets(&input),
        Commands::Check {
            filters,
            assets,
            requester,
            url,
            resource_type,
            json,
        } => cmd_check(&filters, assets.as_deref(), &requester, &url, &resource_type, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_compile(inputs: &[String], verbose: bool) -> Result<(), String> {
    let mut total_filters = 0usize;
    let mut total_invalid = 0usize;

    for path in inputs {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path, e))?;

        let parsed = parse_filter_list(&content);

        if verbose {
            println!(
                "  {} - {} lines, {} filters, {} invalid",
                path,
                content.lines().count(),
                parsed.filters.len(),
                parsed.invalid
            );
        }

        total_filters += parsed.filters.len();
        total_invalid += parsed.invalid;
    }

    println!("Compiled {} filter lists", inputs.len());
    println!("  Filters:  {}", total_filters);
    println!("  Invalid:  {}", total_invalid);

    Ok(())
}

fn cmd_assets(input: &str) -> Result<(), String> {
    let content =
        fs::read_to_string(input).map_err(|e| format!("Failed to read '{}': {}", input, e))?;

    let parsed = parse_asset_list(&content);

    println!("Assets: {}", input);
    println!("  Records:  {}", parsed.assets.len());
    println!("  Invalid:  {}", parsed.invalid);
    for asset in &parsed.assets {
        println!("  {} ({} bytes)", asset.name, asset.payload.len());
    }

    Ok(())
}

#[derive(Serialize)]
struct VerdictReport<'a> {
    requester: &'a str,
    url: &'a str,
    resource_type: &'a str,
    verdict: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<String>,
}

fn cmd_check(
    filters_path: &str,
    assets_path: Option<&str>,
    requester: &str,
    url: &str,
    resource_type: &str,
    json: bool,
) -> Result<(), String> {
    let filter_text = fs::read_to_string(filters_path)
        .map_err(|e| format!("Failed to read '{}': {}", filters_path, e))?;
    let asset_text = match assets_path {
        Some(path) => {
            fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path, e))?
        }
        None => String::new(),
    };

    let parsed = parse_filter_list(&filter_text);
    let assets = parse_asset_list(&asset_text);
    let rules = RuleSet::new(parsed.filters, assets.assets);

    let rtype = ResourceType::from_request(resource_type);
    let verdict = rules.decide(requester, url, rtype, false);

    let report = VerdictReport {
        requester,
        url,
        resource_type,
        verdict: match &verdict {
            Verdict::Allow => "allow",
            Verdict::Block => "block",
            Verdict::Redirect(_) => "redirect",
        },
        payload: match verdict {
            Verdict::Redirect(payload) => Some(payload),
            _ => None,
        },
    };

    if json {
        let encoded = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to encode report: {}", e))?;
        println!("{encoded}");
    } else {
        match &report.payload {
            Some(payload) => println!("{} -> {}", report.verdict, payload),
            None => println!("{}", report.verdict),
        }
    }

    Ok(())
}
