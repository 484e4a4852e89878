mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{CaptureArgs, LocateQuery};
use pinpoint_core::Rect;
use pinpoint_core::config::loader::ConfigLoader;
use pinpoint_core::config::schema::OutputFormat;
use pinpoint_dom::HtmlSnapshot;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "pinpoint", version, about = "Element selector synthesis for HTML snapshots")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file (defaults to ./pinpoint.yaml, then ~/.pinpoint/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Pick elements with a CSS query and print their captures
    Capture {
        /// HTML snapshot to load
        file: PathBuf,

        /// CSS query used to pick the element(s)
        #[arg(long)]
        select: String,

        /// Capture every match instead of the first one
        #[arg(long)]
        all: bool,

        /// Bounding box reported by the host, as x,y,width,height
        #[arg(long)]
        rect: Option<Rect>,

        /// Computed style reported by the host, as property=value (repeatable)
        #[arg(long = "style", value_name = "PROPERTY=VALUE", value_parser = parse_style)]
        styles: Vec<(String, String)>,

        /// Output format (json or text)
        #[arg(long)]
        format: Option<OutputFormat>,
    },
    /// Resolve a synthesized selector back to elements
    Locate {
        /// HTML snapshot to load
        file: PathBuf,

        #[arg(long, conflicts_with = "css", required_unless_present = "css")]
        xpath: Option<String>,

        #[arg(long)]
        css: Option<String>,

        /// Output format (json or text)
        #[arg(long)]
        format: Option<OutputFormat>,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Logs go to stderr so stdout stays clean for captures
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> Result<String> {
    let config = match &args.config {
        Some(path) => ConfigLoader::load_from(path).await,
        None => ConfigLoader::load_default().await,
    }
    .context("Failed to load configuration")?;

    let (file, format) = match &args.command {
        Command::Capture { file, format, .. } | Command::Locate { file, format, .. } => {
            (file, *format)
        }
    };

    let mut output = config.output.clone();
    if let Some(format) = format {
        output.format = format;
    }

    info!("Loading {}", file.display());
    let source = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let snapshot = HtmlSnapshot::parse(&source);

    match &args.command {
        Command::Capture {
            select,
            all,
            rect,
            styles,
            ..
        } => commands::run_capture(
            &snapshot,
            &config,
            &output,
            CaptureArgs {
                query: select,
                all: *all,
                rect: *rect,
                styles,
            },
        ),
        Command::Locate { xpath, css, .. } => {
            let query = match (xpath, css) {
                (Some(xpath), _) => LocateQuery::XPath(xpath),
                (None, Some(css)) => LocateQuery::Css(css),
                (None, None) => anyhow::bail!("Either --xpath or --css is required"),
            };
            commands::run_locate(&snapshot, &config, &output, query)
        }
    }
}

fn parse_style(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((property, value)) if !property.trim().is_empty() => {
            Ok((property.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("invalid style '{}': expected property=value", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style_flag() {
        assert_eq!(
            parse_style(" display = inline-block"),
            Ok(("display".to_string(), "inline-block".to_string()))
        );
        assert_eq!(parse_style("color=").map(|(_, v)| v), Ok(String::new()));
        assert!(parse_style("display").is_err());
        assert!(parse_style("=red").is_err());
    }

    #[test]
    fn test_style_flag_repeats() {
        let args = Args::try_parse_from([
            "pinpoint", "capture", "page.html", "--select", "p", "--style", "color=red",
            "--style", "display=none",
        ])
        .unwrap();
        match args.command {
            Command::Capture { styles, .. } => assert_eq!(styles.len(), 2),
            Command::Locate { .. } => panic!("expected capture"),
        }
    }
}
