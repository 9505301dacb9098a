//! CompanionMind CLI
//!
//! Usage:
//!   companion-mind --text "your text here"          # Classify one utterance
//!   companion-mind --interactive                    # Running trend/pattern over stdin lines
//!   companion-mind --serve                          # HTTP + WebSocket server
//!   companion-mind --serve --config mind.toml       # Server with config file
//!   companion-mind --text "text" --json             # JSON output

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use companion_mind::config::Config;
use companion_mind::core::{run_server, CommandReply, SentimentClassifier, Subject, DEFAULT_SUBJECT};
use companion_mind::logging;
use companion_mind::types::{CombinedRisk, OverallRisk, Severity, UtteranceAnalysis};
use companion_mind::{SERVICE_NAME, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "companion-mind",
    version = VERSION,
    about = "CompanionMind - emotional trend and sensor fusion for caregiver alerts",
    long_about = "CompanionMind classifies what a person says into emotion categories,\n\
                  tracks negativity over time, detects concerning patterns and fuses\n\
                  them with home sensor data into one risk verdict.\n\n\
                  Modes:\n  \
                  --text         Classify one utterance\n  \
                  --interactive  Classify stdin lines with running trend and pattern\n  \
                  --serve        HTTP + WebSocket server\n\n\
                  Risk levels:\n  \
                  LOW       - Routine monitoring\n  \
                  MODERATE  - Monitor closely\n  \
                  HIGH      - Reach out soon\n  \
                  CRITICAL  - Contact immediately"
)]
struct Args {
    /// Text to classify (single mode)
    #[arg(short, long)]
    text: Option<String>,

    /// Interactive mode - read utterances from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP + WebSocket server
    #[arg(short, long)]
    serve: bool,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server address (overrides config)
    #[arg(long)]
    addr: Option<String>,

    /// Reply model (overrides config)
    #[arg(long)]
    model: Option<String>,

    /// Log level (overrides config)
    #[arg(long)]
    log_level: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(1);
        }
    };
    logging::init(&config.logging.level);

    if args.serve {
        run_serve(&config).await;
    } else if args.interactive {
        run_interactive(&args);
    } else if let Some(ref text) = args.text {
        run_single(text, &args);
    } else {
        // Default to interactive if no mode specified
        run_interactive(&args);
    }
}

/// Classify one utterance
fn run_single(text: &str, args: &Args) {
    let record = SentimentClassifier::new().classify(text);

    if args.json {
        print_json(&record);
    } else if args.no_color {
        println!("{}", record.to_parseable_string());
    } else {
        println!("{}", record.to_terminal_string());
    }

    if !args.json && !record.detected_keywords.is_empty() {
        for (category, phrases) in &record.detected_keywords {
            println!("  {}: {}", category, phrases.join(", "));
        }
    }
}

/// Classify stdin lines against one in-memory subject
fn run_interactive(args: &Args) {
    let mut subject = Subject::new(DEFAULT_SUBJECT);

    print_header(args.no_color);
    println!("Type what the person says and press Enter. Type 'quit' to exit.");
    println!("Trend needs 4 utterances, pattern detection needs 3.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        // A failed flush only delays the prompt
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!(
                "\nSession ended. Utterances: {} | Loneliness mentions: {}",
                subject.history().len(),
                subject.loneliness_mentions()
            );
            break;
        }
        if line.is_empty() {
            continue;
        }

        let analysis = subject.record_utterance(line);
        let risk = subject.combined_risk();

        if args.json {
            #[derive(serde::Serialize)]
            struct InteractiveOutput<'a> {
                analysis: &'a UtteranceAnalysis,
                combined_risk: &'a CombinedRisk,
            }
            print_json(&InteractiveOutput { analysis: &analysis, combined_risk: &risk });
        } else {
            print_analysis(&analysis, &risk, args.no_color);
        }
    }
}

/// Print one analysis step
fn print_analysis(analysis: &UtteranceAnalysis, risk: &CombinedRisk, no_color: bool) {
    let sentiment = &analysis.sentiment;
    if no_color {
        println!("{}", sentiment.to_parseable_string());
    } else {
        println!("{}", sentiment.to_terminal_string());
    }

    let trend = &analysis.trend;
    println!(
        "  trend={} | emotional_risk={} | recent_avg={:.2}",
        trend.trend, trend.risk_level, trend.recent_avg_negativity
    );

    let pattern = &analysis.pattern;
    if pattern.pattern_detected {
        let (color, reset) = paint(no_color, "\x1b[31m");
        let severity = pattern.severity.map(|s| s.to_string()).unwrap_or_default();
        println!("{}  ⚠ PATTERN ALERT ({}): {}{}", color, severity, pattern.reasons.join("; "), reset);
    }

    let (color, reset) = paint(no_color, risk.overall_risk_level.color_code());
    println!(
        "{}  risk={} (score {}) | {}{}",
        color,
        risk.overall_risk_level.to_string().to_uppercase(),
        risk.risk_score,
        risk.recommendation,
        reset
    );
    if risk.overall_risk_level >= OverallRisk::High {
        for factor in &risk.physical_risk_factors {
            println!("{}    - {}{}", color, factor, reset);
        }
    }
}

/// Color and reset codes, empty when colors are off
fn paint(no_color: bool, color: &'static str) -> (&'static str, &'static str) {
    if no_color {
        ("", "")
    } else {
        (color, Severity::color_reset())
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("JSON error: {}", e),
    }
}

/// Print header
fn print_header(no_color: bool) {
    if no_color {
        println!("========================================");
        println!("  {} v{}", SERVICE_NAME, VERSION);
        println!("========================================");
    } else {
        println!("\x1b[1m╔════════════════════════════════════════╗\x1b[0m");
        println!("\x1b[1m║  {} v{}         ║\x1b[0m", SERVICE_NAME, VERSION);
        println!("\x1b[1m╚════════════════════════════════════════╝\x1b[0m");
    }
    println!();
}

/// Load the config file (or defaults) and apply command-line overrides
fn load_config(args: &Args) -> companion_mind::error::Result<Config> {
    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(ref addr) = args.addr {
        config.server.addr = addr.clone();
    }
    if let Some(ref model) = args.model {
        config.reply.model = model.clone();
    }
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    Ok(config)
}

/// Run HTTP + WebSocket server
async fn run_serve(config: &Config) {
    let reply = Arc::new(CommandReply::new(&config.reply));
    if let Err(e) = run_server(config, reply).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_in_every_mode() {
        let args = Args::parse_from(["companion-mind", "--text", "hi", "--log-level", "debug", "--model", "tiny"]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.reply.model, "tiny");
        assert_eq!(config.server.addr, "0.0.0.0:8000");
    }

    #[test]
    fn test_defaults_without_flags() {
        let args = Args::parse_from(["companion-mind", "--interactive"]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let args = Args::parse_from(["companion-mind", "--config", "/nonexistent/mind.toml"]);
        assert!(load_config(&args).is_err());
    }
}
