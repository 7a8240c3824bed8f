use clap::{Arg, Command};
use log::LevelFilter;
use phish_scan::ai::{fuse, AiClient};
use phish_scan::report;
use phish_scan::{AnalyzerConfig, PhishingAnalyzer};
use std::io::Read;
use std::process;

#[tokio::main]
async fn main() {
    let matches = Command::new("phish-scan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Heuristic phishing-risk analysis for arbitrary text")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("/etc/phish-scan.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Write the default configuration file and exit")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Validate the configuration and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("text")
                .short('t')
                .long("text")
                .value_name("TEXT")
                .help("Text to analyze (reads stdin when neither --text nor --file is given)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("File whose contents to analyze")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Emit the structured result as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("links-only")
                .long("links-only")
                .help("Report only per-link analysis")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quick")
                .long("quick")
                .help("Print a one-line verdict instead of the full report")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ai")
                .long("ai")
                .value_name("ENDPOINT")
                .help("Also consult an AI collaborator at this endpoint")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("ai-timeout")
                .long("ai-timeout")
                .value_name("SECONDS")
                .help("Timeout for the AI call")
                .default_value("20"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(path) = matches.get_one::<String>("generate-config") {
        generate_default_config(path);
        return;
    }

    let config_path = matches.get_one::<String>("config").unwrap();
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            process::exit(1);
        }
    };

    if matches.get_flag("test-config") {
        let warnings = config.validate();
        if warnings.is_empty() {
            println!("Configuration OK");
        } else {
            println!("Configuration loaded with {} warning(s):", warnings.len());
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
        return;
    }

    let text = match read_input(&matches) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading input: {e}");
            process::exit(1);
        }
    };

    let analyzer = PhishingAnalyzer::new(config);

    if matches.get_flag("links-only") {
        let reports = analyzer.analyze_urls(&text);
        if matches.get_flag("json") {
            println!("{}", serde_json::to_string_pretty(&reports).unwrap());
        } else {
            print!("{}", report::render_link_report(&reports));
        }
        return;
    }

    let assessment = analyzer.assess(&text);

    // Optional AI collaborator; any failure degrades to the rule-based
    // result.
    let opinion = match matches.get_one::<String>("ai") {
        Some(endpoint) => {
            let timeout: u64 = matches
                .get_one::<String>("ai-timeout")
                .unwrap()
                .parse()
                .unwrap_or(20);
            match AiClient::new(endpoint.clone(), timeout) {
                Ok(client) => match client.analyze(&text).await {
                    Ok(opinion) => Some(opinion),
                    Err(e) => {
                        log::warn!("AI analysis unavailable, using rule-based result: {e}");
                        None
                    }
                },
                Err(e) => {
                    log::warn!("AI client setup failed, using rule-based result: {e}");
                    None
                }
            }
        }
        None => None,
    };

    let (score, level) = fuse(
        &assessment,
        opinion.as_ref(),
        &analyzer.config().thresholds,
    );

    if matches.get_flag("quick") {
        println!("{}", report::render_quick_check(&assessment));
        return;
    }

    if matches.get_flag("json") {
        let output = serde_json::json!({
            "assessment": assessment,
            "ai_opinion": opinion,
            "score": score,
            "risk_level": level,
        });
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else {
        print!("{}", report::render_report(&assessment));
        if let Some(op) = &opinion {
            println!();
            println!("--- AI Opinion ---");
            println!(
                "{} (confidence {:.2}): {}",
                op.risk_level, op.confidence_score, op.detailed_analysis
            );
            println!("Fused score: {:.2} ({})", score, level);
        }
    }
}

fn load_config(path: &str) -> anyhow::Result<AnalyzerConfig> {
    if std::path::Path::new(path).exists() {
        log::info!("Loading configuration from {}", path);
        AnalyzerConfig::load_from_file(path)
    } else {
        log::info!("No configuration file at {}, using defaults", path);
        Ok(AnalyzerConfig::default())
    }
}

fn generate_default_config(path: &str) {
    let config = AnalyzerConfig::default();
    match config.to_yaml().and_then(|yaml| {
        std::fs::write(path, yaml).map_err(anyhow::Error::from)
    }) {
        Ok(()) => println!("Default configuration written to {}", path),
        Err(e) => {
            eprintln!("Error writing configuration: {e}");
            process::exit(1);
        }
    }
}

fn read_input(matches: &clap::ArgMatches) -> anyhow::Result<String> {
    if let Some(text) = matches.get_one::<String>("text") {
        return Ok(text.clone());
    }
    if let Some(path) = matches.get_one::<String>("file") {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}
