use catchthephish::config_loader::ConfigLoader;
use catchthephish::machine_learning::ModelSource;
use catchthephish::{Config, ModelParameters, ScoringEngine, Verdict};
use clap::parser::ValueSource;
use clap::{Arg, ArgMatches, Command};
use log::LevelFilter;
use std::io::{self, BufRead};
use std::process;

const TOP_CONTRIBUTIONS: usize = 5;

#[tokio::main]
async fn main() {
    let matches = Command::new("catchthephish")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Phishing risk scoring for URLs from lexical features alone")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("/etc/catchthephish.yaml"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("SOURCE")
                .help("Model JSON path or http(s) URL, overrides the configuration")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Validate the configuration and load the model")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print each verdict as a JSON object")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("report")
                .short('r')
                .long("report")
                .help("Print the full feature table and the strongest model contributions")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("urls")
                .value_name("URL")
                .help("URLs to score; read one per line from stdin when omitted")
                .num_args(0..),
        )
        .get_matches();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        match ConfigLoader::write_default(generate_path) {
            Ok(()) => println!("Default configuration written to: {generate_path}"),
            Err(e) => {
                eprintln!("Error generating configuration: {e:#}");
                process::exit(1);
            }
        }
        return;
    }

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            process::exit(1);
        }
    };

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        config.log_level().unwrap_or(LevelFilter::Info)
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let source = match matches.get_one::<String>("model") {
        Some(location) => ModelSource::from_location(location, config.timeout_seconds()),
        None => config.model_source(),
    };
    let engine = ScoringEngine::from_source(source);

    if matches.get_flag("test-config") {
        test_config(&config, &engine).await;
        return;
    }

    let params = match engine.preload().await {
        Ok(params) => params,
        Err(e) => {
            eprintln!("Model unavailable: {e}");
            process::exit(2);
        }
    };

    let urls: Vec<String> = match matches.get_many::<String>("urls") {
        Some(values) => values.cloned().collect(),
        None => io::stdin().lock().lines().map_while(Result::ok).collect(),
    };

    for url in urls {
        if url.trim().is_empty() {
            log::warn!("Skipping empty input line");
            continue;
        }

        let verdict = engine.score_with(&params, &url);
        if matches.get_flag("json") {
            match serde_json::to_string(&verdict) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Failed to serialize verdict for {}: {}", url, e),
            }
        } else if matches.get_flag("report") {
            print_report(&params, &verdict);
        } else {
            println!("{}", verdict.summary());
            println!("  {}", verdict.explanation);
        }
    }
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<Config> {
    let path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("/etc/catchthephish.yaml");

    // the default location is optional, an explicit one is not
    if matches.value_source("config") == Some(ValueSource::DefaultValue) {
        ConfigLoader::load_or_default(path)
    } else {
        ConfigLoader::load(path)
    }
}

async fn test_config(config: &Config, engine: &ScoringEngine) {
    println!("🔍 Testing configuration...");
    println!("Model source: {}", engine.store().source());
    println!("Fetch timeout: {}s", config.timeout_seconds());

    match engine.preload().await {
        Ok(params) => {
            println!("✅ Model loaded: {} features", params.len());
            println!("   Intercept: {:.6}", params.intercept());
        }
        Err(e) => {
            println!("❌ Model unavailable: {e}");
            process::exit(1);
        }
    }
}

fn print_report(params: &ModelParameters, verdict: &Verdict) {
    println!("{}", verdict.summary());
    println!("  {}", verdict.explanation);
    println!("  {}", verdict.risk_tier().advice());
    println!("  Color:           {}", verdict.color);
    println!("  Raw probability: {:.4}", verdict.raw_probability);
    if let Some(rule) = &verdict.rule {
        println!("  Override rule:   {rule}");
    }

    let primary = verdict.primary_reasons();
    if !primary.is_empty() {
        println!("  Primary reasons:");
        for reason in primary {
            println!("    - {}", reason.title());
        }
    }

    println!("  Features:");
    for (name, value) in verdict.features.iter() {
        println!("    {name:<26} {value:>10.4}");
    }

    println!("  Strongest contributions:");
    for contribution in ScoringEngine::explain(params, verdict)
        .iter()
        .take(TOP_CONTRIBUTIONS)
    {
        println!(
            "    {:<26} {:>+10.4} ({:+.4} x {:.4})",
            contribution.name, contribution.contribution, contribution.coefficient, contribution.value
        );
    }
    println!();
}
