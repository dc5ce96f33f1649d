use clap::{Arg, Command};
use leadgate::config::Config;
use leadgate::spam::{SpamGuard, Submission};
use log::LevelFilter;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

#[tokio::main]
async fn main() {
    let matches = Command::new("leadgate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Form-submission gateway with spam guarding for the website contact forms")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("/etc/leadgate.yaml"),
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
                .help("Validate the configuration and spam rule tables")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("test-submission")
                .long("test-submission")
                .value_name("FILE")
                .help("Evaluate a JSON submission file against the spam guard and exit")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("listen")
                .short('l')
                .long("listen")
                .value_name("ADDR")
                .help("Override the listen address from the config file")
                .action(clap::ArgAction::Set),
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

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config_path = matches.get_one::<String>("config").unwrap();
    let mut config = load_config(config_path);
    config.apply_env_overrides();

    if let Some(listen) = matches.get_one::<String>("listen") {
        config.listen_addr = listen.clone();
    }

    if matches.get_flag("test-config") {
        test_config(&config);
        return;
    }

    if let Some(submission_file) = matches.get_one::<String>("test-submission") {
        test_submission(&config, submission_file);
        return;
    }

    if config.api_key.is_none() {
        log::warn!("RESEND_API_KEY is not set; submissions will be rejected with 500");
    }

    if let Err(e) = leadgate::server::run(config).await {
        eprintln!("Server error: {e}");
        process::exit(1);
    }
}

fn load_config(path: &str) -> Config {
    if !std::path::Path::new(path).exists() {
        log::warn!("Config file {path} not found, using built-in defaults");
        return Config::default();
    }
    match Config::from_file(path) {
        Ok(config) => {
            log::info!("Loaded configuration from {path}");
            config
        }
        Err(e) => {
            eprintln!("Error loading configuration from {path}: {e}");
            process::exit(1);
        }
    }
}

fn generate_default_config(path: &str) {
    let config = Config::default();
    match config.to_file(path) {
        Ok(()) => println!("Default configuration written to {path}"),
        Err(e) => {
            eprintln!("Failed to write configuration: {e}");
            process::exit(1);
        }
    }
}

fn test_config(config: &Config) {
    println!("Testing configuration...");
    match SpamGuard::new(&config.rules) {
        Ok(_) => {
            println!("  blocked domains:          {}", config.rules.blocked_domains.len());
            println!(
                "  blocked domain patterns:  {}",
                config.rules.blocked_domain_patterns.len()
            );
            println!("  blocked phrases:          {}", config.rules.blocked_phrases.len());
            println!("  quote inbox:              {}", config.quote_email);
            println!("  application inbox:        {}", config.application_email);
            println!(
                "  mail API key:             {}",
                if config.api_key.is_some() { "configured" } else { "MISSING" }
            );
            println!("Configuration is valid.");
        }
        Err(e) => {
            eprintln!("Configuration is invalid: {e}");
            process::exit(1);
        }
    }
}

fn test_submission(config: &Config, path: &str) {
    let guard = match SpamGuard::new(&config.rules) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Configuration is invalid: {e}");
            process::exit(1);
        }
    };
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Failed to read {path}: {e}");
            process::exit(1);
        }
    };
    let submission: Submission = match serde_json::from_str(&content) {
        Ok(submission) => submission,
        Err(e) => {
            eprintln!("Failed to parse {path}: {e}");
            process::exit(1);
        }
    };

    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);
    let verdict = guard.evaluate(&submission, now_ms);
    if verdict.blocked {
        println!(
            "BLOCKED: {}",
            verdict.reason.map(|r| r.to_string()).unwrap_or_default()
        );
    } else {
        println!("PASSED: submission would be forwarded");
    }
}
