mod feed;
mod geo;
mod query;
mod web;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;

use crate::feed::epoch::format_epoch;
use crate::feed::{FeedLoader, FeedSource};
use crate::web::Config;

#[derive(Parser)]
#[command(name = "iss-tracker")]
#[command(about = "ISS trajectory data over HTTP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Common {
    /// YAML configuration file
    #[arg(long, env = "ISS_CONFIG")]
    config: Option<String>,
    /// Feed URL or file path, overrides the configuration
    #[arg(long, env = "ISS_FEED_SOURCE")]
    source: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        #[command(flatten)]
        common: Common,
        /// Listen address, overrides the configuration
        #[arg(long, env = "ISS_BIND")]
        bind: Option<String>,
    },
    /// Load the feed once and print a summary
    Summary {
        #[command(flatten)]
        common: Common,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { common, bind } => serve(common, bind).await,
        Commands::Summary { common } => summary(common).await,
    }
}

fn load_config(common: &Common) -> Option<Config> {
    let mut config = match &common.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error reading config {}: {}", path, e);
                return None;
            }
        },
        None => Config::default(),
    };

    if let Some(source) = &common.source {
        config.feed.source = source.clone();
    }
    Some(config)
}

async fn serve(common: Common, bind: Option<String>) -> ExitCode {
    let Some(mut config) = load_config(&common) else {
        return ExitCode::FAILURE;
    };
    if let Some(bind) = bind {
        config.web.bind = bind;
    }

    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn summary(common: Common) -> ExitCode {
    let Some(config) = load_config(&common) else {
        return ExitCode::FAILURE;
    };

    let loader = FeedLoader::new(FeedSource::parse(&config.feed.source));
    let dataset = match loader.load().await {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Feed error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let meta = dataset.metadata();
    println!(
        "{} ({}), frame {}",
        meta.object_name.as_deref().unwrap_or("unknown object"),
        meta.object_id.as_deref().unwrap_or("-"),
        meta.ref_frame.as_deref().unwrap_or("-"),
    );
    if let (Some(first), Some(last)) = (dataset.first(), dataset.last()) {
        println!(
            "{} state vectors from {} to {}",
            dataset.len(),
            format_epoch(&first.epoch),
            format_epoch(&last.epoch)
        );
    }

    match dataset.average_speed() {
        Ok(avg) => println!("Average speed: {:.3} km/s", avg),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if let Ok(closest) = dataset.closest_to(Utc::now()) {
        let p = closest.position;
        let v = closest.velocity;
        println!("Closest epoch: {}", format_epoch(&closest.epoch));
        println!("  position: {:.3} i + {:.3} j + {:.3} k (km)", p.x, p.y, p.z);
        println!("  velocity: {:.3} i + {:.3} j + {:.3} k (km/s)", v.x, v.y, v.z);
        println!("  speed:    {:.3} km/s", closest.speed());
    }

    ExitCode::SUCCESS
}
