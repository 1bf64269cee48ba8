use clap::Parser;

use gtfs_geojson::pipeline::config::Config;
use gtfs_geojson::pipeline::run;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON configuration file
    #[arg(long, default_value = "config.json")]
    config: String,

    /// Skip importing feeds and generate from the existing store
    #[arg(long)]
    skip_import: bool,
}

fn main() {
    let args = Args::parse();

    let raw = std::fs::read_to_string(&args.config)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", args.config));
    let mut config: Config =
        serde_json::from_str(&raw).unwrap_or_else(|e| panic!("invalid config: {e}"));
    if args.skip_import {
        config.skip_import = true;
    }

    let default_level = if config.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let geojson = runtime.block_on(run::run(&config)).unwrap();

    println!("{}", serde_json::to_string_pretty(&geojson).unwrap());
}
