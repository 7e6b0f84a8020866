use std::path::PathBuf;

use runner_common::{run, KeyType, RunParams, RunReport, DEFAULT_CONFIG_PATH, EPSILON};
use tracing_subscriber::EnvFilter;

fn print_report(params: &RunParams, report: &RunReport) {
    println!("Built PGM index over {} keys (epsilon = {}):", report.keys, EPSILON);
    println!(
        "    Build time: {}",
        humantime::format_duration(report.build_time)
    );
    println!("    Size: {} MB", report.size_in_bytes / (1024 * 1024));
    println!("    Height: {}", report.height);
    println!("    Segments: {}", report.segments_count);
    for offset in &report.levels_offsets {
        println!("    Level offset: {}", offset);
    }
    println!();
    println!(
        "Saved {} segments ({:?}) to {}",
        report.saved,
        params.scope,
        params.segment_file.display()
    );
    println!("Loaded {} segments back", report.loaded);
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let params = RunParams::load(&config_path)?;

    let report = match params.key_type {
        KeyType::U32 => run::<u32>(&params)?,
        KeyType::U64 => run::<u64>(&params)?,
    };

    print_report(&params, &report);
    Ok(())
}
