//! iOS Backup Extract - Export WhatsApp chats and voice memos from iOS backups.
//!
//! Reads an (unencrypted) iOS device backup, resolves files through its
//! `Manifest.db`, and writes per-conversation Markdown/HTML transcripts with
//! their attachments, plus the raw Voice Memos recordings.
//!
//!   ios-backup-extract                  # List backups with their dates
//!   ios-backup-extract <backup-id>      # Export into ./out

mod application;
mod cli;
mod domain;
mod infrastructure;
#[cfg(test)]
mod test_support;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    export_voice_memos, export_whatsapp, format_backups_json, format_backups_plain,
    format_backups_table, format_voice_memo_summary, format_whatsapp_summary, OutputFormat,
    RunContext,
};
use cli::Cli;
use domain::AppConfig;
use infrastructure::{list_backups, load_config};

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(cli: &Cli) -> domain::Result<()> {
    let format = cli
        .output_format()
        .map_err(|e| domain::AppError::Config { message: e })?;

    let mut config = load_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    match &cli.backup_id {
        None => cmd_list(&config, format),
        Some(id) => cmd_extract(&config, id, cli),
    }
}

/// List available backups.
fn cmd_list(config: &AppConfig, format: OutputFormat) -> domain::Result<()> {
    let backups = list_backups(&config.backups_dir())?;

    let output = match format {
        OutputFormat::Table => format_backups_table(&backups),
        OutputFormat::Json => format_backups_json(&backups).map_err(domain::AppError::json)?,
        OutputFormat::Plain => format_backups_plain(&backups),
    };

    println!("{output}");
    Ok(())
}

/// Run the exporters against one backup.
fn cmd_extract(config: &AppConfig, backup_id: &str, cli: &Cli) -> domain::Result<()> {
    let ctx = RunContext::new(config, backup_id)?;

    if !cli.skip_whatsapp {
        let stats = export_whatsapp(&ctx)?;
        println!("{}", format_whatsapp_summary(&stats));
    }

    if !cli.skip_voice_memos {
        let stats = export_voice_memos(&ctx)?;
        println!("{}", format_voice_memo_summary(&stats));
    }

    println!("{}", "ok".green().bold());
    Ok(())
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
