use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use vfig_bundle::{validate_figure_name, BundleStore, GenerateReport, LayoutKind};
use vfig_record::{FigureRecord, StatusSet};
use vfig_types::{names, Catalog};

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::resolve(cli.config.as_deref())?;
    let json = matches!(cli.format, OutputFormat::Json);
    match cli.command {
        Command::Catalog(args) => cmd_catalog(args, json),
        Command::Generate(args) => cmd_generate(args, config),
        Command::GenerateSeries(args) => cmd_generate_series(args, config),
        Command::GenerateAll(args) => cmd_generate_all(args, config),
        Command::Inspect(args) => cmd_inspect(args, json),
        Command::Rename(args) => cmd_rename(args),
        Command::Upgrade(args) => cmd_upgrade(args),
    }
}

fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read catalog {}", path.display()))?;
    Catalog::from_json(&text).with_context(|| format!("cannot parse catalog {}", path.display()))
}

fn cmd_catalog(args: CatalogArgs, json: bool) -> anyhow::Result<()> {
    let catalog = load_catalog(&args.file)?;
    let by_series = catalog.by_series();

    match &args.series {
        Some(series) => {
            let entries = by_series
                .get(series)
                .ok_or_else(|| anyhow!("no series named '{series}' in catalog"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(entries)?);
                return Ok(());
            }
            println!("{} ({} figures)", series.bold(), entries.len());
            for entry in entries {
                println!(
                    "  {}  {}  {}",
                    entry.identity_string().to_uppercase().dimmed(),
                    entry.name,
                    entry.character_name.cyan()
                );
            }
        }
        None => {
            if json {
                let counts: std::collections::BTreeMap<_, _> =
                    by_series.iter().map(|(s, e)| (s, e.len())).collect();
                println!("{}", serde_json::to_string_pretty(&counts)?);
                return Ok(());
            }
            for (series, entries) in &by_series {
                println!("{}  ({})", series.bold(), entries.len());
            }
        }
    }
    Ok(())
}

fn cmd_generate(args: GenerateArgs, mut config: CliConfig) -> anyhow::Result<()> {
    config.apply(&args.output);
    let catalog = load_catalog(&args.catalog)?;
    let entry = catalog
        .find(&args.series, &args.name)
        .ok_or_else(|| anyhow!("no figure '{}' in series '{}'", args.name, args.series))?;

    let figure_name = args
        .figure_name
        .clone()
        .unwrap_or_else(|| names::derive_short_name(&entry.name));
    let dir_name = args.dir.clone().unwrap_or_else(|| entry.name.clone());

    let dir = BundleStore::new().generate_one(
        &config.output_root,
        &dir_name,
        entry,
        &figure_name,
        &config.generate_options(),
        &mut rand::thread_rng(),
    )?;
    println!(
        "{} Generated {} ({} layout) in {}",
        "✓".green().bold(),
        figure_name.bold(),
        config.layout,
        dir.display()
    );
    Ok(())
}

fn cmd_generate_series(args: GenerateSeriesArgs, mut config: CliConfig) -> anyhow::Result<()> {
    config.apply(&args.output);
    let catalog = load_catalog(&args.catalog)?;
    let entries = catalog
        .by_series()
        .remove(&args.series)
        .ok_or_else(|| anyhow!("no series named '{}' in catalog", args.series))?;

    let report = BundleStore::new().generate_series(
        &config.output_root,
        &entries,
        &config.generate_options(),
        &mut rand::thread_rng(),
    );
    print_report(&report);
    Ok(())
}

fn cmd_generate_all(args: GenerateAllArgs, mut config: CliConfig) -> anyhow::Result<()> {
    config.apply(&args.output);
    let catalog = load_catalog(&args.catalog)?;
    let report = BundleStore::new().generate_all(
        &config.output_root,
        &catalog,
        &config.generate_options(),
        &mut rand::thread_rng(),
    );
    print_report(&report);
    Ok(())
}

fn print_report(report: &GenerateReport) {
    println!("{} Generated {} bundles", "✓".green().bold(), report.written.len());
    if !report.is_clean() {
        println!("{} Skipped {}:", "!".yellow().bold(), report.failed.len());
        for (name, reason) in &report.failed {
            println!("  {} {}", name.yellow(), reason.dimmed());
        }
    }
}

fn print_status(status: &StatusSet) {
    if status.is_empty() {
        println!("Status: {}", "ok".green());
        return;
    }
    for kind in status.iter() {
        if kind.is_fatal() {
            println!("Status: {}", kind.to_string().red());
        } else {
            println!("Status: {}", kind.to_string().yellow());
        }
    }
}

fn print_record(record: &FigureRecord) {
    let id = record.identity();
    println!("Name: {}", record.name.bold());
    println!("Identity: {}", id.to_hex().cyan());
    println!(
        "  character 0x{:04X}  variant 0x{:02X}  type 0x{:02X}  model 0x{:04X}  series 0x{:02X}",
        id.game_character_id(),
        id.character_variant(),
        id.figure_type(),
        id.model_number(),
        id.series()
    );
    if record.use_random_uuid {
        println!("UUID: {}", "random".yellow());
    } else {
        println!("UUID: {}", hex::encode_upper(record.uuid));
    }
    println!("First written: {}", record.first_write_date);
    println!("Last written: {}", record.last_write_date);
    println!("Write counter: {}  Version: {}", record.write_counter, record.version);
    println!("Mii data: {}", record.mii_data_filename);
    match record.areas() {
        Some(areas) if !areas.is_empty() => {
            println!("Areas:");
            for line in areas.describe() {
                println!("  {line}");
            }
        }
        Some(_) => println!("Areas: none registered"),
        None => println!("Areas: {}", "no area data".dimmed()),
    }
}

fn cmd_inspect(args: InspectArgs, json: bool) -> anyhow::Result<()> {
    let layout = LayoutKind::detect(&args.dir);
    let (status, record) = BundleStore::new().read_any(&args.dir);

    if json {
        let value = serde_json::json!({
            "layout": layout,
            "status": status,
            "record": record,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        match layout {
            Some(kind) => println!("Layout: {}", kind.to_string().bold()),
            None => println!("Layout: {}", "unknown".red()),
        }
        print_status(&status);
        if let Some(record) = &record {
            print_record(record);
        }
    }

    if record.is_none() {
        bail!("no readable bundle at {}: {}", args.dir.display(), status);
    }
    Ok(())
}

fn cmd_rename(args: RenameArgs) -> anyhow::Result<()> {
    validate_figure_name(&args.name)?;
    let store = BundleStore::new();
    let (status, record) = store.read(&args.dir, LayoutKind::Current);
    let mut record = record
        .ok_or_else(|| anyhow!("cannot read bundle at {}: {}", args.dir.display(), status))?;
    if !status.is_empty() {
        tracing::warn!(path = %args.dir.display(), %status, "bundle has diagnostics");
    }

    record.rename(&args.name);
    if let Some(random) = args.random_uuid {
        record.use_random_uuid = random;
    }

    store.rewrite(&args.dir, &record, LayoutKind::Current)?;

    println!("{} Renamed to {}", "✓".green().bold(), record.name.bold());
    Ok(())
}

fn cmd_upgrade(args: UpgradeArgs) -> anyhow::Result<()> {
    let record = BundleStore::new().upgrade(&args.src, &args.dst)?;
    println!(
        "{} Upgraded {} → {}",
        "✓".green().bold(),
        record.name.bold(),
        args.dst.display()
    );
    Ok(())
}
