//! Faraid — command-line Islamic inheritance calculator
//!
//! Reads a case from a TOML file and/or the command line, distributes the
//! estate with the classical rules and prints a table or JSON report.
//!
//! # Usage
//!
//! ```bash
//! faraid --case /path/to/case.toml
//! faraid --heir husband=1 --heir daughter=2 --estate 12000
//! faraid --case case.toml --json --expand
//! faraid --case case.toml --validate   # Validate the case and exit
//! ```

mod config;
mod report;

use anyhow::{Context, Result};
use faraid_core::{expand_individuals, InheritanceEngine};
use report::{OutputFormat, Report};
use std::path::PathBuf;

fn main() -> Result<()> {
    // Parse CLI args (minimal — no clap dependency needed)
    let args: Vec<String> = std::env::args().collect();

    let mut case_path: Option<PathBuf> = None;
    let mut heir_args: Vec<String> = Vec::new();
    let mut estate: Option<f64> = None;
    let mut json = false;
    let mut expand = false;
    let mut validate_only = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--case" | "-c" => {
                i += 1;
                if i < args.len() {
                    case_path = Some(PathBuf::from(&args[i]));
                } else {
                    anyhow::bail!("--case requires a path argument");
                }
            }
            "--heir" => {
                i += 1;
                if i < args.len() {
                    heir_args.push(args[i].clone());
                } else {
                    anyhow::bail!("--heir requires a CATEGORY=COUNT argument");
                }
            }
            "--estate" => {
                i += 1;
                if i < args.len() {
                    let value = args[i]
                        .parse::<f64>()
                        .with_context(|| format!("Invalid estate value: {}", args[i]))?;
                    estate = Some(value);
                } else {
                    anyhow::bail!("--estate requires a value");
                }
            }
            "--json" => {
                json = true;
            }
            "--expand" => {
                expand = true;
            }
            "--validate" => {
                validate_only = true;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--version" | "-V" => {
                println!("faraid {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            other => {
                anyhow::bail!("Unknown argument: {}", other);
            }
        }
        i += 1;
    }

    // Load case
    let mut case = match &case_path {
        Some(path) => config::CaseConfig::from_file(path)
            .with_context(|| format!("Failed to load case from {}", path.display()))?,
        None => config::CaseConfig::default(),
    };

    // Command line on top of the file
    for arg in &heir_args {
        case.add_heir_arg(arg)?;
    }
    if let Some(value) = estate {
        case.estate.value = value;
    }
    if json {
        case.output.format = "json".to_string();
    }
    if expand {
        case.output.expand_individuals = true;
    }

    // Apply env overrides
    case.apply_env_overrides();

    // Validate
    case.validate().context("Case validation failed")?;

    // Init logger
    std::env::set_var("RUST_LOG", &case.output.log_level);
    env_logger::init();

    let heirs = case.composition()?;
    let warnings = case.warnings();
    for warning in &warnings {
        log::warn!("{}", warning);
    }

    if validate_only {
        println!("✅ Case is valid.");
        println!("  Estate:        {:.2} {}", case.estate.value, case.estate.currency);
        println!("  Heirs:         {} in {} categories", heirs.total(), heirs.iter().count());
        for (category, count) in heirs.iter() {
            println!(
                "    {:<22} {:<14} {}",
                category.label(),
                category.arabic_name(),
                count
            );
        }
        println!(
            "  Spouse-only:   {:?}",
            case.engine.spouse_only_residue
        );
        println!("  Output:        {}", case.output.format);
        return Ok(());
    }

    let engine = InheritanceEngine::new(case.engine);
    let result = engine.compute(&heirs, case.estate.value);
    log::info!(
        "Distributed {:.2} {} over {} share lines",
        case.estate.value,
        case.estate.currency,
        result.entries.len()
    );

    let mut report = Report::new(&case.estate.currency, &result);
    report.warnings = warnings;
    if case.output.expand_individuals {
        report.individuals = Some(expand_individuals(&result, &case.heir_names()?));
    }

    let format: OutputFormat = case.output_format()?;
    print!("{}", report.render(format)?);
    if format == OutputFormat::Json {
        println!();
    }

    Ok(())
}

fn print_help() {
    println!(
        r#"faraid {}
Islamic inheritance (fara'id) distribution calculator

USAGE:
    faraid [OPTIONS]

OPTIONS:
    -c, --case <PATH>        Case file (TOML)
        --heir <CAT=N>       Add heirs, e.g. --heir daughter=2 (repeatable)
        --estate <VALUE>     Net estate value
        --json               Print the report as JSON
        --expand             One line per heir instead of per category
        --validate           Validate the case and exit
    -h, --help               Print help
    -V, --version            Print version

HEIR CATEGORIES:
    husband, wife, son, daughter, father, mother,
    paternal_grandfather, paternal_grandmother, maternal_grandmother,
    paternal_grandson, full_brother, full_sister, paternal_brother,
    paternal_sister, maternal_brother, maternal_sister

ENVIRONMENT:
    FARAID_ESTATE_VALUE         Override estate.value
    FARAID_CURRENCY             Override estate.currency
    FARAID_OUTPUT_FORMAT        Override output.format (table, json)
    FARAID_LOG_LEVEL            Override output.log_level
    FARAID_SPOUSE_ONLY_RESIDUE  return_to_spouses or leave_unassigned
    RUST_LOG                    Set by FARAID_LOG_LEVEL / output.log_level

EXAMPLE CASE (case.toml):
    [estate]
    value = 12000
    currency = "JOD"

    [heirs]
    husband = 1
    daughter = 2
    mother = 1

    [names]
    daughter = "Fatima, Maryam"

    [output]
    format = "table"
    expand_individuals = true
    log_level = "warn""#,
        env!("CARGO_PKG_VERSION")
    );
}
