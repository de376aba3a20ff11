use clap::{Parser, Subcommand};
use pp_case::{CaseResult, load_case_file, render_text, run_file};
use pp_core::constants::R_GAS;
use pp_thermo::SpeciesDatabase;
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(name = "propep")]
#[command(about = "Propellant equilibrium and rocket performance calculator", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every case in a YAML case file
    Run {
        /// Path to the case YAML file
        case_path: PathBuf,
        /// Print reports as JSON
        #[arg(long)]
        json: bool,
    },
    /// List product species, optionally filtered by name
    Species { query: Option<String> },
    /// List propellant ingredients, optionally filtered by name
    Propellants { query: Option<String> },
    /// Show data for one species or ingredient
    Info { name: String },
}

fn main() -> CaseResult<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let db = SpeciesDatabase::standard();
    match cli.command {
        Commands::Run { case_path, json } => cmd_run(&db, &case_path, json),
        Commands::Species { query } => {
            cmd_species(&db, query.as_deref().unwrap_or(""));
            Ok(())
        }
        Commands::Propellants { query } => {
            cmd_propellants(&db, query.as_deref().unwrap_or(""));
            Ok(())
        }
        Commands::Info { name } => {
            cmd_info(&db, &name);
            Ok(())
        }
    }
}

fn cmd_run(db: &SpeciesDatabase, case_path: &Path, json: bool) -> CaseResult<()> {
    let file = load_case_file(case_path)?;
    let results = run_file(db, &file);

    if json {
        let mut reports = Vec::new();
        for (case, result) in file.cases.iter().zip(results) {
            match result {
                Ok(report) => reports.push(serde_json::to_value(&report)?),
                Err(err) => reports.push(serde_json::json!({ "name": case.name, "error": err.to_string() })),
            }
        }
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for (case, result) in file.cases.iter().zip(results) {
        match result {
            Ok(report) => println!("{}", render_text(&report)),
            Err(err) => println!("=== {} ===\nFAILED: {err}\n", case.name),
        }
    }
    Ok(())
}

fn cmd_species(db: &SpeciesDatabase, query: &str) {
    for id in db.search_species(query) {
        let sp = db.species(id);
        println!(
            "{:>4}  {:<12} {:<9} {:>9.4} g/mol  {:>7.2}-{:<7.2} K",
            id.index(),
            sp.name(),
            format!("{:?}", sp.phase()).to_lowercase(),
            sp.molar_mass(),
            sp.t_min(),
            sp.t_max()
        );
    }
}

fn cmd_propellants(db: &SpeciesDatabase, query: &str) {
    for id in db.search_propellants(query) {
        let p = db.propellant(id);
        println!(
            "{:>4}  {:<12} {:<10} {:>12.1} J/mol  {:>7.4} g/cm^3",
            id.index(),
            p.name(),
            p.formula().to_string(),
            p.heat_of_formation(),
            p.density()
        );
    }
}

fn cmd_info(db: &SpeciesDatabase, name: &str) {
    let mut found = false;
    if let Some(id) = db.find_species(name) {
        found = true;
        let sp = db.species(id);
        println!("Species {} ({})", sp.name(), sp.formula());
        println!("  phase: {:?}", sp.phase());
        println!("  molar mass: {:.4} g/mol", sp.molar_mass());
        println!("  data range: {:.2} - {:.2} K", sp.t_min(), sp.t_max());
        println!("  heat of formation: {:.1} J/mol", sp.heat_of_formation());
        println!("  {:>8} {:>12} {:>14} {:>12}", "T [K]", "Cp [J/molK]", "H [kJ/mol]", "S [J/molK]");
        let (lo, hi) = (sp.t_min(), sp.t_max());
        for i in 0..=5 {
            let t = lo + (hi - lo) * f64::from(i) / 5.0;
            println!(
                "  {:>8.2} {:>12.3} {:>14.3} {:>12.3}",
                t,
                sp.specific_heat0(t) * R_GAS,
                sp.enthalpy0(t) * R_GAS * t / 1000.0,
                sp.entropy0(t) * R_GAS
            );
        }
    }
    if let Some(id) = db.find_propellant(name) {
        found = true;
        let p = db.propellant(id);
        println!("Ingredient {} ({})", p.name(), p.formula());
        println!("  molar mass: {:.4} g/mol", p.molar_mass());
        println!("  heat of formation: {:.1} J/mol", p.heat_of_formation());
        println!("  density: {:.4} g/cm^3", p.density());
    }
    if !found {
        eprintln!("No species or ingredient named '{name}'");
    }
}
