//! Shop Investment Calculator
//!
//! A startup-cost, margin, break-even and payback calculator for
//! prospective small-shop owners.

mod calculator;
mod db;
mod models;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rusqlite::Connection;

use crate::models::{Plan, FIELDS};

#[derive(Parser)]
#[command(name = "shop-calculator")]
#[command(about = "Startup investment calculator for small shops")]
struct Cli {
    /// Path to the SQLite database holding plans
    #[arg(short, long, default_value = "shop_plans.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new plan with all fields empty
    New {
        /// Plan name
        name: String,
    },

    /// Set one input field and show the recomputed summary
    Set {
        /// Plan name
        plan: String,

        /// Field key (see 'fields')
        field: String,

        /// Raw value; anything that is not a number counts as 0
        value: String,
    },

    /// Show all derived metrics for a plan
    Summary {
        /// Plan name
        plan: String,

        /// Also list every input with its coerced value
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the raw stored text of every field
    Show {
        /// Plan name
        plan: String,
    },

    /// List all plans
    List,

    /// List all editable field keys
    Fields,

    /// Reset every field of a plan to empty
    Clear {
        /// Plan name
        plan: String,
    },

    /// Delete a plan
    Remove {
        /// Plan name
        plan: String,
    },

    /// Initialize empty database with schema
    Init,

    /// Load a sample plan for trying the calculator out
    LoadSample,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let conn = Connection::open(&cli.database)?;
    db::init_schema(&conn)?;

    match cli.command {
        Commands::New { name } => {
            if db::plan_exists(&conn, &name)? {
                println!("Plan '{}' already exists", name);
            } else {
                db::create_plan(&conn, &name)?;
                println!("Created plan '{}'. Fill it in with 'set {} <field> <value>'.", name, name);
            }
        }

        Commands::Set { plan, field, value } => {
            let mut snapshot = db::load_plan(&conn, &plan)?;
            snapshot.set_field(&field, value.as_str())?;
            db::set_field(&conn, &plan, &field, &value)?;

            // every edit re-derives the full metric set
            println!("{}", calculator::evaluate(&snapshot));
        }

        Commands::Summary { plan, verbose } => {
            let snapshot = db::load_plan(&conn, &plan)?;

            if verbose {
                println!("{}", calculator::format_inputs(&snapshot));
            }
            println!("{}", calculator::evaluate(&snapshot));
        }

        Commands::Show { plan } => {
            let snapshot = db::load_plan(&conn, &plan)?;
            println!("Plan: {}", snapshot.name);
            for spec in FIELDS {
                let raw = snapshot.field(spec.key)?;
                let shown = if raw.is_empty() { "(empty)" } else { raw };
                println!("  {:<18} {}", spec.key, shown);
            }
        }

        Commands::List => {
            let plans = db::list_plans(&conn)?;
            if plans.is_empty() {
                println!("No plans yet. Run 'new <name>' or 'load-sample' first.");
            } else {
                for name in plans {
                    println!("  {}", name);
                }
            }
        }

        Commands::Fields => {
            println!("{:<18} {:<30} {}", "Key", "Label", "Group");
            println!("{}", "-".repeat(66));
            for spec in FIELDS {
                println!("{:<18} {:<30} {}", spec.key, spec.label, spec.group.title());
            }
        }

        Commands::Clear { plan } => {
            db::clear_plan(&conn, &plan)?;
            println!("Cleared all fields of plan '{}'", plan);
        }

        Commands::Remove { plan } => {
            db::remove_plan(&conn, &plan)?;
            println!("Removed plan '{}'", plan);
        }

        Commands::Init => {
            println!("Database initialized at: {}", cli.database.display());
        }

        Commands::LoadSample => {
            let plan = sample_plan();
            db::save_plan(&conn, &plan)?;
            println!("Loaded sample plan '{}'\n", plan.name);
            println!("{}", calculator::evaluate(&plan));
        }
    }

    Ok(())
}

/// A filled-in example plan: a small snack shop
fn sample_plan() -> Plan {
    let mut plan = Plan::new("sample-snack-shop");
    let values = [
        ("transfer-fee", "5000"),
        ("tech-fee", "3000"),
        ("decoration", "8000"),
        ("ad", "2000"),
        ("equipment", "4000"),
        ("price", "20"),
        ("food-cost", "6"),
        ("packaging", "2"),
        ("daily-rent", "100"),
        ("daily-salary", "150"),
        ("energy", "20"),
        ("other", "10"),
        ("monthly-profit", "3000"),
    ];
    for (key, value) in values {
        // keys come from the registry, so this cannot fail
        plan.set_field(key, value).expect("sample field key");
    }
    plan
}
