use bodymetrics_core::*;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bodymetrics")]
#[command(about = "Body composition metrics calculator and tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate metrics (missing biometrics come from the saved profile)
    Calc {
        /// Body weight (kg, or lb with --units imperial)
        #[arg(long, allow_negative_numbers = true)]
        weight: Option<f64>,

        /// Height (cm, or inches with --units imperial)
        #[arg(long, allow_negative_numbers = true)]
        height: Option<f64>,

        /// Age in years
        #[arg(long)]
        age: Option<u32>,

        /// Gender (male, female, other)
        #[arg(long)]
        gender: Option<String>,

        /// Activity level (sedentary, light, moderate, very_active, extra_active)
        #[arg(long)]
        activity: Option<String>,

        /// Unit system for --weight and --height (metric, imperial)
        #[arg(long)]
        units: Option<String>,

        /// Append the result to history and remember the profile
        #[arg(long)]
        save: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the most recent saved calculations, newest first
    History {
        /// Number of records to show
        #[arg(long)]
        limit: Option<usize>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Roll up the history log into the CSV archive
    Rollup {
        /// Clean up processed logs after rollup
        #[arg(long)]
        cleanup: bool,
    },
}

/// On-disk layout under the data directory
struct DataPaths {
    log_dir: PathBuf,
    log_path: PathBuf,
    csv_path: PathBuf,
    profile_path: PathBuf,
}

impl DataPaths {
    fn new(data_dir: &Path) -> Self {
        let log_dir = data_dir.join("history");
        Self {
            log_path: log_dir.join("history.jsonl"),
            log_dir,
            csv_path: data_dir.join("history.csv"),
            profile_path: data_dir.join("profile.json"),
        }
    }
}

fn main() -> Result<()> {
    bodymetrics_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let paths = DataPaths::new(&data_dir);

    match cli.command {
        Commands::Calc {
            weight,
            height,
            age,
            gender,
            activity,
            units,
            save,
            json,
        } => {
            let input = CalcInput {
                weight,
                height,
                age,
                gender,
                activity,
                units,
            };
            cmd_calc(&paths, input, save, json, &config)
        }
        Commands::History { limit, json } => {
            cmd_history(&paths, limit.unwrap_or(config.history.recent_limit), json)
        }
        Commands::Rollup { cleanup } => cmd_rollup(&paths, cleanup),
    }
}

/// Biometrics exactly as given on the command line
struct CalcInput {
    weight: Option<f64>,
    height: Option<f64>,
    age: Option<u32>,
    gender: Option<String>,
    activity: Option<String>,
    units: Option<String>,
}

#[derive(Serialize)]
struct CalcOutput<'a> {
    profile: &'a Profile,
    metrics: &'a MetricsResult,
    suggestions: Vec<String>,
    summary: String,
}

fn cmd_calc(
    paths: &DataPaths,
    input: CalcInput,
    save: bool,
    json: bool,
    config: &Config,
) -> Result<()> {
    let saved = SavedProfile::load(&paths.profile_path)?.map(|s| s.profile);
    let profile = resolve_profile(input, saved.as_ref(), config)?;

    // Reject non-positive input before clamping can mask it
    engine::validate(&profile)?;
    let profile = config.limits.apply(profile)?;
    let metrics = compute(&profile)?;

    if json {
        let output = CalcOutput {
            profile: &profile,
            metrics: &metrics,
            suggestions: advice::suggestions(&metrics),
            summary: advice::share_summary(&metrics),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        display_metrics(&profile, &metrics);
    }

    if save {
        let record = HistoryRecord::new(&profile, &metrics, chrono::Utc::now());
        let mut sink = JsonlSink::new(&paths.log_path);
        sink.append(&record)?;
        SavedProfile::new(profile).save(&paths.profile_path)?;

        tracing::info!("Saved record {}", record.id);
        if !json {
            println!("\n✓ Saved to history");
        }
    }

    Ok(())
}

/// Merge command-line values with the saved profile and config defaults
fn resolve_profile(input: CalcInput, saved: Option<&Profile>, config: &Config) -> Result<Profile> {
    let units = match input.units {
        Some(u) => u.parse::<UnitSystem>()?,
        None => config.defaults.units,
    };

    let missing = |field: &str| {
        Error::InvalidInput(format!(
            "--{} is required (no saved profile to fall back on)",
            field
        ))
    };

    let weight_kg = match input.weight {
        Some(w) => units.weight_to_kg(w),
        None => saved.map(|p| p.weight_kg).ok_or_else(|| missing("weight"))?,
    };
    let height_cm = match input.height {
        Some(h) => units.height_to_cm(h),
        None => saved.map(|p| p.height_cm).ok_or_else(|| missing("height"))?,
    };
    let age_years = match input.age {
        Some(a) => a,
        None => saved.map(|p| p.age_years).ok_or_else(|| missing("age"))?,
    };
    let gender = match input.gender {
        Some(g) => g.parse::<Gender>()?,
        None => saved.map(|p| p.gender).ok_or_else(|| missing("gender"))?,
    };
    let activity_level = match input.activity {
        Some(a) => a.parse::<ActivityLevel>()?,
        None => saved
            .map(|p| p.activity_level)
            .unwrap_or(config.defaults.activity_level),
    };

    Ok(Profile {
        weight_kg,
        height_cm,
        age_years,
        gender,
        activity_level,
    })
}

fn cmd_history(paths: &DataPaths, limit: usize, json: bool) -> Result<()> {
    let records = load_recent_records(&paths.log_path, &paths.csv_path, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No records found yet. Run `bodymetrics calc --save` to save the first one.");
        return Ok(());
    }

    println!(
        "{:<17} {:>8} {:>8} {:>4} {:<7} {:>5} {:<12} {:>6} {:>7}",
        "Date", "Weight", "Height", "Age", "Gender", "BMI", "Category", "BMR", "kcal"
    );
    for record in &records {
        println!(
            "{:<17} {:>8.1} {:>8.1} {:>4} {:<7} {:>5.1} {:<12} {:>6} {:>7}",
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.weight_kg,
            record.height_cm,
            record.age_years,
            record.gender,
            record.bmi,
            record.category,
            record.bmr.round() as i64,
            record.daily_calories
        );
    }

    Ok(())
}

fn cmd_rollup(paths: &DataPaths, cleanup: bool) -> Result<()> {
    if !paths.log_path.exists() {
        println!("No history log found - nothing to roll up.");
        return Ok(());
    }

    let count = csv_rollup::log_to_csv_and_archive(&paths.log_path, &paths.csv_path)?;

    println!("✓ Rolled up {} records to CSV", count);
    println!("  CSV: {}", paths.csv_path.display());

    if cleanup {
        let cleaned = csv_rollup::cleanup_processed_logs(&paths.log_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed history logs", cleaned);
        }
    }

    Ok(())
}

fn display_metrics(profile: &Profile, metrics: &MetricsResult) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  BODY METRICS");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  {:.1} kg · {:.1} cm · {} years · {}",
        profile.weight_kg, profile.height_cm, profile.age_years, profile.gender
    );
    println!();
    println!("  BMI:            {:.1} ({})", metrics.bmi, metrics.category);
    println!("  Health risk:    {}", metrics.health_risk_note);
    println!(
        "  Ideal weight:   {:.1} - {:.1} kg",
        metrics.ideal_weight_range.min_kg, metrics.ideal_weight_range.max_kg
    );
    println!("  BMR:            {} kcal/day", metrics.bmr.round() as i64);
    println!(
        "  Daily calories: {} kcal/day ({})",
        metrics.daily_calories, profile.activity_level
    );
    println!("  Body fat:       {:.1}%", metrics.body_fat_pct);
    println!("  Water intake:   {} ml/day", metrics.water_intake_ml);
    println!("  Protein:        {} g/day", metrics.protein_g);
    println!();
    println!("  Suggestions:");
    for suggestion in advice::suggestions(metrics) {
        println!("  → {}", suggestion);
    }
    println!();
    println!("  Health tips:");
    for tip in advice::general_tips() {
        println!("  • {}", tip);
    }
    println!();
    println!("  {}", advice::share_summary(metrics));
}
