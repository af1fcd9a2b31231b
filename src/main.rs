use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};

use kcet_cutoff_advisor::category::Category;
use kcet_cutoff_advisor::models::StudentProfile;
use kcet_cutoff_advisor::{catalog, enhanced, predict, recommend, report, summary};

#[derive(Parser)]
#[command(name = "cutoff-advisor")]
#[command(about = "Cutoff prediction and eligibility ranking for KCET admissions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the predictions payload for a college catalog
    Predict {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        rank: Option<u32>,
        #[arg(long, value_delimiter = ',')]
        branches: Vec<String>,
        #[arg(long, default_value_t = 2025)]
        year: i32,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Rank eligible branches for a student
    Recommend {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        rank: u32,
        #[arg(long)]
        category: Category,
        #[arg(long, value_delimiter = ',')]
        branches: Vec<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Market-wide boom and cutoff movement summary
    Trends {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long, default_value_t = 2025)]
        year: i32,
    },
    /// Generate a markdown report for a student
    Report {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        rank: u32,
        #[arg(long)]
        category: Category,
        #[arg(long, value_delimiter = ',')]
        branches: Vec<String>,
        #[arg(long, default_value_t = 2025)]
        year: i32,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[derive(serde::Serialize)]
struct RecommendationRow<'a> {
    college: &'a str,
    location: &'a str,
    branch: &'a str,
    eligibility_score: f64,
    adjusted_cutoff: u32,
    boom_percent: u8,
    fees: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Predict {
            catalog,
            category,
            rank,
            branches,
            year,
            out,
        } => {
            let colleges = catalog::load_colleges(&catalog)
                .with_context(|| format!("failed to load catalog {}", catalog.display()))?;

            let profile = match (category, rank) {
                (Some(category), Some(rank)) => {
                    Some(StudentProfile::new(rank, category, branches)?)
                }
                _ => None,
            };

            let payload =
                enhanced::build_predictions_payload(&colleges, profile.as_ref(), year, Utc::now());
            let json = serde_json::to_string_pretty(&payload)?;

            match out {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!(
                        "Wrote {} predictions to {}.",
                        payload.predictions.len(),
                        path.display()
                    );
                }
                None => println!("{json}"),
            }
        }
        Commands::Recommend {
            catalog,
            rank,
            category,
            branches,
            limit,
            csv,
        } => {
            let colleges = catalog::load_colleges(&catalog)
                .with_context(|| format!("failed to load catalog {}", catalog.display()))?;
            let student = StudentProfile::new(rank, category, branches)?;
            let recommendations = recommend::recommendations(&colleges, &student);

            if recommendations.is_empty() {
                println!("No eligible branches for rank {rank} in category {category}.");
                return Ok(());
            }

            println!("Top branches for rank {rank} ({category}):");
            for rec in recommendations.iter().take(limit) {
                println!(
                    "- {} ({}) {}: eligibility {:.2}, adjusted cutoff {}, boom {}%",
                    rec.college.name,
                    rec.college.location,
                    rec.branch,
                    rec.eligibility_score,
                    rec.adjusted_cutoff,
                    rec.boom_percent
                );
            }

            if let Some(path) = csv {
                let mut writer = csv::Writer::from_path(&path)?;
                for rec in recommendations.iter().take(limit) {
                    writer.serialize(RecommendationRow {
                        college: &rec.college.name,
                        location: &rec.college.location,
                        branch: &rec.branch,
                        eligibility_score: rec.eligibility_score,
                        adjusted_cutoff: rec.adjusted_cutoff,
                        boom_percent: rec.boom_percent,
                        fees: rec.college.fees,
                    })?;
                }
                writer.flush()?;
                println!(
                    "Wrote {} recommendations to {}.",
                    recommendations.len().min(limit),
                    path.display()
                );
            }
        }
        Commands::Trends { catalog, year } => {
            let colleges = catalog::load_colleges(&catalog)
                .with_context(|| format!("failed to load catalog {}", catalog.display()))?;
            let predictions = predict::predict_colleges(&colleges, year);
            let market = summary::trending_summary(&predictions);

            if market.top_booming_branches.is_empty() {
                println!("No branch predictions for this catalog.");
                return Ok(());
            }

            println!("Average cutoff movement: {:+.1}%", market.average_cutoff_change);
            println!("Booming branches:");
            for name in market.top_booming_branches.iter() {
                println!("- {name}");
            }
            println!("Declining branches:");
            for name in market.top_declining_branches.iter() {
                println!("- {name}");
            }
        }
        Commands::Report {
            catalog,
            rank,
            category,
            branches,
            year,
            out,
        } => {
            let colleges = catalog::load_colleges(&catalog)
                .with_context(|| format!("failed to load catalog {}", catalog.display()))?;
            let student = StudentProfile::new(rank, category, branches)?;
            let report = report::build_report(&colleges, &student, year);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
