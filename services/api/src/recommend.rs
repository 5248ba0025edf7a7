use crate::infra::build_engine;
use clap::Args;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use technician_ai::assignment::{AssignmentRequest, Booking, Recommendation};
use technician_ai::config::AppConfig;
use technician_ai::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Booking request as JSON (same shape as the assign-technician endpoint)
    #[arg(long)]
    pub(crate) booking: PathBuf,
    /// CSV technician roster. Replaces APP_BACKEND_URL and APP_ROSTER_PATH; defaults to the demo roster.
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
    /// Classifier artifact enabling predictive scoring. Defaults to APP_MODEL_PATH.
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let recommendation = recommend(args, config)?;
    println!("{}", serde_json::to_string_pretty(&recommendation)?);
    Ok(())
}

fn recommend(args: RecommendArgs, mut config: AppConfig) -> Result<Recommendation, AppError> {
    let RecommendArgs {
        booking,
        roster,
        model,
    } = args;

    if roster.is_some() {
        config.directory.roster_path = roster;
        config.directory.backend_url = None;
    }
    if model.is_some() {
        config.scoring.model_path = model;
    }

    let booking = read_booking(&booking)?;
    let engine = build_engine(&config)?;
    Ok(engine.recommend(&booking)?)
}

fn read_booking(path: &Path) -> Result<Booking, AppError> {
    let reader = BufReader::new(File::open(path)?);
    let request: AssignmentRequest = serde_json::from_reader(reader)?;
    Ok(request.into_booking()?)
}
