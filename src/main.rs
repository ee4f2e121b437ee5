use std::{path::PathBuf, sync::Arc, time::UNIX_EPOCH};

use clap::{Parser, Subcommand};
use log::debug;
use rebound::{
    AccessDecision, AppContext, AthleteProfile, AthleteVitals, ClientConfig, Gender, HttpBackend,
    Position, ProfilePatch, ReboundError, RegistrationWizard, TrainingMetrics,
    athlete::StepFields,
    format_recovery_time,
    prediction::PredictionHistory,
    session::{FileCredentialStorage, resolve_access},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Backend base URL, overrides the config file
    #[arg(long, global = true, env = "REBOUND_BACKEND_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an account and log in with it
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "REBOUND_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        gender: Gender,
        /// Height in centimeters
        #[arg(long)]
        height: f64,
        /// Weight in kilograms
        #[arg(long)]
        weight: f64,
        #[arg(long)]
        position: Position,
    },
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "REBOUND_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Show the profile of the logged in athlete
    Profile,
    /// Change some profile fields, the others are kept
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        gender: Option<Gender>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        position: Option<Position>,
    },
    /// Predict how long recovering from this week's training will take
    Predict {
        /// Training intensity, 1 to 10
        #[arg(long, default_value_t = 5)]
        intensity: u32,
        #[arg(long, default_value_t = 10.)]
        hours: f64,
        #[arg(long, default_value_t = 2)]
        matches: u32,
        /// Fatigue score, 1 to 10
        #[arg(long, default_value_t = 5)]
        fatigue: u32,
        /// ACL injury risk score, 1 to 10
        #[arg(long, default_value_t = 3)]
        acl: u32,
        #[arg(long)]
        rest_days: Option<u32>,
        #[arg(long)]
        performance: Option<f64>,
        #[arg(long)]
        team_contribution: Option<f64>,
        #[arg(long)]
        load_balance: Option<f64>,
        #[arg(long)]
        injured: Option<bool>,
    },
    /// List past predictions
    History {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show the effective settings, optionally changing and saving them
    Config {
        /// Directory for the credential and the prediction history
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        record_history: Option<bool>,
        /// Write the settings, --base-url included, to the config file
        #[arg(long)]
        save: bool,
    },
}

fn build_context(config: &ClientConfig) -> Result<AppContext<HttpBackend>, ReboundError> {
    let backend = HttpBackend::new(config)?;
    let storage_dir = config.storage_dir()?;
    let credentials = FileCredentialStorage::new(storage_dir.clone());
    debug!("Using credential file {:?}", credentials.path());

    let context = AppContext::new(backend, Arc::new(credentials));
    if config.record_history {
        Ok(context.with_history(PredictionHistory::in_dir(&storage_dir)))
    } else {
        Ok(context)
    }
}

/// The logged in athlete, after restoring the session from disk
async fn require_athlete(
    context: &AppContext<HttpBackend>,
) -> Result<AthleteProfile, ReboundError> {
    match resolve_access(&context.session).await {
        AccessDecision::Allow => context.session.athlete().ok_or(ReboundError::NotAuthenticated),
        AccessDecision::Pending | AccessDecision::RedirectToLogin => {
            println!("Not logged in, run `rebound login` first.");
            Err(ReboundError::NotAuthenticated)
        }
    }
}

fn print_profile(athlete: &AthleteProfile) {
    println!("{} [{}]", athlete.full_name, athlete.initials());
    println!("  Email:    {}", athlete.email);
    println!("  Age:      {}", athlete.age);
    println!("  Gender:   {}", athlete.gender);
    println!("  Height:   {} cm", athlete.height_cm);
    println!("  Weight:   {} kg", athlete.weight_kg);
    println!("  Position: {}", athlete.position);
}

fn history(config: &ClientConfig, limit: Option<usize>) -> Result<(), ReboundError> {
    if !config.record_history {
        println!("Recording is turned off in the config, showing earlier predictions only.");
    }
    let history = PredictionHistory::in_dir(&config.storage_dir()?);
    let records = history.load()?;
    if records.is_empty() {
        println!("No predictions recorded yet.");
        return Ok(());
    }

    let skip = limit.map_or(0, |limit| records.len().saturating_sub(limit));
    for record in records.iter().skip(skip) {
        let recorded_at = record
            .recorded_at
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        println!(
            "{}  intensity {:>2}  fatigue {:>2}  {:>6.2} days  ({})",
            recorded_at,
            record.metrics.training_intensity,
            record.metrics.fatigue_score,
            record.predicted_recovery_days,
            format_recovery_time(record.predicted_recovery_days)
        );
    }
    Ok(())
}

async fn run(cli: Args) -> Result<(), ReboundError> {
    let config = ClientConfig::load(cli.base_url)?;
    debug!("Using backend at {}", config.base_url);

    match cli.command {
        Commands::Register {
            name,
            email,
            password,
            age,
            gender,
            height,
            weight,
            position,
        } => {
            let mut wizard = RegistrationWizard::new();
            wizard.next(StepFields::Account {
                full_name: name,
                email,
                password,
            })?;
            wizard.next(StepFields::Physical {
                age,
                gender,
                height_cm: height,
                weight_kg: weight,
            })?;
            wizard.next(StepFields::Position { position })?;

            println!("{}", wizard.current_step().title());
            for (label, value) in wizard.summary() {
                println!("  {:<10} {}", format!("{}:", label), value);
            }
            let form = wizard.finish()?;

            let context = build_context(&config)?;
            let athlete = context.session.register(&form).await?;
            println!(
                "Welcome, {}! Your account has been created. Please verify your email.",
                athlete.full_name
            );
        }
        Commands::Login { email, password } => {
            let context = build_context(&config)?;
            match context.session.login(&email, &password).await {
                Ok(athlete) => println!("Logged in as {} ({})", athlete.full_name, athlete.email),
                Err(e) => {
                    if e.is_unverified_account() {
                        println!(
                            "Check the inbox of {} for the verification link, then log in again.",
                            email
                        );
                    }
                    return Err(e);
                }
            }
        }
        Commands::Logout => {
            let context = build_context(&config)?;
            context.session.logout();
            println!("Logged out.");
        }
        Commands::Profile => {
            let context = build_context(&config)?;
            let athlete = require_athlete(&context).await?;
            print_profile(&athlete);
        }
        Commands::UpdateProfile {
            name,
            email,
            age,
            gender,
            height,
            weight,
            position,
        } => {
            let patch = ProfilePatch {
                full_name: name,
                email,
                age,
                gender,
                height_cm: height,
                weight_kg: weight,
                position,
            };
            if patch.is_empty() {
                return Err(ReboundError::InvalidUserInput {
                    field: "profile".to_string(),
                    reason: "nothing to update".to_string(),
                });
            }
            patch.validate()?;

            let context = build_context(&config)?;
            require_athlete(&context).await?;
            let athlete = context.session.update_athlete_profile(&patch).await?;
            print_profile(&athlete);
        }
        Commands::Predict {
            intensity,
            hours,
            matches,
            fatigue,
            acl,
            rest_days,
            performance,
            team_contribution,
            load_balance,
            injured,
        } => {
            let metrics = TrainingMetrics {
                training_intensity: intensity,
                training_hours_per_week: hours,
                match_count_per_week: matches,
                fatigue_score: fatigue,
                acl_risk_score: acl,
                rest_days_per_week: rest_days,
                performance_score: performance,
                team_contribution_score: team_contribution,
                load_balance_score: load_balance,
                injury_indicator: injured,
            };
            metrics.validate()?;

            let context = build_context(&config)?;
            let athlete = require_athlete(&context).await?;
            let vitals = AthleteVitals::from(&athlete);
            let days = context
                .prediction
                .predict_recovery_time(&vitals, &metrics)
                .await?;

            let recovery = format_recovery_time(days);
            println!("Estimated recovery time: {}", recovery.primary);
            if let Some(secondary) = recovery.secondary {
                println!("                         {}", secondary);
            }
        }
        Commands::History { limit } => history(&config, limit)?,
        Commands::Config {
            data_dir,
            record_history,
            save,
        } => {
            let mut config = config;
            if data_dir.is_some() {
                config.data_dir = data_dir;
            }
            if let Some(record_history) = record_history {
                config.record_history = record_history;
            }

            println!("Backend:        {}", config.base_url);
            println!("Data directory: {}", config.storage_dir()?.display());
            println!("Record history: {}", config.record_history);
            if save {
                config.save()?;
                println!("Saved to {}", ClientConfig::default_path()?.display());
            }
        }
    }
    Ok(())
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let cli = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");

    // everything runs on one thread, requests only suspend the task that sent them
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Could not start async runtime");

    if let Err(e) = runtime.block_on(run(cli)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
