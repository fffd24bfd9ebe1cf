use spot_reporter::core::config::Config;
use spot_reporter::core::error::AppError;
use spot_reporter::core::state::AppState;
use spot_reporter::features::auth::dtos::CredentialsDto;
use spot_reporter::features::spots::dtos::{ImageAsset, SpotDraft, VoteDirection};
use spot_reporter::features::spots::models::{Spot, SpotSeverity, SpotType};
use spot_reporter::shared::formatting::{format_optional_date_time, status_text, type_label};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: spot-reporter <list | show <id> | vote <id> up|down | submit <type> <severity> [comment] [images...]>";

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(2);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!("Configuration loaded successfully");

    let state = AppState::from_config(&config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&state, &args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("{}", e.user_message());
            Err(e.into())
        }
    }
}

async fn run(state: &AppState, args: &[String]) -> Result<(), AppError> {
    sign_in_from_env(state).await?;

    let command = args.first().map(String::as_str);
    match command {
        Some("list") => {
            let count = state.store.load().await?;
            for spot in state.store.snapshot() {
                println!("{}", summary_line(&spot));
            }
            tracing::info!("Listed {} spots", count);
        }
        Some("show") => {
            let id = arg(args, 1, "spot id")?;
            let spot = state.store.refresh_one(id).await?;
            print_details(&spot);
        }
        Some("vote") => {
            let id = arg(args, 1, "spot id")?;
            let direction = arg(args, 2, "vote direction")?
                .parse::<VoteDirection>()
                .map_err(AppError::Validation)?;

            let spot = state.store.refresh_one(id).await?;
            let updated = state.voting.vote(&spot, direction).await?;
            println!("{}: {} votes", updated.id, updated.voting);
        }
        Some("submit") => {
            let draft = parse_draft(&args[1..])?;
            let location = state.geolocator.current_position().await?;
            let spot = state.submissions.submit(&draft, location).await?;
            println!("Created spot {}", spot.id);
        }
        _ => return Err(AppError::Validation(USAGE.to_string())),
    }

    Ok(())
}

/// Sign in when `SPOT_EMAIL` and `SPOT_PASSWORD` are set, otherwise stay anonymous
async fn sign_in_from_env(state: &AppState) -> Result<(), AppError> {
    match (std::env::var("SPOT_EMAIL"), std::env::var("SPOT_PASSWORD")) {
        (Ok(email), Ok(password)) => {
            state
                .session
                .sign_in(CredentialsDto::new(email, password))
                .await?;
        }
        _ => {
            state.session.restore(None).await?;
        }
    }
    Ok(())
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str, AppError> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| AppError::Validation(format!("missing {}\n{}", name, USAGE)))
}

/// `<type> <severity> [comment] [images...]`. Arguments naming an existing
/// file are images; the first other argument is the comment.
fn parse_draft(args: &[String]) -> Result<SpotDraft, AppError> {
    let spot_type = args
        .first()
        .map(|s| s.parse::<SpotType>())
        .transpose()
        .map_err(AppError::Validation)?;
    let severity = args
        .get(1)
        .map(|s| {
            s.parse::<u8>()
                .map_err(|_| format!("invalid severity '{}'", s))
                .and_then(SpotSeverity::try_from)
        })
        .transpose()
        .map_err(AppError::Validation)?;

    let mut comment = None;
    let mut images = Vec::new();
    for value in args.iter().skip(2) {
        if std::path::Path::new(value).is_file() {
            images.push(ImageAsset::from_path(value));
        } else if comment.is_none() {
            comment = Some(value.clone());
        }
    }

    Ok(SpotDraft {
        spot_type,
        severity,
        comment,
        images,
    })
}

fn summary_line(spot: &Spot) -> String {
    format!(
        "{}  {:<12} severity {}  votes {:>3}  {:<8}  {}",
        spot.id,
        type_label(spot.spot_type),
        spot.severity,
        spot.voting,
        status_text(spot.status),
        format_optional_date_time(spot.created_at.as_ref())
    )
}

fn print_details(spot: &Spot) {
    println!("{}", summary_line(spot));
    println!(
        "  location: {:.5}, {:.5}",
        spot.location.latitude, spot.location.longitude
    );
    if let Some(comment) = &spot.comment {
        println!("  comment:  {}", comment);
    }
    for image in &spot.images {
        println!("  image:    {}", image);
    }
    println!(
        "  updated:  {}",
        format_optional_date_time(spot.updated_at.as_ref())
    );
}
