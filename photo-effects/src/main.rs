//! Photo Effects command line client.
//!
//! Lists effects with their ratings, casts votes, and runs generations.

use std::env;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use photo_effects::catalog::SortOption;
use photo_effects::errors::SessionError;
use photo_effects::generation::GenerationSession;
use photo_effects::uploads::load_upload;
use photo_effects::{AppError, ClientConfig, Dependencies};
use ratings_shared::types::{Choice, Ratings};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "photo-effects", version, about = "Apply generative photo effects and rate them")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List effects with their ratings and your votes
    Effects {
        #[arg(long, value_enum, default_value_t = SortOption::Newest)]
        sort: SortOption,
    },
    /// Print the raw aggregates as JSON
    Ratings,
    /// Rate an effect
    Vote {
        effect: String,
        /// good or bad
        choice: Choice,
    },
    /// Apply an effect to one or two photos
    Generate {
        effect: String,
        #[arg(required = true, num_args = 1..=2)]
        images: Vec<PathBuf>,
        /// Directory for the result
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// Retry a failed generation this many times
        #[arg(long, default_value_t = 0)]
        retries: u32,
    },
}

/// Initialize tracing/logging. Logs go to stderr so command output stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("photo_effects=warn,ratings_ledger=warn"));

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn format_votes(likes: u64, dislikes: u64, vote: Option<Choice>) -> String {
    let vote = match vote {
        Some(Choice::Good) => "  (you: good)",
        Some(Choice::Bad) => "  (you: bad)",
        None => "",
    };
    format!("+{likes} / -{dislikes}{vote}")
}

async fn list_effects(deps: &Dependencies, sort: SortOption) -> Result<(), AppError> {
    let ratings = match deps.feedback.ratings().await {
        Ok(ratings) => ratings,
        Err(e) => {
            warn!(error = %e, "Failed to load ratings, showing effects unrated");
            Ratings::new()
        }
    };
    let votes = deps.feedback.user_votes().await;

    for rated in deps.catalog.rated(&ratings, &votes, sort) {
        let effect = rated.effect;
        println!(
            "{:<14} {:<16} {:>2} photo(s)  {}",
            effect.id,
            effect.title,
            effect.image_count.get(),
            format_votes(
                rated.aggregate.likes,
                rated.aggregate.dislikes,
                rated.user_vote
            )
        );
    }
    Ok(())
}

async fn vote(deps: &Dependencies, effect_id: &str, choice: Choice) -> Result<(), AppError> {
    if deps.catalog.get(effect_id).is_none() {
        return Err(AppError::UnknownEffect(effect_id.to_string()));
    }

    let outcome = deps.feedback.submit_vote(effect_id, choice).await?;
    if !outcome.changed {
        println!("You already voted {choice} on {effect_id}");
    }
    println!(
        "{effect_id}: {}",
        format_votes(
            outcome.aggregate.likes,
            outcome.aggregate.dislikes,
            Some(outcome.choice)
        )
    );
    Ok(())
}

async fn generate(
    deps: &Dependencies,
    effect_id: &str,
    images: &[PathBuf],
    out: PathBuf,
    retries: u32,
) -> Result<(), AppError> {
    let effect = deps
        .catalog
        .get(effect_id)
        .cloned()
        .ok_or_else(|| AppError::UnknownEffect(effect_id.to_string()))?;

    let mut uploads = Vec::with_capacity(images.len());
    for path in images {
        uploads.push(load_upload(path).await?);
    }

    let session = GenerationSession::new(effect, deps.generator()?);
    session.set_images(uploads).await?;

    let mut result = session.generate().await;
    let mut attempt = 0;
    while let Err(SessionError::Generation(e)) = &result {
        if attempt == retries {
            break;
        }
        attempt += 1;
        warn!(code = e.code(), attempt, "Generation failed, retrying");
        result = session.retry().await;
    }
    let image = result?;

    tokio::fs::create_dir_all(&out).await?;
    let path = out.join(image.file_name(effect_id));
    tokio::fs::write(&path, &image.bytes).await?;

    info!(path = %path.display(), "Saved result");
    println!("{}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;
    let deps = Dependencies::new(&config)?;

    match cli.command {
        Command::Effects { sort } => list_effects(&deps, sort).await?,
        Command::Ratings => {
            let ratings = deps.feedback.ratings().await?;
            println!("{}", serde_json::to_string_pretty(&ratings)?);
        }
        Command::Vote { effect, choice } => vote(&deps, &effect, choice).await?,
        Command::Generate {
            effect,
            images,
            out,
            retries,
        } => generate(&deps, &effect, &images, out, retries).await?,
    }

    Ok(())
}
