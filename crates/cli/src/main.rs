use clap::{Parser, Subcommand};
use mdr_core::config::config_from_env_values;
use mdr_core::countdown::format_remaining;
use mdr_core::otp::OtpEntry;
use mdr_core::store::NotificationLevel;
use mdr_core::{
    ConfirmationResponse, CoreConfig, DirectoryError, DirectoryRepository, FormController,
    FormState, Orchestrator, Store, Submission,
};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "mdr")]
#[command(about = "MDR doctor directory CLI")]
struct Cli {
    /// JSON seed file holding doctors, specializations and affiliations
    #[arg(long, global = true, env = "MDR_SEED_FILE")]
    seed: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List doctors as display rows
    List {
        /// Only show rows containing this text (case-insensitive)
        #[arg(long)]
        query: Option<String>,
    },
    /// List specializations
    Specializations,
    /// List affiliations
    Affiliations,
    /// Validate a doctor form stored as JSON
    Validate {
        /// Path to the form JSON
        file: PathBuf,
    },
    /// Create (or, with `doctor_id`, update) a doctor from a form and save the seed file
    Save {
        /// Path to the form JSON
        file: PathBuf,
    },
    /// Delete a doctor and save the seed file
    Delete {
        /// Doctor id
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Run an OTP expiry countdown
    OtpCountdown {
        /// Override the configured expiry
        #[arg(long)]
        seconds: Option<u64>,
    },
}

/// Load the seed into a store through the orchestrator, as the dashboard would on mount.
async fn open_directory(cfg: &CoreConfig) -> CliResult<(Arc<DirectoryRepository>, Orchestrator)> {
    let repository = Arc::new(match cfg.seed_file() {
        Some(path) => DirectoryRepository::load(path)?,
        None => DirectoryRepository::default(),
    });
    let orchestrator = Orchestrator::new(repository.clone(), Arc::new(Store::default()));
    orchestrator.mount().finished().await;
    Ok((repository, orchestrator))
}

fn save(cfg: &CoreConfig, repository: &DirectoryRepository) -> CliResult<()> {
    let path = cfg
        .seed_file()
        .ok_or("no seed file given; pass --seed or set MDR_SEED_FILE")?;
    std::fs::write(path, repository.to_json()?)?;
    tracing::info!(
        path = %path.display(),
        doctors = repository.doctors().len(),
        "seed file written"
    );
    println!("Saved {}", path.display());
    Ok(())
}

fn read_form(path: &Path) -> CliResult<FormState> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Print the newest notification; an error notification fails the command.
fn report_outcome(orchestrator: &Orchestrator) -> CliResult<()> {
    let state = orchestrator.store().snapshot();
    match state.notifications.back() {
        Some(note) if note.level == NotificationLevel::Error => Err(note.message.clone().into()),
        Some(note) => {
            println!("{}", note.message);
            Ok(())
        }
        None => Ok(()),
    }
}

fn confirm(title: &str, subtitle: &str) -> CliResult<bool> {
    print!("{title}: {subtitle} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

#[tokio::main]
async fn main() -> CliResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("mdr_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = config_from_env_values(
        cli.seed.map(|p| p.to_string_lossy().into_owned()),
        std::env::var("MDR_DATE_FORMAT").ok(),
        std::env::var("MDR_OTP_EXPIRY_SECS").ok(),
        std::env::var("MDR_OTP_LENGTH").ok(),
    )?;

    match cli.command {
        Some(Commands::List { query }) => {
            let (_, orchestrator) = open_directory(&cfg).await?;
            let view = orchestrator
                .store()
                .view(query.as_deref().unwrap_or(""), cfg.date_format());
            if view.loading {
                println!(
                    "Directory incomplete: doctors, specializations and affiliations are all needed."
                );
            } else if view.rows.is_empty() {
                println!("No doctors found.");
            } else {
                for row in view.rows {
                    println!(
                        "{}. [{}] {} | {} | {} | {} | {} | {} | {}",
                        row.id,
                        row.doctor_id,
                        row.name_english,
                        row.specialization_title,
                        row.affiliation_title,
                        row.contact,
                        row.email,
                        row.address,
                        row.created_at
                    );
                }
            }
        }
        Some(Commands::Specializations) => {
            let (repository, _) = open_directory(&cfg).await?;
            for item in repository.specializations() {
                println!("{}: {}", item.id, item.title);
            }
        }
        Some(Commands::Affiliations) => {
            let (repository, _) = open_directory(&cfg).await?;
            for item in repository.affiliations() {
                println!("{}: {}", item.id, item.title);
            }
        }
        Some(Commands::Validate { file }) => {
            let mut form = FormController::with_state(read_form(&file)?);
            match form.submit() {
                Ok(Submission::Create(payload)) | Ok(Submission::Update { payload, .. }) => {
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                Err(errors) => {
                    for (field, message) in errors.iter() {
                        eprintln!("{field}: {message}");
                    }
                    return Err(format!("{} field(s) failed validation", errors.len()).into());
                }
            }
        }
        Some(Commands::Save { file }) => {
            let mut form = FormController::with_state(read_form(&file)?);
            let submission = form.submit().map_err(DirectoryError::Validation)?;
            let (repository, orchestrator) = open_directory(&cfg).await?;
            orchestrator.submit(submission).await?;
            report_outcome(&orchestrator)?;
            save(&cfg, &repository)?;
        }
        Some(Commands::Delete { id, yes }) => {
            let (repository, orchestrator) = open_directory(&cfg).await?;
            let name = orchestrator
                .store()
                .snapshot()
                .doctors
                .iter()
                .find(|d| d.id == id)
                .map(|d| d.name_english.clone())
                .unwrap_or_else(|| format!("doctor {id}"));

            orchestrator.request_delete(id, &name);
            let response = match orchestrator.confirmation() {
                Some(prompt) if yes || confirm(&prompt.title, &prompt.subtitle)? => {
                    ConfirmationResponse::Confirmed
                }
                _ => ConfirmationResponse::Cancelled,
            };
            match orchestrator.respond(response) {
                Some(handle) => {
                    handle.await?;
                    report_outcome(&orchestrator)?;
                    save(&cfg, &repository)?;
                }
                None => {
                    tracing::info!(doctor_id = id, "delete cancelled");
                    println!("Delete cancelled.");
                }
            }
        }
        Some(Commands::OtpCountdown { seconds }) => {
            let expiry = seconds.map_or(cfg.otp_expiry(), Duration::from_secs);
            let otp = OtpEntry::new(cfg.otp_length(), expiry)?;
            println!("{}-digit code expires in {}", otp.len(), otp.remaining_label());
            let mut remaining = otp.countdown().subscribe();
            while remaining.changed().await.is_ok() {
                let left = *remaining.borrow_and_update();
                println!("{}", format_remaining(left));
                if left == 0 {
                    break;
                }
            }
            println!("Code expired; request a new one.");
        }
        None => {
            println!("Use 'mdr --help' for commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdr_core::NonEmptyText;

    fn config_for(seed: Option<PathBuf>) -> CoreConfig {
        CoreConfig::new(
            seed,
            NonEmptyText::new("%d/%m/%Y").unwrap(),
            Duration::from_secs(60),
            4,
        )
        .unwrap()
    }

    #[test]
    fn save_writes_a_reloadable_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        let repository = DirectoryRepository::default();

        save(&config_for(Some(path.clone())), &repository).unwrap();

        let reloaded = DirectoryRepository::load(&path).unwrap();
        assert_eq!(reloaded.doctors(), repository.doctors());
    }

    #[test]
    fn save_without_seed_file_fails() {
        let err = save(&config_for(None), &DirectoryRepository::default()).unwrap_err();
        assert!(err.to_string().contains("no seed file"));
    }
}
