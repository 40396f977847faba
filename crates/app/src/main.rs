use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use resume_screen_core::{
    build_archive, build_listing_archive, collect_resume_paths, load_documents_best_effort,
    upload_to_store, EvaluationError, GeminiClient, GeminiConfig, ResumeStore, Screener,
    ScreeningReport, SkippedResume, UploadedDocument, DEFAULT_ENDPOINT, DEFAULT_MODEL,
    LISTING_ARCHIVE_NAME, SUITABLE_ARCHIVE_NAME, UNSUITABLE_ARCHIVE_NAME,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "resume-screen", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// SQLite file holding the resume corpus
    #[arg(long, env = "RESUME_DB", default_value = "resumes.db")]
    database: PathBuf,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Gemini model used for every evaluation
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Gemini API base URL
    #[arg(long, env = "GEMINI_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
}

#[derive(Args)]
struct JobDescriptionArgs {
    /// Job description text
    #[arg(long, conflicts_with = "jd_file")]
    jd: Option<String>,

    /// File containing the job description
    #[arg(long)]
    jd_file: Option<PathBuf>,
}

impl JobDescriptionArgs {
    fn resolve(&self) -> anyhow::Result<String> {
        let text = match (&self.jd, &self.jd_file) {
            (Some(text), _) => text.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("reading job description from {}", path.display()))?,
            (None, None) => anyhow::bail!("pass --jd or --jd-file"),
        };

        if text.trim().is_empty() {
            anyhow::bail!("please provide a job description for analysis");
        }
        Ok(text)
    }
}

#[derive(Args)]
struct ResumeInputArgs {
    /// Resume file (pdf or docx); repeatable
    #[arg(long = "file")]
    files: Vec<PathBuf>,

    /// Folder scanned recursively for pdf and docx resumes
    #[arg(long)]
    folder: Option<PathBuf>,
}

impl ResumeInputArgs {
    fn load(&self) -> anyhow::Result<(Vec<UploadedDocument>, Vec<SkippedResume>)> {
        let paths = collect_resume_paths(&self.files, self.folder.as_deref())?;
        let report = load_documents_best_effort(&paths);
        Ok((report.documents, report.skipped))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Screen resumes against a job description and store them.
    Screen {
        #[command(flatten)]
        jd: JobDescriptionArgs,
        #[command(flatten)]
        input: ResumeInputArgs,
        /// Where the suitable/unsuitable archives are written.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Store resumes, skipping any already stored with identical text.
    Upload {
        #[command(flatten)]
        input: ResumeInputArgs,
    },
    /// Re-evaluate every stored resume against a new job description.
    Rematch {
        #[command(flatten)]
        jd: JobDescriptionArgs,
        /// Where the suitable/unsuitable archives are written.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// List stored resume names with their upload dates.
    List {
        /// Also write the listing archive to this path.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Write the latest stored version of a resume to disk.
    Fetch {
        #[arg(long)]
        name: String,
        /// Output path; defaults to the resume name in the current directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete every stored version of a resume.
    Delete {
        #[arg(long)]
        name: String,
    },
    /// Keep only the earliest stored record for each name.
    Collapse,
    /// Delete every stored resume.
    Wipe,
}

fn screener(cli: &Cli) -> anyhow::Result<Screener<GeminiClient>> {
    let api_key = cli
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or(EvaluationError::MissingApiKey)?;

    let config = GeminiConfig::new(api_key)
        .with_model(&cli.model)
        .with_endpoint(&cli.endpoint);
    Ok(Screener::new(GeminiClient::new(config)))
}

fn print_skipped(skipped: &[SkippedResume]) {
    for item in skipped {
        println!("error processing resume '{}': {}", item.name, item.reason);
    }
}

fn print_results(report: &ScreeningReport) {
    if report.results.is_empty() {
        println!("no resumes were evaluated");
        return;
    }

    println!("{:<40} {:>8}  {}", "resume", "match", "suitability");
    for result in &report.results {
        println!(
            "{:<40} {:>7}%  {}",
            result.resume_name, result.match_percentage, result.suitability
        );
    }
}

fn write_archives(report: &ScreeningReport, out_dir: &Path) -> anyhow::Result<()> {
    let (suitable, unsuitable) = report.split_by_suitability();
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    for (files, archive_name) in [
        (suitable, SUITABLE_ARCHIVE_NAME),
        (unsuitable, UNSUITABLE_ARCHIVE_NAME),
    ] {
        if files.is_empty() {
            continue;
        }
        let path = out_dir.join(archive_name);
        std::fs::write(&path, build_archive(&files)?)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("wrote {} ({} resumes)", path.display(), files.len());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        database = %cli.database.display(),
        "resume-screen boot"
    );

    let store = ResumeStore::open(&cli.database).await?;
    let outcome = run(&cli, &store).await;
    store.close().await;
    outcome
}

async fn run(cli: &Cli, store: &ResumeStore) -> anyhow::Result<()> {
    match &cli.command {
        Command::Screen { jd, input, out_dir } => {
            let job_description = jd.resolve()?;
            let screener = screener(cli)?;
            let (documents, load_failures) = input.load()?;

            let report = screener
                .screen_uploads(&job_description, &documents, store)
                .await?;

            print_skipped(&load_failures);
            print_skipped(&report.skipped);
            print_results(&report);
            write_archives(&report, out_dir)?;
        }
        Command::Upload { input } => {
            let (documents, load_failures) = input.load()?;
            let report = upload_to_store(&documents, store).await?;

            print_skipped(&load_failures);
            print_skipped(&report.skipped);
            for name in &report.uploaded {
                println!("uploaded {name} to the database");
            }
            for name in &report.duplicates {
                println!(
                    "file '{name}' already exists in the database with the same content, skipping upload"
                );
            }
        }
        Command::Rematch { jd, out_dir } => {
            let job_description = jd.resolve()?;
            let screener = screener(cli)?;

            let report = screener.rematch_corpus(&job_description, store).await?;
            if report.results.is_empty() && report.skipped.is_empty() {
                println!("no resumes found in the database");
                return Ok(());
            }

            print_skipped(&report.skipped);
            print_results(&report);
            write_archives(&report, out_dir)?;
        }
        Command::List { export } => {
            let listings = store.list().await?;
            println!("{:<40} {}", "name", "upload date");
            for listing in &listings {
                println!("{:<40} {}", listing.name, listing.uploaded_at.to_rfc3339());
            }

            if let Some(path) = export {
                if listings.is_empty() {
                    warn!("database is empty, listing archive not written");
                } else {
                    let path = if path.is_dir() {
                        path.join(LISTING_ARCHIVE_NAME)
                    } else {
                        path.clone()
                    };
                    std::fs::write(&path, build_listing_archive(&listings)?)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("wrote {}", path.display());
                }
            }
        }
        Command::Fetch { name, out } => {
            let content = store
                .latest_content(name)
                .await?
                .ok_or_else(|| anyhow::anyhow!("'{name}' is not in the database"))?;
            let path = out.clone().unwrap_or_else(|| PathBuf::from(name));
            std::fs::write(&path, content)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("wrote {}", path.display());
        }
        Command::Delete { name } => {
            let removed = store.delete(name).await?;
            println!("'{name}' deleted from database ({removed} records)");
        }
        Command::Collapse => {
            let removed = store.collapse_duplicates().await?;
            println!("duplicate files removed from the database ({removed} records)");
        }
        Command::Wipe => {
            let removed = store.wipe().await?;
            println!("entire database deleted ({removed} records)");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn screen_accepts_files_and_inline_job_description() {
        let cli = Cli::try_parse_from([
            "resume-screen",
            "--database",
            "corpus.db",
            "screen",
            "--jd",
            "Rust engineer",
            "--file",
            "a.pdf",
            "--file",
            "b.docx",
        ])
        .expect("arguments should parse");

        assert_eq!(cli.database, PathBuf::from("corpus.db"));
        match cli.command {
            Command::Screen { jd, input, .. } => {
                assert_eq!(jd.resolve().expect("jd should resolve"), "Rust engineer");
                assert_eq!(input.files.len(), 2);
            }
            _ => panic!("expected screen command"),
        }
    }

    #[test]
    fn inline_and_file_job_descriptions_conflict() {
        let parsed = Cli::try_parse_from([
            "resume-screen",
            "rematch",
            "--jd",
            "Rust engineer",
            "--jd-file",
            "jd.txt",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn blank_job_description_is_rejected() {
        let args = JobDescriptionArgs {
            jd: Some("  \n".to_string()),
            jd_file: None,
        };
        assert!(args.resolve().is_err());

        let missing = JobDescriptionArgs {
            jd: None,
            jd_file: None,
        };
        assert!(missing.resolve().is_err());
    }
}
