use std::fmt;

use mastery_core::model::{DomainId, EnablerId, TaskId};
use services::{AppServices, Clock, domain_overview, search_tasks};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingEnablerId,
    MissingSearchTerm,
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingEnablerId => write!(f, "toggle requires an enabler id"),
            ArgsError::MissingSearchTerm => write!(f, "search requires a term"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- progress            [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- toggle <enabler-id> [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- weakness            [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- search <term>       [--domain <id>] [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:mastery.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MASTERY_DB_URL");
    eprintln!("  MASTERY_AI_API_KEY, MASTERY_AI_BASE_URL, MASTERY_AI_MODEL");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Progress,
    Toggle,
    Weakness,
    Search,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "progress" => Some(Self::Progress),
            "toggle" => Some(Self::Toggle),
            "weakness" => Some(Self::Weakness),
            "search" => Some(Self::Search),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    enabler_id: Option<EnablerId>,
    term: Option<String>,
    domain_id: Option<DomainId>,
}

impl Args {
    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("MASTERY_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://mastery.sqlite3".into(), normalize_sqlite_url);
        let mut enabler_id = None;
        let mut term = None;
        let mut domain_id = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--domain" if cmd == Command::Search => {
                    let value = require_value(args, "--domain")?;
                    domain_id = Some(DomainId::new(value));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => match cmd {
                    Command::Toggle if enabler_id.is_none() => {
                        enabler_id = Some(EnablerId::new(arg));
                    }
                    Command::Search if term.is_none() => term = Some(arg),
                    _ => return Err(ArgsError::UnknownArg(arg)),
                },
            }
        }

        if cmd == Command::Toggle && enabler_id.is_none() {
            return Err(ArgsError::MissingEnablerId);
        }
        if cmd == Command::Search && term.is_none() {
            return Err(ArgsError::MissingSearchTerm);
        }

        Ok(Self {
            db_url,
            enabler_id,
            term,
            domain_id,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None | Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    argv.remove(0);

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, Clock::default_clock()).await?;

    match cmd {
        Command::Progress => show_progress(&services).await,
        Command::Toggle => {
            let id = parsed.enabler_id.as_ref().ok_or(ArgsError::MissingEnablerId)?;
            toggle_enabler(&services, id).await
        }
        Command::Weakness => show_weakness(&services).await,
        Command::Search => {
            let term = parsed.term.as_deref().ok_or(ArgsError::MissingSearchTerm)?;
            show_search(&services, term, parsed.domain_id.as_ref())
        }
    }
}

async fn show_progress(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let curriculum = services.curriculum();
    let progress = services.progress().load().await?;
    let (rows, totals) = domain_overview(&curriculum, &progress);

    println!("{:<22} {:>8} {:>12} {:>9}", "Domain", "Weight", "Enablers", "Mastery");
    for row in rows {
        println!(
            "{:<22} {:>7}% {:>6}/{:<5} {:>8}%",
            row.name, row.coverage, row.completed_enablers, row.total_enablers, row.percentage
        );
    }
    println!();
    println!(
        "Overall: {}/{} enablers ({}%)",
        totals.completed, totals.total, totals.percentage
    );
    Ok(())
}

async fn toggle_enabler(
    services: &AppServices,
    id: &EnablerId,
) -> Result<(), Box<dyn std::error::Error>> {
    let curriculum = services.curriculum();
    if !curriculum.enablers().any(|e| e.id() == id) {
        eprintln!("note: {id} is not part of the built-in outline");
    }

    let progress_service = services.progress();
    let mut record = progress_service.load().await?;
    let completed = progress_service.toggle(&mut record, id).await?;

    let state = if completed { "completed" } else { "pending" };
    println!("{id}: {state}");

    let (_, totals) = domain_overview(&curriculum, &record);
    println!(
        "Overall: {}/{} enablers ({}%)",
        totals.completed, totals.total, totals.percentage
    );
    Ok(())
}

async fn show_weakness(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let curriculum = services.curriculum();
    let weakness = services.exams().weakness().await?;
    if weakness.is_empty() {
        println!("No recorded exam misses yet.");
        return Ok(());
    }

    let mut entries: Vec<(TaskId, u32)> = weakness
        .iter()
        .map(|(id, count)| (id.clone(), count))
        .collect();
    // Highest failure counts first; ties break on id for stable output.
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));

    println!("{:<8} {:>7}  Task", "Id", "Misses");
    for (id, count) in entries {
        let name = curriculum
            .find_task(&id)
            .map_or("(not in the current outline)", |t| t.name());
        println!("{:<8} {:>7}  {name}", id.as_str(), count);
    }
    Ok(())
}

fn show_search(
    services: &AppServices,
    term: &str,
    domain_id: Option<&DomainId>,
) -> Result<(), Box<dyn std::error::Error>> {
    let curriculum = services.curriculum();
    let domains: Vec<_> = match domain_id {
        Some(id) => match curriculum.find_domain(id) {
            Some(domain) => vec![domain],
            None => {
                eprintln!("unknown domain: {id}");
                return Ok(());
            }
        },
        None => curriculum.domains().iter().collect(),
    };

    let mut any = false;
    for domain in domains {
        let hits = search_tasks(domain, term);
        if hits.is_empty() {
            continue;
        }
        any = true;
        println!("{}:", domain.name());
        for task in hits {
            println!("  {:<6} {}", task.id().as_str(), task.name());
        }
    }
    if !any {
        println!("No tasks match \"{term}\".");
    }
    Ok(())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
