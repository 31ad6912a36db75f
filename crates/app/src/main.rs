use std::fmt;

use clap::{Parser, Subcommand};
use services::view::EMPTY_CATALOG_MESSAGE;
use services::{
    Advance, AppServices, BadgeState, CatalogQuery, Clock, FacetSelection, OnboardingConfig,
    OnboardingEngine, SectionStep, ViewState, filter_lessons,
};
use storage::repository::LessonRepository;
use swim_core::model::{Facet, Lesson, StepKind, UserId};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod seed;

#[derive(Parser)]
#[command(name = "swim", version, about = "Swim coaching lessons, plan and onboarding")]
struct Cli {
    /// SQLite database URL or path
    #[arg(long = "db", env = "SWIM_DB_URL", default_value = "sqlite://swim.sqlite3")]
    db_url: String,

    /// Signed-in user id (UUID)
    #[arg(long = "user", env = "SWIM_USER_ID")]
    user_id: Option<UserId>,

    /// Email of the signed-in user
    #[arg(long, env = "SWIM_USER_EMAIL")]
    email: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List lessons, optionally filtered
    Catalog {
        /// Free-text search over title, description and facets
        #[arg(long, default_value = "")]
        query: String,
        /// Facet label to filter by; repeat to select several
        #[arg(long = "facet")]
        facets: Vec<String>,
    },
    /// Show the weekly training plan
    Plan,
    /// Show one lesson
    Lesson {
        id: String,
        /// Step through every section and record completion
        #[arg(long)]
        complete: bool,
    },
    /// Answer the onboarding questionnaire
    Onboard {
        /// `step=value`; repeat for multi-select steps
        #[arg(long = "answer", value_parser = parse_answer)]
        answers: Vec<(String, String)>,
    },
    /// List the filter facets and their options
    Facets,
    /// Insert a sample curriculum
    Seed {
        /// Number of plan weeks to generate
        #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(1..=52))]
        weeks: u32,
    },
}

#[derive(Debug)]
enum CliError {
    InvalidDbUrl { raw: String },
    MissingAnswer { step_id: String, title: String },
    UnknownStep(String),
    Load(&'static str),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            CliError::MissingAnswer { step_id, title } => {
                write!(f, "answer required for `{step_id}` ({title})")
            }
            CliError::UnknownStep(step_id) => write!(f, "unknown onboarding step: {step_id}"),
            CliError::Load(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for CliError {}

fn parse_answer(raw: &str) -> Result<(String, String), String> {
    let (step, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected step=value, got `{raw}`"))?;
    let step = step.trim();
    if step.is_empty() {
        return Err("step id cannot be empty".into());
    }
    Ok((step.to_owned(), value.to_owned()))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_owned();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| CliError::InvalidDbUrl {
            raw: db_url.to_owned(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(CliError::InvalidDbUrl {
            raw: db_url.to_owned(),
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

fn ready<T>(state: ViewState<T>) -> Result<T, CliError> {
    match state {
        ViewState::Ready(value) => Ok(value),
        ViewState::Error(err) => Err(CliError::Load(err.message())),
        // Loaders resolve before returning.
        ViewState::Loading => Err(CliError::Load("still loading")),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

//
// ─── COMMANDS ──────────────────────────────────────────────────────────────────
//

async fn catalog(
    services: &AppServices,
    query: String,
    facets: Vec<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let lessons = ready(services.catalog().await)?;
    let selection: FacetSelection = facets.into_iter().collect();
    let filtered = filter_lessons(&lessons, &CatalogQuery::new(query, selection));

    if json {
        return print_json(&filtered);
    }
    if filtered.is_empty() {
        println!("{EMPTY_CATALOG_MESSAGE}");
        return Ok(());
    }
    for lesson in &filtered {
        println!(
            "{:<10} {:<40} {:>3} мин  {} · {} · {}",
            lesson.id(),
            lesson.title(),
            lesson.duration_minutes(),
            lesson.style(),
            lesson.training_type(),
            lesson.level(),
        );
    }
    Ok(())
}

async fn plan(services: &AppServices, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let plan = ready(services.plan().await?)?;
    if json {
        return print_json(&plan);
    }

    for week in &plan.weeks {
        let marker = match week.badge() {
            BadgeState::None => " ",
            BadgeState::Partial => "~",
            BadgeState::Complete => "✓",
        };
        println!(
            "[{marker}] Неделя {} · {} ({})",
            week.week_number,
            week.title,
            week.badge_label()
        );
        println!("    {}", week.description);
        for item in &week.lessons {
            let state = if item.completed {
                "готово"
            } else if item.locked {
                "закрыто"
            } else {
                "доступно"
            };
            println!("    - {:<10} {} [{state}]", item.lesson.id(), item.lesson.title());
        }
    }
    if let Some(next) = plan.next_lesson() {
        println!();
        println!("Следующий урок: {} ({})", next.lesson.title(), next.lesson.id());
    }
    Ok(())
}

fn print_lesson(lesson: &Lesson) {
    println!("{} · {} мин", lesson.title(), lesson.duration_minutes());
    if let Some(description) = lesson.description() {
        println!("{description}");
    }
    println!(
        "{} · {} · {} · прогресс {}%",
        lesson.style(),
        lesson.training_type(),
        lesson.level(),
        lesson.progress()
    );
    for (index, section) in lesson.sections().iter().enumerate() {
        let mark = if section.completed { "x" } else { " " };
        println!("  [{mark}] {}. {} ({})", index + 1, section.title, section.kind.label());
        if !section.content.is_empty() {
            println!("      {}", section.content);
        }
    }
}

async fn lesson(
    services: &AppServices,
    raw_id: &str,
    complete: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let lesson = ready(services.lesson(raw_id).await?)?;
    if json && !complete {
        return print_json(&lesson);
    }
    print_lesson(&lesson);
    if !complete {
        return Ok(());
    }

    let mut tracker = services.lesson_tracker(&lesson)?;
    loop {
        let label = tracker.action_label();
        match tracker.advance_or_complete().await {
            SectionStep::Advanced(index) => println!("{label} → {}", index + 1),
            SectionStep::Completed { persisted } => {
                println!("{label}: {}%", tracker.progress_percent());
                if !persisted {
                    eprintln!("прогресс сохранён только локально");
                }
                break;
            }
            SectionStep::Disabled => {
                println!("урок уже завершён или не содержит этапов");
                break;
            }
        }
    }
    Ok(())
}

fn apply_answer(
    engine: &mut OnboardingEngine,
    step_id: &str,
    value: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind = engine
        .catalog()
        .find(step_id)
        .map(|(_, step)| step.kind())
        .ok_or_else(|| CliError::UnknownStep(step_id.to_owned()))?;
    match kind {
        StepKind::Text | StepKind::Email => engine.set_text(step_id, value)?,
        StepKind::SingleSelect | StepKind::MultiSelect => engine.select_option(step_id, value)?,
    }
    Ok(())
}

async fn onboard(
    services: &AppServices,
    answers: Vec<(String, String)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = services.onboarding()?;
    for (step_id, value) in &answers {
        apply_answer(&mut engine, step_id, value)?;
    }

    loop {
        let Some(step) = engine.current_step() else {
            break;
        };
        let outcome = if engine.can_advance() {
            engine.advance().await?
        } else if step.is_optional() {
            engine.skip().await?
        } else {
            return Err(CliError::MissingAnswer {
                step_id: step.id().to_owned(),
                title: step.title().to_owned(),
            }
            .into());
        };
        match outcome {
            Advance::Moved(_) => {}
            Advance::Submitted { persisted: true } => println!("Анкета сохранена"),
            Advance::Submitted { persisted: false } => {
                eprintln!("Не удалось сохранить анкету");
            }
            Advance::AlreadySubmitted => break,
        }
    }
    Ok(())
}

fn facets() {
    for facet in Facet::ALL {
        println!("{}", facet.title());
        for option in facet.options() {
            println!("  {:<14} {}", option.id, option.label);
        }
    }
}

async fn seed(services: &AppServices, weeks: u32) -> Result<(), Box<dyn std::error::Error>> {
    let records = seed::sample_curriculum(weeks, services.clock().now())?;
    let lessons = services.storage().lessons.as_ref();
    for record in &records {
        lessons.upsert_lesson(record).await?;
    }
    tracing::info!(weeks, lessons = records.len(), "seeded sample curriculum");
    println!("Добавлено уроков: {}", records.len());
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    let db_url = normalize_sqlite_url(&cli.db_url);
    prepare_sqlite_file(&db_url)?;
    let mut services =
        AppServices::new_sqlite(&db_url, Clock::system(), OnboardingConfig::from_env()).await?;
    if let Some(user_id) = cli.user_id {
        services.sign_in(user_id, cli.email);
    }

    let result = match cli.command {
        Command::Catalog { query, facets } => catalog(&services, query, facets, cli.json).await,
        Command::Plan => plan(&services, cli.json).await,
        Command::Lesson { id, complete } => lesson(&services, &id, complete, cli.json).await,
        Command::Onboard { answers } => onboard(&services, answers).await,
        Command::Facets => {
            facets();
            Ok(())
        }
        Command::Seed { weeks } => seed(&services, weeks).await,
    };

    services.sign_out();
    result
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_split_on_first_equals() {
        assert_eq!(
            parse_answer("name=Аня=Мария").unwrap(),
            ("name".to_owned(), "Аня=Мария".to_owned())
        );
        assert!(parse_answer("name").is_err());
        assert!(parse_answer(" =x").is_err());
    }

    #[test]
    fn sqlite_urls_are_normalized() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/swim.db"),
            "sqlite:///tmp/swim.db"
        );
        assert_eq!(normalize_sqlite_url("/tmp/swim.db"), "sqlite:///tmp/swim.db");
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "swim",
            "--db",
            "sqlite::memory:",
            "catalog",
            "--query",
            "кроль",
            "--facet",
            "Техника",
            "--facet",
            "Средний",
        ])
        .unwrap();
        match cli.command {
            Command::Catalog { query, facets } => {
                assert_eq!(query, "кроль");
                assert_eq!(facets.len(), 2);
            }
            _ => panic!("expected catalog"),
        }
    }

    #[test]
    fn seed_weeks_stay_within_a_year() {
        let parse = |weeks: &str| Cli::try_parse_from(["swim", "seed", "--weeks", weeks]);
        assert!(parse("0").is_err());
        assert!(parse("1000").is_err());
        assert!(parse("4294967295").is_err());
        match parse("52").unwrap().command {
            Command::Seed { weeks } => assert_eq!(weeks, 52),
            _ => panic!("expected seed"),
        }
    }
}
