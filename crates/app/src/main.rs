use prep_core::model::Course;
use services::{AppConfig, AppServices, Clock, EnrollOutcome, ProgressOutcome, SessionService};
use storage::repository::Storage;
use tracing_subscriber::EnvFilter;

mod args;

use args::{Args, ArgsError, Command, StorageTarget, print_usage};

fn init_logging() {
    let filter = EnvFilter::try_from_env("PREP_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_course_row(course: &Course) {
    println!(
        "[{}] {}  ({}, {}, {:.1}★, {} students, ₹{})",
        course.id(),
        course.title(),
        course.category(),
        course.level(),
        course.rating().value(),
        course.students_enrolled(),
        course.price()
    );
}

async fn require_learner(session: &SessionService) -> Option<prep_core::model::Learner> {
    let learner = session.current().await;
    if learner.is_none() {
        println!("Not signed in. Use `login <email>` or `signup <name> <email>`.");
    }
    learner
}

async fn execute(app: &AppServices, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = app.catalog();
    let session = app.session();

    match command {
        Command::Help => print_usage(),
        Command::Courses(query) => {
            let found = catalog.filter_and_sort(&query);
            println!("{} course(s)", found.len());
            for course in found {
                print_course_row(course);
            }
        }
        Command::Categories => {
            println!("Categories: {}", catalog.categories().join(", "));
            println!("Levels: {}", catalog.levels().join(", "));
        }
        Command::Course { id } => {
            let viewer = session.current().await;
            let Some(detail) = catalog.course_detail(&id, viewer.as_ref()) else {
                println!(
                    "Course Not Found: no course with id {id}. Run `courses` to browse the catalog."
                );
                return Ok(());
            };
            let course = detail.course;
            print_course_row(course);
            println!("List price: ₹{} (now ₹{})", detail.list_price(), course.price());
            println!("Instructor: {}  Duration: {}", course.instructor(), course.duration());
            println!("{}", course.long_description());
            println!("Tags: {}", course.tags().join(", "));
            match detail.progress {
                Some(progress) => println!("Enrolled, progress {progress}"),
                None => println!("Not enrolled"),
            }
            for lesson in &detail.lessons {
                let mark = if lesson.completed { "x" } else { " " };
                println!(
                    "  [{mark}] {} {} ({}, {})",
                    lesson.lesson.id(),
                    lesson.lesson.title(),
                    lesson.lesson.kind(),
                    lesson.lesson.duration()
                );
            }
        }
        Command::Login { email } => {
            let learner = session.login(&email).await?;
            println!("Welcome back, {}!", learner.name());
        }
        Command::Signup { name, email } => {
            let learner = session.signup(&name, &email).await?;
            println!("Account created for {} ({})", learner.name(), learner.id());
        }
        Command::Logout => {
            session.logout().await?;
            println!("Signed out.");
        }
        Command::Whoami => {
            if let Some(learner) = require_learner(&session).await {
                println!("{} <{}> id={}", learner.name(), learner.email(), learner.id());
            }
        }
        Command::Enroll { id } => {
            if catalog.find_by_id(&id).is_none() {
                println!("Course Not Found: {id}");
                return Ok(());
            }
            match session.enroll_in_course(&id).await? {
                EnrollOutcome::Enrolled => println!("Enrolled in course {id}."),
                EnrollOutcome::AlreadyEnrolled => println!("Already enrolled in course {id}."),
                EnrollOutcome::NotSignedIn => println!("Sign in before enrolling."),
            }
        }
        Command::Progress { id, value } => {
            report_progress(&id, session.update_progress(&id, value).await?);
        }
        Command::Continue { id } => {
            report_progress(&id, session.continue_learning(&id).await?);
        }
        Command::Dashboard => {
            let Some(learner) = require_learner(&session).await else {
                return Ok(());
            };
            let dashboard = catalog.dashboard(&learner);
            println!("Welcome back, {}!", learner.name());
            println!(
                "Enrolled: {}  Completed: {}  In progress: {}  Average progress: {}%  Lessons: {}",
                dashboard.enrolled().len(),
                dashboard.completed().len(),
                dashboard.in_progress().len(),
                dashboard.average_progress(),
                dashboard.total_lessons()
            );
            for entry in dashboard.enrolled() {
                println!(
                    "  [{}] {}  {}  ({}/{} lessons)",
                    entry.course.id(),
                    entry.course.title(),
                    entry.progress,
                    entry.completed_lessons(),
                    entry.total_lessons()
                );
            }
        }
        Command::Contact(message) => {
            let receipt = app.contact().submit(message).await?;
            println!(
                "Thanks! Your {} inquiry was received at {}.",
                receipt.kind,
                receipt.received_at.to_rfc3339()
            );
        }
    }
    Ok(())
}

fn report_progress(id: &str, outcome: ProgressOutcome) {
    match outcome {
        ProgressOutcome::Updated(progress) => println!("Course {id}: {progress}"),
        ProgressOutcome::NotEnrolled => {
            println!("Not enrolled in course {id}; progress unchanged.");
        }
        ProgressOutcome::NotSignedIn => println!("Sign in before tracking progress."),
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" || db_url.starts_with("sqlite:file:") {
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

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1)).inspect_err(|_| print_usage())?;

    let mut config = AppConfig::from_env()?;
    let clock = Clock::default_clock();
    tracing::debug!(storage = ?parsed.storage, "starting prep");

    let app = match parsed.storage {
        Some(StorageTarget::Memory) => {
            AppServices::with_storage(&config, clock, &Storage::in_memory()).await?
        }
        Some(StorageTarget::Sqlite(url)) => {
            config.db_url = url;
            prepare_sqlite_file(&config.db_url)?;
            AppServices::new_sqlite(&config, clock).await?
        }
        None => {
            prepare_sqlite_file(&config.db_url)?;
            AppServices::new_sqlite(&config, clock).await?
        }
    };

    execute(&app, parsed.command).await
}

#[tokio::main]
async fn main() {
    init_logging();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
