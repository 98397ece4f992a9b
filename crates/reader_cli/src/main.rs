//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `reader_core` linkage and schema bootstrap without the web app.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `reader_cli [DB_PATH]`. Without a path an in-memory database is
//! used. `READER_LOG_DIR` (absolute) enables file logging at
//! `READER_LOG_LEVEL` or the build-mode default.

use reader_core::db::migrations::current_user_version;
use reader_core::db::{open_db, open_db_in_memory};
use reader_core::{ArticleCriteria, ArticleRepository, SqliteArticleRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err}");
            eprintln!("reader_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    if let Ok(log_dir) = std::env::var("READER_LOG_DIR") {
        let level = std::env::var("READER_LOG_LEVEL")
            .unwrap_or_else(|_| reader_core::default_log_level().to_string());
        reader_core::init_logging(&level, &log_dir)?;
    }

    let conn = match std::env::args().nth(1) {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let repo = SqliteArticleRepository::try_new(&conn)?;
    let live_articles = repo.find_by_criteria(&ArticleCriteria::new())?.len();

    println!("reader_core ping={}", reader_core::ping());
    println!("reader_core version={}", reader_core::core_version());
    println!("reader_core schema_version={}", current_user_version(&conn)?);
    println!("reader_core live_articles={live_articles}");
    Ok(())
}
