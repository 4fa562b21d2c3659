//! One-shot SQL runner: execute a single statement, or a `;`-separated
//! batch from a file, against a data directory. No REPL, no table
//! rendering, no color — just the `ExecResult` of each statement.

use clap::Parser;
use common::Config;
use database::Database;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "cli", about = "Run SQL against a data directory")]
struct Args {
    /// A single SQL statement to execute.
    sql: Option<String>,

    /// A file of `;`-separated statements to execute in order.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Directory holding `catalog.json` and table files.
    #[arg(long, default_value = "./db_data")]
    data_dir: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let statements = match (&args.sql, &args.file) {
        (Some(sql), None) => vec![sql.clone()],
        (None, Some(path)) => match std::fs::read_to_string(path) {
            Ok(contents) => contents
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) => {
                eprintln!("error reading {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        (Some(_), Some(_)) => {
            eprintln!("error: pass either a SQL string or --file, not both");
            return ExitCode::FAILURE;
        }
        (None, None) => {
            eprintln!("error: pass a SQL string or --file");
            return ExitCode::FAILURE;
        }
    };

    let config = Config::builder().data_dir(args.data_dir).build();
    let mut db = match Database::open(config) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("error opening database: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut had_error = false;
    for statement in statements {
        match db.execute(&statement) {
            Ok(result) => println!("{result:?}"),
            Err(e) => {
                eprintln!("error: {e}");
                had_error = true;
            }
        }
    }

    if let Err(e) = db.flush_all() {
        eprintln!("error flushing database: {e}");
        return ExitCode::FAILURE;
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
