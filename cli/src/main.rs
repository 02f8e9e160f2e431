use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use table_json_sqlite::{DumpOptions, EditOptions, dump_table, edit_table};
use tracing::debug;

mod logging;

#[derive(Debug, Parser)]
#[command(name = "table-json")]
#[command(about = "Dump a SQLite table to JSON, or replace its rows from JSON")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write every row of a table to `<table>.json` in the current directory.
    Dump(DumpArgs),
    /// Replace every row of a table, in a staged copy under `generated/`,
    /// with the row-objects of a JSON file.
    Edit(EditArgs),
}

#[derive(Debug, Args)]
struct DumpArgs {
    /// Path to the SQLite database file.
    #[arg(long)]
    file: PathBuf,
    /// Table to dump.
    #[arg(long)]
    table: String,
}

#[derive(Debug, Args)]
struct EditArgs {
    /// Path to the SQLite database file. It is copied, never modified.
    #[arg(long)]
    file: PathBuf,
    /// Table whose rows are replaced.
    #[arg(long)]
    table: String,
    /// JSON file holding an array of row objects.
    #[arg(long)]
    json: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    debug!(command = ?cli.command, "starting");

    let result = match cli.command {
        Command::Dump(args) => run_dump(args),
        Command::Edit(args) => run_edit(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_dump(args: DumpArgs) -> Result<(), String> {
    let report = dump_table(&args.file, &args.table, &DumpOptions::default()).map_err(|e| {
        format!(
            "Failed to dump table '{}' from '{}': {e}",
            args.table,
            args.file.display()
        )
    })?;
    println!(
        "Dumped {} row(s) from '{}' to '{}'.",
        report.rows,
        args.table,
        report.output_path.display()
    );
    if report.unparsed_blobs > 0 {
        eprintln!(
            "{} BLOB cell(s) were not valid JSON and were left out.",
            report.unparsed_blobs
        );
    }
    Ok(())
}

fn run_edit(args: EditArgs) -> Result<(), String> {
    let report = edit_table(&args.file, &args.table, &args.json, &EditOptions::default())
        .map_err(|e| {
            format!(
                "Failed to edit table '{}' from '{}': {e}",
                args.table,
                args.json.display()
            )
        })?;
    println!(
        "Replaced {} row(s) with {} row(s) in '{}' of '{}'.",
        report.deleted,
        report.inserted,
        args.table,
        report.staged_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_requires_file_and_table() {
        assert!(Cli::try_parse_from(["table-json", "dump", "--table=users"]).is_err());
        assert!(Cli::try_parse_from(["table-json", "dump", "--file=app.db"]).is_err());
        let cli =
            Cli::try_parse_from(["table-json", "dump", "--file=app.db", "--table=users"]).unwrap();
        assert!(matches!(cli.command, Command::Dump(ref a) if a.table == "users"));
    }

    #[test]
    fn test_edit_requires_json() {
        assert!(
            Cli::try_parse_from(["table-json", "edit", "--file=app.db", "--table=users"]).is_err()
        );
        let cli = Cli::try_parse_from([
            "table-json",
            "edit",
            "--file=app.db",
            "--table=users",
            "--json=users.json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Edit(ref a) if a.json == PathBuf::from("users.json")));
    }
}
