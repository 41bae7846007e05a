//! KCQL CLI - Command line interface for the KCQL parser

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand};
use regex::Regex;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kcql_ast::Query;
use kcql_mapper::{parse_multiple, Mapper, NamePattern};
use kcql_parser::{parse, KcqlError};

#[derive(Parser)]
#[command(name = "kcql")]
#[command(about = "Kafka Connect Query Language parser", long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a statement and output the query as JSON
    Parse {
        /// Statement text
        statement: Option<String>,
        /// Read ';'-separated statements from a file instead
        #[arg(short, long, conflicts_with = "statement")]
        file: Option<PathBuf>,
        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Validate connector configuration files
    Check {
        /// Input file(s)
        files: Vec<PathBuf>,
        /// Regular expression every source and target must match
        #[arg(long, conflicts_with = "topic_names")]
        name_pattern: Option<String>,
        /// Require Kafka topic style names
        #[arg(long)]
        topic_names: bool,
    },
    /// Interactive REPL
    Repl,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("kcql={}", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ok = match cli.command {
        Commands::Parse {
            statement,
            file,
            pretty,
        } => cmd_parse(statement, file, pretty),
        Commands::Check {
            files,
            name_pattern,
            topic_names,
        } => cmd_check(&files, name_pattern.as_deref(), topic_names),
        Commands::Repl => cmd_repl(),
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn cmd_parse(statement: Option<String>, file: Option<PathBuf>, pretty: bool) -> bool {
    match (statement, file) {
        (Some(statement), _) => match parse(&statement) {
            Ok(query) => print_json(&query, pretty),
            Err(e) => {
                report_error(&statement, "<statement>", &e);
                false
            }
        },
        (None, Some(file)) => {
            let Some(source) = read_file(&file) else {
                return false;
            };
            match parse_multiple(&source) {
                Ok(queries) => print_json(&queries, pretty),
                Err(e) => {
                    report_error(&source, &file.to_string_lossy(), &e);
                    false
                }
            }
        }
        (None, None) => {
            eprintln!("Nothing to parse: pass a statement or --file");
            false
        }
    }
}

fn cmd_check(files: &[PathBuf], name_pattern: Option<&str>, topic_names: bool) -> bool {
    let mut mapper = Mapper::new();
    if topic_names {
        mapper = mapper.with_name_policy(NamePattern::topic_names());
    } else if let Some(pattern) = name_pattern {
        match Regex::new(pattern) {
            Ok(re) => mapper = mapper.with_name_policy(NamePattern::new(re)),
            Err(e) => {
                eprintln!("Invalid name pattern: {}", e);
                return false;
            }
        }
    }

    let mut all_ok = true;

    for file in files {
        let Some(source) = read_file(file) else {
            all_ok = false;
            continue;
        };

        match mapper.map(&source) {
            Ok(table) => {
                info!(file = %file.display(), statements = table.len(), "checked");
                println!("✓ {} - {} statements", file.display(), table.len());
                for query in table.queries() {
                    println!("  {}", describe(query));
                }
            }
            Err(e) => {
                eprintln!("✗ {}", file.display());
                report_error(&source, &file.to_string_lossy(), &e);
                all_ok = false;
            }
        }
    }

    all_ok
}

fn cmd_repl() -> bool {
    use rustyline::DefaultEditor;

    println!("KCQL REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type :help for help, :quit to exit");
    println!();

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to create REPL: {}", e);
            return false;
        }
    };
    let mut pretty = true;

    loop {
        let readline = rl.readline("kcql> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                let trimmed = line.trim();

                if trimmed.starts_with(':') {
                    match trimmed {
                        ":quit" | ":q" => break,
                        ":help" | ":h" => {
                            println!("Commands:");
                            println!("  <statement>   - Parse a statement and show the query");
                            println!("  :load <file>  - Check a configuration file");
                            println!("  :compact      - Toggle compact JSON output");
                            println!("  :quit         - Exit REPL");
                        }
                        ":compact" => {
                            pretty = !pretty;
                            println!("Compact output {}", if pretty { "off" } else { "on" });
                        }
                        cmd if cmd.starts_with(":load ") => {
                            let path = PathBuf::from(cmd[6..].trim());
                            cmd_check(&[path], None, false);
                        }
                        _ => {
                            println!("Unknown command. Type :help for help.");
                        }
                    }
                } else if !trimmed.is_empty() {
                    debug!(statement = trimmed, "repl input");
                    match parse(trimmed) {
                        Ok(query) => {
                            print_json(&query, pretty);
                        }
                        Err(e) => report_error(trimmed, "<repl>", &e),
                    }
                }
            }
            Err(_) => break,
        }
    }

    println!("Goodbye!");
    true
}

fn read_file(file: &Path) -> Option<String> {
    match fs::read_to_string(file) {
        Ok(s) => Some(s),
        Err(e) => {
            eprintln!("Error reading {}: {}", file.display(), e);
            None
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> bool {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match json {
        Ok(json) => {
            println!("{}", json);
            true
        }
        Err(e) => {
            eprintln!("Failed to serialize: {}", e);
            false
        }
    }
}

/// One-line summary of a mapping
fn describe(query: &Query) -> String {
    match (&query.write_mode, &query.target) {
        (Some(mode), Some(target)) => format!("{} -> {} ({})", query.source, target, mode),
        _ => format!("{} (select)", query.source),
    }
}

fn report_error(source: &str, name: &str, error: &KcqlError) {
    let Some(span) = error.span() else {
        eprintln!("  {}", error);
        return;
    };

    let name = name.to_string();
    let printed = Report::build(ReportKind::Error, name.clone(), span.start)
        .with_message(error.to_string())
        .with_label(
            Label::new((name.clone(), span.start..span.end))
                .with_message(label(error))
                .with_color(Color::Red),
        )
        .finish()
        .eprint((name, Source::from(source)));
    if printed.is_err() {
        eprintln!("  {}", error);
    }
}

fn label(error: &KcqlError) -> String {
    match error {
        KcqlError::Syntax { source, .. } => source.to_string(),
        KcqlError::Semantic(err) => err.to_string(),
        KcqlError::Statement { error, .. } => label(error),
    }
}
