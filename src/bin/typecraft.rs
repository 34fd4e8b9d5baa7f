//! Typecraft CLI
//!
//! Command-line interface for checking and transforming JSON values against
//! wire-form schemas, and for linting schema files.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde_json::Value as Json;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use typecraft::{
    lint, load_policy, load_schema, load_value, Context, FileStatus, Schema, Severity,
    TypeRegistry, Value, ValueError,
};

#[derive(Parser)]
#[command(name = "typecraft")]
#[command(about = "Check, clean and transform JSON values against schemas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a value against a schema
    Check {
        #[command(flatten)]
        input: ValueArgs,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },

    /// List every violation of a value as JSON
    Errors {
        #[command(flatten)]
        input: ValueArgs,
    },

    /// Remove properties the schema does not describe
    Clean {
        #[command(flatten)]
        input: ValueArgs,
    },

    /// Fill in schema defaults
    Default {
        #[command(flatten)]
        input: ValueArgs,
    },

    /// Clean, default, check and decode a value
    Parse {
        #[command(flatten)]
        input: ValueArgs,
    },

    /// Lint schema files for structural errors
    Lint {
        /// File or directory to lint
        path: PathBuf,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Suppress progress output, only show errors
        #[arg(long, short)]
        quiet: bool,
    },
}

#[derive(Args)]
struct ValueArgs {
    /// Schema file (wire form)
    schema: PathBuf,

    /// Value file to process
    value: PathBuf,

    /// Schema file referenced by `$id`; may be repeated
    #[arg(long = "ref", value_name = "FILE")]
    refs: Vec<PathBuf>,

    /// Policy file with camelCase flags (e.g. {"allowNan": true})
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

/// Everything a value command needs, loaded from disk.
struct Loaded {
    ctx: Context,
    schema: Schema,
    refs: Vec<Schema>,
    value: Value,
    pretty: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { input, json } => load(&input).and_then(|l| run_check(&l, json)),
        Commands::Errors { input } => load(&input).and_then(|l| run_errors(&l)),
        Commands::Clean { input } => load(&input).and_then(|l| {
            let cleaned = l.ctx.clean(&l.schema, &l.refs, l.value.clone());
            finish(cleaned, l.pretty)
        }),
        Commands::Default { input } => load(&input).and_then(|l| {
            let defaulted = l.ctx.default_value(&l.schema, &l.refs, l.value.clone());
            finish(defaulted, l.pretty)
        }),
        Commands::Parse { input } => load(&input).and_then(|l| {
            let parsed = l.ctx.parse(&l.schema, &l.refs, &l.value);
            finish(parsed, l.pretty)
        }),
        Commands::Lint {
            path,
            format,
            strict,
            quiet,
        } => run_lint(&path, &format, strict, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn load(args: &ValueArgs) -> Result<Loaded, u8> {
    let fail = |what: &str, e: typecraft::LoadError| {
        eprintln!("Error: loading {}: {}", what, e);
        e.exit_code() as u8
    };

    let ctx = match &args.policy {
        Some(path) => Context::new().with_policy(load_policy(path).map_err(|e| fail("policy", e))?),
        None => Context::new(),
    };
    let schema = load_schema(&args.schema).map_err(|e| fail("schema", e))?;
    let refs = args
        .refs
        .iter()
        .map(|path| load_schema(path).map_err(|e| fail("reference", e)))
        .collect::<Result<Vec<_>, _>>()?;
    let value = load_value(&args.value).map_err(|e| fail("value", e))?;
    debug!(
        schema = %args.schema.display(),
        references = refs.len(),
        "loaded inputs"
    );

    Ok(Loaded {
        ctx,
        schema,
        refs,
        value,
        pretty: args.pretty,
    })
}

fn run_check(loaded: &Loaded, json_output: bool) -> Result<(), u8> {
    let Loaded {
        ctx,
        schema,
        refs,
        value,
        ..
    } = loaded;

    let valid = ctx.check(schema, refs, value).map_err(report)?;
    if valid {
        if json_output {
            println!(r#"{{"valid":true}}"#);
        } else {
            println!("Valid");
        }
        return Ok(());
    }

    let violations = ctx.errors(schema, refs, value).map_err(report)?;
    if json_output {
        let output = serde_json::json!({
            "valid": false,
            "errors": violations
        });
        println!("{}", output);
    } else {
        eprintln!("Validation failed:");
        for violation in violations {
            eprintln!("  {}", violation);
        }
    }
    Err(1)
}

fn run_errors(loaded: &Loaded) -> Result<(), u8> {
    let violations = loaded
        .ctx
        .errors(&loaded.schema, &loaded.refs, &loaded.value)
        .map_err(report)?;
    let json = serde_json::to_value(&violations).map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;
    print_json(&json, loaded.pretty)?;
    if violations.is_empty() {
        Ok(())
    } else {
        Err(1)
    }
}

/// Prints a transformed value, or reports why it could not be produced.
fn finish(result: Result<Value, ValueError>, pretty: bool) -> Result<(), u8> {
    let value = result.map_err(report)?;
    print_json(&value.to_json(), pretty)
}

fn print_json(json: &Json, pretty: bool) -> Result<(), u8> {
    let output = if pretty {
        serde_json::to_string_pretty(json)
    } else {
        serde_json::to_string(json)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;
    println!("{}", output);
    Ok(())
}

/// Writes a value error to stderr and returns its exit code.
fn report(err: ValueError) -> u8 {
    if err.violations().is_empty() {
        eprintln!("Error: {}", err);
    } else {
        eprintln!("Validation failed:");
        for violation in err.violations() {
            eprintln!("  {}", violation);
        }
    }
    err.exit_code() as u8
}

fn run_lint(path: &Path, format: &str, strict: bool, quiet: bool) -> Result<(), u8> {
    if !path.exists() {
        eprintln!("Error: path not found: {}", path.display());
        return Err(2);
    }

    let result = lint(path, strict, &TypeRegistry::new());

    if format == "json" {
        let output = serde_json::to_string_pretty(&result).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", output);
    } else {
        if !quiet {
            println!("Linting {} ...\n", path.display());
        }

        for file_result in &result.results {
            let status_icon = match file_result.status {
                FileStatus::Ok => "\x1b[32m✓\x1b[0m",
                FileStatus::Warning => "\x1b[33m⚠\x1b[0m",
                FileStatus::Error => "\x1b[31m✗\x1b[0m",
            };

            if !quiet || file_result.status != FileStatus::Ok {
                println!("  {} {}", status_icon, file_result.file.display());
            }

            for diag in &file_result.diagnostics {
                let (color, label) = match diag.severity {
                    Severity::Error => ("\x1b[31m", "error"),
                    Severity::Warning => ("\x1b[33m", "warning"),
                };
                if !quiet || diag.severity == Severity::Error {
                    println!(
                        "    {}{}[{}]\x1b[0m: {} - {}",
                        color, label, diag.code, diag.path, diag.message
                    );
                }
            }
        }

        println!();
        if result.is_ok() && (!strict || result.warnings == 0) {
            println!(
                "\x1b[32m✓ {} files checked, all passed\x1b[0m",
                result.files_checked
            );
        } else {
            println!(
                "\x1b[31m✗ {} files checked: {} passed, {} failed ({} errors, {} warnings)\x1b[0m",
                result.files_checked, result.passed, result.failed, result.errors, result.warnings
            );
        }
    }

    if result.is_ok() && (!strict || result.warnings == 0) {
        Ok(())
    } else {
        Err(1)
    }
}
