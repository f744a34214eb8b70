use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use joinpath::*;
use std::io::{self, Read};

/// Join path resolver for relational schemas
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Find the joins connecting a set of tables and print them as JSON
    Resolve(ResolveArgs),
    /// Print every join the schema's foreign keys allow
    Joins(SchemaArgs),
    /// Check join conditions (for example from an LLM) against the schema
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct SchemaArgs {
    /// Path to the schema JSON file
    #[arg(short, long)]
    schema: String,
    /// Hide a table or column, written as `table.column` where either part may be `*`
    #[arg(short = 'x', long = "exclude")]
    exclusions: Vec<String>,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    #[command(flatten)]
    schema: SchemaArgs,
    /// Most intermediary tables allowed between two required tables
    #[arg(short, long, default_value_t = 2)]
    max_intermediaries: usize,
    /// Most tied candidate paths to enumerate
    #[arg(long, default_value_t = 64)]
    max_candidates: usize,
    /// Require table names to match the schema exactly
    #[arg(long)]
    strict: bool,
    /// Required tables. Each argument may hold a comma-separated list.
    #[arg(required = true)]
    tables: Vec<String>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    #[command(flatten)]
    schema: SchemaArgs,
    /// Require table and column names to match the schema exactly
    #[arg(long)]
    strict: bool,
    /// Join conditions such as `a.x=b.y, c.z=d.w`. If empty, stdin will be used.
    joins: Option<String>,
}

fn get_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
    Ok(buffer)
}

fn identifier_resolution(strict: bool) -> IdentifierResolution {
    if strict {
        IdentifierResolution::Strict
    } else {
        IdentifierResolution::Flexible
    }
}

fn load(args: SchemaArgs, options: Options) -> Result<Resolver> {
    let schema_json = std::fs::read_to_string(&args.schema)
        .with_context(|| format!("Failed to read schema file {}", args.schema))?;
    let options = Options {
        exclusions: args.exclusions,
        ..options
    };
    Ok(Resolver::new(&schema_json, options)?)
}

fn resolve(args: ResolveArgs) -> Result<()> {
    let options = Options {
        max_intermediaries: args.max_intermediaries,
        max_candidates: args.max_candidates,
        identifier_resolution: identifier_resolution(args.strict),
        ..Options::default()
    };
    let tables = parse_tables(&args.tables.join(","))?;
    let resolver = load(args.schema, options)?;
    let context = resolver.context(tables.as_slice())?;
    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}

fn joins(args: SchemaArgs) -> Result<()> {
    let resolver = load(args, Options::default())?;
    for join in resolver.allowed_joins() {
        println!("{join}");
    }
    Ok(())
}

fn validate(args: ValidateArgs) -> Result<()> {
    let text = match args.joins {
        Some(text) => text,
        None => get_stdin()?,
    };
    let options = Options {
        identifier_resolution: identifier_resolution(args.strict),
        ..Options::default()
    };
    let resolver = load(args.schema, options)?;
    let selection = resolver.select_joins(&text)?;
    println!("{}", serde_json::to_string_pretty(&selection)?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Cli::parse();
    log::debug!("{:?}", args);
    match args.command {
        Command::Resolve(args) => resolve(args),
        Command::Joins(args) => joins(args),
        Command::Validate(args) => validate(args),
    }
}
