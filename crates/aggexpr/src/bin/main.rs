//! Aggregate expression command-line interface

use aggexpr::cli::{describe, evaluate, indicator, logger, output, parse, validate};
use aggexpr::{DataType, ExpressionService, MissingValueStrategy, ServiceConfig, UsageContext};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Aggregate expression tool
#[derive(Parser)]
#[command(name = "aggexpr")]
#[command(author, version, about = "Parse, check, describe and evaluate aggregate expressions", long_about = None)]
struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    /// Service configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Usage context the expressions belong to
    #[arg(short, long, default_value = "indicator", global = true)]
    usage: UsageContext,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an expression and show its tree
    Parse {
        expression: String,

        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Describe expressions with display names
    Describe {
        expressions: Vec<String>,

        /// Context file with a metadata section
        #[arg(short, long)]
        metadata: Option<PathBuf>,
    },

    /// Check expressions for the usage context
    Validate {
        expressions: Vec<String>,

        /// Required result type (numeric, text, boolean, date)
        #[arg(short = 't', long = "type")]
        expected: Option<DataType>,

        /// Context file with a metadata section
        #[arg(short, long)]
        metadata: Option<PathBuf>,
    },

    /// Evaluate an expression against a value context
    Eval {
        expression: String,

        /// Context file (JSON)
        #[arg(short, long)]
        context: Option<PathBuf>,

        /// Missing value strategy
        #[arg(short, long)]
        strategy: Option<MissingValueStrategy>,

        #[arg(long)]
        json: bool,
    },

    /// Compute an indicator value
    Indicator {
        /// Indicator uid from the context file
        uid: Option<String>,

        #[arg(short, long)]
        numerator: Option<String>,

        #[arg(short, long)]
        denominator: Option<String>,

        /// Indicator type factor
        #[arg(short, long, default_value_t = 1.0)]
        factor: f64,

        /// Annualize by the context period
        #[arg(short, long)]
        annualized: bool,

        /// Context file (JSON)
        #[arg(short, long)]
        context: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(&cli.color);
    logger::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    };
    let service = ExpressionService::new(config)?;

    match cli.command {
        Commands::Parse { expression, json } => parse::parse(
            &service,
            parse::ParseConfig {
                expression,
                usage: cli.usage,
                json,
            },
        ),

        Commands::Describe {
            expressions,
            metadata,
        } => describe::describe(
            &service,
            describe::DescribeConfig {
                expressions,
                usage: cli.usage,
                metadata,
            },
        ),

        Commands::Validate {
            expressions,
            expected,
            metadata,
        } => validate::validate(
            &service,
            validate::ValidateConfig {
                expressions,
                usage: cli.usage,
                expected,
                metadata,
                verbose: cli.verbose > 0,
            },
        ),

        Commands::Eval {
            expression,
            context,
            strategy,
            json,
        } => evaluate::evaluate(
            &service,
            evaluate::EvalConfig {
                expression,
                usage: cli.usage,
                context,
                strategy,
                json,
            },
        ),

        Commands::Indicator {
            uid,
            numerator,
            denominator,
            factor,
            annualized,
            context,
            json,
        } => indicator::indicator(
            &service,
            indicator::IndicatorConfig {
                uid,
                numerator,
                denominator,
                factor,
                annualized,
                context,
                json,
            },
        ),
    }
}
