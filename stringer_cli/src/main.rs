use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cmds;

#[derive(Parser)]
#[command(name = "stringer-gen")]
#[command(about = "Bitmask and String() generator for integer constant groups", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /* Generate accessor code for declared constant groups */
    Codegen {
        /* Declaration files (YAML, or JSON by extension) */
        #[arg(short = 'f', long = "files", value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /* Types to generate; all declared types when omitted */
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        types: Vec<String>,

        /* Target language for code generation */
        #[arg(short = 'l', long = "language", value_enum, default_value = "go")]
        language: Language,

        /* Output file; defaults to <dir of first file>/<first type>_string.<ext> */
        #[arg(short = 'o', long = "output", value_name = "PATH")]
        output: Option<PathBuf>,

        /* Prefix to strip from constant names */
        #[arg(long = "trim-prefix", value_name = "PREFIX")]
        trim_prefix: Option<String>,

        /* Use trailing line comments as display names */
        #[arg(long = "line-comment")]
        line_comment: bool,

        /* Formatting stage applied to the assembled output */
        #[arg(long = "formatter", value_enum, default_value = "builtin")]
        formatter: Formatter,

        /* External formatter command, e.g. "gofmt -s" */
        #[arg(long = "formatter-cmd", value_name = "CMD")]
        formatter_cmd: Option<String>,

        /* Drop groups with unsupported or missing values instead of failing */
        #[arg(long = "skip-invalid")]
        skip_invalid: bool,

        /* Enable verbose output */
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },

    /* Show runs, name tables and the chosen plan for each group */
    Analyze {
        /* Declaration files (YAML, or JSON by extension) */
        #[arg(short = 'f', long = "files", value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /* Types to analyze; all declared types when omitted */
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        types: Vec<String>,

        /* Print each emit plan as JSON */
        #[arg(long = "print-plan")]
        print_plan: bool,

        /* Stringify these values with every analyzed group */
        #[arg(long = "probe", value_name = "VALUE", allow_hyphen_values = true)]
        probes: Vec<String>,

        /* Enable verbose output */
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum Language {
    /* Generate Go methods (.go) */
    Go,
    /* Generate a Rust trait and Display impl (.rs) */
    Rust,
}

impl From<Language> for stringer_gen::Target {
    fn from(lang: Language) -> Self {
        match lang {
            Language::Go => stringer_gen::Target::Go,
            Language::Rust => stringer_gen::Target::Rust,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Formatter {
    /* Delimiter check and whitespace normalization */
    Builtin,
    /* Write generated text untouched */
    #[value(name = "none")]
    Off,
    /* Pipe through gofmt/rustfmt or --formatter-cmd */
    External,
}

impl From<Formatter> for stringer_gen::FormatterKind {
    fn from(formatter: Formatter) -> Self {
        match formatter {
            Formatter::Builtin => stringer_gen::FormatterKind::Builtin,
            Formatter::Off => stringer_gen::FormatterKind::None,
            Formatter::External => stringer_gen::FormatterKind::External,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Codegen {
            files,
            types,
            language,
            output,
            trim_prefix,
            line_comment,
            formatter,
            formatter_cmd,
            skip_invalid,
            verbose,
        } => {
            init_tracing(verbose);
            cmds::codegen::run(cmds::codegen::CodegenConfig {
                files,
                types,
                target: language.into(),
                output,
                trim_prefix,
                line_comment,
                formatter: formatter.into(),
                formatter_cmd,
                skip_invalid,
                verbose,
            })?;
        }

        Commands::Analyze {
            files,
            types,
            print_plan,
            probes,
            verbose,
        } => {
            init_tracing(verbose);
            cmds::analyze::run(files, types, print_plan, probes)?;
        }
    }

    Ok(())
}
