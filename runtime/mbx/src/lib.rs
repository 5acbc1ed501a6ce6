//! Command-line driver for mbx message patterns.
//!
//! `mbx match <pattern> <tuple>` parses both arguments with [`syntax`],
//! runs the matcher and reports the mapping and bound values.

use std::any::Any;
use std::fmt;
use std::io::{self, Write};
use std::sync::Once;

use mbx_pattern::Pattern;
use mbx_types::{FmtFn, TypeRegistry};

pub mod syntax;

pub use syntax::{parse_pattern, parse_tuple, SyntaxError, SyntaxErrorKind};

/// Environment variable holding the log filter, in `EnvFilter` syntax.
pub const LOG_ENV: &str = "MBX_LOG";

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber.
///
/// Does nothing unless `MBX_LOG` is set. With `--trace-tree` the output is
/// an indented span tree instead of flat lines. Safe to call more than once.
pub fn init_tracing(options: &CliOptions) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var(LOG_ENV).is_err() {
            return;
        }
        let filter = EnvFilter::from_env(LOG_ENV);
        let registry = tracing_subscriber::registry().with(filter);
        if options.trace_tree {
            registry
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_writer(io::stderr),
                )
                .init();
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(io::stderr),
                )
                .init();
        }
    });
}

/// Flags accepted by every subcommand.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliOptions {
    /// Render trace output as a span tree.
    pub trace_tree: bool,
    /// Print nothing; report the result through the exit status only.
    pub quiet: bool,
}

impl CliOptions {
    /// Split `args` into recognised flags and positional arguments.
    pub fn parse(args: &[String]) -> Result<(Self, Vec<&str>), CliError> {
        let mut options = CliOptions::default();
        let mut positional = Vec::new();
        for arg in args {
            match arg.as_str() {
                "--trace-tree" => options.trace_tree = true,
                "-q" | "--quiet" => options.quiet = true,
                flag if flag.starts_with("--") => {
                    return Err(CliError::Usage(format!("unknown option `{flag}`")));
                }
                other => positional.push(other),
            }
        }
        Ok((options, positional))
    }
}

/// Result of a successful command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Matched,
    NoMatch,
    /// Informational command such as `help` or `show`.
    Done,
}

impl Outcome {
    /// Process exit status: 0 on match, 1 on no match.
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Matched | Outcome::Done => 0,
            Outcome::NoMatch => 1,
        }
    }
}

/// Errors reported by the driver. All of them exit with status 2.
#[derive(Debug)]
pub enum CliError {
    /// Bad command line.
    Usage(String),
    /// The pattern or tuple argument failed to parse.
    Syntax {
        what: &'static str,
        source: SyntaxError,
    },
    /// Writing output failed.
    Io(io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        2
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) => f.write_str(msg),
            CliError::Syntax { what, source } => write!(f, "invalid {what}: {source}"),
            CliError::Io(e) => write!(f, "failed to write output: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Usage(_) => None,
            CliError::Syntax { source, .. } => Some(source),
            CliError::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

pub const USAGE: &str = "\
Usage: mbx <command> [options]

Commands:
  match <pattern> <tuple>   Match a tuple against a pattern
  show <pattern>            Print a pattern and its shape
  help                      Show this message

Options:
  --trace-tree   Render MBX_LOG output as a span tree
  -q, --quiet    Print nothing; use the exit status only

Examples:
  mbx match ':get, int, ..' ':get, 1, \"x\"'
  MBX_LOG=mbx_pattern=trace mbx match '.., int' '\"a\", 1'
";

/// Run the driver on `args` (without the program name), writing results to `out`.
pub fn run(args: &[String], out: &mut impl Write) -> Result<Outcome, CliError> {
    let (options, positional) = CliOptions::parse(args)?;
    let Some((&command, rest)) = positional.split_first() else {
        return Err(CliError::Usage("missing command".to_string()));
    };

    match (command, rest) {
        ("match", [pattern, tuple]) => run_match(pattern, tuple, &options, out),
        ("match", _) => Err(CliError::Usage(
            "`match` takes a pattern and a tuple".to_string(),
        )),
        ("show", [pattern]) => run_show(pattern, &options, out),
        ("show", _) => Err(CliError::Usage("`show` takes one pattern".to_string())),
        ("help" | "-h", _) => {
            out.write_all(USAGE.as_bytes())?;
            Ok(Outcome::Done)
        }
        (other, _) => Err(CliError::Usage(format!("unknown command `{other}`"))),
    }
}

fn parse_pattern_arg(source: &str, registry: &TypeRegistry) -> Result<Pattern, CliError> {
    parse_pattern(source, registry).map_err(|source| CliError::Syntax {
        what: "pattern",
        source,
    })
}

fn run_match(
    pattern: &str,
    tuple: &str,
    options: &CliOptions,
    out: &mut impl Write,
) -> Result<Outcome, CliError> {
    let registry = TypeRegistry::new();
    let pattern = parse_pattern_arg(pattern, &registry)?;
    let tuple = parse_tuple(tuple, &registry).map_err(|source| CliError::Syntax {
        what: "tuple",
        source,
    })?;

    tracing::debug!(
        pattern = %pattern.display(&registry),
        tuple = %tuple.display(&registry),
        "matching"
    );

    let Some(bindings) = pattern.bind(&tuple) else {
        if !options.quiet {
            writeln!(out, "no match")?;
        }
        return Ok(Outcome::NoMatch);
    };

    if !options.quiet {
        writeln!(out, "match {:?}", bindings.mapping())?;
        for (i, ((ty, value), pos)) in bindings.iter().zip(bindings.mapping()).enumerate() {
            let rendered = registry
                .info(ty)
                .map(|info| DebugWith(info.fmt_fn(), value.as_any()));
            match rendered {
                Some(value) => writeln!(out, "  ${i} = {value:?} : {} @{pos}", registry.name(ty))?,
                None => writeln!(out, "  ${i} : {} @{pos}", registry.name(ty))?,
            }
        }
    }
    Ok(Outcome::Matched)
}

fn run_show(pattern: &str, options: &CliOptions, out: &mut impl Write) -> Result<Outcome, CliError> {
    let registry = TypeRegistry::new();
    let pattern = parse_pattern_arg(pattern, &registry)?;
    if !options.quiet {
        writeln!(out, "{}", pattern.display(&registry))?;
        writeln!(out, "  slots: {}", pattern.len())?;
        writeln!(out, "  arity: {}", pattern.arity())?;
        writeln!(out, "  stretch: {}", pattern.has_stretch())?;
    }
    Ok(Outcome::Done)
}

/// Formats an erased value with its registered formatter.
struct DebugWith<'a>(FmtFn, &'a dyn Any);

impl fmt::Debug for DebugWith<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.0)(self.1, f)
    }
}
