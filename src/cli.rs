//! Command-line interface for pycpp-debug.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::path::PathBuf;

/// Which user command to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Full coordinated launch (the default).
    #[default]
    Launch,
    /// Run without debugging.
    Run,
    /// Stop the active python session so the host can relaunch.
    Restart,
}

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// The command to run.
    pub command: Command,
    /// Path to the launch-configuration catalog file (JSON).
    pub catalog: Option<PathBuf>,
    /// Name of the composite configuration to launch from the catalog.
    pub name: Option<String>,
    /// Workspace folder the sessions run in.
    pub workspace: Option<PathBuf>,
    /// Collapse the post-attach settle delay to zero.
    pub optimized: bool,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut command_seen = false;
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('c') | Long("catalog") => {
                result.catalog = Some(parser.value()?.parse()?);
            }
            Short('n') | Long("name") => {
                result.name = Some(parser.value()?.parse()?);
            }
            Short('w') | Long("workspace") => {
                result.workspace = Some(parser.value()?.parse()?);
            }
            Long("optimized") => {
                result.optimized = true;
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) if !command_seen => {
                let value = val.to_string_lossy().into_owned();
                result.command = match value.as_str() {
                    "launch" => Command::Launch,
                    "run" => Command::Run,
                    "restart" => Command::Restart,
                    _ => return Err(ArgsError::UnknownCommand(value)),
                };
                command_seen = true;
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"pycpp-debug {version}
Coordinated dual-debugger launcher for mixed Python/C++ debugging

USAGE:
    pycpp-debug [COMMAND] [OPTIONS]

COMMANDS:
    launch                  Start a coordinated debug launch [default]
    run                     Run without debugging
    restart                 Stop the active python session for relaunch

OPTIONS:
    -c, --catalog <FILE>    Launch-configuration catalog (JSON)
    -n, --name <NAME>       Composite configuration name in the catalog
    -w, --workspace <DIR>   Workspace folder [default: current directory]
        --optimized         Skip the post-attach settle delay
    -l, --log-level <LVL>   Log level (error, warn, info, debug, trace)
    -h, --help              Print help
    -V, --version           Print version

EXAMPLES:
    # Debug the current file with both debuggers
    pycpp-debug

    # Launch a named composite configuration
    pycpp-debug -c .vscode/launch.json -n "PythonCpp Debug"

    # Run without debugging
    pycpp-debug run
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("pycpp-debug {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Unknown command word.
    UnknownCommand(String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::UnknownCommand(cmd) => {
                write!(f, "unknown command: '{}' (try launch, run, restart)", cmd)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}
