use elkweb_core::{EditorConfig, ParseError, SceneGraph, apply_defaults, parse_graph};
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Elkweb(elkweb_core::Error),
    Config(ParseError),
    Json(serde_json::Error),
    CheckFailed,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Elkweb(err) => write!(f, "{}", err.diagnostic()),
            CliError::Config(err) => write!(f, "config error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::CheckFailed => write!(f, "check failed"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<elkweb_core::Error> for CliError {
    fn from(value: elkweb_core::Error) -> Self {
        Self::Elkweb(value)
    }
}

impl From<ParseError> for CliError {
    fn from(value: ParseError) -> Self {
        Self::Elkweb(value.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Transform,
    Check,
    Defaults,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    overrides: Vec<(String, Value)>,
    pretty: bool,
    lenient: bool,
}

fn usage() -> &'static str {
    "elkweb-cli\n\
\n\
USAGE:\n\
  elkweb-cli [transform] [--pretty] [--lenient] [--config <path>] [<path>|-]\n\
  elkweb-cli check [--config <path>] [<path>|-]\n\
  elkweb-cli defaults [--pretty] [--config <path>] [--set <key>=<value>]... [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is a laid-out ELK graph in JSON or JSON5.\n\
  - transform prints the scene JSON; --lenient prints an error scene instead of failing.\n\
  - check prints 'ok' or '<line>:<column>: <message>' and exits with 1 on failure.\n\
  - defaults fills in missing node/port/label sizes and prints the ELK JSON.\n\
  - --config names a JSON5 file with editor settings; its defaults.* sizes are used by defaults.\n\
  - --set overrides one dotted setting after --config, e.g. --set defaults.portSize=7.\n\
    The value is read as JSON5 and taken as a plain string if that fails.\n\
  - Set ELKWEB_LOG (e.g. ELKWEB_LOG=debug) to log to stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "transform" => args.command = Command::Transform,
            "check" => args.command = Command::Check,
            "defaults" => args.command = Command::Defaults,
            "--pretty" => args.pretty = true,
            "--lenient" => args.lenient = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--set" => {
                let Some(assignment) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.overrides.push(parse_override(assignment)?);
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" if args.input.is_none() => args.input = Some("-".to_string()),
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn parse_override(assignment: &str) -> Result<(String, Value), CliError> {
    let Some((key, raw)) = assignment.split_once('=') else {
        return Err(CliError::Usage(usage()));
    };
    if key.is_empty() {
        return Err(CliError::Usage(usage()));
    }
    let value = json5::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn load_config(path: Option<&str>, overrides: &[(String, Value)]) -> Result<EditorConfig, CliError> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            EditorConfig::from_json5_str(&text).map_err(CliError::Config)?
        }
        None => EditorConfig::default(),
    };
    for (key, value) in overrides {
        tracing::debug!(key = %key, value = %value, "config override");
        config.set_value(key, value.clone());
    }
    Ok(config)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("ELKWEB_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref(), &args.overrides)?;
    let text = read_input(args.input.as_deref())?;
    tracing::debug!(
        command = ?args.command,
        input = args.input.as_deref().unwrap_or("-"),
        bytes = text.len(),
        "read input"
    );

    match args.command {
        Command::Transform => {
            let scene = match elkweb_core::transform_str(&text) {
                Ok(scene) => scene,
                Err(err) if args.lenient => {
                    tracing::warn!(error = %err, "rendering error scene");
                    SceneGraph::error_scene(err.to_string())
                }
                Err(err) => return Err(err.into()),
            };
            write_json(&scene, args.pretty)
        }
        Command::Check => match elkweb_core::transform_str(&text) {
            Ok(_) => {
                println!("ok");
                Ok(())
            }
            Err(err) => {
                println!("{}", err.diagnostic());
                Err(CliError::CheckFailed)
            }
        },
        Command::Defaults => {
            let mut graph = parse_graph(&text)?;
            apply_defaults(&mut graph, &config.default_sizes());
            write_json(&graph, args.pretty)
        }
    }
}

fn main() {
    init_logging();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::CheckFailed) => std::process::exit(1),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
