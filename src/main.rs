use altre_killring::ui::StatusMessage;
use altre_killring::{logging, EditingEngine, EngineConfig, MemorySurface, MessageLog, SessionScript};
use anyhow::{bail, Context};
use std::io::Read;
use std::path::PathBuf;

const USAGE: &str = "usage: altre-killring [SCRIPT] [--text FILE] [--config FILE] [--verbose]";

#[derive(Debug, Default)]
struct Options {
    script: Option<PathBuf>,
    text: Option<PathBuf>,
    config: Option<PathBuf>,
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_args(&args)?;

    let mut config = match &options.config {
        Some(path) => EngineConfig::load_from(path)?,
        None => EngineConfig::load()?,
    };
    if options.verbose {
        config.logging.level = logging::LogLevel::Debug;
    }
    logging::init(&config.logging).context("failed to install logger")?;

    let script = match &options.script {
        Some(path) => SessionScript::load(path)?,
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("failed to read script from stdin")?;
            SessionScript::parse(&content)?
        }
    };

    let mut surface = match &options.text {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            MemorySurface::from_text(&text)
        }
        None => MemorySurface::new(),
    };

    let mut engine = EditingEngine::with_config(&config, MessageLog::new());
    let report = script.replay(&mut engine, &mut surface);

    println!("{}", surface);
    if options.verbose {
        for message in engine.status().messages() {
            match message {
                StatusMessage::Transient { text, duration } => {
                    eprintln!("[{} ms] {}", duration.as_millis(), text)
                }
                StatusMessage::Persistent(text) if !text.is_empty() => eprintln!("[prompt] {}", text),
                StatusMessage::Persistent(_) => {}
            }
        }
        eprintln!(
            "{} steps, {} failed, modes: [{}]",
            report.executed,
            report.failed,
            engine.modes().describe().replace('\n', ", ")
        );
    }
    Ok(())
}

fn parse_args(args: &[String]) -> anyhow::Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--text" => options.text = Some(next_path(&mut iter, arg)?),
            "--config" => options.config = Some(next_path(&mut iter, arg)?),
            "--verbose" | "-v" => options.verbose = true,
            "--help" | "-h" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            other if other.starts_with('-') => bail!("unknown option {}\n{}", other, USAGE),
            other => {
                if options.script.is_some() {
                    bail!("only one script may be given\n{}", USAGE);
                }
                options.script = Some(PathBuf::from(other));
            }
        }
    }
    Ok(options)
}

fn next_path<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> anyhow::Result<PathBuf> {
    match iter.next() {
        Some(value) if !value.starts_with('-') => Ok(PathBuf::from(value)),
        _ => bail!("{} needs a file argument\n{}", flag, USAGE),
    }
}
