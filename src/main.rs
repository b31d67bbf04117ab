// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use traduire::app_config::{self, Config, ModelBackend};
use traduire::app_controller::{Controller, InputSource};
use traduire::translation::CancellationFlag;

/// CLI Wrapper for ModelBackend to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliModelBackend {
    Phrasebook,
    Ollama,
    Mock,
}

impl From<CliModelBackend> for ModelBackend {
    fn from(cli_backend: CliModelBackend) -> Self {
        match cli_backend {
            CliModelBackend::Phrasebook => ModelBackend::Phrasebook,
            CliModelBackend::Ollama => ModelBackend::Ollama,
            CliModelBackend::Mock => ModelBackend::Mock,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate text sentence by sentence
    Translate(TranslateArgs),

    /// Show how text is split into sentence units, without translating
    Segment {
        /// Text to segment (reads standard input when omitted)
        #[arg(value_name = "TEXT")]
        text: Option<String>,

        /// Read the text from a file
        #[arg(short, long, conflicts_with = "text")]
        input: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: PathBuf,
    },

    /// Generate shell completions for traduire
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Text to translate (reads standard input when omitted)
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Read the text from a file
    #[arg(short, long, conflicts_with = "text")]
    input: Option<PathBuf>,

    /// Write the translation to a file instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Translator backend to use
    #[arg(short, long, value_enum)]
    backend: Option<CliModelBackend>,

    /// Model file (phrasebook) or model name (ollama)
    #[arg(short, long)]
    model: Option<String>,

    /// Number of sentences translated concurrently
    #[arg(long)]
    concurrency: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,
}

/// traduire - Neural machine translation, français → anglais
///
/// Splits text into sentences, translates each one with the configured
/// model and puts the translation back together with the original spacing.
#[derive(Parser, Debug)]
#[command(name = "traduire")]
#[command(version)]
#[command(about = "Sentence-by-sentence French to English translation")]
#[command(long_about = "traduire splits text into sentences, translates each sentence with a neural
translation model and reassembles the result with the original spacing.

EXAMPLES:
    traduire translate \"J'ai toujours voulu être un oiseau.\"
    traduire translate -i lettre.txt -o letter.txt
    cat lettre.txt | traduire translate -b ollama -m llama3.2:3b
    traduire segment \"Bonjour M. Dupont. Comment allez-vous?\"
    traduire completions bash > traduire.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

BACKENDS:
    phrasebook - Serialized model file (default: models/fr-en.phrasebook.json)
    ollama     - Local Ollama server (default: llama3.2:3b)
    mock       - Tags sentences instead of translating them")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and emoji for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "❌"),
            Level::Warn => ("\x1B[1;33m", "🚧"),
            Level::Info => ("\x1B[1;32m", " "),
            Level::Debug => ("\x1B[1;36m", "🔍"),
            Level::Trace => ("\x1B[1;35m", "📋"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level.min(log::max_level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, emoji) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install the logger with the most verbose level; the effective level is
    // set through log::set_max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "traduire", &mut std::io::stdout());
            Ok(())
        }
        Commands::Segment { text, input, config_path } => run_segment(text, input, &config_path),
        Commands::Translate(args) => run_translate(args).await,
    }
}

fn input_source(text: Option<String>, input: Option<PathBuf>) -> InputSource {
    match (text, input) {
        (Some(text), _) => InputSource::Text(text),
        (None, Some(path)) => InputSource::File(path),
        (None, None) => InputSource::Stdin,
    }
}

fn run_segment(text: Option<String>, input: Option<PathBuf>, config_path: &Path) -> Result<()> {
    // Segmentation never loads the model, but honours the input limit
    let config = Config::load_or_create(config_path)?;
    log::set_max_level(config.log_level.into());

    let controller = Controller::with_config(config)?.with_progress(false);
    let text = controller.read_input(&input_source(text, input))?;
    let segmentation = controller.segment(&text);

    let mut stdout = std::io::stdout();
    for (index, sentence) in segmentation.sentences.iter().enumerate() {
        writeln!(stdout, "[{}] {:?}", index + 1, sentence)?;
        if let Some(separator) = segmentation.separators.get(index) {
            writeln!(stdout, "    separator {:?}", separator)?;
        }
    }

    Ok(())
}

/// Load the config file and apply command line overrides
fn load_config(options: &TranslateArgs) -> Result<Config> {
    let mut config = Config::load_or_create(&options.config_path)?;

    if let Some(backend) = &options.backend {
        config.model.backend = backend.clone().into();
    }

    if let Some(model) = &options.model {
        match config.model.backend {
            ModelBackend::Phrasebook => config.model.path = PathBuf::from(model),
            ModelBackend::Ollama => config.model.model_name = model.clone(),
            ModelBackend::Mock => warn!("--model is ignored by the mock backend"),
        }
    }

    if let Some(concurrency) = options.concurrency {
        config.concurrent_requests = concurrency;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // Apply the command line log level before the config file is read
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.into());
    }

    let config = load_config(&options)?;
    log::set_max_level(config.log_level.into());

    let controller = Controller::with_config(config)?.with_progress(!options.no_progress);
    let source = input_source(options.text.clone(), options.input.clone());

    // Stop between two sentences on Ctrl-C
    let cancel = CancellationFlag::new();
    let signal_flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current sentence");
            signal_flag.cancel();
        }
    });

    let translated = match controller.run(source, options.output.as_deref(), Some(&cancel)).await {
        Ok(translated) => translated,
        Err(e) => {
            error!("{:#}", e);
            return Err(anyhow!("Translation failed"));
        }
    };

    if options.output.is_none() {
        print_output(&translated)?;
    }

    Ok(())
}

fn print_output(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}
