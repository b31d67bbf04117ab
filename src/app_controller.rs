use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_config::Config;
use crate::model_provider::ModelProvider;
use crate::translation::{CancellationFlag, Segmentation, TranslationOutput, TranslationService};

// @module: Application controller for the command line host

/// Where the text to translate comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Text given directly
    Text(String),
    /// Text read from a file
    File(PathBuf),
    /// Text read from standard input
    Stdin,
}

/// Main application controller for text translation
#[derive(Debug)]
pub struct Controller {
    // @field: App configuration
    pub config: Config,
    // @field: Lazily loaded model
    provider: ModelProvider,
    // @field: Whether progress bars are drawn
    show_progress: bool,
}

impl Controller {
    /// Create a new controller for test purposes: mock backend, no progress bars
    pub fn new_for_test() -> Result<Self> {
        let mut config = Config::default();
        config.model.backend = crate::app_config::ModelBackend::Mock;
        Ok(Self::with_config(config)?.with_progress(false))
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        Ok(Self {
            provider: ModelProvider::new(config.clone()),
            config,
            show_progress: true,
        })
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Override the directory downloaded models are cached in
    pub fn with_model_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.provider = ModelProvider::new(self.config.clone()).with_cache_dir(cache_dir);
        self
    }

    /// Load the model (once) and build a translation service around it
    pub async fn service(&self) -> Result<TranslationService> {
        let spinner = if self.show_progress && !self.provider.is_loaded() {
            let spinner = ProgressBar::new_spinner();
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner.set_message("Loading model...");
            spinner
        } else {
            ProgressBar::hidden()
        };

        let translator = self.provider.translator().await;
        match &translator {
            Ok(_) => spinner.finish_with_message("Loading model... Done!"),
            Err(_) => spinner.abandon_with_message("Loading model... Failed"),
        }

        let translator = translator.context("Failed to load translation model")?;
        Ok(TranslationService::from_config(translator, &self.config))
    }

    /// Split text into sentence units without loading a model
    pub fn segment(&self, text: &str) -> Segmentation {
        crate::translation::segment(text)
    }

    /// Read the input text, enforcing the configured length limit
    pub fn read_input(&self, source: &InputSource) -> Result<String> {
        let text = match source {
            InputSource::Text(text) => text.clone(),
            InputSource::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file: {:?}", path))?,
            InputSource::Stdin => {
                let mut buffer = String::new();
                std::io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read standard input")?;
                buffer
            }
        };

        let length = text.chars().count();
        if length > self.config.max_input_chars {
            return Err(anyhow!(
                "Input is {} characters long, the limit is {}",
                length,
                self.config.max_input_chars
            ));
        }

        Ok(text)
    }

    /// Translate text with a sentence progress bar
    pub async fn translate_text(&self, text: &str, cancel: Option<&CancellationFlag>) -> Result<TranslationOutput> {
        let service = self.service().await?;

        let progress_bar = if self.show_progress {
            let progress_bar = ProgressBar::new(0);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} sentences ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            progress_bar.set_style(style.progress_chars("█▓▒░"));
            progress_bar.set_message("Translating");
            progress_bar
        } else {
            ProgressBar::hidden()
        };

        let pb = progress_bar.clone();
        let result = service
            .translate_with_progress(
                text,
                move |completed, total| {
                    pb.set_length(total as u64);
                    pb.set_position(completed as u64);
                },
                cancel,
            )
            .await;

        progress_bar.finish_and_clear();
        let output = result?;

        info!(
            "Translated {} sentence(s) with {} in {}.",
            output.sentences.iter().filter(|s| !s.is_empty()).count(),
            service.translator_name(),
            Self::format_duration(output.duration)
        );

        Ok(output)
    }

    /// Read, translate and write out one input
    pub async fn run(&self, source: InputSource, output_file: Option<&Path>, cancel: Option<&CancellationFlag>) -> Result<String> {
        let text = self.read_input(&source)?;
        let output = self.translate_text(&text, cancel).await?;

        if let Some(path) = output_file {
            std::fs::write(path, &output.text)
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
            info!("Success: {:?}", path);
        }

        Ok(output.text)
    }

    /// Format a duration as seconds or minutes and seconds
    pub fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs_f64();
        if total_secs < 60.0 {
            format!("{:.1}s", total_secs)
        } else {
            let minutes = (total_secs / 60.0).floor() as u64;
            let seconds = total_secs - (minutes as f64 * 60.0);
            format!("{}m {:.0}s", minutes, seconds)
        }
    }
}
