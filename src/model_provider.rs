/*!
 * Model acquisition and process-wide translator lifetime.
 *
 * A `ModelProvider` builds the configured translator the first time it is
 * asked for one and hands out the same instance afterwards. Phrasebook
 * models are read from disk, downloading them into the user cache directory
 * first when only a URL is configured.
 */

use log::{debug, info};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;

use crate::app_config::{Config, ModelBackend};
use crate::errors::ModelError;
use crate::language_utils;
use crate::providers::SharedTranslator;
use crate::providers::mock::MockTranslator;
use crate::providers::ollama::Ollama;
use crate::providers::phrasebook::Phrasebook;

/// Directory name under the user cache directory
const CACHE_DIRNAME: &str = "traduire";

/// Process-wide translator used by `shared_translator`
static SHARED_TRANSLATOR: OnceCell<SharedTranslator> = OnceCell::const_new();

/// Lazily builds and keeps one translator
#[derive(Debug)]
pub struct ModelProvider {
    config: Config,
    cache_dir: Option<PathBuf>,
    translator: OnceCell<SharedTranslator>,
}

impl ModelProvider {
    /// Create a provider; nothing is loaded until `translator` is called
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cache_dir: None,
            translator: OnceCell::new(),
        }
    }

    /// Override the directory downloaded models are cached in
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    /// Whether the translator has been built already
    pub fn is_loaded(&self) -> bool {
        self.translator.initialized()
    }

    /// Get the translator, building it on first use.
    ///
    /// Concurrent first calls wait for a single initialization. A failed
    /// initialization leaves the provider empty so the next call retries.
    pub async fn translator(&self) -> Result<SharedTranslator, ModelError> {
        self.translator
            .get_or_try_init(|| self.load())
            .await
            .cloned()
    }

    /// Build the configured backend
    async fn load(&self) -> Result<SharedTranslator, ModelError> {
        let start = Instant::now();
        let backend = self.config.model.backend;
        info!("Loading {} model...", backend.display_name());

        let translator: SharedTranslator = match backend {
            ModelBackend::Phrasebook => {
                let path = self.resolve_model_file().await?;
                let phrasebook = Phrasebook::from_file(&path)?;
                self.check_language_pair(phrasebook.source_language(), phrasebook.target_language())?;
                debug!(
                    "Phrasebook {:?}: {} sentences, {} lexicon entries",
                    path,
                    phrasebook.sentence_count(),
                    phrasebook.lexicon_size()
                );
                Arc::new(phrasebook)
            }
            ModelBackend::Ollama => {
                let source_name = language_name(&self.config.source_language);
                let target_name = language_name(&self.config.target_language);
                let ollama = Ollama::from_config(&self.config.model, &source_name, &target_name)?;
                let version = ollama.version().await?;
                debug!("Connected to Ollama {} at {}", version, ollama.base_url());
                Arc::new(ollama)
            }
            ModelBackend::Mock => Arc::new(
                MockTranslator::working().with_tag(self.config.target_language.to_uppercase()),
            ),
        };

        info!("Loading {} model... Done! ({:.2?})", backend.display_name(), start.elapsed());
        Ok(translator)
    }

    /// Locate the model file, downloading it when only a URL is configured
    pub async fn resolve_model_file(&self) -> Result<PathBuf, ModelError> {
        let model = &self.config.model;
        if model.path.is_file() {
            return Ok(model.path.clone());
        }

        let Some(url) = &model.url else {
            return Err(ModelError::NotFound(model.path.display().to_string()));
        };

        let cached = self.cache_dir()?.join(cache_file_name(url, &model.path));
        if cached.is_file() {
            match &model.sha256 {
                Some(expected) => {
                    let bytes = tokio::fs::read(&cached).await?;
                    if verify_checksum(&bytes, expected).is_ok() {
                        debug!("Using cached model {:?}", cached);
                        return Ok(cached);
                    }
                    info!("Cached model {:?} does not match its checksum, downloading again", cached);
                }
                None => {
                    debug!("Using cached model {:?}", cached);
                    return Ok(cached);
                }
            }
        }

        download_model(
            url,
            &cached,
            model.sha256.as_deref(),
            Duration::from_secs(model.timeout_secs),
        )
        .await?;

        Ok(cached)
    }

    fn cache_dir(&self) -> Result<PathBuf, ModelError> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }

        dirs::cache_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
            .map(|dir| dir.join(CACHE_DIRNAME))
            .ok_or_else(|| ModelError::NotFound("no cache directory available for model download".to_string()))
    }

    fn check_language_pair(&self, model_source: &str, model_target: &str) -> Result<(), ModelError> {
        let source_matches = language_utils::language_codes_match(model_source, &self.config.source_language);
        let target_matches = language_utils::language_codes_match(model_target, &self.config.target_language);

        if source_matches && target_matches {
            return Ok(());
        }

        Err(ModelError::LanguageMismatch {
            model_pair: format!("{} → {}", model_source, model_target),
            configured_pair: format!("{} → {}", self.config.source_language, self.config.target_language),
        })
    }
}

/// Translator shared by the whole process.
///
/// The first caller's configuration decides which backend is built; later
/// calls get the same instance whatever configuration they pass.
pub async fn shared_translator(config: &Config) -> Result<SharedTranslator, ModelError> {
    SHARED_TRANSLATOR
        .get_or_try_init(|| async { ModelProvider::new(config.clone()).load().await })
        .await
        .cloned()
}

/// Download a model file to `destination`, verifying its checksum if given.
///
/// The file is written to a temporary file next to the destination and
/// renamed into place, so a failed download never leaves a partial model.
pub async fn download_model(
    url: &str,
    destination: &Path,
    expected_sha256: Option<&str>,
    timeout: Duration,
) -> Result<(), ModelError> {
    info!("Downloading model from {}", url);

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ModelError::Download(e.to_string()))?;

    let response = client.get(url)
        .send()
        .await
        .map_err(|e| ModelError::Download(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ModelError::Download(format!("{} responded with {}", url, status)));
    }

    let bytes: bytes::Bytes = response.bytes()
        .await
        .map_err(|e| ModelError::Download(e.to_string()))?;

    if let Some(expected) = expected_sha256 {
        verify_checksum(&bytes, expected)?;
    }

    let parent = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    tokio::fs::create_dir_all(&parent).await?;

    let target = destination.to_path_buf();
    let size = bytes.len();
    tokio::task::spawn_blocking(move || -> Result<(), ModelError> {
        let mut staging = tempfile::NamedTempFile::new_in(&parent)?;
        staging.write_all(&bytes)?;
        staging.flush()?;
        staging.persist(&target).map_err(|e| ModelError::Io(e.error))?;
        Ok(())
    })
    .await
    .map_err(|e| ModelError::Io(std::io::Error::other(e)))??;

    info!("Saved model ({} bytes) to {:?}", size, destination);
    Ok(())
}

/// Compare the SHA-256 of `bytes` with a hex digest
pub fn verify_checksum(bytes: &[u8], expected: &str) -> Result<(), ModelError> {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let actual = format!("{:x}", hasher.finalize());

    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(ModelError::ChecksumMismatch {
            expected: expected.trim().to_lowercase(),
            actual,
        })
    }
}

/// File name for a downloaded model: the last URL path segment, or the
/// configured path's file name
fn cache_file_name(url: &str, configured_path: &Path) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .or_else(|| configured_path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "model.json".to_string())
}

fn language_name(code: &str) -> String {
    language_utils::get_language_name(code).unwrap_or_else(|_| code.to_string())
}
