//! Model endpoint access with exponential backoff.
//!
//! Translation and the classifier strategy both talk to an OpenAI-compatible
//! endpoint through `awful_aj`. Each call goes through [`RetryAsk`], which
//! retries transient failures before giving the error back to the caller,
//! where it turns into a fallback value.
//!
//! # Retry Strategy
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
//! ```

use crate::config::LlmSettings;
use awful_aj::api::ask;
use awful_aj::config::AwfulJadeConfig;
use awful_aj::template::ChatTemplate;
use awful_aj::{config, config_dir, template};
use rand::{Rng, rng};
use std::error::Error;
use std::fmt;
use std::path::Path;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Something that can answer a text prompt.
pub trait AskAsync {
    type Response;

    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// Adds exponential backoff with jitter to any [`AskAsync`].
pub struct RetryAsk<T> {
    inner: T,
    /// Retries after the first attempt; zero means a single attempt.
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    /// Backoff before retry number `attempt` (1-based), without jitter.
    pub fn delay_for(&self, attempt: usize) -> StdDuration {
        let shift = attempt.saturating_sub(1).min(16) as u32;
        self.base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync,
{
    type Response = T::Response;

    #[instrument(level = "debug", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.ask(text).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        warn!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_t0.elapsed().as_millis(),
                            error = %e,
                            "Model call exhausted retries"
                        );
                        return Err(e);
                    }

                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = self.delay_for(attempt) + StdDuration::from_millis(jitter_ms);
                    debug!(attempt, ?delay, error = %e, "Model call failed; backing off");
                    sleep(delay).await;
                }
            }
        }
    }
}

/// One chat template bound to an endpoint configuration.
pub struct TemplateAsk<'a> {
    pub config: &'a AwfulJadeConfig,
    pub template: &'a ChatTemplate,
}

impl fmt::Debug for TemplateAsk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateAsk").finish_non_exhaustive()
    }
}

impl AskAsync for TemplateAsk<'_> {
    type Response = String;

    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let t0 = Instant::now();
        let res = ask(self.config, text.to_string(), self.template, None, None).await;
        debug!(elapsed_ms = t0.elapsed().as_millis(), ok = res.is_ok(), "Model call returned");
        res
    }
}

/// Endpoint configuration plus the two templates the pipeline uses.
pub struct LlmClient {
    config: AwfulJadeConfig,
    translation: ChatTemplate,
    sentiment: ChatTemplate,
    max_retries: usize,
}

impl fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmClient")
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    /// Load the endpoint configuration and both templates.
    ///
    /// Without an explicit path, `config.yaml` in the `awful_aj` config
    /// directory is used.
    #[instrument(level = "info", skip(settings))]
    pub async fn load(
        config_path: Option<&Path>,
        settings: &LlmSettings,
    ) -> Result<Self, Box<dyn Error>> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => config_dir()?.join("config.yaml"),
        };
        let path_str = path.to_str().ok_or("model config path is not valid UTF-8")?;
        let config = config::load_config(path_str)
            .map_err(|e| format!("failed to load model config {path_str}: {e:?}"))?;

        let translation = template::load_template(&settings.translation_template).await?;
        let sentiment = template::load_template(&settings.sentiment_template).await?;
        info!(
            config_path = path_str,
            translation_template = %settings.translation_template,
            sentiment_template = %settings.sentiment_template,
            "Loaded model endpoint"
        );

        Ok(Self {
            config,
            translation,
            sentiment,
            max_retries: settings.max_retries,
        })
    }

    /// Ask the translation template.
    pub async fn ask_translation(&self, text: &str) -> Result<String, Box<dyn Error>> {
        self.ask_with(&self.translation, text).await
    }

    /// Ask the sentiment template.
    pub async fn ask_sentiment(&self, text: &str) -> Result<String, Box<dyn Error>> {
        self.ask_with(&self.sentiment, text).await
    }

    async fn ask_with(
        &self,
        template: &ChatTemplate,
        text: &str,
    ) -> Result<String, Box<dyn Error>> {
        let client = TemplateAsk {
            config: &self.config,
            template,
        };
        RetryAsk::new(client, self.max_retries, StdDuration::from_millis(500))
            .ask(text)
            .await
    }
}
