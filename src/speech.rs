//! Text-to-speech for summaries.
//!
//! Uses the Google Translate `translate_tts` endpoint, which returns MP3 audio
//! for at most 100 characters per request. Longer text is split at word
//! boundaries, each piece is fetched in order, and the MP3 frames are
//! concatenated into one file.

use crate::config::AppConfig;
use crate::error::SpeechError;
use crate::models::GroupedResult;
use crate::utils::{slugify_title, truncate_chars};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Longest text the endpoint accepts in one request.
pub const MAX_CHUNK_CHARS: usize = 100;

/// Split text into pieces of at most `max` characters.
///
/// Breaks between words where possible; a single word longer than `max` is
/// split mid-word. Whitespace runs collapse to one space.
pub fn chunk_text(text: &str, max: usize) -> Vec<String> {
    let max = max.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word = word;
        let mut word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len > max {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        while word_len > max {
            if current_len > 0 {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let head = truncate_chars(word, max);
            chunks.push(head.to_string());
            word = &word[head.len()..];
            word_len -= max;
        }

        if word_len == 0 {
            continue;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if current_len > 0 {
        chunks.push(current);
    }
    chunks
}

/// File name for the audio of one article: `{index:02}-{slug}.mp3`.
pub fn audio_path(dir: &str, index: usize, title: &str) -> PathBuf {
    let slug = slugify_title(truncate_chars(title, 60));
    let slug = slug.trim_matches('-');
    let name = if slug.is_empty() {
        format!("{:02}.mp3", index)
    } else {
        format!("{:02}-{}.mp3", index, slug)
    };
    Path::new(dir).join(name)
}

/// Client for the speech endpoint.
#[derive(Debug, Clone)]
pub struct SpeechClient {
    http: Client,
    endpoint: String,
}

impl SpeechClient {
    pub fn new(http: Client, config: &AppConfig) -> Self {
        Self {
            http,
            endpoint: config.tts_endpoint.clone(),
        }
    }

    /// URL for one piece of text.
    pub fn chunk_url(
        &self,
        chunk: &str,
        lang: &str,
        idx: usize,
        total: usize,
    ) -> Result<Url, SpeechError> {
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();
        let url = Url::parse_with_params(
            &self.endpoint,
            [
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", lang),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
                ("client", "tw-ob"),
            ],
        )?;
        Ok(url)
    }

    /// Render `text` in language `lang` (2-letter code) to an MP3 at `path`.
    ///
    /// Returns the number of bytes written.
    #[instrument(level = "info", skip(self, text, path), fields(path = %path.display()))]
    pub async fn synthesize(&self, text: &str, lang: &str, path: &Path) -> Result<usize, SpeechError> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let total = chunks.len();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let url = self.chunk_url(chunk, lang, idx, total)?;
            let response = self.http.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(SpeechError::Status(status.as_u16()));
            }
            let bytes = response.bytes().await?;
            debug!(idx, total, bytes = bytes.len(), "Fetched speech chunk");
            audio.extend_from_slice(&bytes);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, &audio).await?;
        info!(bytes = audio.len(), chunks = total, "Wrote audio summary");
        Ok(audio.len())
    }

    /// Render every summary in `grouped`, in display order, into `audio_dir`.
    ///
    /// A failed summary is logged and skipped. Returns the files written.
    #[instrument(level = "info", skip(self, grouped))]
    pub async fn synthesize_all(
        &self,
        grouped: &GroupedResult,
        lang: &str,
        audio_dir: &str,
    ) -> Vec<PathBuf> {
        let mut written = Vec::new();
        let items = grouped.non_empty().flat_map(|(_, items)| items.iter());
        for (index, item) in items.enumerate() {
            let path = audio_path(audio_dir, index, &item.title);
            match self.synthesize(&item.summary, lang, &path).await {
                Ok(_) => written.push(path),
                Err(e) => warn!(title = %item.title, error = %e, "Speech synthesis failed; skipping"),
            }
        }
        info!(files = written.len(), "Finished audio summaries");
        written
    }
}
