//! Google Docs / Slides import and local script files.
//!
//! Network calls are blocking and meant for worker threads. Response parsing
//! is kept in pure functions so it can be tested against canned JSON.

use crate::config::AppConfig;
use crate::error::ImportError;
use crate::slides::{Slide, SlideVideo};
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use unicode_normalization::UnicodeNormalization;

const ACCESS_TOKEN_ENV: &str = "GOOGLE_ACCESS_TOKEN";
const IMPORT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct GoogleSource {
    token: String,
    docs_endpoint: String,
    slides_endpoint: String,
}

/// Accept either a bare id or a full `.../d/<id>/edit` URL.
pub fn document_id_from_input(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let id = match trimmed.split_once("/d/") {
        Some((_, rest)) => rest.split(['/', '?', '#']).next().unwrap_or_default(),
        None => trimmed,
    };
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    valid.then(|| id.to_string())
}

impl GoogleSource {
    pub fn from_config(config: &AppConfig) -> Result<Self, ImportError> {
        let token = config
            .google_access_token
            .clone()
            .filter(|token| !token.trim().is_empty())
            .or_else(|| env::var(ACCESS_TOKEN_ENV).ok().filter(|t| !t.trim().is_empty()))
            .ok_or(ImportError::MissingCredential)?;
        Ok(Self {
            token,
            docs_endpoint: config.docs_endpoint.trim_end_matches('/').to_string(),
            slides_endpoint: config.slides_endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn get_json(&self, url: &str) -> Result<Value, ImportError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(IMPORT_TIMEOUT)
            .build()
            .map_err(|err| ImportError::Failed(err.to_string()))?;
        let response = http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|err| ImportError::Failed(err.to_string()))?;
        match response.status() {
            StatusCode::UNAUTHORIZED => Err(ImportError::ExpiredCredential),
            status if !status.is_success() => {
                warn!(%status, url, "Import request failed");
                Err(ImportError::Failed(format!("HTTP {status}")))
            }
            _ => response
                .json()
                .map_err(|err| ImportError::Failed(format!("malformed response: {err}"))),
        }
    }

    pub fn fetch_document(&self, document_id: &str) -> Result<String, ImportError> {
        let url = format!("{}/v1/documents/{document_id}", self.docs_endpoint);
        let doc = self.get_json(&url)?;
        let text = document_text(&doc);
        info!(document_id, chars = text.len(), "Imported document");
        Ok(text)
    }

    pub fn fetch_presentation(&self, presentation_id: &str) -> Result<Vec<Slide>, ImportError> {
        let base = format!("{}/v1/presentations/{presentation_id}", self.slides_endpoint);
        let deck = self.get_json(&base)?;
        let mut slides = Vec::new();
        for page in deck["slides"].as_array().into_iter().flatten() {
            let Some(page_id) = page["objectId"].as_str() else {
                continue;
            };
            let thumbnail = self.get_json(&format!("{base}/pages/{page_id}/thumbnail"))?;
            slides.push(Slide {
                image_url: thumbnail["contentUrl"].as_str().unwrap_or_default().to_string(),
                speaker_notes: speaker_notes(page),
                videos: slide_videos(page),
            });
        }
        info!(presentation_id, slides = slides.len(), "Imported presentation");
        Ok(slides)
    }
}

pub fn fetch_image(url: &str) -> Result<Vec<u8>> {
    let http = reqwest::blocking::Client::builder()
        .timeout(IMPORT_TIMEOUT)
        .build()
        .context("Building HTTP client")?;
    let bytes = http
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .with_context(|| format!("Fetching slide image {url}"))?
        .bytes()
        .context("Reading slide image")?;
    Ok(bytes.to_vec())
}

/// Concatenate paragraph text runs of a `documents.get` response.
pub fn document_text(doc: &Value) -> String {
    let mut text = String::new();
    for element in doc["body"]["content"].as_array().into_iter().flatten() {
        for part in element["paragraph"]["elements"]
            .as_array()
            .into_iter()
            .flatten()
        {
            if let Some(content) = part["textRun"]["content"].as_str() {
                text.push_str(content);
            }
        }
    }
    text.nfc().collect()
}

fn shape_text(element: &Value) -> String {
    let mut text = String::new();
    for part in element["shape"]["text"]["textElements"]
        .as_array()
        .into_iter()
        .flatten()
    {
        if let Some(content) = part["textRun"]["content"].as_str() {
            text.push_str(content);
        }
    }
    text
}

/// Speaker notes live in the notes page shape named by `speakerNotesObjectId`.
pub fn speaker_notes(page: &Value) -> String {
    let notes_page = &page["slideProperties"]["notesPage"];
    let Some(notes_id) = notes_page["notesProperties"]["speakerNotesObjectId"].as_str() else {
        return String::new();
    };
    notes_page["pageElements"]
        .as_array()
        .into_iter()
        .flatten()
        .find(|element| element["objectId"].as_str() == Some(notes_id))
        .map(shape_text)
        .map(|notes| notes.trim().nfc().collect())
        .unwrap_or_default()
}

/// Videos with both start and end set; others have no usable duration.
pub fn slide_videos(page: &Value) -> Vec<SlideVideo> {
    page["pageElements"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|element| {
            let props = &element["video"]["videoProperties"];
            let start = props["start"].as_u64()?;
            let end = props["end"].as_u64()?;
            (end > start).then(|| SlideVideo {
                duration_secs: u32::try_from(end - start).unwrap_or(u32::MAX),
            })
        })
        .collect()
}

pub fn load_script_file(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    Ok(raw.nfc().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_are_extracted_from_urls() {
        assert_eq!(
            document_id_from_input("https://docs.google.com/document/d/1AbC-d_9/edit#heading"),
            Some("1AbC-d_9".to_string())
        );
        assert_eq!(document_id_from_input(" 1AbC "), Some("1AbC".to_string()));
        assert_eq!(document_id_from_input("not an id"), None);
        assert_eq!(document_id_from_input(""), None);
    }

    #[test]
    fn document_text_joins_runs_and_normalizes() {
        let doc = json!({
            "body": {"content": [
                {"sectionBreak": {}},
                {"paragraph": {"elements": [
                    {"textRun": {"content": "Cafe\u{0301} opening.\n"}},
                ]}},
                {"paragraph": {"elements": [
                    {"textRun": {"content": "Second "}},
                    {"textRun": {"content": "line.\n"}}
                ]}}
            ]}
        });
        assert_eq!(document_text(&doc), "Caf\u{e9} opening.\nSecond line.\n");
    }

    #[test]
    fn speaker_notes_and_videos_are_read_from_slide() {
        let page = json!({
            "objectId": "p1",
            "pageElements": [
                {"video": {"videoProperties": {"start": 5, "end": 20}}},
                {"video": {"videoProperties": {}}}
            ],
            "slideProperties": {"notesPage": {
                "notesProperties": {"speakerNotesObjectId": "n1"},
                "pageElements": [
                    {"objectId": "n0", "shape": {"text": {"textElements": [
                        {"textRun": {"content": "slide thumbnail"}}
                    ]}}},
                    {"objectId": "n1", "shape": {"text": {"textElements": [
                        {"textRun": {"content": "Welcome everyone. "}},
                        {"textRun": {"content": "[PLAY VIDEO 1]\n"}}
                    ]}}}
                ]
            }}
        });
        assert_eq!(speaker_notes(&page), "Welcome everyone. [PLAY VIDEO 1]");
        assert_eq!(slide_videos(&page), vec![SlideVideo { duration_secs: 15 }]);
    }

    #[test]
    fn missing_token_is_reported() {
        if env::var(ACCESS_TOKEN_ENV).is_err() {
            let err = GoogleSource::from_config(&AppConfig::default()).expect_err("no token");
            assert_eq!(err, ImportError::MissingCredential);
        }
    }
}
