//! Flavor-text bank and its background loader.
//!
//! The bank JSON looks like
//! `{ "sentiment_type_talks": { "neutral": [..], "positive": [..], "negative": [..] } }`.
//! There is no schema validation: a category whose entry is missing or is
//! not a list of strings is simply absent from the bank.

use crate::config::MessageSource;
use crate::core::DialogCategory;
use crate::error::{GameError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

const EMBEDDED_TALKS: &str = include_str!("../assets/trash_talk.json");

/// Category-keyed candidate messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBank {
    entries: HashMap<DialogCategory, Vec<String>>,
}

impl MessageBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, category: DialogCategory, messages: Vec<String>) -> Self {
        self.entries.insert(category, messages);
        self
    }

    pub fn get(&self, category: DialogCategory) -> Option<&[String]> {
        self.entries.get(&category).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Parse the flavor-text document. Only fails on invalid JSON; shape
    /// problems just drop the affected categories.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&doc))
    }

    fn from_value(doc: &Value) -> Self {
        let mut bank = Self::new();
        let Some(talks) = doc.get("sentiment_type_talks") else {
            return bank;
        };
        for category in DialogCategory::ALL {
            let Some(list) = talks.get(category.key()).and_then(Value::as_array) else {
                continue;
            };
            let messages: Option<Vec<String>> = list
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect();
            if let Some(messages) = messages {
                bank.entries.insert(category, messages);
            }
        }
        bank
    }

    /// The bank shipped inside the binary.
    pub fn embedded() -> Self {
        Self::from_json(EMBEDDED_TALKS).unwrap_or_default()
    }
}

/// Resolve a source synchronously.
pub fn load(source: &MessageSource) -> Result<MessageBank> {
    match source {
        MessageSource::Embedded => Ok(MessageBank::embedded()),
        MessageSource::File(path) => MessageBank::from_json(&fs::read_to_string(path)?),
        MessageSource::Url(url) => {
            let body = ureq::get(url)
                .set("User-Agent", "skyflap")
                .call()
                .map_err(|e| GameError::Http {
                    url: url.clone(),
                    reason: e.to_string(),
                })?
                .into_string()?;
            MessageBank::from_json(&body)
        }
    }
}

/// State of a bank requested from a background thread.
#[derive(Debug)]
pub enum PendingPoll {
    /// Still loading.
    Waiting,
    Ready(MessageBank),
    /// The load failed or the loader went away; it will not be retried.
    Failed(String),
}

/// Handle to a bank being loaded in the background.
#[derive(Debug)]
pub struct PendingMessages {
    rx: Option<Receiver<Result<MessageBank>>>,
}

impl PendingMessages {
    /// Start loading `source`. The embedded bank resolves on the calling
    /// thread but is still delivered through the channel.
    pub fn spawn(source: MessageSource) -> Self {
        let (tx, rx) = mpsc::channel();
        if source == MessageSource::Embedded {
            let _ = tx.send(Ok(MessageBank::embedded()));
        } else {
            thread::spawn(move || {
                let _ = tx.send(load(&source));
            });
        }
        Self { rx: Some(rx) }
    }

    /// Non-blocking check. Returns `Ready` or `Failed` at most once; every
    /// later poll returns `Waiting`.
    pub fn poll(&mut self) -> PendingPoll {
        let Some(rx) = &self.rx else {
            return PendingPoll::Waiting;
        };
        let outcome = match rx.try_recv() {
            Err(TryRecvError::Empty) => return PendingPoll::Waiting,
            Ok(Ok(bank)) => PendingPoll::Ready(bank),
            Ok(Err(e)) => PendingPoll::Failed(e.to_string()),
            Err(TryRecvError::Disconnected) => {
                PendingPoll::Failed("message loader exited without a result".to_string())
            }
        };
        self.rx = None;
        outcome
    }

    pub fn is_resolved(&self) -> bool {
        self.rx.is_none()
    }
}
