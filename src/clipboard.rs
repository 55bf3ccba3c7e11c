// Copying the paragraph or pasting into the input never moves real text.

use crate::error::Result;
use std::sync::{Arc, Mutex};

pub const PLACEHOLDER: &str = "Don't be smart";

/// Clipboard content produced when the reference text is copied
pub fn copy_payload(_selected: &str) -> &'static str {
    PLACEHOLDER
}

/// Input value after a paste. The clipboard content is discarded.
pub fn paste_into(current: &str, _clipboard: &str) -> String {
    let mut value = String::with_capacity(current.len() + PLACEHOLDER.len());
    value.push_str(current);
    value.push_str(PLACEHOLDER);
    value
}

/// Somewhere copied text can be written to
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// In-process clipboard; clones share the same contents
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        *self
            .contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(text.to_string());
        Ok(())
    }
}
