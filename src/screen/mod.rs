//! Screen text sources.
//!
//! The extractor only ever sees a string. Whatever reads the screen (an
//! accessibility tree walker, a captured dump, a test fixture) is passed in
//! as a [`ScreenTextSource`] instead of being reached through global state.

use thiserror::Error;
use tracing::debug;

/// Errors that can occur while reading screen text.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Capability to produce the text currently on screen.
pub trait ScreenTextSource {
    /// Source identifier for logging.
    fn name(&self) -> &'static str;

    /// Read the current screen text as one newline-joined dump.
    fn read_screen_text(&self) -> Result<String, ScreenError>;
}

/// A node in an accessibility-style view tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextNode {
    pub text: Option<String>,
    pub content_description: Option<String>,
    pub children: Vec<TextNode>,
}

impl TextNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the node text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder method to set the content description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.content_description = Some(description.into());
        self
    }

    /// Builder method to append a child node.
    pub fn with_child(mut self, child: TextNode) -> Self {
        self.children.push(child);
        self
    }
}

/// Collect the texts of a node tree into a single dump.
///
/// Pre-order walk. Non-blank node texts are always kept; a non-blank
/// content description is kept only if the exact string was not collected
/// already. Entries are joined with `\n`.
pub fn collect_text(root: &TextNode) -> String {
    let mut texts: Vec<String> = Vec::new();
    collect_into(root, &mut texts);
    texts.join("\n")
}

fn collect_into(node: &TextNode, texts: &mut Vec<String>) {
    if let Some(text) = node.text.as_deref().filter(|t| !t.trim().is_empty()) {
        texts.push(text.to_string());
    }

    if let Some(desc) = node
        .content_description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
    {
        if !texts.iter().any(|t| t == desc) {
            texts.push(desc.to_string());
        }
    }

    for child in &node.children {
        collect_into(child, texts);
    }
}

/// Source backed by a snapshot of a view tree.
#[derive(Debug, Clone)]
pub struct NodeTreeSource {
    root: Option<TextNode>,
}

impl NodeTreeSource {
    pub fn new(root: TextNode) -> Self {
        Self { root: Some(root) }
    }

    /// A source with no active window.
    pub fn empty() -> Self {
        Self { root: None }
    }
}

impl ScreenTextSource for NodeTreeSource {
    fn name(&self) -> &'static str {
        "node_tree"
    }

    fn read_screen_text(&self) -> Result<String, ScreenError> {
        // No active window reads as an empty screen
        let text = self.root.as_ref().map(collect_text).unwrap_or_default();
        debug!("Collected {} bytes from view tree", text.len());
        Ok(text)
    }
}

/// Source that returns a fixed string (piped input, fixtures).
#[derive(Debug, Clone)]
pub struct StaticTextSource {
    text: String,
}

impl StaticTextSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Read the whole of a reader, e.g. stdin.
    pub fn from_reader<R: std::io::Read>(mut reader: R) -> Result<Self, ScreenError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self { text })
    }
}

impl ScreenTextSource for StaticTextSource {
    fn name(&self) -> &'static str {
        "static"
    }

    fn read_screen_text(&self) -> Result<String, ScreenError> {
        Ok(self.text.clone())
    }
}
