//! Host configuration.
//!
//! The host supplies one options object when constructing the editor; every
//! field is optional and defaulted, and the whole object deserializes from the
//! camelCase JSON a host page would embed. The configuration is immutable per
//! render pass: the shell reads it, never writes it.

use serde::{Deserialize, Serialize};

/// Default text-color palette.
pub const DEFAULT_COLORS: &[&str] = &[
    "#FF4541", "#E65100", "#43A047", "#1C9BE6", "#6446EB", "#ACACC2", "#626272",
];

/// Default highlight palette.
pub const DEFAULT_HIGHLIGHTS: &[&str] = &[
    "#f3f315", "#ff0099", "#83f52c", "#ff6600", "#6e0dd0",
];

/// Default toolbar layout.
pub const DEFAULT_TOOLBAR: &[&str] = &[
    "bold",
    "italic",
    "underline",
    "strikethrough",
    "|",
    "color",
    "highlight",
    "|",
    "link",
    "|",
    "orderedList",
    "unorderedList",
];

/// Default font stack applied to the surface root.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";
/// Default font size applied to the surface root.
pub const DEFAULT_FONT_SIZE: &str = "14px";
/// Default font color applied to the surface root.
pub const DEFAULT_FONT_COLOR: &str = "#626272";

/// Default empty-state placeholder.
pub const DEFAULT_PLACEHOLDER: &str = "Insert text...";

/// Where the toolbar sits relative to the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolbarPosition {
    /// Toolbar above the content.
    #[default]
    Top,
    /// Toolbar below the content.
    Bottom,
}

/// Toolbar visibility behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShowToolbar {
    /// Always visible.
    #[default]
    Always,
    /// Visible while hovering the text container.
    OnHover,
    /// Visible while the editable surface holds focus.
    OnSelect,
}

/// A custom font face declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontFace {
    /// Font weight (e.g. `400`, `"bold"`).
    pub weight: FontWeight,
    /// Font style (`normal`, `italic`, `oblique`).
    pub style: String,
    /// One or more source URLs.
    pub src: FontSource,
}

/// Numeric or keyword font weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    /// Numeric weight (100–900).
    Numeric(u16),
    /// Keyword weight (`normal`, `bold`).
    Keyword(String),
}

impl std::fmt::Display for FontWeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric(weight) => write!(f, "{}", weight),
            Self::Keyword(keyword) => write!(f, "{}", keyword),
        }
    }
}

/// Single URL or a fallback stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontSource {
    /// One source URL.
    Single(String),
    /// Multiple source URLs, first match wins.
    Stack(Vec<String>),
}

impl FontSource {
    /// The sources in order.
    pub fn urls(&self) -> Vec<&str> {
        match self {
            Self::Single(url) => vec![url.as_str()],
            Self::Stack(urls) => urls.iter().map(String::as_str).collect(),
        }
    }
}

/// Font configuration for the surface.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FontOptions {
    /// Font family name.
    pub family: Option<String>,
    /// Font size (CSS length).
    pub size: Option<String>,
    /// Text color.
    pub color: Option<String>,
    /// Custom face declarations for `family`.
    pub faces: Option<Vec<FontFace>>,
}

/// The host-supplied editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RichTextOptions {
    /// Ordered toolbar component identifiers.
    pub toolbar: Option<Vec<String>>,
    /// Text-color palette.
    pub colors: Option<Vec<String>>,
    /// Highlight palette.
    pub highlights: Option<Vec<String>>,
    /// Toolbar position.
    pub position: ToolbarPosition,
    /// Initial HTML content.
    pub content: Option<String>,
    /// Empty-state placeholder text.
    pub placeholder: Option<String>,
    /// Toolbar visibility behavior.
    pub show_toolbar: ShowToolbar,
    /// Focus the surface on mount.
    pub auto_focus: bool,
    /// Font configuration.
    pub font: Option<FontOptions>,
    /// Maximum content length in user-perceived characters.
    pub max_length: Option<usize>,
    /// Whether the color popover offers a free-text hex input.
    pub allow_custom_color: Option<bool>,
    /// Placeholder href for links created at a collapsed caret.
    pub base_url: Option<String>,
    /// Native command names forwarded from otherwise-unrecognized toolbar
    /// identifiers.
    pub allowed_commands: Vec<String>,
    /// Text container height (CSS length).
    pub height: Option<String>,
    /// Text container width (CSS length).
    pub width: Option<String>,
    /// Host container border.
    pub border: Option<String>,
    /// Host container border radius.
    pub border_radius: Option<String>,
    /// Recompute sizing on window resize.
    pub resize: bool,
    /// Reflow to fill the host container dynamically.
    pub dynamic_sizing: bool,
}

impl Default for RichTextOptions {
    fn default() -> Self {
        Self {
            toolbar: None,
            colors: None,
            highlights: None,
            position: ToolbarPosition::Top,
            content: None,
            placeholder: Some(DEFAULT_PLACEHOLDER.to_string()),
            show_toolbar: ShowToolbar::Always,
            auto_focus: false,
            font: None,
            max_length: None,
            allow_custom_color: None,
            base_url: None,
            allowed_commands: Vec::new(),
            height: None,
            width: None,
            border: None,
            border_radius: None,
            resize: false,
            dynamic_sizing: false,
        }
    }
}

impl RichTextOptions {
    /// Deserialize options from the JSON object a host page embeds.
    pub fn from_json(json: &str) -> Result<Self, crate::error::EditorError> {
        serde_json::from_str(json)
            .map_err(|err| crate::error::EditorError::InvalidOptions(err.to_string()))
    }

    /// Toolbar identifiers, defaulted.
    pub fn toolbar_identifiers(&self) -> Vec<String> {
        self.toolbar.clone().unwrap_or_else(|| {
            DEFAULT_TOOLBAR.iter().map(|s| s.to_string()).collect()
        })
    }

    /// Text-color palette, defaulted.
    pub fn color_palette(&self) -> Vec<String> {
        self.colors
            .clone()
            .unwrap_or_else(|| DEFAULT_COLORS.iter().map(|s| s.to_string()).collect())
    }

    /// Highlight palette, defaulted.
    pub fn highlight_palette(&self) -> Vec<String> {
        self.highlights
            .clone()
            .unwrap_or_else(|| DEFAULT_HIGHLIGHTS.iter().map(|s| s.to_string()).collect())
    }

    /// Effective font family.
    pub fn font_family(&self) -> String {
        self.font
            .as_ref()
            .and_then(|font| font.family.clone())
            .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string())
    }

    /// Effective font size.
    pub fn font_size(&self) -> String {
        self.font
            .as_ref()
            .and_then(|font| font.size.clone())
            .unwrap_or_else(|| DEFAULT_FONT_SIZE.to_string())
    }

    /// Effective font color.
    pub fn font_color(&self) -> String {
        self.font
            .as_ref()
            .and_then(|font| font.color.clone())
            .unwrap_or_else(|| DEFAULT_FONT_COLOR.to_string())
    }

    /// Placeholder href for caret-created links.
    pub fn link_placeholder_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| "about:blank".to_string())
    }

    /// CSS custom properties the host applies to its container.
    pub fn host_styles(&self) -> Vec<(String, String)> {
        let mut styles = vec![
            (
                "--rte-position".to_string(),
                match self.position {
                    ToolbarPosition::Top => "top".to_string(),
                    ToolbarPosition::Bottom => "bottom".to_string(),
                },
            ),
            ("--rte-font-family".to_string(), self.font_family()),
            ("--rte-font-size".to_string(), self.font_size()),
            ("--rte-font-color".to_string(), self.font_color()),
        ];
        if let Some(height) = &self.height {
            styles.push(("--rte-height".to_string(), height.clone()));
        }
        if let Some(width) = &self.width {
            styles.push(("--rte-width".to_string(), width.clone()));
        }
        if let Some(border) = &self.border {
            styles.push(("--rte-border".to_string(), border.clone()));
        }
        if let Some(radius) = &self.border_radius {
            styles.push(("--rte-border-radius".to_string(), radius.clone()));
        }
        styles
    }
}
