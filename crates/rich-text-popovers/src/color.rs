//! Color picker popover.

use regex::Regex;
use rich_text_core::ToolbarPosition;
use std::sync::OnceLock;

/// Swatch color shown while the custom input holds no valid color.
const EMPTY_SWATCH: &str = "#fff";

/// Hex color pattern: `#RRGGBB` or `#RGB`, case-insensitive.
fn hex_color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(^#[0-9A-F]{6}$)|(^#[0-9A-F]{3}$)").expect("valid hex color pattern")
    })
}

/// Controlled color-picker popover.
///
/// The component validates its free-text input locally: invalid input resets
/// the preview swatch to white and withholds submission (no active color)
/// until corrected — the user retries without restarting.
#[derive(Debug, Clone)]
pub struct ColorPopover {
    colors: Vec<String>,
    position: ToolbarPosition,
    allow_custom_color: bool,
    is_open: bool,
    input_value: String,
    active_color: Option<String>,
}

impl ColorPopover {
    /// A popover over `colors`, with the custom hex input enabled.
    pub fn new(colors: Vec<String>, position: ToolbarPosition) -> Self {
        Self {
            colors,
            position,
            allow_custom_color: true,
            is_open: false,
            input_value: String::new(),
            active_color: None,
        }
    }

    /// Disable or enable the free-text hex input.
    pub fn set_allow_custom_color(&mut self, allow: bool) {
        self.allow_custom_color = allow;
    }

    /// The palette swatches in order.
    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Toolbar position the popover is anchored to.
    pub fn position(&self) -> ToolbarPosition {
        self.position
    }

    /// Whether the popover is currently shown.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Show or hide the popover (controlled by the lifecycle manager).
    pub fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    /// Current free-text input value, after normalization.
    pub fn input_value(&self) -> &str {
        &self.input_value
    }

    /// The validated color the input currently holds, if any.
    pub fn active_color(&self) -> Option<&str> {
        self.active_color.as_deref()
    }

    /// Preview swatch color: the active color, or white while invalid.
    pub fn swatch_preview(&self) -> &str {
        self.active_color.as_deref().unwrap_or(EMPTY_SWATCH)
    }

    /// Free-text input changed. A missing leading `#` is supplied and a
    /// doubled one collapsed before validation.
    pub fn input(&mut self, value: &str) {
        if !self.allow_custom_color {
            return;
        }
        let normalized = if let Some(rest) = value.strip_prefix("##") {
            format!("#{}", rest)
        } else if !value.starts_with('#') {
            format!("#{}", value)
        } else {
            value.to_string()
        };

        self.active_color = if hex_color_pattern().is_match(&normalized) {
            Some(normalized.to_ascii_lowercase())
        } else {
            None
        };
        self.input_value = normalized;
    }

    /// A palette swatch was clicked: commits that color directly.
    pub fn select_swatch(&mut self, color: &str) -> String {
        let chosen = color.to_string();
        self.reset();
        chosen
    }

    /// Enter pressed in the hex input: commits the currently valid color, or
    /// nothing while the input is invalid.
    pub fn enter_pressed(&mut self) -> Option<String> {
        let chosen = self.active_color.clone()?;
        self.reset();
        Some(chosen)
    }

    /// Clear the input and preview.
    pub fn reset(&mut self) {
        self.input_value.clear();
        self.active_color = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn popover() -> ColorPopover {
        ColorPopover::new(
            vec!["#FF4541".to_string(), "#43A047".to_string()],
            ToolbarPosition::Top,
        )
    }

    #[test]
    fn test_valid_six_digit_hex() {
        let mut popover = popover();
        popover.input("#1C9BE6");
        assert_eq!(popover.active_color(), Some("#1c9be6"));
        assert_eq!(popover.swatch_preview(), "#1c9be6");
    }

    #[test]
    fn test_valid_three_digit_hex() {
        let mut popover = popover();
        popover.input("#abc");
        assert_eq!(popover.active_color(), Some("#abc"));
    }

    #[test]
    fn test_missing_hash_is_supplied() {
        let mut popover = popover();
        popover.input("ff0099");
        assert_eq!(popover.input_value(), "#ff0099");
        assert_eq!(popover.active_color(), Some("#ff0099"));
    }

    #[test]
    fn test_doubled_hash_is_collapsed() {
        let mut popover = popover();
        popover.input("##ff0099");
        assert_eq!(popover.input_value(), "#ff0099");
        assert_eq!(popover.active_color(), Some("#ff0099"));
    }

    #[test]
    fn test_invalid_input_defaults_swatch_to_white() {
        let mut popover = popover();
        popover.input("#12345");
        assert_eq!(popover.active_color(), None);
        assert_eq!(popover.swatch_preview(), "#fff");

        popover.input("#zzzzzz");
        assert_eq!(popover.active_color(), None);
    }

    #[test]
    fn test_enter_commits_only_valid_color() {
        let mut popover = popover();
        popover.input("#12345");
        assert_eq!(popover.enter_pressed(), None);

        popover.input("#123456");
        assert_eq!(popover.enter_pressed(), Some("#123456".to_string()));
        // Committed: input resets for the next use.
        assert_eq!(popover.input_value(), "");
        assert_eq!(popover.active_color(), None);
    }

    #[test]
    fn test_swatch_click_commits_directly() {
        let mut popover = popover();
        popover.input("#bad");
        assert_eq!(popover.select_swatch("#FF4541"), "#FF4541");
        assert_eq!(popover.input_value(), "");
    }

    #[test]
    fn test_custom_input_can_be_disabled() {
        let mut popover = popover();
        popover.set_allow_custom_color(false);
        popover.input("#123456");
        assert_eq!(popover.active_color(), None);
        assert_eq!(popover.input_value(), "");
    }

    #[test]
    fn test_user_recovers_after_invalid_input() {
        let mut popover = popover();
        popover.input("#nope");
        assert_eq!(popover.active_color(), None);
        popover.input("#00ff00");
        assert_eq!(popover.enter_pressed(), Some("#00ff00".to_string()));
    }
}
