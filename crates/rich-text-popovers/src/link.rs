//! Link editor popover.

use rich_text_core::{LinkAction, LinkActionKind};

/// Controlled link-editor popover.
///
/// Holds the URL/text field state for one anchor and reports the user's
/// decision as a [`LinkAction`]. In creating mode the URL field starts empty
/// even though the anchor already carries a placeholder href.
#[derive(Debug, Clone)]
pub struct LinkPopover {
    url: Option<String>,
    text: Option<String>,
    creating: bool,
    url_input: String,
    text_input: String,
    submitted: bool,
}

impl LinkPopover {
    /// A popover for an anchor with the given href and display text.
    pub fn new(url: Option<String>, text: Option<String>, creating: bool) -> Self {
        let url_input = if creating {
            String::new()
        } else {
            url.clone().unwrap_or_default()
        };
        Self {
            url,
            text,
            creating,
            url_input,
            text_input: String::new(),
            submitted: false,
        }
    }

    /// Whether the popover opened in creating mode.
    pub fn creating(&self) -> bool {
        self.creating
    }

    /// Current URL field value.
    pub fn url_input(&self) -> &str {
        &self.url_input
    }

    /// The text field is only rendered when the anchor has no text yet.
    pub fn shows_text_input(&self) -> bool {
        self.text.as_deref().unwrap_or_default().is_empty()
    }

    /// URL field changed.
    pub fn set_url_input(&mut self, value: &str) {
        self.url_input = value.to_string();
    }

    /// Text field changed.
    pub fn set_text_input(&mut self, value: &str) {
        self.text_input = value.to_string();
    }

    /// Enter pressed in either field: commits an `edit` when a URL is present,
    /// otherwise a `destroy`.
    pub fn enter_pressed(&mut self) -> LinkAction {
        if self.url_input.is_empty() {
            return self.resolve(LinkActionKind::Destroy, None, self.text.clone());
        }

        // Display text preference: explicit text field, then the anchor's
        // existing text, then the URL itself.
        let text = if !self.text_input.is_empty() {
            self.text_input.clone()
        } else if let Some(existing) = self.text.as_deref().filter(|t| !t.is_empty()) {
            existing.to_string()
        } else {
            self.url_input.clone()
        };
        let url = self.url_input.clone();
        self.resolve(LinkActionKind::Edit, Some(url), Some(text))
    }

    /// The open-in-new-context button was clicked.
    pub fn open_clicked(&mut self) -> LinkAction {
        self.resolve(LinkActionKind::Open, self.url.clone(), self.text.clone())
    }

    /// The unlink button was clicked.
    pub fn unlink_clicked(&mut self) -> LinkAction {
        self.resolve(LinkActionKind::Unlink, self.url.clone(), self.text.clone())
    }

    /// Teardown without explicit submission: emits a `destroy` when the
    /// anchor never got usable text or URL, so abandoned creation flows do not
    /// leave empty links behind.
    pub fn teardown(&mut self) -> Option<LinkAction> {
        if self.submitted {
            return None;
        }
        let has_text = !self.text.as_deref().unwrap_or_default().is_empty();
        if has_text && !self.url_input.is_empty() {
            return None;
        }
        Some(self.resolve(LinkActionKind::Destroy, None, self.text.clone()))
    }

    fn resolve(
        &mut self,
        action: LinkActionKind,
        url: Option<String>,
        text: Option<String>,
    ) -> LinkAction {
        self.submitted = true;
        LinkAction { action, url, text }
    }
}
