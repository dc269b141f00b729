//! Editor shell.
//!
//! `RichTextEditor` composes the surface, selection tracker, format executor,
//! popover lifecycle, and toolbar into the component a host embeds. The host
//! drives it with input events (pointer, key, selection, focus) and toolbar
//! interactions; the shell keeps the visual state synchronized and reports
//! changes through the event hub.
//!
//! Control flow: input → tracker → inspector → toolbar + popover sync;
//! toolbar clicks → executor → surface mutation → tracker refresh.

use crate::commands::{
    CommandExecutor, ExecCommand, Surface, clear_caret_marker, delete_before_caret, insert_text,
};
use crate::dom::{Dom, NodeId};
use crate::error::EditorError;
use crate::events::{EditorEvent, EventHub, StyleChangePayload, SubscriptionId};
use crate::format::Format;
use crate::html::visible_len;
use crate::inspect::{ActiveStates, AnchorColors, anchor_colors, compute_active_states};
use crate::keys::{KeyEvent, code, is_os_key, is_special_key};
use crate::options::{RichTextOptions, ShowToolbar, ToolbarPosition};
use crate::popover::{
    ColorTarget, LinkAction, LinkMode, LinkResolution, PopoverLifecycle, PopoverState,
};
use crate::selection::{DomRange, SelectionTracker};
use crate::toolbar::{PopoverButton, Toolbar, ToolbarAction, ToolbarItem};

/// Debounce window for focus-loss toolbar/popover teardown, in milliseconds.
///
/// The host arms a timer for this long after [`RichTextEditor::blur`] and then
/// calls [`RichTextEditor::blur_timer_fired`]; a pending teardown is cancelled
/// if a popover is open or focus has returned by then.
pub const BLUR_DEBOUNCE_MS: u64 = 500;

/// Nominal toolbar height used for popover placement when the toolbar sits
/// above the content.
pub const TOOLBAR_HEIGHT: i32 = 40;

/// Content read back from the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    /// Plain-text rendering.
    pub text: String,
    /// HTML serialization with `&nbsp;` normalized to regular spaces.
    pub html: String,
}

/// The top-level rich-text editing component.
pub struct RichTextEditor {
    options: RichTextOptions,
    mounted: bool,
    surface: Surface,
    tracker: SelectionTracker,
    executor: CommandExecutor,
    popovers: PopoverLifecycle,
    toolbar: Toolbar,
    events: EventHub,
    active: ActiveStates,
    empty: bool,
    creating_link: bool,
    suppress_link_attach: bool,
    pending_blur_hide: bool,
    os_key_down: Option<u32>,
    revision: u64,
}

impl RichTextEditor {
    /// Build an unmounted editor from host options.
    pub fn new(options: RichTextOptions) -> Self {
        let toolbar = Toolbar::build(
            &options.toolbar_identifiers(),
            &options.allowed_commands,
            options.show_toolbar,
        );
        Self {
            options,
            mounted: false,
            surface: Surface::new(),
            tracker: SelectionTracker::new(),
            executor: CommandExecutor::new(),
            popovers: PopoverLifecycle::new(),
            toolbar,
            events: EventHub::new(),
            active: ActiveStates::new(),
            empty: true,
            creating_link: false,
            suppress_link_attach: false,
            pending_blur_hide: false,
            os_key_down: None,
            revision: 0,
        }
    }

    /// Build an editor from the options JSON a host page embeds.
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(Self::new(RichTextOptions::from_json(json)?))
    }

    /// Initialize the editable surface: initial content, popover placement,
    /// auto-focus. Every other surface method fails before this runs.
    pub fn mount(&mut self) -> Result<(), EditorError> {
        if self.mounted {
            return Ok(());
        }
        self.mounted = true;

        if self.options.position != ToolbarPosition::Bottom {
            self.popovers.set_toolbar_height(TOOLBAR_HEIGHT);
        }
        if let Some(content) = self.options.content.clone() {
            self.set_content(&content)?;
        }
        self.check_for_empty();
        if self.options.auto_focus {
            self.focus()?;
        }
        Ok(())
    }

    fn ensure_mounted(&self) -> Result<(), EditorError> {
        if self.mounted {
            Ok(())
        } else {
            Err(EditorError::NotMounted)
        }
    }

    // -- host surface --------------------------------------------------------

    /// Current content as plain text and HTML.
    pub fn get_content(&self) -> Result<Content, EditorError> {
        self.ensure_mounted()?;
        Ok(Content {
            text: self.surface.inner_text(),
            html: self.surface.inner_html().replace("&nbsp;", " "),
        })
    }

    /// Replace the surface content and rerun the empty-state check.
    pub fn set_content(&mut self, html: &str) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        self.surface.set_inner_html(html);
        self.tracker.invalidate();
        self.after_mutation();
        self.refresh_styles();
        Ok(())
    }

    /// Move focus into the surface, restoring the saved selection if present.
    pub fn focus(&mut self) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        if let Some(saved) = self.tracker.saved_range() {
            self.surface.set_selection(saved);
        }
        let was_focused = self.surface.focused();
        self.surface.set_focused(true);
        self.pending_blur_hide = false;
        if self.options.show_toolbar == ShowToolbar::OnSelect {
            self.toolbar.set_show(true);
        }
        if !was_focused {
            self.events.emit(&EditorEvent::Focus);
        }
        Ok(())
    }

    /// The surface lost focus. Arms the debounced teardown in onSelect mode.
    pub fn blur(&mut self) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        let was_focused = self.surface.focused();
        self.surface.set_focused(false);
        if was_focused {
            self.events.emit(&EditorEvent::Blur);
        }
        if self.options.show_toolbar == ShowToolbar::OnSelect {
            self.pending_blur_hide = true;
        }
        Ok(())
    }

    /// The host's blur debounce timer fired ([`BLUR_DEBOUNCE_MS`] after
    /// [`blur`](Self::blur)). The pending teardown is cancelled when a popover
    /// is open or focus has returned. Returns `true` if the toolbar was
    /// hidden.
    pub fn blur_timer_fired(&mut self) -> bool {
        if !self.pending_blur_hide {
            return false;
        }
        self.pending_blur_hide = false;
        if self.popovers.is_open() || self.surface.focused() {
            return false;
        }
        self.toolbar.set_show(false);
        true
    }

    /// A mouse press was observed on the surface.
    pub fn pointer_down(&mut self) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        self.tracker.pointer_down();
        self.reset_popovers(None);
        Ok(())
    }

    /// A touch press was observed on the surface.
    pub fn touch_start(&mut self) -> Result<(), EditorError> {
        self.pointer_down()
    }

    /// The live selection changed; recapture and resync everything.
    ///
    /// Visual sync never lags the selection: the inspector, toolbar, and
    /// popover lifecycle all refresh unconditionally here.
    pub fn selection_change(&mut self) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        let live = self.surface.selection().copied();
        self.tracker
            .selection_changed(&self.surface.dom, live.as_ref());
        self.refresh_styles();
        Ok(())
    }

    /// Set the live selection, as a host reporting a user selection would.
    pub fn select(&mut self, range: DomRange) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        self.surface.set_selection(range);
        self.selection_change()
    }

    /// Collapse the selection to a caret, as a host reporting a click would.
    pub fn place_caret(&mut self, node: NodeId, offset: usize) -> Result<(), EditorError> {
        self.select(DomRange::caret(node, offset))
    }

    // -- events --------------------------------------------------------------

    /// Subscribe to editor events; the returned id unsubscribes.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&EditorEvent) + Send + 'static,
    {
        self.events.subscribe(callback)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.events.unsubscribe(id);
    }

    // -- state queries -------------------------------------------------------

    /// The live surface.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The document tree.
    pub fn dom(&self) -> &Dom {
        &self.surface.dom
    }

    /// The toolbar controller.
    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    /// The current popover state.
    pub fn popover_state(&self) -> PopoverState {
        self.popovers.state()
    }

    /// The active-state set from the last recomputation.
    pub fn active_states(&self) -> &ActiveStates {
        &self.active
    }

    /// `true` while the surface has no content.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Placeholder text shown while empty.
    pub fn placeholder(&self) -> Option<&str> {
        self.options.placeholder.as_deref()
    }

    /// Host options.
    pub fn options(&self) -> &RichTextOptions {
        &self.options
    }

    /// Monotonic revision, incremented on every surface mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // -- toolbar interaction -------------------------------------------------

    /// A toolbar button was clicked. Unknown identifiers are ignored.
    pub fn toolbar_click(&mut self, identifier: &str) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        let Some(item) = self.toolbar.item(identifier).cloned() else {
            return Ok(());
        };

        match item {
            ToolbarItem::Toggle(format) => {
                self.style(format, None, None)?;
            }
            ToolbarItem::Alignment(format) => {
                self.alignment_click(format)?;
            }
            ToolbarItem::Action(action) => {
                self.action_click(action)?;
            }
            ToolbarItem::Popover(PopoverButton::Color) => {
                self.color_click(ColorTarget::Color)?;
            }
            ToolbarItem::Popover(PopoverButton::Highlight) => {
                self.color_click(ColorTarget::Highlight)?;
            }
            ToolbarItem::Popover(PopoverButton::Link) => {
                self.link_click()?;
            }
            ToolbarItem::Separator(_) => {}
            ToolbarItem::Passthrough(name) => {
                if let Some(command) = ExecCommand::from_name(&name, None) {
                    if self.executor.exec_command(&mut self.surface, command) {
                        self.after_mutation();
                    }
                    self.refresh_styles();
                    self.clean_text();
                    self.emit_style_change("Style Event", Some(name), None, None);
                }
            }
        }
        Ok(())
    }

    /// Apply a format to the current selection and emit the style-change
    /// notification. This is the path toolbar toggles, keyboard shortcuts,
    /// and popover submissions share.
    pub fn style(
        &mut self,
        format: Format,
        show_ui: Option<bool>,
        value: Option<&str>,
    ) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        let changed =
            self.executor
                .apply_format(&mut self.surface, format, &self.active, value);
        if changed {
            self.after_mutation();
        }
        self.refresh_styles();
        self.focus()?;
        self.clean_text();
        self.emit_style_change(
            "Style Event",
            Some(format.identifier().to_string()),
            show_ui,
            value.map(str::to_string),
        );
        Ok(())
    }

    fn alignment_click(&mut self, format: Format) -> Result<(), EditorError> {
        // Strip any inline text-align override on the anchor's element first,
        // so the alignment command is not fighting a conflicting inline style.
        if let Some(range) = self.surface.selection().copied() {
            if let Some(target) =
                crate::inspect::inspection_target(&self.surface.dom, range.start.node)
            {
                self.surface.dom.remove_style(target, "text-align");
            }
        }
        if let Some(command) = ExecCommand::from_name(format.identifier(), None) {
            if self.executor.exec_command(&mut self.surface, command) {
                self.after_mutation();
            }
        }
        self.refresh_styles();
        self.clean_text();
        self.emit_style_change(
            "Action Click Event",
            Some(format.identifier().to_string()),
            None,
            None,
        );
        Ok(())
    }

    fn action_click(&mut self, action: ToolbarAction) -> Result<(), EditorError> {
        let command = match action {
            ToolbarAction::OrderedList => ExecCommand::InsertOrderedList,
            ToolbarAction::UnorderedList => ExecCommand::InsertUnorderedList,
            ToolbarAction::Undo => ExecCommand::Undo,
            ToolbarAction::Redo => ExecCommand::Redo,
        };
        if self.executor.exec_command(&mut self.surface, command) {
            self.after_mutation();
        }
        if matches!(
            action,
            ToolbarAction::OrderedList | ToolbarAction::UnorderedList
        ) {
            self.focus()?;
        }
        self.refresh_styles();
        self.clean_text();
        self.emit_style_change(
            "Action Click Event",
            Some(action.command_name().to_string()),
            None,
            None,
        );
        Ok(())
    }

    fn color_click(&mut self, target: ColorTarget) -> Result<(), EditorError> {
        self.reset_popovers(Some(target));

        // The palette applies to selected text; a bare caret just refocuses.
        let is_caret = self
            .surface
            .selection()
            .map(|range| range.is_caret())
            .unwrap_or(true);
        if is_caret {
            self.focus()?;
            return Ok(());
        }

        match target {
            ColorTarget::Color => {
                if self.popovers.color_open(ColorTarget::Color) {
                    self.popovers.close_color(None);
                } else {
                    self.popovers.open_color(&mut self.surface, ColorTarget::Color);
                }
            }
            ColorTarget::Highlight => {
                if self.active.contains(Format::Highlight) {
                    if self
                        .executor
                        .exec_command(&mut self.surface, ExecCommand::RemoveFormat)
                    {
                        self.after_mutation();
                    }
                    self.refresh_styles();
                } else if self.popovers.color_open(ColorTarget::Highlight) {
                    self.popovers.close_color(None);
                } else {
                    self.popovers
                        .open_color(&mut self.surface, ColorTarget::Highlight);
                }
            }
        }

        self.clean_text();
        self.emit_style_change(
            "Color Change Event",
            Some(target.identifier().to_string()),
            None,
            None,
        );
        Ok(())
    }

    /// The color popover reported a chosen text color.
    pub fn submit_color(&mut self, hex: &str) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        self.reset_popovers(None);
        self.focus()?;
        self.style(Format::Color, Some(true), Some(hex))?;
        // The popover-driven mutation invalidates the snapshot; the next
        // focus re-captures from the live tree.
        self.tracker.invalidate();
        Ok(())
    }

    /// The highlight popover reported a chosen highlight color.
    pub fn submit_highlight(&mut self, hex: &str) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        self.reset_popovers(None);
        self.focus()?;
        self.style(Format::Highlight, Some(true), Some(hex))?;
        self.tracker.invalidate();
        Ok(())
    }

    fn link_click(&mut self) -> Result<(), EditorError> {
        if self.active.contains(Format::Link) {
            // Already inside a link: the button unlinks.
            if self
                .executor
                .exec_command(&mut self.surface, ExecCommand::Unlink)
            {
                self.after_mutation();
            }
            self.refresh_styles();
        } else {
            if self.popovers.link_open() {
                if self.popovers.close_all(&mut self.surface) {
                    self.after_mutation();
                }
                self.focus()?;
            }

            let is_caret = self
                .surface
                .selection()
                .map(|range| range.is_caret())
                .unwrap_or(false);
            if is_caret {
                let placeholder = self.options.link_placeholder_url();
                self.popovers
                    .open_link_creating(&mut self.surface, &placeholder);
                self.after_mutation();
            } else if self.surface.selection().is_some() {
                // Convert the selection to a link; the style refresh attaches
                // the popover to the new anchor in creating mode.
                self.creating_link = true;
                let placeholder = self.options.link_placeholder_url();
                self.style(Format::Link, Some(true), Some(&placeholder))?;
            }
        }

        self.clean_text();
        self.emit_style_change("Link Click Event", Some("link".to_string()), None, None);
        Ok(())
    }

    /// The link popover resolved with a user action.
    pub fn link_action(&mut self, action: LinkAction) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        let resolution = self.popovers.resolve_link(&mut self.surface, &action);
        // The popover mutated the tree out from under the snapshot.
        self.tracker.invalidate();
        self.after_mutation();
        // The resolution re-homed the caret inside the anchor; every
        // resolution ends with the popover closed, so the refresh must not
        // re-attach it.
        self.suppress_link_attach = true;
        self.refresh_styles();
        self.suppress_link_attach = false;
        self.focus()?;

        if let LinkResolution::OpenUrl(url) = resolution {
            self.events.emit(&EditorEvent::LinkOpenRequested { url });
        }
        self.emit_style_change("Style Event", Some("link".to_string()), None, None);
        Ok(())
    }

    /// Tear down the link popover without an explicit action (focus loss).
    /// Applies the implicit-destroy cleanup.
    pub fn dismiss_link_popover(&mut self) -> Result<(), EditorError> {
        self.ensure_mounted()?;
        if self.popovers.close_all(&mut self.surface) {
            self.after_mutation();
            self.refresh_styles();
        }
        Ok(())
    }

    // -- keyboard ------------------------------------------------------------

    /// A key went down in the surface. Returns `true` when the engine consumed
    /// the event (the host must prevent the default action).
    pub fn key_down(&mut self, event: KeyEvent) -> Result<bool, EditorError> {
        self.ensure_mounted()?;

        if is_os_key(event.code) {
            self.os_key_down = Some(event.code);
            return Ok(false);
        }
        if self.os_key_down.map(is_os_key).unwrap_or(false) {
            match event.code {
                code::KEY_B => {
                    self.style(Format::Bold, None, None)?;
                    return Ok(true);
                }
                code::KEY_I => {
                    self.style(Format::Italic, None, None)?;
                    return Ok(true);
                }
                code::KEY_U => {
                    self.style(Format::Underline, None, None)?;
                    return Ok(true);
                }
                _ => {}
            }
        }

        if event.code == code::ENTER {
            return self.enter_pressed();
        }
        if event.code == code::ARROW_UP || event.code == code::ARROW_DOWN {
            self.arrow_at_list_boundary(event.code);
            return Ok(false);
        }

        // Max-length guard: reject the keystroke outright rather than trim
        // after the fact. Typing over a selection is always allowed.
        if let Some(max_length) = self.options.max_length {
            let typing = event.ch.is_some();
            let replacing = !self.surface.selected_text().is_empty();
            if typing
                && !is_special_key(event.code)
                && event.code != code::BACKSPACE
                && !replacing
                && visible_len(&self.surface.inner_text()) >= max_length
            {
                return Ok(true);
            }
        }

        if event.code == code::BACKSPACE {
            if delete_before_caret(&mut self.surface) {
                self.after_mutation();
                self.refresh_styles();
            }
            return Ok(true);
        }

        if let Some(ch) = event.ch {
            if insert_text(&mut self.surface, &ch.to_string()) {
                self.after_mutation();
                self.refresh_styles();
            }
            return Ok(true);
        }

        Ok(false)
    }

    /// A key was released in the surface: strip a spent caret marker, clear
    /// modifier tracking, normalize stray markup, and emit `textChange`.
    pub fn key_up(&mut self, event: KeyEvent) -> Result<(), EditorError> {
        self.ensure_mounted()?;

        if clear_caret_marker(&mut self.surface) {
            self.after_mutation();
            self.refresh_styles();
        }
        if is_os_key(event.code) {
            self.os_key_down = None;
        }
        self.clean_text();
        self.check_for_empty();
        self.events.emit(&EditorEvent::TextChange { key: event });
        Ok(())
    }

    fn enter_pressed(&mut self) -> Result<bool, EditorError> {
        let in_list_item = self
            .surface
            .selection()
            .map(|range| {
                self.surface
                    .dom
                    .closest(range.start.node, |dom, n| dom.tag(n) == Some("li"))
                    .is_some()
            })
            .unwrap_or(false);
        if in_list_item {
            // Native list behavior owns Enter inside items.
            return Ok(false);
        }

        // After a trailing list, the default would grow the list; force a
        // plain double break instead.
        let after_trailing_list = self
            .surface
            .dom
            .children(self.surface.dom.root())
            .last()
            .map(|&last| matches!(self.surface.dom.tag(last), Some("ol") | Some("ul")))
            .unwrap_or(false);
        let fragment = if after_trailing_list { "<br><br>" } else { "<br>" };
        if self.executor.exec_command(
            &mut self.surface,
            ExecCommand::InsertHtml(fragment.to_string()),
        ) {
            self.after_mutation();
            self.refresh_styles();
        }
        Ok(true)
    }

    fn arrow_at_list_boundary(&mut self, key_code: u32) {
        let Some(range) = self.surface.selection().copied() else {
            return;
        };
        let Some(item) = self
            .surface
            .dom
            .closest(range.start.node, |dom, n| dom.tag(n) == Some("li"))
        else {
            return;
        };
        let Some(list) = self.surface.dom.parent(item) else {
            return;
        };
        let items = self.surface.dom.children(list).to_vec();
        let list_index = self.surface.dom.child_index(list).unwrap_or(0);
        let root = self.surface.dom.root();
        let sibling_count = self.surface.dom.children(root).len();

        if key_code == code::ARROW_UP && items.first() == Some(&item) && list_index == 0 {
            // Document starts with this list: give the caret a line above it.
            let br = self.surface.dom.create_element("br");
            self.surface.dom.insert_before(list, br);
            self.after_mutation();
        } else if key_code == code::ARROW_DOWN
            && items.last() == Some(&item)
            && list_index + 1 == sibling_count
        {
            // Document ends with this list: give the caret a line below it.
            let br = self.surface.dom.create_element("br");
            self.surface.dom.append_child(root, br);
            self.after_mutation();
        }
    }

    /// Paste plain text, truncating to the remaining length budget.
    pub fn paste(&mut self, text: &str) -> Result<(), EditorError> {
        self.ensure_mounted()?;

        let mut insertion = text.to_string();
        if let Some(max_length) = self.options.max_length {
            let current = visible_len(&self.surface.inner_text());
            let replaced = visible_len(&self.surface.selected_text());
            let available = (max_length + replaced).saturating_sub(current);
            if visible_len(&insertion) > available {
                insertion = text
                    .chars()
                    .take(available)
                    .collect();
            }
        }

        if insert_text(&mut self.surface, &insertion) {
            self.after_mutation();
            self.refresh_styles();
        }
        Ok(())
    }

    // -- internal sync -------------------------------------------------------

    /// Recompute the active-state set from the live tree and mirror it onto
    /// the toolbar and popover lifecycle. Pure recomputation: no caches.
    fn refresh_styles(&mut self) {
        let enabled = self.toolbar.enabled_formats();
        let anchor = self.surface.selection().map(|range| range.start.node);

        let (active, colors) = match anchor {
            Some(node) => (
                compute_active_states(&self.surface.dom, node, &enabled),
                anchor_colors(&self.surface.dom, node),
            ),
            None => (ActiveStates::new(), AnchorColors::default()),
        };
        self.active = active.clone();
        self.toolbar.sync(active, colors);
        self.sync_link_popover(anchor);
    }

    fn sync_link_popover(&mut self, anchor: Option<NodeId>) {
        if self.toolbar.item("link").is_none() {
            return;
        }

        if self.active.contains(Format::Link) {
            if self.suppress_link_attach {
                return;
            }
            let anchor_element = anchor.and_then(|node| {
                self.surface
                    .dom
                    .closest(node, |dom, n| dom.tag(n) == Some("a"))
            });
            if let Some(element) = anchor_element {
                if self.popovers.link_anchor() != Some(element) {
                    let mode = if self.creating_link {
                        LinkMode::Creating
                    } else {
                        LinkMode::Editing
                    };
                    self.creating_link = false;
                    self.popovers
                        .attach_link(&mut self.surface, element, mode);
                }
            }
        } else if self.popovers.link_open() && self.popovers.link_mode() != Some(LinkMode::Creating)
        {
            // Selection moved off the anchor: tear the popover down. A
            // creating-mode popover survives until resolved or dismissed —
            // its anchor is empty, so the caret can never sit inside it.
            if self.popovers.close_all(&mut self.surface) {
                self.after_mutation();
            }
        }
    }

    /// Close color popovers (except `exclude`) and an inactive link popover.
    fn reset_popovers(&mut self, exclude: Option<ColorTarget>) {
        if self.popovers.link_open()
            && self.popovers.link_mode() != Some(LinkMode::Creating)
            && !self.active.contains(Format::Link)
        {
            if self.popovers.close_all(&mut self.surface) {
                self.after_mutation();
            }
        }
        self.popovers.close_color(exclude);
    }

    /// Normalize editing debris: stray `<div>` wrappers flatten to `<br>` +
    /// content, and text-less anchors are dropped unless the link popover is
    /// working on one.
    fn clean_text(&mut self) {
        let root = self.surface.dom.root();
        let children = self.surface.dom.children(root).to_vec();
        let mut changed = false;

        for node in children {
            match self.surface.dom.tag(node) {
                Some("div") => {
                    let inner: Vec<NodeId> = self.surface.dom.children(node).to_vec();
                    let br = self.surface.dom.create_element("br");
                    self.surface.dom.insert_before(node, br);
                    let only_break =
                        inner.len() == 1 && self.surface.dom.tag(inner[0]) == Some("br");
                    if !only_break {
                        let mut reference = br;
                        for child in inner {
                            self.surface.dom.insert_after(reference, child);
                            reference = child;
                        }
                    }
                    self.surface.dom.detach(node);
                    changed = true;
                }
                Some("a") => {
                    let has_text = !self.surface.dom.inner_text(node).is_empty();
                    let popover_target = self.popovers.link_anchor() == Some(node);
                    if !has_text && !popover_target {
                        self.surface.dom.detach(node);
                        changed = true;
                    }
                }
                _ => {}
            }
        }

        if changed {
            self.after_mutation();
        }
    }

    fn check_for_empty(&mut self) {
        self.empty = self.surface.inner_html().is_empty();
    }

    fn after_mutation(&mut self) {
        self.revision += 1;
        self.check_for_empty();
    }

    fn emit_style_change(
        &mut self,
        name: &str,
        component: Option<String>,
        show_ui: Option<bool>,
        value: Option<String>,
    ) {
        self.events
            .emit(&EditorEvent::StyleChange(StyleChangePayload {
                name: name.to_string(),
                component,
                show_ui,
                value,
            }));
    }
}

impl std::fmt::Debug for RichTextEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RichTextEditor")
            .field("mounted", &self.mounted)
            .field("empty", &self.empty)
            .field("revision", &self.revision)
            .field("popover", &self.popovers.state())
            .finish()
    }
}
