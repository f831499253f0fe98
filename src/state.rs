//! View state for the four-screen navigation flow

use crate::models::{AppMode, Category, ChatTurn, FlowchartStep, GeneratedContent, Preserve, Sender};
use crate::prompts;
use log::warn;

/// Screen derived from the current selections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    ModeSelect,
    Categories,
    Preserves,
    Detail,
}

/// Single source of truth for the active screen and its overlays.
/// There is exactly one writer (the interactive loop); every transition
/// either applies fully or is refused without touching any field.
#[derive(Debug, Default)]
pub struct ViewState {
    mode: Option<AppMode>,
    selected_category: Option<Category>,
    selected_preserve: Option<Preserve>,
    content: Option<GeneratedContent>,
    loading: bool,
    error: Option<String>,
    active_step_id: Option<u32>,
    chat_open: bool,
    chat_log: Vec<ChatTurn>,
    exporting: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    // ============ Accessors ============

    pub fn screen(&self) -> Screen {
        if self.mode.is_none() {
            Screen::ModeSelect
        } else if self.selected_category.is_none() {
            Screen::Categories
        } else if self.selected_preserve.is_none() {
            Screen::Preserves
        } else {
            Screen::Detail
        }
    }

    pub fn mode(&self) -> Option<AppMode> {
        self.mode
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.selected_category.as_ref()
    }

    pub fn selected_preserve(&self) -> Option<&Preserve> {
        self.selected_preserve.as_ref()
    }

    pub fn content(&self) -> Option<&GeneratedContent> {
        self.content.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The step behind the open detail overlay, if any
    pub fn active_step(&self) -> Option<&FlowchartStep> {
        let id = self.active_step_id?;
        self.content
            .as_ref()
            .and_then(|content| content.process.iter().find(|step| step.id == id))
    }

    pub fn chat_open(&self) -> bool {
        self.chat_open
    }

    pub fn chat_log(&self) -> &[ChatTurn] {
        &self.chat_log
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    // ============ Transitions ============

    pub fn select_mode(&mut self, mode: AppMode) -> bool {
        if self.mode.is_some() {
            warn!("[state] select_mode ignored: a mode is already active");
            return false;
        }
        self.mode = Some(mode);
        true
    }

    pub fn select_category(&mut self, category: Category) -> bool {
        if self.screen() != Screen::Categories {
            warn!("[state] select_category ignored on {:?}", self.screen());
            return false;
        }
        self.selected_category = Some(category);
        true
    }

    /// Selects a recipe and enters the loading state. The caller is
    /// expected to start the content fetch next.
    pub fn select_preserve(&mut self, preserve: Preserve) -> bool {
        if self.screen() != Screen::Preserves {
            warn!("[state] select_preserve ignored on {:?}", self.screen());
            return false;
        }
        self.selected_preserve = Some(preserve);
        self.begin_loading();
        true
    }

    /// Re-enters the loading state for the already selected recipe
    pub fn retry(&mut self) -> bool {
        if self.screen() != Screen::Detail || self.loading {
            warn!("[state] retry ignored: no settled recipe selection");
            return false;
        }
        self.begin_loading();
        true
    }

    fn begin_loading(&mut self) {
        self.content = None;
        self.loading = true;
        self.error = None;
        self.active_step_id = None;
        self.chat_open = false;
        self.chat_log.clear();
    }

    /// Installs freshly fetched content, replacing any prior content wholesale
    pub fn content_loaded(&mut self, content: GeneratedContent) -> bool {
        if self.screen() != Screen::Detail || !self.loading {
            warn!("[state] content_loaded ignored: no fetch in progress");
            return false;
        }
        self.content = Some(content);
        self.loading = false;
        self.error = None;
        true
    }

    pub fn content_failed(&mut self, message: String) -> bool {
        if self.screen() != Screen::Detail || !self.loading {
            warn!("[state] content_failed ignored: no fetch in progress");
            return false;
        }
        self.content = None;
        self.loading = false;
        self.error = Some(message);
        true
    }

    /// One level up: detail to recipe list, or recipe list to categories.
    /// Leaving the detail view drops its content and overlays with it.
    pub fn back(&mut self) -> bool {
        match self.screen() {
            Screen::Detail => {
                self.selected_preserve = None;
                self.content = None;
                self.loading = false;
                self.error = None;
                self.active_step_id = None;
                self.chat_open = false;
                self.chat_log.clear();
                self.exporting = false;
                true
            }
            Screen::Preserves => {
                self.selected_category = None;
                true
            }
            other => {
                warn!("[state] back ignored on {:?}", other);
                false
            }
        }
    }

    /// Returns to the mode selector, dropping every selection and overlay
    pub fn change_mode(&mut self) {
        *self = Self::default();
    }

    pub fn open_step(&mut self, id: u32) -> bool {
        let known = self
            .content
            .as_ref()
            .map(|content| content.process.iter().any(|step| step.id == id))
            .unwrap_or(false);
        if self.screen() != Screen::Detail || !known {
            warn!("[state] open_step ignored: step {} is not in the loaded content", id);
            return false;
        }
        self.active_step_id = Some(id);
        true
    }

    pub fn close_step(&mut self) {
        self.active_step_id = None;
    }

    /// Opens the chat panel, resetting the transcript to one greeting
    /// for the current recipe
    pub fn open_chat(&mut self) -> bool {
        let name = match (self.screen(), &self.selected_preserve) {
            (Screen::Detail, Some(preserve)) => preserve.name.clone(),
            _ => {
                warn!("[state] open_chat ignored outside the detail view");
                return false;
            }
        };
        self.chat_log = vec![ChatTurn {
            sender: Sender::Assistant,
            text: prompts::chat_greeting(&name),
        }];
        self.chat_open = true;
        true
    }

    pub fn close_chat(&mut self) {
        self.chat_open = false;
    }

    pub fn push_chat_turn(&mut self, sender: Sender, text: String) -> bool {
        if !self.chat_open {
            warn!("[state] chat message dropped: panel is closed");
            return false;
        }
        self.chat_log.push(ChatTurn { sender, text });
        true
    }

    /// Claims the export slot. Refused without loaded content or while
    /// another export is running; the flag is only ever set on success.
    pub fn begin_export(&mut self) -> bool {
        if self.screen() != Screen::Detail || self.content.is_none() || self.exporting {
            warn!("[state] export ignored: no loaded content or already exporting");
            return false;
        }
        self.exporting = true;
        true
    }

    pub fn finish_export(&mut self) {
        self.exporting = false;
    }
}
