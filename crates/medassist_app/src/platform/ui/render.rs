use std::io::{self, Write};

use medassist_core::{AppViewModel, HistoryEntry, MessageKind, Role, Sender};

/// Prints view-model changes as an append-only terminal log.
///
/// Placeholders cannot be erased from a terminal, so they are printed as
/// status lines and only normal messages count towards the transcript.
pub struct TerminalRenderer {
    clock: fn() -> String,
    shown_messages: usize,
    shown_placeholder: Option<MessageKind>,
    shown_typing: bool,
    shown_history: Option<Vec<HistoryEntry>>,
    shown_exporting: bool,
    shown_notice: Option<String>,
    shown_waiting_for: Option<String>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::with_clock(local_time)
    }

    pub fn with_clock(clock: fn() -> String) -> Self {
        Self {
            clock,
            shown_messages: 0,
            shown_placeholder: None,
            shown_typing: false,
            shown_history: None,
            shown_exporting: false,
            shown_notice: None,
            shown_waiting_for: None,
        }
    }

    pub fn render(&mut self, view: &AppViewModel, out: &mut impl Write) -> io::Result<()> {
        let mut normal = 0;
        for message in view.messages.iter().filter(|m| !m.kind.is_placeholder()) {
            normal += 1;
            if normal > self.shown_messages {
                let who = match message.sender {
                    Sender::User => "You",
                    Sender::Bot => "Bot",
                };
                writeln!(out, "[{}] {}: {}", (self.clock)(), who, message.text)?;
            }
        }
        self.shown_messages = normal;

        let placeholder = view.messages.iter().find(|m| m.kind.is_placeholder());
        let placeholder_kind = placeholder.map(|m| m.kind);
        if placeholder_kind != self.shown_placeholder {
            if let Some(message) = placeholder {
                writeln!(out, "  ... {}", message.text)?;
            }
            self.shown_placeholder = placeholder_kind;
        }

        if view.show_typing && !self.shown_typing {
            writeln!(out, "  ... thinking")?;
        }
        self.shown_typing = view.show_typing;

        self.render_held_input(view, out)?;

        self.render_history(view, out)?;

        if view.exporting && !self.shown_exporting {
            writeln!(out, "  Summarizing...")?;
        }
        self.shown_exporting = view.exporting;

        if view.notice != self.shown_notice {
            if let Some(notice) = &view.notice {
                writeln!(out, "! {notice}")?;
            }
            self.shown_notice = view.notice.clone();
        }
        out.flush()
    }

    /// Input typed while a query is in flight stays in the box unsent.
    fn render_held_input(&mut self, view: &AppViewModel, out: &mut impl Write) -> io::Result<()> {
        let held = (view.busy && !view.input.trim().is_empty())
            .then(|| view.input.clone());
        if held.is_some() && held != self.shown_waiting_for {
            writeln!(out, "  (still waiting for the previous answer)")?;
        }
        self.shown_waiting_for = held;
        Ok(())
    }

    fn render_history(&mut self, view: &AppViewModel, out: &mut impl Write) -> io::Result<()> {
        if !view.history_open {
            if self.shown_history.take().is_some() {
                writeln!(out, "-- history closed --")?;
            }
            return Ok(());
        }
        if view.history_loading || self.shown_history.as_ref() == Some(&view.history) {
            return Ok(());
        }

        writeln!(out, "== Chat History ==")?;
        if view.history.is_empty() {
            writeln!(out, "No chat history available.")?;
        }
        for entry in &view.history {
            let who = match entry.role {
                Role::User => "You:",
                Role::Bot => "Bot:",
            };
            writeln!(out, "{who} {}", entry.content)?;
        }
        if view.export_enabled {
            writeln!(out, "(/export to save a summary, /close to return)")?;
        } else {
            writeln!(out, "(/close to return)")?;
        }
        self.shown_history = Some(view.history.clone());
        Ok(())
    }
}

/// Display-only timestamp, regenerated on every render and never stored.
fn local_time() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}
