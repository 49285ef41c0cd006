//! Line-oriented console presenter.
//!
//! Writes chat activity to stdout and, optionally, appends an HTML
//! transcript. The transcript path takes untrusted message text, so
//! everything interpolated into markup goes through
//! [`mirage_core::escape_text`].

#![allow(clippy::print_stdout, reason = "console output is this module's job")]

use std::{
    fs::File,
    io::{self, Write},
    path::Path,
};

use mirage_app::{AuthTab, Presenter, Severity};
use mirage_core::{
    escape_text,
    types::{Message, Presence, User},
};

/// Presenter printing one line per update, with an optional HTML transcript.
pub struct ConsolePresenter {
    transcript: Option<File>,
}

impl ConsolePresenter {
    /// Create a presenter. When `transcript_path` is set, an HTML file is
    /// created there and every message and system line is appended to it.
    pub fn new(transcript_path: Option<&Path>) -> io::Result<Self> {
        let transcript = match transcript_path {
            Some(path) => {
                let mut file = File::create(path)?;
                writeln!(file, "<!doctype html>\n<meta charset=\"utf-8\">\n<title>Mirage transcript</title>")?;
                Some(file)
            }
            None => None,
        };
        Ok(Self { transcript })
    }

    fn transcript_line(&mut self, html: &str) -> io::Result<()> {
        if let Some(file) = &mut self.transcript {
            writeln!(file, "{html}")?;
            file.flush()?;
        }
        Ok(())
    }

    /// Wall-clock millis rendered as `HH:MM` UTC.
    fn clock(millis: u64) -> String {
        let secs = millis / 1000;
        format!("{:02}:{:02}", (secs / 3600) % 24, (secs / 60) % 60)
    }

    fn presence_mark(presence: Presence) -> char {
        match presence {
            Presence::Online => '+',
            Presence::Away => '~',
            Presence::Offline => '-',
        }
    }
}

impl Presenter for ConsolePresenter {
    type Error = io::Error;

    fn render_roster(&mut self, users: &[User]) -> Result<(), Self::Error> {
        println!("participants:");
        for user in users {
            println!(
                "  {} [{}] {} ({})",
                Self::presence_mark(user.presence),
                user.avatar_glyph,
                user.display_name,
                user.presence.label()
            );
        }
        Ok(())
    }

    fn append_message_view(&mut self, message: &Message, own: bool) -> Result<(), Self::Error> {
        let marker = if own { "*" } else { " " };
        println!(
            "[{}]{marker}{}: {}",
            Self::clock(message.sent_at_millis),
            message.author_name,
            message.text
        );
        self.transcript_line(&format!(
            "<div class=\"message{}\"><b>{}</b>: {}</div>",
            if own { " own" } else { "" },
            escape_text(&message.author_name),
            escape_text(&message.text),
        ))
    }

    fn append_system_message(&mut self, text: &str) -> Result<(), Self::Error> {
        println!("-- {text}");
        self.transcript_line(&format!("<div class=\"system\">{}</div>", escape_text(text)))
    }

    fn set_connection_label(&mut self, text: &str) -> Result<(), Self::Error> {
        println!("status: {text}");
        Ok(())
    }

    fn set_online_count(&mut self, count: usize) -> Result<(), Self::Error> {
        println!("online: {count}");
        Ok(())
    }

    fn set_message_count(&mut self, count: usize) -> Result<(), Self::Error> {
        println!("messages: {count}");
        Ok(())
    }

    fn show_notification(&mut self, text: &str, severity: Severity) -> Result<(), Self::Error> {
        let tag = match severity {
            Severity::Info => "note",
            Severity::Success => "ok",
            Severity::Error => "error",
        };
        println!("({tag}) {text}");
        Ok(())
    }

    fn switch_auth_tab(&mut self, tab: AuthTab) -> Result<(), Self::Error> {
        let name = match tab {
            AuthTab::Login => "login",
            AuthTab::Register => "register",
        };
        println!("auth: {name} form active");
        Ok(())
    }

    fn close_auth_overlay(&mut self) -> Result<(), Self::Error> {
        println!("auth: signed in");
        Ok(())
    }

    fn set_auth_busy(&mut self, busy: bool) -> Result<(), Self::Error> {
        if busy {
            println!("auth: working...");
        }
        Ok(())
    }
}
