/*!
call.rs - the per-invocation context handed to commands.

A `Call` carries the raw invocation text and a response sink. `respond` is
the only required sink; `error` / `success` / `info` route to it unless an
implementation styles them differently.

Implementations:
  - BufferedCall  records every message (tests, JSON output)
  - ConsoleCall   prints to stdout with role colors
*/

use serde::Serialize;
use std::fmt;

use super::format::{Role, StyleOptions, color, emoji};

pub trait Call {
    fn call_text(&self) -> &str;

    fn respond(&mut self, message: &str);

    fn error(&mut self, message: &str) {
        self.respond(message);
    }

    fn success(&mut self, message: &str) {
        self.respond(message);
    }

    fn info(&mut self, message: &str) {
        self.respond(message);
    }
}

/* ---- Buffered ---- */

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Respond,
    Error,
    Success,
    Info,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Respond => "respond",
            Level::Error => "error",
            Level::Success => "success",
            Level::Info => "info",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Response {
    pub level: Level,
    pub text: String,
}

/// Keeps every message instead of printing it.
#[derive(Clone, Debug, Default, Serialize)]
pub struct BufferedCall {
    text: String,
    responses: Vec<Response>,
}

impl BufferedCall {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            responses: Vec::new(),
        }
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    /// Texts of all messages at `level`, in order.
    pub fn texts(&self, level: Level) -> Vec<&str> {
        self.responses
            .iter()
            .filter(|r| r.level == level)
            .map(|r| r.text.as_str())
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        self.responses.iter().any(|r| r.level == Level::Error)
    }

    fn push(&mut self, level: Level, message: &str) {
        self.responses.push(Response {
            level,
            text: message.to_string(),
        });
    }
}

impl Call for BufferedCall {
    fn call_text(&self) -> &str {
        &self.text
    }

    fn respond(&mut self, message: &str) {
        self.push(Level::Respond, message);
    }

    fn error(&mut self, message: &str) {
        self.push(Level::Error, message);
    }

    fn success(&mut self, message: &str) {
        self.push(Level::Success, message);
    }

    fn info(&mut self, message: &str) {
        self.push(Level::Info, message);
    }
}

/* ---- Console ---- */

/// Prints each message on its own stdout line.
#[derive(Debug)]
pub struct ConsoleCall {
    text: String,
    style: StyleOptions,
}

impl ConsoleCall {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: StyleOptions::detect(),
        }
    }

    fn print(&self, tag: &str, role: Role, message: &str) {
        let icon = emoji(tag, &self.style);
        let body = color(role, message, &self.style);
        if icon.is_empty() {
            println!("{body}");
        } else {
            println!("{icon} {body}");
        }
    }
}

impl Call for ConsoleCall {
    fn call_text(&self) -> &str {
        &self.text
    }

    fn respond(&mut self, message: &str) {
        println!("{message}");
    }

    fn error(&mut self, message: &str) {
        self.print("error", Role::Error, message);
    }

    fn success(&mut self, message: &str) {
        self.print("success", Role::Success, message);
    }

    fn info(&mut self, message: &str) {
        self.print("info", Role::Dim, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain {
        out: Vec<String>,
    }

    impl Call for Plain {
        fn call_text(&self) -> &str {
            "plain"
        }
        fn respond(&mut self, message: &str) {
            self.out.push(message.to_string());
        }
    }

    #[test]
    fn sinks_default_to_respond() {
        let mut c = Plain { out: Vec::new() };
        c.error("e");
        c.success("s");
        c.info("i");
        assert_eq!(c.out, ["e", "s", "i"]);
    }

    #[test]
    fn buffered_records_levels() {
        let mut c = BufferedCall::new("cmd --x");
        c.info("hello");
        c.error("bad");
        assert_eq!(c.call_text(), "cmd --x");
        assert_eq!(c.texts(Level::Error), ["bad"]);
        assert!(c.has_errors());
        let json = serde_json::to_value(c.responses()).unwrap();
        assert_eq!(json[0]["level"], "info");
    }
}
