pub mod text;

use serde::Serialize;

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy)]
pub struct Output {
    mode: OutputMode,
}

impl Output {
    pub fn new(json: bool) -> Self {
        let mode = if json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };
        Self { mode }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn is_text(&self) -> bool {
        self.mode == OutputMode::Text
    }

    /// Prints `text_line` in text mode, or `json_value` as pretty JSON.
    pub fn emit<T: Serialize + ?Sized>(&self, text_line: &str, json_value: &T) -> AppResult<()> {
        match self.mode {
            OutputMode::Text => text::print_line(text_line),
            OutputMode::Json => {
                println!("{}", serde_json::to_string_pretty(json_value)?);
                Ok(())
            }
        }
    }
}
