use crate::challenge::Puzzle;
use serde::Serialize;
use std::fmt;

/// Which front end currently receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Terminal,
    Matrix,
    Gui,
    FreedOs,
    Editor,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Terminal => "terminal",
            Mode::Matrix => "matrix",
            Mode::Gui => "gui",
            Mode::FreedOs => "freed_os",
            Mode::Editor => "editor",
        };
        f.write_str(name)
    }
}

/// Everything a command can hand back to the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Output {
    Text { text: String },
    /// Wipe the visible buffer.
    Clear,
    ModeSwitch { mode: Mode },
    /// The page opens `url` in a new tab and prints `message`.
    OpenUrl { url: String, message: String },
    Panel(Panel),
    Challenge(PuzzleView),
}

impl Output {
    pub fn text(text: impl Into<String>) -> Self {
        Output::Text { text: text.into() }
    }

    pub fn lines(lines: Vec<String>) -> Self {
        Output::Text {
            text: lines.join("\n"),
        }
    }

    pub fn switch(mode: Mode) -> Self {
        Output::ModeSwitch { mode }
    }

    pub fn open(url: &str, message: impl Into<String>) -> Self {
        Output::OpenUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Output::Text { text } => Some(text),
            Output::OpenUrl { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Side panel content (about/projects).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Panel {
    pub title: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub heading: String,
    pub lines: Vec<String>,
    pub link: Option<String>,
}

/// The part of a puzzle the modal may show. The solution never leaves the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PuzzleView {
    pub title: String,
    pub description: String,
    pub hint: String,
}

impl From<&Puzzle> for PuzzleView {
    fn from(p: &Puzzle) -> Self {
        PuzzleView {
            title: p.name.into(),
            description: p.description.into(),
            hint: p.hint.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_string(&vec![
            Output::text("hi"),
            Output::Clear,
            Output::switch(Mode::FreedOs),
        ])
        .unwrap();
        assert_eq!(
            json,
            r#"[{"kind":"text","text":"hi"},{"kind":"clear"},{"kind":"mode_switch","mode":"freed_os"}]"#
        );
    }
}
