/// Line-oriented vim buffer. Text lines are appended; `:`-commands save,
/// quit, delete or print.
pub struct Editor {
    filename: String,
    lines: Vec<String>,
    modified: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum EditorAction {
    /// Stay in the editor and show this text.
    Continue(String),
    /// Persist `content` under `filename`; `quit` leaves the editor afterwards.
    Save {
        filename: String,
        content: String,
        quit: bool,
    },
    /// Leave without saving.
    Quit,
}

impl Editor {
    pub fn new(filename: &str, content: &str) -> Editor {
        let lines = if content.is_empty() {
            Vec::new()
        } else {
            content.lines().map(|s| s.to_string()).collect()
        };
        Editor {
            filename: filename.to_string(),
            lines,
            modified: false,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    fn mark_saved(&mut self) {
        self.modified = false;
    }

    pub fn append_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
        self.modified = true;
    }

    /// Removes line `n` (1-based), or the last line when `n` is `None`.
    pub fn delete_line(&mut self, n: Option<usize>) -> bool {
        let idx = match n {
            Some(0) => return false,
            Some(n) => n - 1,
            None => match self.lines.len().checked_sub(1) {
                Some(last) => last,
                None => return false,
            },
        };
        if idx >= self.lines.len() {
            return false;
        }
        self.lines.remove(idx);
        self.modified = true;
        true
    }

    /// Numbered listing with a status line.
    pub fn render(&self) -> String {
        let marker = if self.modified { " [+]" } else { "" };
        let mut out = format!("\"{}\"{}\n", self.filename, marker);
        if self.lines.is_empty() {
            out.push_str("~\n");
        }
        for (i, line) in self.lines.iter().enumerate() {
            out.push_str(&format!("{:>3} {}\n", i + 1, line));
        }
        out.push_str(&format!("-- {} lines --", self.lines.len()));
        out
    }

    pub fn apply(&mut self, input: &str) -> EditorAction {
        let Some(cmd) = input.strip_prefix(':') else {
            self.append_line(input);
            return EditorAction::Continue(String::new());
        };
        let mut parts = cmd.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("w"), _) => self.save(false),
            (Some("wq"), _) | (Some("x"), _) => self.save(true),
            (Some("q"), _) if self.modified => EditorAction::Continue(
                "E37: No write since last change (add ! to override)".into(),
            ),
            (Some("q"), _) | (Some("q!"), _) => EditorAction::Quit,
            (Some("d"), arg) => {
                let n = match arg.map(str::parse::<usize>) {
                    None => None,
                    Some(Ok(n)) => Some(n),
                    Some(Err(_)) => return EditorAction::Continue(format!("E488: Trailing characters: {}", cmd)),
                };
                if self.delete_line(n) {
                    EditorAction::Continue(String::new())
                } else {
                    EditorAction::Continue("E16: Invalid range".into())
                }
            }
            (Some("p"), _) => EditorAction::Continue(self.render()),
            _ => EditorAction::Continue(format!("E492: Not an editor command: {}", cmd)),
        }
    }

    fn save(&mut self, quit: bool) -> EditorAction {
        self.mark_saved();
        EditorAction::Save {
            filename: self.filename.clone(),
            content: self.content(),
            quit,
        }
    }
}
