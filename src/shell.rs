use crate::config::Config;
use crate::vfs::{display, Vfs};

/// Submitted lines, oldest first. The recall cursor counts back from the
/// newest entry and resets on every submission.
#[derive(Default)]
pub struct History {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl History {
    pub fn push(&mut self, line: &str) {
        let line = line.trim();
        if !line.is_empty() {
            self.entries.push(line.into());
        }
        self.cursor = None;
    }

    /// Older entry; sticks at the oldest.
    pub fn up(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let next = match self.cursor {
            None => 0,
            Some(i) if i + 1 < self.entries.len() => i + 1,
            Some(i) => i,
        };
        self.cursor = Some(next);
        self.recalled()
    }

    /// Newer entry; stepping past the newest yields an empty line and stops
    /// recalling.
    pub fn down(&mut self) -> Option<&str> {
        match self.cursor {
            None => None,
            Some(0) => {
                self.cursor = None;
                Some("")
            }
            Some(i) => {
                self.cursor = Some(i - 1);
                self.recalled()
            }
        }
    }

    fn recalled(&self) -> Option<&str> {
        let i = self.cursor?;
        self.entries
            .get(self.entries.len().checked_sub(i + 1)?)
            .map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

#[derive(Default)]
pub struct Shell {
    pub history: History,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn prompt(fs: &Vfs, config: &Config) -> String {
    let cwd = display(&fs.cwd);
    let home = display(fs.home());
    let shown = if cwd == home {
        "~".to_string()
    } else if let Some(rest) = cwd.strip_prefix(&format!("{}/", home)) {
        format!("~/{}", rest)
    } else {
        cwd
    };
    format!("{}@{}:{}$ ", config.user, config.hostname, shown)
}
