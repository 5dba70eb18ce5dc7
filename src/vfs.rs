use crate::error::VfsError;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DIR_SIZE: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    File { content: String },
    Directory { children: BTreeMap<String, Node> },
}

impl Node {
    pub fn dir() -> Self {
        Node::Directory {
            children: BTreeMap::new(),
        }
    }

    pub fn file(content: &str) -> Self {
        Node::File {
            content: content.into(),
        }
    }

    /// Builder used by the static templates. Inserting into a file is a no-op.
    pub fn with(mut self, name: &str, child: Node) -> Self {
        if let Node::Directory { children } = &mut self {
            children.insert(name.into(), child);
        }
        self
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory { .. })
    }

    pub fn size(&self) -> usize {
        match self {
            Node::File { content } => content.len(),
            Node::Directory { .. } => DIR_SIZE,
        }
    }

    fn child(&self, name: &str) -> Option<&Node> {
        match self {
            Node::Directory { children } => children.get(name),
            Node::File { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    pub name: String,
    pub kind: NodeKind,
    pub size: usize,
    /// `None` for template entries, which carry no timestamp of their own.
    pub modified: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFile {
    pub content: String,
    pub modified: NaiveDateTime,
}

/// `/a/b` for `["a", "b"]`, `/` for the root.
pub fn display(path: &[String]) -> String {
    format!("/{}", path.join("/"))
}

/// Turns user input into absolute segments. `..` at the root stays at the root.
pub fn resolve_path(input: &str, current: &[String], home: &[String]) -> Vec<String> {
    let (mut parts, rest): (Vec<String>, &str) = if let Some(rest) = input.strip_prefix('/') {
        (Vec::new(), rest)
    } else if input == "~" {
        (home.to_vec(), "")
    } else if let Some(rest) = input.strip_prefix("~/") {
        (home.to_vec(), rest)
    } else {
        (current.to_vec(), input)
    };
    for part in rest.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            _ => parts.push(part.into()),
        }
    }
    parts
}

/// Immutable template tree plus a flat overlay of user-written files that
/// surfaces in the home directory. An overlay file shadows a template file
/// of the same name; template directories cannot be shadowed.
pub struct Vfs {
    root: Node,
    home: Vec<String>,
    pub cwd: Vec<String>,
    user_files: BTreeMap<String, UserFile>,
}

impl Vfs {
    pub fn new(root: Node, home: Vec<String>) -> Self {
        Vfs {
            root,
            cwd: home.clone(),
            home,
            user_files: BTreeMap::new(),
        }
    }

    pub fn home(&self) -> &[String] {
        &self.home
    }

    pub fn pwd(&self) -> String {
        display(&self.cwd)
    }

    pub fn resolve_path(&self, input: &str) -> Vec<String> {
        resolve_path(input, &self.cwd, &self.home)
    }

    pub fn navigate(&self, path: &[String]) -> Result<&Node, VfsError> {
        let mut node = &self.root;
        for part in path {
            if !node.is_dir() {
                return Err(VfsError::NotADirectory(display(path)));
            }
            node = node
                .child(part)
                .ok_or_else(|| VfsError::NotFound(display(path)))?;
        }
        Ok(node)
    }

    pub fn cd(&mut self, input: &str) -> Result<(), VfsError> {
        let target = self.resolve_path(input);
        if !self.navigate(&target)?.is_dir() {
            return Err(VfsError::NotADirectory(display(&target)));
        }
        self.cwd = target;
        Ok(())
    }

    pub fn list(&self, path: &[String]) -> Result<Vec<DirEntry>, VfsError> {
        let children = match self.navigate(path)? {
            Node::Directory { children } => children,
            Node::File { .. } => return Err(VfsError::NotADirectory(display(path))),
        };
        let in_home = path == self.home.as_slice();
        let mut entries: Vec<DirEntry> = children
            .iter()
            .filter(|(name, _)| !(in_home && self.user_files.contains_key(name.as_str())))
            .map(|(name, child)| DirEntry {
                name: name.clone(),
                kind: if child.is_dir() {
                    NodeKind::Directory
                } else {
                    NodeKind::File
                },
                size: child.size(),
                modified: None,
            })
            .collect();
        if in_home {
            entries.extend(self.user_files.iter().map(|(name, file)| DirEntry {
                name: name.clone(),
                kind: NodeKind::File,
                size: file.content.len(),
                modified: Some(file.modified),
            }));
        }
        Ok(entries)
    }

    pub fn read(&self, path: &[String]) -> Result<String, VfsError> {
        if let Some(file) = self.overlay(path) {
            return Ok(file.content.clone());
        }
        match self.navigate(path)? {
            Node::File { content } => Ok(content.clone()),
            Node::Directory { .. } => Err(VfsError::IsADirectory(display(path))),
        }
    }

    fn overlay(&self, path: &[String]) -> Option<&UserFile> {
        match path.split_last() {
            Some((name, parent)) if parent == self.home.as_slice() => self.user_files.get(name),
            _ => None,
        }
    }

    /// `name` resolved directly inside home.
    pub fn home_path(&self, name: &str) -> Vec<String> {
        let mut path = self.home.clone();
        path.push(name.into());
        path
    }

    /// Whether `name` exists in home, either in the template or the overlay.
    pub fn exists_in_home(&self, name: &str) -> bool {
        self.user_files.contains_key(name) || self.navigate(&self.home_path(name)).is_ok()
    }

    /// Case-insensitive match on the last segment; exact names win.
    pub fn find_relaxed(&self, path: &[String]) -> Option<Vec<String>> {
        if self.navigate(path).is_ok() {
            return Some(path.to_vec());
        }
        let (name, parent) = path.split_last()?;
        match self.navigate(parent).ok()? {
            Node::Directory { children } => children
                .keys()
                .find(|k| k.eq_ignore_ascii_case(name))
                .map(|k| {
                    let mut found = parent.to_vec();
                    found.push(k.clone());
                    found
                }),
            Node::File { .. } => None,
        }
    }

    pub fn write(&mut self, name: &str, content: &str, at: NaiveDateTime) -> Result<(), VfsError> {
        let path = self.home_path(name);
        if matches!(self.navigate(&path), Ok(Node::Directory { .. })) {
            return Err(VfsError::IsADirectory(display(&path)));
        }
        self.user_files.insert(
            name.into(),
            UserFile {
                content: content.into(),
                modified: at,
            },
        );
        Ok(())
    }

    pub fn user_file(&self, name: &str) -> Option<&str> {
        self.user_files.get(name).map(|f| f.content.as_str())
    }

    pub fn user_files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.user_files
            .iter()
            .map(|(name, f)| (name.as_str(), f.content.as_str()))
    }
}
