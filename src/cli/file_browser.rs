//! File Browser Module
//!
//! Directory tree shown in the left pane. Directories are read lazily when
//! expanded; the visible rows are rebuilt from the set of expanded paths, so
//! toggling hidden files or collapsing a branch never loses the selection
//! when the selected entry is still visible.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

/// File system entry with metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_directory: bool,
    pub is_hidden: bool,
}

impl FileEntry {
    /// Create a new FileEntry from a path
    pub fn from_path(path: PathBuf) -> io::Result<Self> {
        let metadata = fs::metadata(&path)?;
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let is_directory = metadata.is_dir();
        let is_hidden = name.starts_with('.');

        Ok(Self {
            name,
            path,
            is_directory,
            is_hidden,
        })
    }
}

/// A visible row of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub entry: FileEntry,
    pub depth: usize,
    pub expanded: bool,
}

impl TreeNode {
    /// Label with indentation and expand marker
    pub fn label(&self) -> String {
        let marker = match (self.entry.is_directory, self.expanded) {
            (true, true) => "▾ ",
            (true, false) => "▸ ",
            (false, _) => "  ",
        };
        format!("{}{}{}", "  ".repeat(self.depth), marker, self.entry.name)
    }
}

/// Result of activating the selected row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionResult {
    FileSelected(PathBuf),
    Expanded(PathBuf),
    Collapsed(PathBuf),
    Nothing,
}

pub struct DirectoryTree {
    root: PathBuf,
    show_hidden: bool,
    expanded: HashSet<PathBuf>,
    nodes: Vec<TreeNode>,
    selected: usize,
}

impl DirectoryTree {
    /// Create a tree rooted at `root`, which must be a directory
    pub fn new(root: PathBuf, show_hidden: bool) -> io::Result<Self> {
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            ));
        }

        let mut tree = Self {
            root,
            show_hidden,
            expanded: HashSet::new(),
            nodes: Vec::new(),
            selected: 0,
        };
        tree.rebuild();
        Ok(tree)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn selected_index(&self) -> Option<usize> {
        (!self.nodes.is_empty()).then_some(self.selected)
    }

    pub fn selected(&self) -> Option<&TreeNode> {
        self.nodes.get(self.selected)
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.nodes.len() {
            self.selected += 1;
        }
    }

    pub fn move_to_top(&mut self) {
        self.selected = 0;
    }

    /// Expand the selected directory, or step into it when already expanded
    pub fn expand(&mut self) -> SelectionResult {
        let Some(node) = self.selected().cloned() else {
            return SelectionResult::Nothing;
        };
        if !node.entry.is_directory {
            return SelectionResult::Nothing;
        }
        if node.expanded {
            if self
                .nodes
                .get(self.selected + 1)
                .is_some_and(|next| next.depth > node.depth)
            {
                self.selected += 1;
            }
            return SelectionResult::Nothing;
        }

        self.expanded.insert(node.entry.path.clone());
        self.rebuild();
        SelectionResult::Expanded(node.entry.path)
    }

    /// Collapse the selected directory, or jump to its parent row
    pub fn collapse(&mut self) -> SelectionResult {
        let Some(node) = self.selected().cloned() else {
            return SelectionResult::Nothing;
        };
        if node.entry.is_directory && node.expanded {
            self.expanded.remove(&node.entry.path);
            self.rebuild();
            return SelectionResult::Collapsed(node.entry.path);
        }

        if let Some(parent) = self.nodes[..self.selected]
            .iter()
            .rposition(|candidate| candidate.depth < node.depth)
        {
            self.selected = parent;
        }
        SelectionResult::Nothing
    }

    /// Open the selected file or toggle the selected directory
    pub fn activate(&mut self) -> SelectionResult {
        let Some(node) = self.selected() else {
            return SelectionResult::Nothing;
        };
        if !node.entry.is_directory {
            return SelectionResult::FileSelected(node.entry.path.clone());
        }
        if node.expanded {
            self.collapse()
        } else {
            self.expand()
        }
    }

    /// Flip hidden-file visibility and return the new setting
    pub fn toggle_hidden(&mut self) -> bool {
        self.show_hidden = !self.show_hidden;
        self.rebuild();
        self.show_hidden
    }

    /// Re-read expanded directories and restore the selection by path
    pub fn rebuild(&mut self) {
        let previous = self.selected().map(|node| node.entry.path.clone());

        let mut nodes = Vec::new();
        self.push_children(&self.root, 0, &mut nodes);
        self.nodes = nodes;

        self.selected = previous
            .and_then(|path| self.nodes.iter().position(|node| node.entry.path == path))
            .unwrap_or_else(|| self.selected.min(self.nodes.len().saturating_sub(1)));
    }

    fn push_children(&self, dir: &Path, depth: usize, nodes: &mut Vec<TreeNode>) {
        let entries = match self.read_directory(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "could not read directory");
                return;
            }
        };

        for entry in entries {
            let expanded = entry.is_directory && self.expanded.contains(&entry.path);
            let path = entry.path.clone();
            nodes.push(TreeNode {
                entry,
                depth,
                expanded,
            });
            if expanded {
                self.push_children(&path, depth + 1, nodes);
            }
        }
    }

    /// Read the immediate children of `dir`, directories first
    pub fn read_directory(&self, dir: &Path) -> io::Result<Vec<FileEntry>> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(io::Error::from)?;
            match FileEntry::from_path(entry.into_path()) {
                Ok(file_entry) => {
                    if !self.show_hidden && file_entry.is_hidden {
                        continue;
                    }
                    entries.push(file_entry);
                }
                Err(e) => debug!(error = %e, "skipping unreadable entry"),
            }
        }

        sort_entries(&mut entries);
        Ok(entries)
    }
}

fn sort_entries(entries: &mut [FileEntry]) {
    entries.sort_by(|a, b| {
        // Always put directories first
        match (a.is_directory, b.is_directory) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    });
}
