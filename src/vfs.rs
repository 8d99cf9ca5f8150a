use crate::error::SnapshotError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::rc::Rc;

pub const README: &str = "Welcome to Sandbox OS.\nThis is a temporary isolated environment.\nType \"help\" to see available commands.";

/// Children of a directory, sorted by name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    contents: BTreeMap<String, Rc<Node>>,
}

impl Directory {
    pub fn new() -> Self {
        Directory {
            contents: BTreeMap::new(),
        }
    }
    /// Builder used for fixed layouts.
    pub fn with(mut self, name: &str, node: Node) -> Self {
        self.insert(name, node);
        self
    }
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.contents.get(name).map(|n| n.as_ref())
    }
    pub fn contains(&self, name: &str) -> bool {
        self.contents.contains_key(name)
    }
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.contents.keys().map(|k| k.as_str())
    }
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
    fn insert(&mut self, name: &str, node: Node) {
        self.contents.insert(name.into(), Rc::new(node));
    }
    fn remove(&mut self, name: &str) -> Option<Rc<Node>> {
        self.contents.remove(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    File { content: String },
    Dir(Directory),
}

impl Node {
    pub fn file(content: &str) -> Self {
        Node::File {
            content: content.into(),
        }
    }
    pub fn dir() -> Self {
        Node::Dir(Directory::new())
    }
    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Dir(_))
    }
    pub fn as_dir(&self) -> Option<&Directory> {
        match self {
            Node::Dir(d) => Some(d),
            Node::File { .. } => None,
        }
    }
    pub fn as_file(&self) -> Option<&str> {
        match self {
            Node::File { content } => Some(content),
            Node::Dir(_) => None,
        }
    }
}

fn deep_copy_node(node: &Node) -> Node {
    match node {
        Node::File { content } => Node::file(content),
        Node::Dir(dir) => Node::Dir(Directory {
            contents: dir
                .contents
                .iter()
                .map(|(name, child)| (name.clone(), Rc::new(deep_copy_node(child))))
                .collect(),
        }),
    }
}

fn check_names(dir: &Directory) -> Result<(), SnapshotError> {
    for (name, child) in &dir.contents {
        if name.is_empty() || name == "." || name == ".." || name.contains('/') {
            return Err(SnapshotError::InvalidName(name.clone()));
        }
        if let Node::Dir(sub) = child.as_ref() {
            check_names(sub)?;
        }
    }
    Ok(())
}

/// An immutable filesystem snapshot.
///
/// Cloning is cheap and shares the whole tree. Edits never touch `self`: they
/// copy the directories on the path from the root to the edited parent and
/// return a new snapshot that shares every other subtree with this one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fs {
    // always a Node::Dir
    root: Rc<Node>,
}

impl Default for Fs {
    fn default() -> Self {
        Self::seed()
    }
}

impl Fs {
    pub fn new(root: Directory) -> Self {
        Fs {
            root: Rc::new(Node::Dir(root)),
        }
    }

    /// The layout every sandbox starts from and resets to.
    pub fn seed() -> Self {
        let sandbox = Directory::new()
            .with("readme.txt", Node::file(README))
            .with("projects", Node::dir());
        let home = Directory::new().with("sandbox", Node::Dir(sandbox));
        let mut root = Directory::new().with("home", Node::Dir(home));
        for d in ["etc", "var", "usr", "bin"] {
            root.insert(d, Node::dir());
        }
        Fs::new(root)
    }

    /// Walk `segments` from the root. The empty path is the root itself.
    pub fn get_node<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Node> {
        let mut node: &Node = &self.root;
        for seg in segments {
            node = node.as_dir()?.get(seg.as_ref())?;
        }
        Some(node)
    }

    pub fn get_dir<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Directory> {
        self.get_node(segments)?.as_dir()
    }

    /// Fully independent copy sharing no nodes with `self`.
    pub fn deep_copy(&self) -> Fs {
        Fs {
            root: Rc::new(deep_copy_node(&self.root)),
        }
    }

    fn edit_dir<S, F>(&self, parent: &[S], edit: F) -> Option<Fs>
    where
        S: AsRef<str>,
        F: FnOnce(&mut Directory),
    {
        let mut root = Rc::clone(&self.root);
        let mut node = Rc::make_mut(&mut root);
        for seg in parent {
            node = match node {
                Node::Dir(dir) => Rc::make_mut(dir.contents.get_mut(seg.as_ref())?),
                Node::File { .. } => return None,
            };
        }
        match node {
            Node::Dir(dir) => edit(dir),
            Node::File { .. } => return None,
        }
        Some(Fs { root })
    }

    /// New snapshot with `node` stored as `name` under `parent`.
    /// `None` if `parent` is not an existing directory.
    pub fn with_node<S: AsRef<str>>(&self, parent: &[S], name: &str, node: Node) -> Option<Fs> {
        self.edit_dir(parent, |dir| dir.insert(name, node))
    }

    /// New snapshot without the child `name` of `parent`.
    /// `None` if `parent` is not an existing directory.
    pub fn without<S: AsRef<str>>(&self, parent: &[S], name: &str) -> Option<Fs> {
        self.edit_dir(parent, |dir| {
            dir.remove(name);
        })
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(&*self.root)?)
    }

    /// Parse a snapshot. Every name must be a single path segment so that
    /// each imported node stays reachable through `path::resolve`.
    pub fn from_json(json: &str) -> Result<Fs, SnapshotError> {
        match serde_json::from_str::<Node>(json)? {
            Node::Dir(root) => {
                check_names(&root)?;
                Ok(Fs::new(root))
            }
            Node::File { .. } => Err(SnapshotError::RootNotDirectory),
        }
    }
}
