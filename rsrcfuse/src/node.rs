use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    name: String,
    data: Vec<u8>,
}

impl File {
    #[inline(always)]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    name: String,
    children: HashMap<String, Node>,
}

impl Folder {
    pub fn new<S: Into<String>>(name: S) -> Folder {
        Folder {
            name: name.into(),
            children: HashMap::new(),
        }
    }

    #[inline(always)]
    pub fn children(&self) -> &HashMap<String, Node> {
        &self.children
    }

    #[inline(always)]
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    /// Adds a child, returning the name it was stored under. A child whose
    /// name is taken is renamed to `"<name> (2)"`, `"<name> (3)"` and so on.
    pub fn insert<N: Into<Node>>(&mut self, node: N) -> String {
        let mut node = node.into();

        if self.children.contains_key(node.name()) {
            let original = node.name().to_string();
            let renamed = (2u32..)
                .map(|n| format!("{} ({})", original, n))
                .find(|candidate| !self.children.contains_key(candidate))
                .unwrap_or_default();

            tracing::warn!(
                folder = %self.name,
                name = %original,
                renamed = %renamed,
                "name collision, renaming node"
            );
            node.set_name(renamed);
        }

        let name = node.name().to_string();
        self.children.insert(name.clone(), node);
        name
    }

    /// Number of direct children that are folders.
    pub fn subfolder_count(&self) -> usize {
        self.children
            .values()
            .filter(|child| child.kind() == NodeKind::Folder)
            .count()
    }
}

/// A node of the projected tree. Names are already filesystem safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    File(File),
    Folder(Folder),
}

impl Node {
    pub fn file<S: Into<String>>(name: S, data: Vec<u8>) -> Node {
        Node::File(File {
            name: name.into(),
            data,
        })
    }

    pub fn folder<S: Into<String>>(name: S) -> Node {
        Node::Folder(Folder::new(name))
    }

    pub fn name(&self) -> &str {
        match self {
            Node::File(file) => &file.name,
            Node::Folder(folder) => &folder.name,
        }
    }

    fn set_name(&mut self, name: String) {
        match self {
            Node::File(file) => file.name = name,
            Node::Folder(folder) => folder.name = name,
        }
    }

    #[inline(always)]
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::File(_) => NodeKind::File,
            Node::Folder(_) => NodeKind::Folder,
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Node::Folder(folder) => Some(folder),
            Node::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Node::File(file) => Some(file),
            Node::Folder(_) => None,
        }
    }

    /// Finds the node at `path` below this one. Empty components are
    /// ignored, so `"/"`, `""` and `"//"` all name this node.
    pub fn resolve(&self, path: &str) -> Option<&Node> {
        path.split('/')
            .filter(|component| !component.is_empty())
            .try_fold(self, |node, component| node.as_folder()?.get(component))
    }

    pub fn link_count(&self) -> u32 {
        match self {
            Node::File(_) => 1,
            Node::Folder(folder) => 2 + folder.subfolder_count() as u32,
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            Node::File(file) => file.data.len() as u64,
            Node::Folder(_) => 0,
        }
    }
}

impl From<File> for Node {
    fn from(file: File) -> Self {
        Node::File(file)
    }
}

impl From<Folder> for Node {
    fn from(folder: Folder) -> Self {
        Node::Folder(folder)
    }
}
