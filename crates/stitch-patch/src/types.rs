use std::collections::BTreeMap;

/// The three kinds of per-file intention a patch can express.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionType {
    Add,
    Delete,
    Update,
}

/// One contiguous edit inside an update action.
///
/// `orig_index` is the position in the original file's line array where
/// removal begins; `del_lines` are the lines expected there and
/// `ins_lines` replace them. Within one action chunks are ordered and
/// non-overlapping: the next chunk starts at or after
/// `orig_index + del_lines.len()` of the previous one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chunk {
    pub orig_index: usize,
    pub del_lines: Vec<String>,
    pub ins_lines: Vec<String>,
}

/// Per-path intention parsed out of the patch text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatchAction {
    AddFile {
        new_file: String,
    },
    DeleteFile,
    UpdateFile {
        chunks: Vec<Chunk>,
        move_path: Option<String>,
    },
}

impl PatchAction {
    pub fn action_type(&self) -> ActionType {
        match self {
            PatchAction::AddFile { .. } => ActionType::Add,
            PatchAction::DeleteFile => ActionType::Delete,
            PatchAction::UpdateFile { .. } => ActionType::Update,
        }
    }
}

/// Parsed patch: path to intention, each path in exactly one directive.
///
/// Built purely from text plus a snapshot of current file contents;
/// construction never touches the filesystem.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Patch {
    pub actions: BTreeMap<String, PatchAction>,
}

/// Resolved result for one path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileChange {
    Add {
        new_content: String,
    },
    Delete {
        old_content: String,
    },
    Update {
        old_content: String,
        new_content: String,
        move_path: Option<String>,
    },
}

impl FileChange {
    pub fn action_type(&self) -> ActionType {
        match self {
            FileChange::Add { .. } => ActionType::Add,
            FileChange::Delete { .. } => ActionType::Delete,
            FileChange::Update { .. } => ActionType::Update,
        }
    }
}

/// Path to resolved change; the only structure carrying concrete final
/// content. Changes apply in map order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Commit {
    pub changes: BTreeMap<String, FileChange>,
}
