use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Input,
    Output,
    Error,
    System,
}

/// One rendered line of a terminal tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminalLine {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: LineKind,
    pub text: String,
}

/// Per-tab shell state. The filesystem is not part of it: all tabs of a
/// sandbox run against the same snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub id: u32,
    pub name: String,
    pub lines: Vec<TerminalLine>,
    pub history: Vec<String>,
    #[serde(rename = "currentPath")]
    pub cwd: String,
    #[serde(skip)]
    pub cursor: HistoryCursor,
}

impl Session {
    pub fn new(id: u32, name: &str, cwd: &str) -> Self {
        Session {
            id,
            name: name.into(),
            lines: Vec::new(),
            history: Vec::new(),
            cwd: cwd.into(),
            cursor: HistoryCursor::default(),
        }
    }

    pub fn push_line(&mut self, id: u64, kind: LineKind, text: &str) {
        self.lines.push(TerminalLine {
            id,
            kind,
            text: text.into(),
        });
    }

    /// Recall an older history entry (Up arrow).
    pub fn history_up(&mut self) -> Option<&str> {
        self.cursor.up(&self.history)
    }

    /// Recall a newer history entry (Down arrow).
    pub fn history_down(&mut self) -> Option<&str> {
        self.cursor.down(&self.history)
    }
}

/// Position while walking back through a session's history.
/// `None` means the user is editing a fresh line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryCursor {
    back: Option<usize>,
}

impl HistoryCursor {
    /// Step one entry further into the past; sticks at the oldest entry.
    /// Returns `None` when there is no history at all.
    pub fn up<'a>(&mut self, history: &'a [String]) -> Option<&'a str> {
        if history.is_empty() {
            return None;
        }
        let next = match self.back {
            Some(i) if i + 1 < history.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.back = Some(next);
        history.get(history.len() - 1 - next).map(String::as_str)
    }

    /// Step one entry toward the present. Stepping past the newest entry
    /// yields the empty line; with no recall in progress nothing changes.
    pub fn down<'a>(&mut self, history: &'a [String]) -> Option<&'a str> {
        match self.back {
            Some(0) => {
                self.back = None;
                Some("")
            }
            Some(i) => {
                let next = i - 1;
                self.back = Some(next);
                history
                    .len()
                    .checked_sub(1 + next)
                    .and_then(|idx| history.get(idx))
                    .map(String::as_str)
            }
            None => None,
        }
    }

    pub fn reset(&mut self) {
        self.back = None;
    }
}
