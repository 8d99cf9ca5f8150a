use crate::{
    config::SandboxConfig,
    error::SnapshotError,
    logging,
    session::{LineKind, Session},
    shell::Shell,
    vfs::Fs,
};
use log::{info, warn, LevelFilter};
use wasm_bindgen::prelude::*;

/// All tabs of one sandbox plus the filesystem snapshot they share.
pub struct Sandbox {
    shell: Shell,
    config: SandboxConfig,
    fs: Fs,
    sessions: Vec<Session>,
    active: u32,
    next_session: u32,
    next_line: u64,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new(SandboxConfig::default())
    }
}

impl Sandbox {
    pub fn new(config: SandboxConfig) -> Self {
        let mut sandbox = Sandbox {
            shell: Shell::from_config(&config),
            config,
            fs: Fs::seed(),
            sessions: Vec::new(),
            active: 0,
            next_session: 1,
            next_line: 1,
        };
        sandbox.active = sandbox.spawn_session("bash");
        sandbox
    }

    fn spawn_session(&mut self, name: &str) -> u32 {
        let id = self.next_session;
        self.next_session += 1;
        self.sessions.push(Session::new(id, name, &self.config.home));
        let idx = self.sessions.len() - 1;
        let motd = self.config.motd.clone();
        self.push_line(idx, LineKind::System, &motd);
        info!("session {} ({}) started", id, name);
        id
    }

    fn push_line(&mut self, idx: usize, kind: LineKind, text: &str) {
        let id = self.next_line;
        self.next_line += 1;
        self.sessions[idx].push_line(id, kind, text);
    }

    fn active_index(&self) -> usize {
        self.sessions
            .iter()
            .position(|s| s.id == self.active)
            .unwrap_or(0)
    }

    pub fn fs(&self) -> &Fs {
        &self.fs
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn active(&self) -> &Session {
        &self.sessions[self.active_index()]
    }

    pub fn active_mut(&mut self) -> &mut Session {
        let idx = self.active_index();
        &mut self.sessions[idx]
    }

    pub fn prompt(&self) -> String {
        self.shell.prompt(&self.active().cwd)
    }

    /// Feed one submitted line to the active session.
    pub fn submit(&mut self, line: &str) {
        let idx = self.active_index();
        self.sessions[idx].cursor.reset();
        if line.trim().is_empty() {
            self.push_line(idx, LineKind::Input, "");
            return;
        }
        self.push_line(idx, LineKind::Input, line);
        let res = self.shell.execute(line, &self.sessions[idx].cwd, &self.fs);
        if res.clear {
            self.sessions[idx].lines.clear();
        } else {
            if let Some(out) = res.output.as_deref().filter(|s| !s.is_empty()) {
                self.push_line(idx, LineKind::Output, out);
            }
            if let Some(err) = res.error.as_deref().filter(|s| !s.is_empty()) {
                self.push_line(idx, LineKind::Error, err);
            }
        }
        let session = &mut self.sessions[idx];
        session.history.push(line.into());
        if let Some(path) = res.new_path {
            session.cwd = path;
        }
        if let Some(fs) = res.new_fs {
            self.fs = fs;
        }
    }

    /// Open a new tab and make it active.
    pub fn new_session(&mut self) -> u32 {
        let name = format!("bash-{}", self.sessions.len() + 1);
        let id = self.spawn_session(&name);
        self.active = id;
        id
    }

    /// Close a tab. The last remaining tab cannot be closed.
    pub fn close_session(&mut self, id: u32) -> bool {
        if self.sessions.len() <= 1 {
            return false;
        }
        let Some(idx) = self.sessions.iter().position(|s| s.id == id) else {
            return false;
        };
        self.sessions.remove(idx);
        if self.active == id {
            if let Some(last) = self.sessions.last() {
                self.active = last.id;
            }
        }
        info!("session {} closed", id);
        true
    }

    pub fn switch_session(&mut self, id: u32) -> bool {
        if self.sessions.iter().any(|s| s.id == id) {
            self.active = id;
            true
        } else {
            false
        }
    }

    /// Back to the seed filesystem with a single fresh tab.
    pub fn reset(&mut self) {
        self.fs = Fs::seed();
        self.sessions.clear();
        self.active = self.spawn_session("bash");
        info!("sandbox reset");
    }

    pub fn load_fs_json(&mut self, json: &str) -> Result<(), SnapshotError> {
        match Fs::from_json(json) {
            Ok(fs) => {
                self.fs = fs;
                Ok(())
            }
            Err(e) => {
                warn!("rejected snapshot: {}", e);
                Err(e)
            }
        }
    }
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// JS-facing handle. The page calls `exec` once per submitted line and
/// re-renders from `lines_json`.
#[wasm_bindgen]
pub struct System {
    sandbox: Sandbox,
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl System {
    #[wasm_bindgen(constructor)]
    pub fn new() -> System {
        logging::init(LevelFilter::Info);
        System {
            sandbox: Sandbox::default(),
        }
    }
    #[wasm_bindgen]
    pub fn with_config(json: &str) -> Result<System, JsValue> {
        logging::init(LevelFilter::Info);
        let config = SandboxConfig::from_json(json).map_err(js_err)?;
        Ok(System {
            sandbox: Sandbox::new(config),
        })
    }
    #[wasm_bindgen]
    pub fn exec(&mut self, line: &str) {
        self.sandbox.submit(line);
    }
    #[wasm_bindgen]
    pub fn prompt(&self) -> String {
        self.sandbox.prompt()
    }
    #[wasm_bindgen]
    pub fn cwd(&self) -> String {
        self.sandbox.active().cwd.clone()
    }
    #[wasm_bindgen]
    pub fn lines_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.sandbox.active().lines).map_err(js_err)
    }
    #[wasm_bindgen]
    pub fn sessions_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.sandbox.sessions()).map_err(js_err)
    }
    #[wasm_bindgen]
    pub fn session_ids(&self) -> js_sys::Array {
        self.sandbox
            .sessions()
            .iter()
            .map(|s| JsValue::from(s.id))
            .collect()
    }
    #[wasm_bindgen]
    pub fn fs_json(&self) -> Result<String, JsValue> {
        self.sandbox.fs().to_json().map_err(js_err)
    }
    #[wasm_bindgen]
    pub fn load_fs_json(&mut self, json: &str) -> Result<(), JsValue> {
        self.sandbox.load_fs_json(json).map_err(js_err)
    }
    #[wasm_bindgen]
    pub fn new_session(&mut self) -> u32 {
        self.sandbox.new_session()
    }
    #[wasm_bindgen]
    pub fn close_session(&mut self, id: u32) -> bool {
        self.sandbox.close_session(id)
    }
    #[wasm_bindgen]
    pub fn switch_session(&mut self, id: u32) -> bool {
        self.sandbox.switch_session(id)
    }
    #[wasm_bindgen]
    pub fn active_session(&self) -> u32 {
        self.sandbox.active().id
    }
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.sandbox.reset();
    }
    #[wasm_bindgen]
    pub fn history_up(&mut self) -> Option<String> {
        self.sandbox.active_mut().history_up().map(String::from)
    }
    #[wasm_bindgen]
    pub fn history_down(&mut self) -> Option<String> {
        self.sandbox.active_mut().history_down().map(String::from)
    }
}
