use crate::banners::{self, APT_USAGE, CURL_PAGE, CURL_USAGE, GIT, HELP, PYTHON, UNAME};
use crate::config::SandboxConfig;
use crate::error::{ShellError, Subject};
use crate::path;
use crate::vfs::{Fs, Node};
use log::debug;
use std::collections::HashMap;

/// What a single command line produced. The caller applies it to its own state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub output: Option<String>,
    pub error: Option<String>,
    /// New absolute working directory (set by `cd`).
    pub new_path: Option<String>,
    /// Replacement snapshot (set by `mkdir`, `touch`, `rm`).
    pub new_fs: Option<Fs>,
    /// Caller should wipe its displayed lines.
    pub clear: bool,
}

impl CommandResult {
    fn output(text: impl Into<String>) -> Self {
        CommandResult {
            output: Some(text.into()),
            ..Default::default()
        }
    }
    fn path(path: String) -> Self {
        CommandResult {
            new_path: Some(path),
            ..Default::default()
        }
    }
    fn fs(fs: Fs) -> Self {
        CommandResult {
            new_fs: Some(fs),
            ..Default::default()
        }
    }
}

impl From<ShellError> for CommandResult {
    fn from(e: ShellError) -> Self {
        CommandResult {
            error: Some(e.to_string()),
            ..Default::default()
        }
    }
}

type CmdResult = Result<CommandResult, ShellError>;

/// The command interpreter. Holds no filesystem state: every call gets the
/// working directory and snapshot it runs against.
pub struct Shell {
    pub env: HashMap<String, String>,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    pub fn new() -> Self {
        Self::from_config(&SandboxConfig::default())
    }

    pub fn from_config(cfg: &SandboxConfig) -> Self {
        let mut env = HashMap::new();
        env.insert("HOME".into(), cfg.home.clone());
        env.insert("USER".into(), cfg.user.clone());
        env.insert("HOSTNAME".into(), cfg.host.clone());
        Shell { env }
    }

    fn var(&self, key: &str) -> &str {
        self.env.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn prompt(&self, cwd: &str) -> String {
        format!("{}@{}:{}$ ", self.var("USER"), self.var("HOSTNAME"), cwd)
    }

    /// Run one command line against `cwd` and `fs`. Never fails: errors come
    /// back as the result's `error` text and leave `fs` untouched.
    pub fn execute(&self, line: &str, cwd: &str, fs: &Fs) -> CommandResult {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&cmd, args)) = parts.split_first() else {
            return CommandResult::default();
        };
        debug!("exec {} {:?} in {}", cmd, args, cwd);
        self.dispatch(cmd, args, cwd, fs).unwrap_or_else(|e| {
            debug!("{}", e);
            e.into()
        })
    }

    fn dispatch(&self, cmd: &str, args: &[&str], cwd: &str, fs: &Fs) -> CmdResult {
        Ok(match cmd {
            "help" => CommandResult::output(HELP),
            "clear" => CommandResult {
                clear: true,
                ..Default::default()
            },
            "pwd" => CommandResult::output(if cwd.is_empty() { "/" } else { cwd }),
            "whoami" => CommandResult::output(self.var("USER")),
            "uname" => CommandResult::output(UNAME),
            "echo" => CommandResult::output(args.join(" ")),
            "ls" => self.cmd_ls(args, cwd, fs)?,
            "cd" => self.cmd_cd(args, cwd, fs)?,
            "cat" => self.cmd_cat(args, cwd, fs)?,
            "mkdir" => self.cmd_mkdir(args, cwd, fs)?,
            "touch" => self.cmd_touch(args, cwd, fs)?,
            "rm" => self.cmd_rm(args, cwd, fs)?,
            "python" => CommandResult::output(PYTHON),
            "git" => CommandResult::output(GIT),
            "curl" => CommandResult::output(if args.is_empty() { CURL_USAGE } else { CURL_PAGE }),
            "apt" => self.cmd_apt(args)?,
            _ => return Err(ShellError::CommandNotFound(cmd.into())),
        })
    }

    fn cmd_ls(&self, args: &[&str], cwd: &str, fs: &Fs) -> CmdResult {
        let target = args.first().copied().unwrap_or(".");
        match fs.get_node(&path::resolve(cwd, target)) {
            Some(Node::Dir(dir)) => Ok(CommandResult::output(
                dir.names().collect::<Vec<_>>().join("  "),
            )),
            Some(Node::File { .. }) => Ok(CommandResult::output(target)),
            None => Err(ShellError::NotFound(Subject::action("ls", "cannot access", target))),
        }
    }

    fn cmd_cd(&self, args: &[&str], cwd: &str, fs: &Fs) -> CmdResult {
        let target = args.first().copied().unwrap_or_else(|| self.var("HOME"));
        let segs = path::resolve(cwd, target);
        match fs.get_node(&segs) {
            Some(Node::Dir(_)) => Ok(CommandResult::path(path::render(&segs))),
            Some(Node::File { .. }) => Err(ShellError::NotADirectory(Subject::plain("cd", target))),
            None => Err(ShellError::NotFound(Subject::plain("cd", target))),
        }
    }

    fn cmd_cat(&self, args: &[&str], cwd: &str, fs: &Fs) -> CmdResult {
        let target = *args.first().ok_or(ShellError::MissingOperand("cat"))?;
        match fs.get_node(&path::resolve(cwd, target)) {
            Some(Node::File { content }) => Ok(CommandResult::output(content.as_str())),
            Some(Node::Dir(_)) => Err(ShellError::IsADirectory(Subject::plain("cat", target))),
            None => Err(ShellError::NotFound(Subject::plain("cat", target))),
        }
    }

    fn cmd_mkdir(&self, args: &[&str], cwd: &str, fs: &Fs) -> CmdResult {
        let target = *args.first().ok_or(ShellError::MissingOperand("mkdir"))?;
        let subject = || Subject::action("mkdir", "cannot create directory", target);
        let segs = path::resolve(cwd, target);
        let Some((name, parent)) = segs.split_last() else {
            return Err(ShellError::AlreadyExists(subject()));
        };
        let dir = fs
            .get_dir(parent)
            .ok_or_else(|| ShellError::NotFound(subject()))?;
        if dir.contains(name) {
            return Err(ShellError::AlreadyExists(subject()));
        }
        fs.with_node(parent, name, Node::dir())
            .map(CommandResult::fs)
            .ok_or_else(|| ShellError::NotFound(subject()))
    }

    fn cmd_touch(&self, args: &[&str], cwd: &str, fs: &Fs) -> CmdResult {
        let target = *args.first().ok_or(ShellError::MissingOperand("touch"))?;
        let subject = || Subject::action("touch", "cannot touch", target);
        let segs = path::resolve(cwd, target);
        let Some((name, parent)) = segs.split_last() else {
            return Err(ShellError::PermissionDenied(subject()));
        };
        let dir = fs
            .get_dir(parent)
            .ok_or_else(|| ShellError::NotFound(subject()))?;
        if dir.contains(name) {
            // nothing to change
            return Ok(CommandResult::default());
        }
        fs.with_node(parent, name, Node::file(""))
            .map(CommandResult::fs)
            .ok_or_else(|| ShellError::NotFound(subject()))
    }

    fn cmd_rm(&self, args: &[&str], cwd: &str, fs: &Fs) -> CmdResult {
        let target = *args.first().ok_or(ShellError::MissingOperand("rm"))?;
        let subject = || Subject::action("rm", "cannot remove", target);
        let segs = path::resolve(cwd, target);
        let Some((name, parent)) = segs.split_last() else {
            return Err(ShellError::PermissionDenied(subject()));
        };
        match fs.get_dir(parent) {
            Some(dir) if dir.contains(name) => fs
                .without(parent, name)
                .map(CommandResult::fs)
                .ok_or_else(|| ShellError::NotFound(subject())),
            _ => Err(ShellError::NotFound(subject())),
        }
    }

    fn cmd_apt(&self, args: &[&str]) -> CmdResult {
        match args {
            ["install"] => Err(ShellError::MissingPackage("apt")),
            ["install", pkgs @ ..] => Ok(CommandResult::output(banners::apt_install(pkgs))),
            _ => Ok(CommandResult::output(APT_USAGE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::README;

    const HOME: &str = "/home/sandbox";

    fn run(line: &str, cwd: &str, fs: &Fs) -> CommandResult {
        Shell::new().execute(line, cwd, fs)
    }

    fn out(line: &str) -> String {
        run(line, HOME, &Fs::seed()).output.unwrap()
    }

    fn err(line: &str) -> String {
        let res = run(line, HOME, &Fs::seed());
        assert!(res.new_fs.is_none(), "{} must not produce a snapshot", line);
        res.error.unwrap()
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(run("   \t ", HOME, &Fs::seed()), CommandResult::default());
    }

    #[test]
    fn test_fixed_outputs() {
        assert_eq!(out("whoami"), "sandbox");
        assert_eq!(out("uname"), UNAME);
        assert_eq!(out("help"), HELP);
        assert_eq!(out("python"), PYTHON);
        assert_eq!(out("git status"), GIT);
        assert!(run("clear", HOME, &Fs::seed()).clear);
    }

    #[test]
    fn test_echo() {
        assert_eq!(out("echo   hello    world "), "hello world");
        assert_eq!(out("echo"), "");
    }

    #[test]
    fn test_pwd() {
        assert_eq!(out("pwd"), HOME);
        assert_eq!(run("pwd", "", &Fs::seed()).output.unwrap(), "/");
    }

    #[test]
    fn test_ls() {
        assert_eq!(out("ls"), "projects  readme.txt");
        assert_eq!(out("ls /"), "bin  etc  home  usr  var");
        assert_eq!(out("ls projects"), "");
        assert_eq!(out("ls ./readme.txt"), "./readme.txt");
        assert_eq!(
            err("ls nope"),
            "ls: cannot access 'nope': No such file or directory"
        );
    }

    #[test]
    fn test_cd() {
        let fs = Fs::seed();
        assert_eq!(run("cd", "/", &fs).new_path.unwrap(), HOME);
        assert_eq!(run("cd ..", "/home", &fs).new_path.unwrap(), "/");
        assert_eq!(run("cd ../../../..", "/", &fs).new_path.unwrap(), "/");
        assert_eq!(run("cd /etc", HOME, &fs).new_path.unwrap(), "/etc");
        assert_eq!(err("cd readme.txt"), "cd: readme.txt: Not a directory");
        assert_eq!(err("cd nope"), "cd: nope: No such file or directory");
    }

    #[test]
    fn test_cat() {
        assert_eq!(out("cat readme.txt"), README);
        assert_eq!(err("cat"), "cat: missing operand");
        assert_eq!(err("cat projects"), "cat: projects: Is a directory");
        assert_eq!(err("cat x"), "cat: x: No such file or directory");
    }

    #[test]
    fn test_mkdir_then_ls_and_cd() {
        let fs = Fs::seed();
        let res = run("mkdir foo", HOME, &fs);
        assert_eq!(res.output, None);
        assert_eq!(res.error, None);
        let fs1 = res.new_fs.unwrap();
        assert!(run("ls", HOME, &fs1).output.unwrap().contains("foo"));
        assert_eq!(
            run("cd foo", HOME, &fs1).new_path.unwrap(),
            "/home/sandbox/foo"
        );
    }

    #[test]
    fn test_mkdir_errors() {
        assert_eq!(err("mkdir"), "mkdir: missing operand");
        assert_eq!(
            err("mkdir /"),
            "mkdir: cannot create directory '/': File exists"
        );
        assert_eq!(
            err("mkdir projects"),
            "mkdir: cannot create directory 'projects': File exists"
        );
        assert_eq!(
            err("mkdir a/b"),
            "mkdir: cannot create directory 'a/b': No such file or directory"
        );
        assert_eq!(
            err("mkdir readme.txt/b"),
            "mkdir: cannot create directory 'readme.txt/b': No such file or directory"
        );
    }

    #[test]
    fn test_touch_leaves_prior_snapshot() {
        let fs0 = Fs::seed();
        let res = run("touch a.txt", HOME, &fs0);
        assert!(fs0.get_node(&["home", "sandbox", "a.txt"]).is_none());
        let fs1 = res.new_fs.unwrap();
        assert_eq!(
            fs1.get_node(&["home", "sandbox", "a.txt"]).unwrap().as_file(),
            Some("")
        );
    }

    #[test]
    fn test_touch_existing() {
        let fs0 = Fs::seed();
        let fs1 = run("touch notes.txt", HOME, &fs0).new_fs.unwrap();
        assert_eq!(run("touch notes.txt", HOME, &fs1), CommandResult::default());
        assert_eq!(run("cat notes.txt", HOME, &fs1).output.unwrap(), "");
        assert_eq!(run("touch readme.txt", HOME, &fs1), CommandResult::default());
        assert_eq!(run("cat readme.txt", HOME, &fs1).output.unwrap(), README);
    }

    #[test]
    fn test_touch_errors() {
        assert_eq!(err("touch"), "touch: missing operand");
        assert_eq!(err("touch /"), "touch: cannot touch '/': Permission denied");
        assert_eq!(
            err("touch nope/a"),
            "touch: cannot touch 'nope/a': No such file or directory"
        );
        assert_eq!(
            err("touch readme.txt/x"),
            "touch: cannot touch 'readme.txt/x': No such file or directory"
        );
    }

    #[test]
    fn test_rm() {
        let fs0 = Fs::seed();
        let fs1 = run("rm readme.txt", HOME, &fs0).new_fs.unwrap();
        assert_eq!(run("ls", HOME, &fs1).output.unwrap(), "projects");
        assert_eq!(run("ls", HOME, &fs0).output.unwrap(), "projects  readme.txt");
    }

    #[test]
    fn test_rm_errors() {
        assert_eq!(err("rm"), "rm: missing operand");
        assert_eq!(err("rm /"), "rm: cannot remove '/': Permission denied");
        assert_eq!(
            err("rm ghost"),
            "rm: cannot remove 'ghost': No such file or directory"
        );
        assert_eq!(
            err("rm ghost/x"),
            "rm: cannot remove 'ghost/x': No such file or directory"
        );
    }

    #[test]
    fn test_canned_network_tools() {
        assert_eq!(out("curl https://example.com"), CURL_PAGE);
        assert_eq!(out("curl"), CURL_USAGE);
        assert_eq!(out("apt"), APT_USAGE);
        assert_eq!(out("apt update"), APT_USAGE);
        assert_eq!(err("apt install"), "apt: missing package name");
        assert!(out("apt install vim git").contains("Inst git (1.0.0 sandbox-repo)"));
    }

    #[test]
    fn test_unknown_command() {
        let res = run("frobnicate --now", HOME, &Fs::seed());
        assert_eq!(
            res,
            CommandResult {
                error: Some("frobnicate: command not found".into()),
                ..Default::default()
            }
        );
        // names are case-sensitive
        assert_eq!(err("LS"), "LS: command not found");
    }

    #[test]
    fn test_walkthrough() {
        let sh = Shell::new();
        let mut cwd = HOME.to_string();
        let mut fs = Fs::seed();
        let step = |line: &str, cwd: &mut String, fs: &mut Fs| {
            let res = sh.execute(line, cwd, fs);
            assert_eq!(res.error, None, "{}", line);
            if let Some(p) = res.new_path.clone() {
                *cwd = p;
            }
            if let Some(f) = res.new_fs.clone() {
                *fs = f;
            }
            res.output
        };
        assert_eq!(
            step("ls", &mut cwd, &mut fs).unwrap(),
            "projects  readme.txt"
        );
        assert_eq!(step("cat readme.txt", &mut cwd, &mut fs).unwrap(), README);
        assert_eq!(step("mkdir work", &mut cwd, &mut fs), None);
        step("cd work", &mut cwd, &mut fs);
        assert_eq!(cwd, "/home/sandbox/work");
        assert_eq!(
            step("pwd", &mut cwd, &mut fs).unwrap(),
            "/home/sandbox/work"
        );
        step("cd ..", &mut cwd, &mut fs);
        assert_eq!(cwd, HOME);
        assert_eq!(step("rm work", &mut cwd, &mut fs), None);
        assert_eq!(
            step("ls", &mut cwd, &mut fs).unwrap(),
            "projects  readme.txt"
        );
        assert_eq!(fs, Fs::seed());
    }

    #[test]
    fn test_prompt_and_config() {
        let cfg = SandboxConfig {
            user: "guest".into(),
            ..Default::default()
        };
        let sh = Shell::from_config(&cfg);
        assert_eq!(sh.prompt("/tmp"), "guest@android:/tmp$ ");
        assert_eq!(sh.execute("whoami", "/", &Fs::seed()).output.unwrap(), "guest");
    }
}
