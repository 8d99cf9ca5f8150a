//! Fixed text printed by the sandbox. Kept byte-for-byte stable: hosts and
//! snapshot tests compare against it.

pub const MOTD: &str = "Sandbox OS v1.0.0\nTemporary isolated environment initialized.\nType \"help\" for available commands.";

pub const HELP: &str = "Available commands:\n  help, clear, ls, cd, pwd, echo, mkdir, touch, cat, rm\n  whoami, uname, python, git, curl, apt";

pub const UNAME: &str = "Linux sandbox 5.15.0-virtual #1 SMP x86_64 GNU/Linux";

pub const PYTHON: &str = "Python 3.10.12 (main, Nov 20 2023, 15:14:05) [GCC 11.4.0] on linux\nType \"help\", \"copyright\", \"credits\" or \"license\" for more information.\n>>> exit()";

pub const GIT: &str = "usage: git [--version] [--help] [-C <path>] [-c <name>=<value>]\n           [--exec-path[=<path>]] [--html-path] [--man-path] [--info-path]\n           [-p | --paginate | -P | --no-pager] [--no-replace-objects] [--bare]\n           [--git-dir=<path>] [--work-tree=<path>] [--namespace=<name>]\n           [--super-prefix=<path>] [--config-env=<name>=<envvar>]\n           <command> [<args>]";

pub const CURL_PAGE: &str = "<!doctype html>\n<html>\n<head>\n    <title>Example Domain</title>\n</head>\n<body>\n    <div>\n        <h1>Example Domain</h1>\n        <p>This domain is for use in illustrative examples in documents.</p>\n    </div>\n</body>\n</html>";

pub const CURL_USAGE: &str = "curl: try 'curl --help' or 'curl --manual' for more information";

pub const APT_USAGE: &str = "apt 2.4.10 (amd64)\nUsage: apt [options] command";

const APT_REPO: &str = "1.0.0 sandbox-repo";

/// Install log for `apt install <pkgs>`. `pkgs` must be non-empty.
pub fn apt_install(pkgs: &[&str]) -> String {
    let mut out = String::from(
        "Reading package lists... Done\nBuilding dependency tree... Done\nReading state information... Done\n",
    );
    out.push_str("The following NEW packages will be installed:\n");
    out.push_str(&format!("  {}\n", pkgs.join(" ")));
    out.push_str(&format!(
        "0 upgraded, {} newly installed, 0 to remove and 0 not upgraded.",
        pkgs.len()
    ));
    for pkg in pkgs {
        out.push_str(&format!("\nInst {} ({})", pkg, APT_REPO));
        out.push_str(&format!("\nConf {} ({})", pkg, APT_REPO));
    }
    out
}
