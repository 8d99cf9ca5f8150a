/// Resolve `target` against `cwd` into canonical path segments.
///
/// Absolute targets ignore `cwd`. `.` and empty segments are dropped and `..`
/// pops one segment; popping past the root stays at the root.
pub fn resolve(cwd: &str, target: &str) -> Vec<String> {
    if target.is_empty() {
        return cwd
            .split('/')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }
    let base = if target.starts_with('/') { "" } else { cwd };
    let mut parts: Vec<String> = Vec::new();
    for part in base.split('/').chain(target.split('/')) {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            _ => parts.push(part.to_string()),
        }
    }
    parts
}

/// Render segments as an absolute path. The root is always `/`.
pub fn render(segments: &[String]) -> String {
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}
