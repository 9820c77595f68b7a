use thiserror::Error;

use crate::config::AboveRootPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("import {literal:?} ascends {back_count} levels from depth {depth}, above the module root")]
    AboveModuleRoot {
        literal: String,
        back_count: usize,
        depth: usize,
    },
}

/// Lexically clean a slash-separated path the way Go's `path.Clean` does.
///
/// Backslashes are treated as separators. The filesystem is never consulted.
pub fn clean_path(raw: &str) -> String {
    let normalized = raw.replace('\\', "/");
    let rooted = normalized.starts_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for seg in normalized.split('/') {
        match seg {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                // `/..` is `/`
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    match (rooted, body.is_empty()) {
        (true, _) => format!("/{body}"),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}

fn is_module_qualified(path: &str, module: &str) -> bool {
    path == module
        || path
            .strip_prefix(module)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Rewrite one import literal into a module-qualified path.
///
/// `dirs` is the directory chain from the module root to the importing file;
/// only its first `depth` entries are used.
pub fn resolve(
    literal: &str,
    depth: usize,
    dirs: &[String],
    module: &str,
    above_root: AboveRootPolicy,
) -> Result<String, ResolveError> {
    debug_assert!(depth <= dirs.len(), "depth past directory stack");
    if literal.is_empty() {
        return Ok(String::new());
    }
    let path = clean_path(literal);
    let tokens: Vec<&str> = path.split('/').collect();
    let back_count = tokens.iter().take_while(|t| **t == "..").count();

    if back_count == 0 {
        if is_module_qualified(&path, module) {
            return Ok(path);
        }
        if !literal.replace('\\', "/").starts_with("./") {
            // bare literal: external package
            return Ok(path);
        }
        let mut out = String::from(module);
        for dir in dirs.iter().take(depth) {
            out.push('/');
            out.push_str(dir);
        }
        if path != "." {
            out.push('/');
            out.push_str(&path);
        }
        return Ok(out);
    }

    let forward_level = match depth.checked_sub(back_count) {
        Some(level) => level,
        None => match above_root {
            AboveRootPolicy::Clamp => 0,
            AboveRootPolicy::Error => {
                return Err(ResolveError::AboveModuleRoot {
                    literal: literal.to_string(),
                    back_count,
                    depth,
                });
            }
        },
    };

    let mut out = String::from(module);
    for dir in dirs.iter().take(forward_level) {
        out.push('/');
        out.push_str(dir);
    }
    for seg in &tokens[back_count..] {
        out.push('/');
        out.push_str(seg);
    }
    Ok(out)
}
