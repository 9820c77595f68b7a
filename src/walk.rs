// Purpose: Depth-first traversal of the module tree, rewriting every eligible source file.
// Inputs/Outputs: Takes the run config and module name; returns a WalkReport or the first fatal error.
// Invariants: The directory stack is pushed before descending and popped on return, so siblings never see each other.
// Gotchas: Symlinks are not followed; depth-limit hits skip the subtree but keep walking siblings.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, trace, warn};

use crate::config::{FixConfig, ScanErrorPolicy};
use crate::error::FixError;
use crate::pkg::modfile::ModuleName;
use crate::rewrite::{ImportContext, rewrite_file};

#[derive(Debug, Clone)]
pub struct Failure {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct WalkReport {
    pub scanned: usize,
    pub unchanged: usize,
    /// Files rewritten (or, in a dry run, that would be), relative to the root.
    pub changed: Vec<PathBuf>,
    pub failures: Vec<Failure>,
}

impl WalkReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct TreeWalker<'a> {
    cfg: &'a FixConfig,
    module: &'a ModuleName,
    report: WalkReport,
}

impl<'a> TreeWalker<'a> {
    pub fn new(cfg: &'a FixConfig, module: &'a ModuleName) -> Self {
        Self {
            cfg,
            module,
            report: WalkReport::default(),
        }
    }

    pub fn run(mut self) -> Result<WalkReport, FixError> {
        let root = self.cfg.root.clone();
        let mut stack = Vec::new();
        self.visit_dir(&root, &mut stack)?;
        Ok(self.report)
    }

    fn visit_dir(&mut self, dir: &Path, stack: &mut Vec<String>) -> Result<(), FixError> {
        if stack.len() >= self.cfg.max_depth {
            let err = FixError::DepthLimitExceeded {
                path: dir.to_path_buf(),
                limit: self.cfg.max_depth,
            };
            warn!("{err}");
            self.record_failure(dir, &err);
            return Ok(());
        }
        trace!(dir = %dir.display(), depth = stack.len(), "enter");

        let traversal_err = |source| FixError::Traversal {
            path: dir.to_path_buf(),
            source,
        };
        let mut entries = fs::read_dir(dir)
            .map_err(traversal_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(traversal_err)?;
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let path = entry.path();
            let file_type = entry.file_type().map_err(|source| FixError::Traversal {
                path: path.clone(),
                source,
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();

            if file_type.is_dir() {
                stack.push(name);
                let res = self.visit_dir(&path, stack);
                stack.pop();
                res?;
            } else if file_type.is_file() && name.ends_with(&self.cfg.suffix) {
                self.visit_file(&path, stack)?;
            } else if file_type.is_symlink() {
                debug!(path = %path.display(), "skipping symlink");
            }
        }
        Ok(())
    }

    fn visit_file(&mut self, path: &Path, dirs: &[String]) -> Result<(), FixError> {
        self.report.scanned += 1;
        let ctx = ImportContext {
            module: self.module.as_str(),
            dirs,
            above_root: self.cfg.above_root,
        };
        match rewrite_file(path, ctx, self.cfg.dry_run) {
            Ok(outcome) if outcome.changed() => {
                info!(path = %path.display(), dry_run = self.cfg.dry_run, "rewrote imports");
                let rel = path.strip_prefix(&self.cfg.root).unwrap_or(path);
                self.report.changed.push(rel.to_path_buf());
            }
            Ok(_) => {
                debug!(path = %path.display(), "unchanged");
                self.report.unchanged += 1;
            }
            Err(err) if err.is_file_local() => {
                if self.cfg.on_scan_error == ScanErrorPolicy::Abort {
                    return Err(err);
                }
                error!("{err}");
                self.record_failure(path, &err);
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    fn record_failure(&mut self, path: &Path, err: &FixError) {
        self.report.failures.push(Failure {
            path: path.to_path_buf(),
            message: err.to_string(),
        });
    }
}

/// Rewrite every eligible file under `cfg.root`.
pub fn fix_tree(cfg: &FixConfig, module: &ModuleName) -> Result<WalkReport, FixError> {
    TreeWalker::new(cfg, module).run()
}

#[cfg(test)]
mod tests {
    use super::fix_tree;
    use crate::config::{FixConfig, ScanErrorPolicy};
    use crate::error::FixError;
    use crate::pkg::modfile::ModuleName;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time drift")
            .as_nanos();
        std::env::temp_dir().join(format!("gofix-{}-{}-{}", prefix, std::process::id(), nonce))
    }

    fn write(root: &Path, rel: &str, text: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().expect("parent")).expect("mkdir");
        fs::write(p, text).expect("write");
    }

    fn read(root: &Path, rel: &str) -> String {
        fs::read_to_string(root.join(rel)).expect("read")
    }

    #[test]
    fn rewrites_tree_with_per_directory_context() {
        let root = temp_dir("walk-tree");
        write(&root, "go.mod", "module mymod\n");
        write(&root, "main.go", "package main\n\nimport \"./a\"\n");
        write(&root, "a/a.go", "package a\n\nimport (\n\t\"fmt\"\n\t\"./b\"\n)\n");
        write(&root, "a/b/b.go", "package b\n\nimport \"../../c\"\n");
        write(&root, "c/c.go", "package c\n\nimport \"./d\"\n");
        write(&root, "c/notes.txt", "import \"./d\"\n");

        let cfg = FixConfig::new(&root);
        let module = ModuleName::new("mymod");
        let report = fix_tree(&cfg, &module).expect("walk");

        assert_eq!(read(&root, "main.go"), "package main\n\nimport \"mymod/a\"\n");
        assert_eq!(
            read(&root, "a/a.go"),
            "package a\n\nimport (\n\t\"fmt\"\n\t\"mymod/a/b\"\n)\n"
        );
        assert_eq!(read(&root, "a/b/b.go"), "package b\n\nimport \"mymod/c\"\n");
        // sibling `c` must not inherit `a/b` from the earlier descent
        assert_eq!(read(&root, "c/c.go"), "package c\n\nimport \"mymod/c/d\"\n");
        assert_eq!(read(&root, "c/notes.txt"), "import \"./d\"\n");
        assert_eq!(report.scanned, 4);
        assert_eq!(report.changed.len(), 4);
        assert!(report.is_clean());

        let second = fix_tree(&cfg, &module).expect("second walk");
        assert!(second.changed.is_empty(), "second run must be a no-op");
        assert_eq!(second.unchanged, 4);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn scan_error_aborts_by_default() {
        let root = temp_dir("walk-abort");
        write(&root, "a.go", "import \"unclosed\n");
        write(&root, "b.go", "import \"./x\"\n");

        let cfg = FixConfig::new(&root);
        let err = fix_tree(&cfg, &ModuleName::new("mymod")).unwrap_err();
        assert!(matches!(err, FixError::Scan { line: 1, .. }));
        assert_eq!(read(&root, "a.go"), "import \"unclosed\n");
        assert_eq!(read(&root, "b.go"), "import \"./x\"\n", "run stops before b.go");

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn keep_going_records_failure_and_continues() {
        let root = temp_dir("walk-continue");
        write(&root, "a.go", "import \"unclosed\n");
        write(&root, "b.go", "import \"./x\"\n");

        let mut cfg = FixConfig::new(&root);
        cfg.on_scan_error = ScanErrorPolicy::Continue;
        let report = fix_tree(&cfg, &ModuleName::new("mymod")).expect("walk");
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.ends_with("a.go"));
        assert_eq!(read(&root, "b.go"), "import \"mymod/x\"\n");

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn depth_limit_skips_subtree_but_not_siblings() {
        let root = temp_dir("walk-depth");
        write(&root, "a/b/deep.go", "import \"./x\"\n");
        write(&root, "a/ok.go", "import \"./x\"\n");
        write(&root, "z/ok.go", "import \"./x\"\n");

        let mut cfg = FixConfig::new(&root);
        cfg.max_depth = 2;
        let report = fix_tree(&cfg, &ModuleName::new("mymod")).expect("walk");

        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.ends_with("a/b"));
        assert_eq!(read(&root, "a/b/deep.go"), "import \"./x\"\n");
        assert_eq!(read(&root, "a/ok.go"), "import \"mymod/a/x\"\n");
        assert_eq!(read(&root, "z/ok.go"), "import \"mymod/z/x\"\n");

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let root = temp_dir("walk-dry");
        write(&root, "a/a.go", "import \"./x\"\n");

        let mut cfg = FixConfig::new(&root);
        cfg.dry_run = true;
        let report = fix_tree(&cfg, &ModuleName::new("mymod")).expect("walk");
        assert_eq!(report.changed, vec![PathBuf::from("a").join("a.go")]);
        assert_eq!(read(&root, "a/a.go"), "import \"./x\"\n");

        let _ = fs::remove_dir_all(root);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed() {
        use std::os::unix::fs::symlink;

        let root = temp_dir("walk-symlink");
        write(&root, "real/r.go", "import \"./x\"\n");
        let outside = temp_dir("walk-symlink-target");
        write(&outside, "t.go", "import \"./x\"\n");
        symlink(outside.join("t.go"), root.join("linked.go")).expect("file symlink");
        symlink(&outside, root.join("linkdir")).expect("dir symlink");

        let report = fix_tree(&FixConfig::new(&root), &ModuleName::new("mymod")).expect("walk");
        assert_eq!(report.scanned, 1);
        assert_eq!(report.changed, vec![PathBuf::from("real").join("r.go")]);
        assert_eq!(read(&outside, "t.go"), "import \"./x\"\n");
        assert_eq!(read(&root, "real/r.go"), "import \"mymod/real/x\"\n");

        let _ = fs::remove_dir_all(root);
        let _ = fs::remove_dir_all(outside);
    }

    #[test]
    fn missing_root_is_a_traversal_error() {
        let root = temp_dir("walk-missing");
        let err = fix_tree(&FixConfig::new(&root), &ModuleName::new("m")).unwrap_err();
        assert!(matches!(err, FixError::Traversal { .. }));
    }
}
