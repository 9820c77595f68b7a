// Purpose: Line-at-a-time region scanner that finds import literals and rewrites them.
// Inputs/Outputs: Consumes source lines plus carried FileScanState; appends rewritten text to a caller buffer.
// Invariants: Exactly one region is active per character; block comments and raw strings suppress everything else.
// Gotchas: Import literals never span lines; a line ending inside one is an error, never a join.

use thiserror::Error;

use super::keyword::KeywordMatcher;
use super::resolve::{ResolveError, resolve};
use crate::config::AboveRootPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("unterminated import literal starting at column {column}")]
    UnterminatedLiteral { column: usize },

    #[error("invalid UTF-8 at column {column}")]
    InvalidUtf8 { column: usize },

    #[error("column {column}: {source}")]
    AboveModuleRoot {
        column: usize,
        #[source]
        source: ResolveError,
    },
}

/// Scanner state that survives line boundaries within one file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FileScanState {
    pub in_block_comment: bool,
    pub in_raw_string: bool,
    pub in_import_block: bool,
}

/// Where the importing file sits inside the module.
#[derive(Clone, Copy, Debug)]
pub struct ImportContext<'a> {
    pub module: &'a str,
    pub dirs: &'a [String],
    pub above_root: AboveRootPolicy,
}

impl ImportContext<'_> {
    pub fn depth(&self) -> usize {
        self.dirs.len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LineRegion {
    Code,
    LineComment,
    PlainString { escaped: bool },
    RuneLiteral { escaped: bool },
    ImportLiteral { column: usize },
}

struct LineScanState {
    region: LineRegion,
    keyword: KeywordMatcher,
    expecting_target: bool,
    literal: String,
    prev: char,
}

impl LineScanState {
    fn new() -> Self {
        Self {
            region: LineRegion::Code,
            keyword: KeywordMatcher::default(),
            expecting_target: false,
            literal: String::new(),
            // line start counts as whitespace for the keyword matcher
            prev: ' ',
        }
    }
}

pub struct RegionScanner<'a> {
    ctx: ImportContext<'a>,
    state: FileScanState,
}

impl<'a> RegionScanner<'a> {
    pub fn new(ctx: ImportContext<'a>) -> Self {
        Self {
            ctx,
            state: FileScanState::default(),
        }
    }

    pub fn state(&self) -> FileScanState {
        self.state
    }

    /// Scan one line (terminator included) and append its rewritten form to `out`.
    ///
    /// On error `out` may hold a partial line; callers discard the whole buffer.
    pub fn scan_line(&mut self, line: &str, out: &mut String) -> Result<(), ScanError> {
        let mut ls = LineScanState::new();

        for (idx, c) in line.chars().enumerate() {
            let column = idx + 1;

            if self.state.in_block_comment {
                out.push(c);
                if ls.prev == '*' && c == '/' {
                    self.state.in_block_comment = false;
                    ls.prev = ' ';
                } else {
                    ls.prev = c;
                }
                continue;
            }

            if self.state.in_raw_string {
                out.push(c);
                if c == '`' {
                    self.state.in_raw_string = false;
                }
                ls.prev = c;
                continue;
            }

            match ls.region {
                LineRegion::LineComment => {
                    out.push(c);
                    continue;
                }
                LineRegion::ImportLiteral { column: open } => {
                    if c == '"' {
                        self.close_import_literal(&mut ls, open, out)?;
                    } else {
                        ls.literal.push(c);
                    }
                    ls.prev = c;
                    continue;
                }
                LineRegion::PlainString { escaped } => {
                    out.push(c);
                    ls.region = match step_quoted(escaped, c, '"') {
                        Some(escaped) => LineRegion::PlainString { escaped },
                        None => LineRegion::Code,
                    };
                    ls.prev = c;
                    continue;
                }
                LineRegion::RuneLiteral { escaped } => {
                    out.push(c);
                    ls.region = match step_quoted(escaped, c, '\'') {
                        Some(escaped) => LineRegion::RuneLiteral { escaped },
                        None => LineRegion::Code,
                    };
                    ls.prev = c;
                    continue;
                }
                LineRegion::Code => {}
            }

            out.push(c);
            let keyword_done = ls.keyword.is_complete();
            ls.keyword.feed(ls.prev, c);

            match c {
                ' ' | '\t' => {
                    if keyword_done {
                        ls.expecting_target = true;
                    }
                }
                '(' => {
                    if keyword_done || ls.expecting_target {
                        self.state.in_import_block = true;
                        ls.expecting_target = false;
                    }
                }
                ')' => {
                    self.state.in_import_block = false;
                }
                ';' => {
                    ls.expecting_target = false;
                }
                '"' => {
                    if self.state.in_import_block || ls.expecting_target {
                        ls.literal.clear();
                        ls.region = LineRegion::ImportLiteral { column };
                    } else {
                        ls.region = LineRegion::PlainString { escaped: false };
                    }
                }
                '\'' => {
                    ls.region = LineRegion::RuneLiteral { escaped: false };
                }
                '/' if ls.prev == '/' => {
                    ls.region = LineRegion::LineComment;
                }
                '*' if ls.prev == '/' => {
                    self.state.in_block_comment = true;
                    // the opener's `*` must not pair with a following `/`
                    ls.prev = ' ';
                    continue;
                }
                '`' => {
                    self.state.in_raw_string = true;
                }
                _ => {}
            }

            ls.prev = c;
        }

        if let LineRegion::ImportLiteral { column } = ls.region {
            return Err(ScanError::UnterminatedLiteral { column });
        }
        Ok(())
    }

    fn close_import_literal(
        &mut self,
        ls: &mut LineScanState,
        open: usize,
        out: &mut String,
    ) -> Result<(), ScanError> {
        let resolved = resolve(
            &ls.literal,
            self.ctx.depth(),
            self.ctx.dirs,
            self.ctx.module,
            self.ctx.above_root,
        )
        .map_err(|source| ScanError::AboveModuleRoot {
            column: open,
            source,
        })?;
        out.push_str(&resolved);
        out.push('"');
        ls.literal.clear();
        ls.region = LineRegion::Code;
        if !self.state.in_import_block {
            ls.expecting_target = false;
        }
        Ok(())
    }
}

/// One step inside a quoted literal: `None` when `c` closes it, else the next escape flag.
fn step_quoted(escaped: bool, c: char, quote: char) -> Option<bool> {
    if escaped {
        Some(false)
    } else if c == quote {
        None
    } else {
        Some(c == '\\')
    }
}
