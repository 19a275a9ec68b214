//! 修正被 markdown formatter 多跳脫的語法：GitHub admonition、`\&`、task list、
//! 單獨的反斜線、標題裡的 `\_`，以及含 `\_` 的識別字。
//! front matter 與 fenced code block 內的內容不動。

use crate::utils::error::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

pub struct MarkdownFixer {
    fence: Regex,
    blockquote: Regex,
    admonition: Regex,
    inline_code: Regex,
    escaped_amp: Regex,
    task_checkbox: Regex,
    lone_backslash: Regex,
    heading: Regex,
    url: Regex,
    link: Regex,
    escaped_identifier: Regex,
}

impl Default for MarkdownFixer {
    fn default() -> Self {
        let re = |pattern: &str| Regex::new(pattern).expect("static regex");
        Self {
            fence: re(r"^\s*(```|~~~)"),
            blockquote: re(r"^\s*>"),
            admonition: re(r"\\(\[!(?:TIP|NOTE|WARNING|IMPORTANT|CAUTION|DANGER)\])"),
            inline_code: re(r"`.*`"),
            escaped_amp: re(r"\\(&)"),
            task_checkbox: re(r"^(\s*- )\\(\[[^\]]*\])"),
            lone_backslash: re(r"^\s*\\(\s*)?$"),
            heading: re(r"^#+\s"),
            url: re(r"https?://"),
            link: re(r"\[.*\]\(.*\)"),
            escaped_identifier: re(r"([A-Za-z0-9]+(?:\\_[A-Za-z0-9]+)+)"),
        }
    }
}

fn is_front_matter_marker(line: &str) -> bool {
    line == "---" || line == "..."
}

impl MarkdownFixer {
    pub fn fix_line(&self, line: &str) -> String {
        let mut fixed = line.to_string();

        if self.blockquote.is_match(line) {
            fixed = self.admonition.replace_all(&fixed, "${1}").into_owned();
        }

        if !self.inline_code.is_match(&fixed) {
            fixed = self.escaped_amp.replace_all(&fixed, "${1}").into_owned();
        }

        fixed = self.task_checkbox.replace(&fixed, "${1}${2}").into_owned();

        if self.lone_backslash.is_match(&fixed) {
            fixed.clear();
        }

        if self.heading.is_match(&fixed) {
            fixed = fixed.replace("\\_", "_");
        }

        if !fixed.contains('`') && !self.url.is_match(&fixed) && !self.link.is_match(&fixed) {
            fixed = self
                .escaped_identifier
                .replace_all(&fixed, |caps: &regex::Captures| {
                    format!("`{}`", caps[1].replace("\\_", "_"))
                })
                .into_owned();
        }

        fixed
    }

    /// 沒有任何修改時回傳 None
    pub fn fix(&self, content: &str) -> Option<String> {
        let mut lines: Vec<String> = content
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();

        let mut body_start = 0;
        if lines.first().is_some_and(|l| is_front_matter_marker(l)) {
            if let Some(close) = lines.iter().skip(1).position(|l| is_front_matter_marker(l)) {
                body_start = close + 2;
            }
        }

        let mut in_fence = false;
        let mut changed = false;

        for (i, line) in lines.iter_mut().enumerate() {
            if self.fence.is_match(line) {
                in_fence = !in_fence;
                continue;
            }
            if i < body_start || in_fence {
                continue;
            }

            let fixed = self.fix_line(line);
            if fixed != *line {
                *line = fixed;
                changed = true;
            }
        }

        changed.then(|| lines.join("\n"))
    }
}

#[derive(Debug, Default)]
pub struct FixReport {
    pub scanned: usize,
    pub fixed: Vec<PathBuf>,
}

fn is_ignored(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name == "node_modules"
}

pub fn find_markdown_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_ignored(e))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable path: {}", e);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        .map(|e| e.into_path())
        .collect()
}

/// dry_run 時只回報需要修正的檔案，不寫回
pub fn fix_tree(root: &Path, dry_run: bool) -> Result<FixReport> {
    let fixer = MarkdownFixer::default();
    let files = find_markdown_files(root);
    let mut report = FixReport {
        scanned: files.len(),
        fixed: Vec::new(),
    };

    for file in files {
        // 非 UTF-8 的檔案略過，不中斷其他檔案
        let content = match std::fs::read_to_string(&file) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                tracing::warn!("Skipping non UTF-8 file {}: {}", file.display(), e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if let Some(fixed) = fixer.fix(&content) {
            if !dry_run {
                std::fs::write(&file, fixed)?;
            }
            tracing::debug!("Fixed: {}", file.display());
            report.fixed.push(file);
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fix(content: &str) -> Option<String> {
        MarkdownFixer::default().fix(content)
    }

    #[test]
    fn test_admonition_in_blockquote() {
        assert_eq!(fix("> \\[!TIP]\n> text").unwrap(), "> [!TIP]\n> text");
        assert_eq!(fix("  > \\[!WARNING]").unwrap(), "  > [!WARNING]");
        assert!(fix("\\[!TIP] outside quote").is_none());
    }

    #[test]
    fn test_escaped_ampersand() {
        assert_eq!(fix("a=1\\&b=2").unwrap(), "a=1&b=2");
        assert!(fix("`a\\&b`").is_none());
    }

    #[test]
    fn test_task_checkbox() {
        assert_eq!(fix("- \\[x] done").unwrap(), "- [x] done");
        assert_eq!(fix("  - \\[/] partial").unwrap(), "  - [/] partial");
        assert_eq!(fix("- \\[ ] todo").unwrap(), "- [ ] todo");
    }

    #[test]
    fn test_lone_backslash() {
        assert_eq!(fix("para\n\\\nnext").unwrap(), "para\n\nnext");
        assert_eq!(fix("  \\  ").unwrap(), "");
    }

    #[test]
    fn test_heading_underscores() {
        assert_eq!(fix("# BACKEND\\_TITLE").unwrap(), "# BACKEND_TITLE");
    }

    #[test]
    fn test_escaped_identifier_becomes_inline_code() {
        assert_eq!(
            fix("call underfoot\\_orchestrator then rank\\_and\\_format").unwrap(),
            "call `underfoot_orchestrator` then `rank_and_format`"
        );
        assert!(fix("see https://x.io/a\\_b").is_none());
        assert!(fix("[a\\_b](link)").is_none());
        assert!(fix("`code` and a\\_b").is_none());
    }

    #[test]
    fn test_code_fences_are_untouched() {
        let content = "```\n- \\[x] keep\n```\n- \\[x] fix";
        assert_eq!(fix(content).unwrap(), "```\n- \\[x] keep\n```\n- [x] fix");

        let tilde = "~~~\na\\&b\n~~~";
        assert!(fix(tilde).is_none());
    }

    #[test]
    fn test_front_matter_is_untouched() {
        let content = "---\ntitle: a\\&b\n---\na\\&b";
        assert_eq!(fix(content).unwrap(), "---\ntitle: a\\&b\n---\na&b");
    }

    #[test]
    fn test_unclosed_front_matter_is_body() {
        let content = "---\na\\&b";
        assert_eq!(fix(content).unwrap(), "---\na&b");
    }

    #[test]
    fn test_crlf_is_normalized_only_when_changed() {
        assert_eq!(fix("a\\&b\r\nc").unwrap(), "a&b\nc");
        assert!(fix("plain\r\ntext").is_none());
    }

    #[test]
    fn test_fix_tree() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::write(root.join("README.md"), "> \\[!NOTE]\n").unwrap();
        std::fs::write(root.join("clean.md"), "nothing here\n").unwrap();
        std::fs::write(root.join("notes.txt"), "a\\&b\n").unwrap();
        std::fs::create_dir_all(root.join("docs")).unwrap();
        std::fs::write(root.join("docs/guide.md"), "- \\[ ] step\n").unwrap();
        std::fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        std::fs::write(root.join("node_modules/pkg/README.md"), "a\\&b\n").unwrap();
        std::fs::create_dir_all(root.join(".github")).unwrap();
        std::fs::write(root.join(".github/PR.md"), "a\\&b\n").unwrap();

        let dry = fix_tree(root, true).unwrap();
        assert_eq!(dry.scanned, 3);
        assert_eq!(dry.fixed.len(), 2);
        assert_eq!(
            std::fs::read_to_string(root.join("README.md")).unwrap(),
            "> \\[!NOTE]\n"
        );

        let report = fix_tree(root, false).unwrap();
        assert_eq!(report.fixed.len(), 2);
        assert_eq!(
            std::fs::read_to_string(root.join("README.md")).unwrap(),
            "> [!NOTE]\n"
        );
        assert_eq!(
            std::fs::read_to_string(root.join("docs/guide.md")).unwrap(),
            "- [ ] step\n"
        );
        assert_eq!(
            std::fs::read_to_string(root.join("node_modules/pkg/README.md")).unwrap(),
            "a\\&b\n"
        );
    }

    #[test]
    fn test_fix_tree_skips_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::write(root.join("a_broken.md"), [0xff, 0xfe, b'\\', b'&']).unwrap();
        std::fs::write(root.join("b_good.md"), "a\\&b\n").unwrap();

        let report = fix_tree(root, false).unwrap();
        assert_eq!(report.scanned, 2);
        assert_eq!(report.fixed, vec![root.join("b_good.md")]);
        assert_eq!(std::fs::read_to_string(root.join("b_good.md")).unwrap(), "a&b\n");
        assert_eq!(
            std::fs::read(root.join("a_broken.md")).unwrap(),
            vec![0xff, 0xfe, b'\\', b'&']
        );
    }
}
