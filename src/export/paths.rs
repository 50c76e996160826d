//! Output path helpers.

use regex_lite::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

fn invalid_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Static pattern; compiling it cannot fail.
    RE.get_or_init(|| Regex::new(r#"[<>:"|?*\x00-\x1f]"#).expect("static file-name pattern compiles"))
}

/// Replace characters that are invalid in file names with `_`.
///
/// Path separators are invalid inside a file name and are replaced too.
pub fn fix_invalid_file_name_characters(name: &str) -> String {
    let fixed = invalid_chars().replace_all(name, "_");
    let fixed = fixed.replace(['/', '\\'], "_");
    let trimmed = fixed.trim_end_matches(['.', ' ']);
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Turn a directory hint into a relative, filesystem-safe path.
///
/// Both `/` and `\` separate components. Empty, `.` and `..` components and
/// any root prefix are dropped, so the result always stays under whatever
/// directory it is joined onto.
pub fn fix_invalid_path_characters(hint: &str) -> PathBuf {
    let normalized = hint.replace('\\', "/");
    let mut out = PathBuf::new();
    for part in normalized.split('/') {
        let part = part.trim();
        if part.is_empty() || part == "." || part == ".." {
            continue;
        }
        out.push(fix_invalid_file_name_characters(part));
    }
    debug_assert!(out.components().all(|c| matches!(c, Component::Normal(_))));
    out
}

/// Pick a file name `stem.ext` in `dir`, appending `_N` until it is unused.
pub fn unique_file_name(dir: &Path, stem: &str, ext: &str) -> String {
    let stem = fix_invalid_file_name_characters(stem);
    let candidate = with_extension(&stem, ext);
    if !dir.join(&candidate).exists() {
        return candidate;
    }
    let mut n = 1u32;
    loop {
        let candidate = with_extension(&format!("{}_{}", stem, n), ext);
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        n += 1;
    }
}

fn with_extension(stem: &str, ext: &str) -> String {
    if ext.is_empty() {
        stem.to_string()
    } else {
        format!("{}.{}", stem, ext)
    }
}
