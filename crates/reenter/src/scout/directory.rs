use std::fs;
use std::path::Path;

/// Levels below the root that are still listed.
pub const DEFAULT_MAX_DEPTH: usize = 2;

const SKIPPED: [&str; 6] = ["node_modules", "__pycache__", ".git", "dist", "build", ".next"];

/// List the project tree, one entry per line, indented two spaces per level.
///
/// Dot-entries and build or dependency folders are skipped; directories end in `/`. Entries are
/// sorted by name within a folder. Unreadable folders are left out.
pub fn scan_directory(root: &Path, max_depth: usize) -> Vec<String> {
    let mut items = Vec::new();
    scan_into(root, 0, max_depth, &mut items);
    items
}

fn scan_into(dir: &Path, depth: usize, max_depth: usize, items: &mut Vec<String>) {
    if depth > max_depth {
        return;
    }
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(path = %dir.display(), error = %err, "skipping unreadable folder");
            return;
        }
    };

    let mut entries: Vec<_> = entries.filter_map(Result::ok).collect();
    entries.sort_by_key(|entry| entry.file_name());

    let indent = "  ".repeat(depth);
    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || SKIPPED.contains(&name.as_str()) {
            continue;
        }
        let is_dir = entry.file_type().map(|kind| kind.is_dir()).unwrap_or(false);
        if is_dir {
            items.push(format!("{indent}{name}/"));
            scan_into(&entry.path(), depth + 1, max_depth, items);
        } else {
            items.push(format!("{indent}{name}"));
        }
    }
}
