use std::fs;
use std::path::Path;

/// Files that usually say what a project is, in reading order.
pub const KEY_FILES: [&str; 9] = [
    "package.json",
    "README.md",
    "requirements.txt",
    "Makefile",
    "docker-compose.yml",
    "Cargo.toml",
    "go.mod",
    "pom.xml",
    ".env.example",
];

const MAX_CHARS: usize = 1000;

/// The first 1000 characters of each key file present, under `--- name ---` headers, separated by
/// blank lines. Empty when none are found.
pub fn read_key_files(root: &Path) -> String {
    let mut sections = Vec::new();
    for name in KEY_FILES {
        let path = root.join(name);
        if !path.is_file() {
            continue;
        }
        match fs::read(&path) {
            Ok(bytes) => {
                let content: String = String::from_utf8_lossy(&bytes).chars().take(MAX_CHARS).collect();
                sections.push(format!("--- {name} ---\n{content}"));
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable key file");
            }
        }
    }
    sections.join("\n\n")
}
