use crate::utils::error::Result;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_EXTENSION: &str = "txt";
const FALLBACK_STEM: &str = "board";

/// Works out where the export is written.
#[derive(Debug, Clone)]
pub struct OutputNamer {
    cwd: PathBuf,
    directory: Option<PathBuf>,
    extension: String,
}

impl OutputNamer {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            directory: None,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn from_current_dir() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Default names go here instead of the parent of the working directory.
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    fn default_directory(&self) -> PathBuf {
        match &self.directory {
            Some(dir) => absolutize(&self.cwd, dir),
            None => self.cwd.parent().unwrap_or(&self.cwd).to_path_buf(),
        }
    }

    pub fn resolve(&self, override_path: Option<&str>, title: &str) -> PathBuf {
        match override_path {
            Some(path) => absolutize(&self.cwd, Path::new(path)),
            None => {
                let file_name = format!("{}.{}", sanitize_file_stem(title), self.extension);
                self.default_directory().join(file_name)
            }
        }
    }
}

/// 去除標題中不能出現在檔名裡的字元
pub fn sanitize_file_stem(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect();

    let stem = cleaned
        .trim_start_matches(|c: char| c == '.' || c.is_whitespace())
        .trim_end();

    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem.to_string()
    }
}

/// Joins relative paths onto `base` and folds `.`/`..` lexically.
fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name_in_parent_directory() {
        let namer = OutputNamer::new("/home/dev/tools");
        assert_eq!(
            namer.resolve(None, "Sprint42Retro"),
            PathBuf::from("/home/dev/Sprint42Retro.txt")
        );
    }

    #[test]
    fn test_override_is_used_verbatim() {
        let namer = OutputNamer::new("/home/dev/tools");
        assert_eq!(
            namer.resolve(Some("/tmp/out.csv"), "Ignored"),
            PathBuf::from("/tmp/out.csv")
        );
        assert_eq!(
            namer.resolve(Some("exports/../out.txt"), "Ignored"),
            PathBuf::from("/home/dev/tools/out.txt")
        );
    }

    #[test]
    fn test_root_cwd_has_no_parent() {
        let namer = OutputNamer::new("/");
        assert_eq!(namer.resolve(None, "Team"), PathBuf::from("/Team.txt"));
    }

    #[test]
    fn test_directory_and_extension_overrides() {
        let namer = OutputNamer::new("/work")
            .with_directory("exports")
            .with_extension("csv");
        assert_eq!(namer.resolve(None, "Q3"), PathBuf::from("/work/exports/Q3.csv"));
    }

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("Team/Retro"), "TeamRetro");
        assert_eq!(sanitize_file_stem("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_file_stem("What?<now>|"), "Whatnow");
        assert_eq!(sanitize_file_stem("..."), "board");
        assert_eq!(sanitize_file_stem(""), "board");
        assert_eq!(sanitize_file_stem("Sprint\t42"), "Sprint42");
    }

    #[test]
    fn test_traversal_stays_in_output_directory() {
        let namer = OutputNamer::new("/home/dev/tools");
        let path = namer.resolve(None, "../../../etc/cron.d/job");
        assert_eq!(path.parent(), Some(Path::new("/home/dev")));
    }
}
