//! Extension classes, extension lists and the per-run extension filter.
//!
//! Extensions are always handled in normalized form: lower-case with a single
//! leading dot (`.mp4`). A file without an extension normalizes to the empty
//! string and is never a member of any list.

use crate::error::{CoreError, CoreResult};

use once_cell::sync::Lazy;
use serde::Serialize;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

const BUNDLED_AV: &str = include_str!("../assets/extensions-av.txt");
const BUNDLED_IMAGES: &str = include_str!("../assets/extensions-images.txt");

static AV_SET: Lazy<ExtensionSet> = Lazy::new(|| ExtensionSet::parse(BUNDLED_AV));
static IMAGES_SET: Lazy<ExtensionSet> = Lazy::new(|| ExtensionSet::parse(BUNDLED_IMAGES));

/// Which family of files a run benchmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionClass {
    /// Still images (`images` mode)
    Images,
    /// Audio and video containers (`av` mode)
    #[serde(rename = "av")]
    AudioVideo,
}

impl ExtensionClass {
    /// Parses an invocation mode. Both `av` and the legacy `-av` spelling are
    /// accepted, likewise `images`/`-images`.
    pub fn from_mode(mode: &str) -> Option<Self> {
        match mode.trim().trim_start_matches('-').to_ascii_lowercase().as_str() {
            "images" | "image" | "img" => Some(Self::Images),
            "av" | "audio-video" => Some(Self::AudioVideo),
            _ => None,
        }
    }

    /// The extension list shipped with the library for this class.
    pub fn bundled_extensions(self) -> &'static ExtensionSet {
        match self {
            Self::Images => &IMAGES_SET,
            Self::AudioVideo => &AV_SET,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Images => "image files",
            Self::AudioVideo => "audio and video files",
        }
    }
}

impl fmt::Display for ExtensionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Images => write!(f, "images"),
            Self::AudioVideo => write!(f, "av"),
        }
    }
}

impl FromStr for ExtensionClass {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_mode(s).ok_or_else(|| CoreError::InvalidMode(s.to_string()))
    }
}

/// Normalizes a raw extension (`MP4`, `.Mp4`, ` mp4 `) to `.mp4`.
///
/// Returns an empty string when nothing remains after trimming.
pub fn normalize_extension(raw: &str) -> String {
    let bare = raw.trim().trim_start_matches('.');
    if bare.is_empty() {
        String::new()
    } else {
        format!(".{}", bare.to_lowercase())
    }
}

/// Normalized extension of `path`, or `""` when it has none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| normalize_extension(&ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Ordered, de-duplicated set of normalized extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet {
    extensions: Vec<String>,
}

impl ExtensionSet {
    /// Parses a newline-delimited list of bare extensions. Blank lines and
    /// lines starting with `#` are ignored; duplicates keep their first
    /// position.
    pub fn parse(text: &str) -> Self {
        let mut set = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            set.insert(line);
        }
        set
    }

    /// Loads a list file from disk. An empty list is rejected since it would
    /// skip every file in the tree.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ExtensionList(format!("failed to read '{}': {}", path.display(), e))
        })?;
        let set = Self::parse(&text);
        if set.is_empty() {
            return Err(CoreError::ExtensionList(format!(
                "'{}' does not contain any extensions",
                path.display()
            )));
        }
        log::debug!("Loaded {} extensions from {}", set.len(), path.display());
        Ok(set)
    }

    /// Adds an extension, returning `false` if it was already present.
    pub fn insert(&mut self, raw: &str) -> bool {
        let ext = normalize_extension(raw);
        if ext.is_empty() || self.extensions.contains(&ext) {
            return false;
        }
        self.extensions.push(ext);
        true
    }

    /// Membership test for an already normalized extension.
    pub fn contains(&self, normalized: &str) -> bool {
        self.extensions.iter().any(|ext| ext == normalized)
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExtensionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::default();
        for ext in iter {
            set.insert(ext.as_ref());
        }
        set
    }
}

/// Applies an [`ExtensionSet`] to the files of one run and remembers every
/// distinct extension it turned away.
#[derive(Debug)]
pub struct ExtensionFilter<'a> {
    set: &'a ExtensionSet,
    skipped: Vec<String>,
}

impl<'a> ExtensionFilter<'a> {
    pub fn new(set: &'a ExtensionSet) -> Self {
        Self {
            set,
            skipped: Vec::new(),
        }
    }

    /// Returns the normalized extension when `path` is selected. Otherwise the
    /// extension is recorded as skipped (once per distinct extension) and
    /// `None` is returned.
    pub fn admit(&mut self, path: &Path) -> Option<String> {
        let ext = extension_of(path);
        if self.set.contains(&ext) {
            return Some(ext);
        }
        if !self.skipped.contains(&ext) {
            log::debug!("Skipping extension '{}' (first seen at {})", ext, path.display());
            self.skipped.push(ext);
        }
        None
    }

    /// Distinct skipped extensions in first-seen order.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn into_skipped(self) -> Vec<String> {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("MP4"), ".mp4");
        assert_eq!(normalize_extension(".Mkv"), ".mkv");
        assert_eq!(normalize_extension("  flac \r"), ".flac");
        assert_eq!(normalize_extension(""), "");
        assert_eq!(normalize_extension("."), "");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("/a/b/Movie.MP4")), ".mp4");
        assert_eq!(extension_of(Path::new("/a/b/archive.tar.GZ")), ".gz");
        assert_eq!(extension_of(Path::new("/a/b/README")), "");
    }

    #[test]
    fn test_parse_skips_comments_and_duplicates() {
        let set = ExtensionSet::parse("# header\nmp4\n\nMKV\nmp4\r\n.avi\n");
        let items: Vec<&str> = set.iter().collect();
        assert_eq!(items, vec![".mp4", ".mkv", ".avi"]);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(ExtensionClass::from_mode("av"), Some(ExtensionClass::AudioVideo));
        assert_eq!(ExtensionClass::from_mode("-av"), Some(ExtensionClass::AudioVideo));
        assert_eq!(ExtensionClass::from_mode("-images"), Some(ExtensionClass::Images));
        assert_eq!(ExtensionClass::from_mode("IMAGES"), Some(ExtensionClass::Images));
        assert!(ExtensionClass::from_mode("video").is_none());
        assert!(matches!(
            "bogus".parse::<ExtensionClass>(),
            Err(CoreError::InvalidMode(m)) if m == "bogus"
        ));
    }

    #[test]
    fn test_bundled_lists_are_disjoint_and_populated() {
        let av = ExtensionClass::AudioVideo.bundled_extensions();
        let images = ExtensionClass::Images.bundled_extensions();
        assert!(av.contains(".mp4"));
        assert!(av.contains(".mkv"));
        assert!(images.contains(".jpg"));
        assert!(!av.contains(".txt"));
        assert!(av.iter().all(|ext| !images.contains(ext)));
    }

    #[test]
    fn test_filter_records_each_skipped_extension_once() {
        let set: ExtensionSet = ["mp4"].into_iter().collect();
        let mut filter = ExtensionFilter::new(&set);

        assert_eq!(filter.admit(Path::new("a.MP4")).as_deref(), Some(".mp4"));
        assert!(filter.admit(Path::new("notes.txt")).is_none());
        assert!(filter.admit(Path::new("other.TXT")).is_none());
        assert!(filter.admit(Path::new("cover.jpg")).is_none());
        assert!(filter.admit(Path::new("Makefile")).is_none());

        assert_eq!(filter.skipped(), &[".txt", ".jpg", ""]);
    }
}
