//! Logical images and where they resolve to on disk.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// The five kinds of artwork a shortcut can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Icon,
    Logo,
    Cover,
    Banner,
    Hero,
}

impl AssetKind {
    pub const ALL: [AssetKind; 5] = [
        AssetKind::Icon,
        AssetKind::Logo,
        AssetKind::Cover,
        AssetKind::Banner,
        AssetKind::Hero,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Icon => "icon",
            AssetKind::Logo => "logo",
            AssetKind::Cover => "cover",
            AssetKind::Banner => "banner",
            AssetKind::Hero => "hero",
        }
    }

    /// Acceptable file extensions, in priority order.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            AssetKind::Icon => &[".png", ".ico"],
            AssetKind::Logo => &[".png"],
            AssetKind::Cover | AssetKind::Banner | AssetKind::Hero => {
                &[".png", ".jpg", ".jpeg", ".webp"]
            }
        }
    }

    /// File basename for a shortcut id, following the client's grid naming.
    pub fn target_name(&self, id: &str) -> String {
        match self {
            AssetKind::Icon => format!("{}_icon", id),
            AssetKind::Logo => format!("{}_logo", id),
            AssetKind::Cover => format!("{}p", id),
            AssetKind::Banner => id.to_string(),
            AssetKind::Hero => format!("{}_hero", id),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// No source: the image is being cleared.
    None,
    Url(Url),
    Local(PathBuf),
}

impl ImageSource {
    /// Interpret a stored source string.
    ///
    /// `http`/`https` URLs are remote, `file://` URLs and everything else
    /// are local paths. Blank strings mean no source.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            return ImageSource::None;
        }

        match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => ImageSource::Url(url),
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => ImageSource::Local(path),
                Err(()) => ImageSource::Local(PathBuf::from(value)),
            },
            _ => ImageSource::Local(PathBuf::from(value)),
        }
    }

    /// The part of the source that carries the file extension.
    fn extension_subject(&self) -> Option<String> {
        match self {
            ImageSource::None => None,
            ImageSource::Url(url) => Some(url.path().to_ascii_lowercase()),
            ImageSource::Local(path) => Some(path.to_string_lossy().to_ascii_lowercase()),
        }
    }
}

/// A logical image: a source plus the directory and basename it resolves
/// into, with the extensions that are acceptable for it.
///
/// At most one `target_name.<ext>` file may exist for the acceptable
/// extensions at any time.
#[derive(Debug, Clone)]
pub struct Image {
    pub source: ImageSource,
    pub target_directory: PathBuf,
    pub target_name: String,
    pub extensions: Vec<String>,
}

impl Image {
    pub fn new(
        source: ImageSource,
        target_directory: impl Into<PathBuf>,
        target_name: impl Into<String>,
        extensions: &[&str],
    ) -> Self {
        Self {
            source,
            target_directory: target_directory.into(),
            target_name: target_name.into(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// The image for one asset slot of a shortcut.
    pub fn for_asset(kind: AssetKind, source: &str, target_directory: &Path, id: &str) -> Self {
        Self::new(
            ImageSource::parse(source),
            target_directory,
            kind.target_name(id),
            kind.extensions(),
        )
    }

    /// Target path for a given extension.
    pub fn path(&self, extension: &str) -> PathBuf {
        self.target_directory
            .join(format!("{}{}", self.target_name, extension))
    }

    /// The first acceptable extension the source ends with.
    pub fn matching_extension(&self) -> Option<&str> {
        let subject = self.source.extension_subject()?;
        self.extensions
            .iter()
            .find(|ext| subject.ends_with(&ext.to_ascii_lowercase()))
            .map(String::as_str)
    }

    /// All extension variants for this image's basename.
    pub fn variants(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.extensions.iter().map(|ext| self.path(ext))
    }
}
