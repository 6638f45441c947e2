//! Media files and storage object naming

use rand::Rng;
use std::path::Path;

/// Placeholder cover shown for tracks without a thumbnail
pub const DEFAULT_THUMBNAIL_PATH: &str = "thumbnails/default.jpg";

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 5;

/// A file picked for upload, held in memory
#[derive(Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Original file name (used for the extension)
    pub file_name: String,
    /// MIME type sent with the upload
    pub content_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl MediaFile {
    /// Create a media file, guessing the content type from the name
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// File extension, lowercased
    ///
    /// Names without a dot use the whole name.
    pub fn extension(&self) -> String {
        extension_of(&self.file_name)
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the file has no content
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Storage prefix an object is written under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// `audio/...`
    Audio,
    /// `thumbnails/...`
    Thumbnail,
}

impl ObjectKind {
    /// Folder name in the bucket
    pub fn prefix(&self) -> &'static str {
        match self {
            ObjectKind::Audio => "audio",
            ObjectKind::Thumbnail => "thumbnails",
        }
    }

    /// Build an object path: `{prefix}/{millis}_{suffix}.{ext}`
    ///
    /// The suffix is five random base-36 characters so two uploads in the
    /// same millisecond do not collide.
    pub fn object_path<R: Rng + ?Sized>(&self, file: &MediaFile, millis: i64, rng: &mut R) -> String {
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect();
        format!(
            "{}/{}_{}.{}",
            self.prefix(),
            millis,
            suffix,
            file.extension()
        )
    }
}

fn extension_of(file_name: &str) -> String {
    let name = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_name);
    name.rsplit('.').next().unwrap_or(name).to_ascii_lowercase()
}

/// Get MIME type for an audio or image file name.
pub fn content_type_for(file_name: &str) -> &'static str {
    match extension_of(file_name).as_str() {
        "mp3" => "audio/mpeg",
        "flac" => "audio/flac",
        "ogg" => "audio/ogg",
        "opus" => "audio/opus",
        "wav" => "audio/wav",
        "m4a" | "aac" => "audio/mp4",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for("song.mp3"), "audio/mpeg");
        assert_eq!(content_type_for("song.FLAC"), "audio/flac");
        assert_eq!(content_type_for("song.m4a"), "audio/mp4");
        assert_eq!(content_type_for("cover.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("cover.png"), "image/png");
        assert_eq!(content_type_for("blob"), "application/octet-stream");
    }

    #[test]
    fn object_path_layout() {
        let file = MediaFile::new("My Song.MP3", vec![1]);
        let mut rng = StepRng::new(0, 0);
        let path = ObjectKind::Audio.object_path(&file, 1_700_000_000_000, &mut rng);
        assert_eq!(path, "audio/1700000000000_00000.mp3");

        let cover = MediaFile::new("cover.png", vec![1]);
        let path = ObjectKind::Thumbnail.object_path(&cover, 5, &mut rand::thread_rng());
        assert!(path.starts_with("thumbnails/5_"));
        assert!(path.ends_with(".png"));
        let suffix = &path["thumbnails/5_".len()..path.len() - ".png".len()];
        assert_eq!(suffix.len(), 5);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn extension_without_dot_uses_whole_name() {
        let file = MediaFile::new("track", vec![1]);
        assert_eq!(file.extension(), "track");
    }
}
