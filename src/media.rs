use std::path::{Path, PathBuf};

use crate::error::{MatchlyError, Result};
use crate::fmt::format_bytes;

pub const PROFILE_PHOTO_SLOTS: usize = 3;
pub const GALLERY_SLOTS: usize = 6;

/// At least this many profile photos before leaving step 1.
pub const MIN_PROFILE_PHOTOS: usize = 2;

pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;
pub const MAX_VIDEO_BYTES: u64 = 50 * 1024 * 1024;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "heic"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "webm", "avi", "m4v"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Declared kind of a file, judged by its extension.
    pub fn from_path(path: &Path) -> Option<MediaKind> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Image)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

}

/// A local file reference plus what was declared about it. No upload happens
/// in this prototype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub kind: MediaKind,
    pub size: u64,
}

impl MediaFile {
    /// Build a reference from a path on disk, reading size from metadata.
    pub fn open(path: &Path) -> Result<MediaFile> {
        let kind = MediaKind::from_path(path).ok_or_else(|| {
            MatchlyError::UnsupportedMedia(format!(
                "Unsupported file type: {}",
                path.display()
            ))
        })?;
        let size = std::fs::metadata(path)?.len();
        Ok(MediaFile {
            path: path.to_path_buf(),
            kind,
            size,
        })
    }

    pub fn from_parts(path: &str, kind: MediaKind, size: u64) -> MediaFile {
        MediaFile {
            path: PathBuf::from(path),
            kind,
            size,
        }
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Address of one slot within `MediaSlots`. Indices are fixed by construction
/// in the wizard surfaces; an out-of-range index is a programming error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotId {
    Photo(usize),
    Gallery(usize),
    Video,
}

impl SlotId {
    pub fn expected_kind(self) -> MediaKind {
        match self {
            SlotId::Photo(_) | SlotId::Gallery(_) => MediaKind::Image,
            SlotId::Video => MediaKind::Video,
        }
    }

    pub fn max_bytes(self) -> u64 {
        match self.expected_kind() {
            MediaKind::Image => MAX_IMAGE_BYTES,
            MediaKind::Video => MAX_VIDEO_BYTES,
        }
    }
}

/// Fixed-position placeholders for uploaded media: 3 profile photos (slot 0 is
/// the primary), 6 gallery images, one optional video.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaSlots {
    photos: [Option<MediaFile>; PROFILE_PHOTO_SLOTS],
    gallery: [Option<MediaFile>; GALLERY_SLOTS],
    video: Option<MediaFile>,
}

impl MediaSlots {
    /// Store a file in a slot. Rejects before any state mutation when the
    /// declared kind does not match the slot or the size exceeds the ceiling;
    /// the slot keeps its prior state on rejection.
    pub fn attach(&mut self, slot: SlotId, file: MediaFile) -> Result<()> {
        let expected = slot.expected_kind();
        if file.kind != expected {
            let message = match expected {
                MediaKind::Image => "Please choose an image file for this slot",
                MediaKind::Video => "Please choose a video file for this slot",
            };
            return Err(MatchlyError::UnsupportedMedia(message.to_string()));
        }
        let ceiling = slot.max_bytes();
        if file.size > ceiling {
            return Err(MatchlyError::MediaTooLarge(format!(
                "File size must be less than {} (got {})",
                format_bytes(ceiling),
                format_bytes(file.size)
            )));
        }
        *self.slot_mut(slot) = Some(file);
        Ok(())
    }

    /// Clear a slot, re-arming its empty affordance. Returns the removed file.
    pub fn remove(&mut self, slot: SlotId) -> Option<MediaFile> {
        self.slot_mut(slot).take()
    }

    pub fn get(&self, slot: SlotId) -> Option<&MediaFile> {
        match slot {
            SlotId::Photo(i) => self.photos[i].as_ref(),
            SlotId::Gallery(i) => self.gallery[i].as_ref(),
            SlotId::Video => self.video.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: SlotId) -> &mut Option<MediaFile> {
        match slot {
            SlotId::Photo(i) => &mut self.photos[i],
            SlotId::Gallery(i) => &mut self.gallery[i],
            SlotId::Video => &mut self.video,
        }
    }

    /// Renderable preview for a filled slot: file name plus size badge.
    pub fn preview(&self, slot: SlotId) -> Option<String> {
        self.get(slot)
            .map(|f| format!("{} ({})", f.file_name(), format_bytes(f.size)))
    }

    pub fn photo_count(&self) -> usize {
        self.photos.iter().filter(|p| p.is_some()).count()
    }

    /// Slot 0 of the profile photos is the primary photo.
    pub fn has_primary(&self) -> bool {
        self.photos[0].is_some()
    }

    pub fn gallery_count(&self) -> usize {
        self.gallery.iter().filter(|p| p.is_some()).count()
    }

    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(size: u64) -> MediaFile {
        MediaFile::from_parts("photos/beach.jpg", MediaKind::Image, size)
    }

    fn video(size: u64) -> MediaFile {
        MediaFile::from_parts("clips/intro.mp4", MediaKind::Video, size)
    }

    #[test]
    fn kind_from_extension() {
        assert_eq!(MediaKind::from_path(Path::new("a.JPG")), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_path(Path::new("a.png")), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_path(Path::new("a.mp4")), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_path(Path::new("a.pdf")), None);
        assert_eq!(MediaKind::from_path(Path::new("noext")), None);
    }

    #[test]
    fn attach_and_preview() {
        let mut slots = MediaSlots::default();
        slots.attach(SlotId::Photo(0), image(1024 * 1024)).unwrap();
        assert_eq!(slots.photo_count(), 1);
        assert!(slots.has_primary());
        assert_eq!(
            slots.preview(SlotId::Photo(0)).as_deref(),
            Some("beach.jpg (1.0 MB)")
        );
        assert!(slots.preview(SlotId::Photo(1)).is_none());
    }

    #[test]
    fn oversize_image_rejected_slot_unchanged() {
        let mut slots = MediaSlots::default();
        let err = slots
            .attach(SlotId::Photo(1), image(6 * 1024 * 1024))
            .unwrap_err();
        assert!(err.to_string().contains("less than 5.0 MB"));
        assert_eq!(slots.get(SlotId::Photo(1)), None);
        assert_eq!(slots.photo_count(), 0);
    }

    #[test]
    fn oversize_rejection_keeps_existing_file() {
        let mut slots = MediaSlots::default();
        slots.attach(SlotId::Photo(0), image(1024)).unwrap();
        let before = slots.get(SlotId::Photo(0)).cloned();
        assert!(slots.attach(SlotId::Photo(0), image(6 * 1024 * 1024)).is_err());
        assert_eq!(slots.get(SlotId::Photo(0)).cloned(), before);
    }

    #[test]
    fn wrong_kind_rejected() {
        let mut slots = MediaSlots::default();
        let err = slots.attach(SlotId::Photo(0), video(1024)).unwrap_err();
        assert!(err.to_string().contains("image"));
        let err = slots.attach(SlotId::Video, image(1024)).unwrap_err();
        assert!(err.to_string().contains("video"));
        assert!(!slots.has_primary());
        assert!(!slots.has_video());
    }

    #[test]
    fn video_ceiling_is_50_mb() {
        let mut slots = MediaSlots::default();
        slots.attach(SlotId::Video, video(49 * 1024 * 1024)).unwrap();
        assert!(slots.has_video());
        let mut slots = MediaSlots::default();
        assert!(slots.attach(SlotId::Video, video(51 * 1024 * 1024)).is_err());
        assert!(!slots.has_video());
    }

    #[test]
    fn remove_clears_slot_and_preview() {
        let mut slots = MediaSlots::default();
        slots.attach(SlotId::Gallery(2), image(2048)).unwrap();
        assert_eq!(slots.gallery_count(), 1);
        let removed = slots.remove(SlotId::Gallery(2));
        assert!(removed.is_some());
        assert_eq!(slots.gallery_count(), 0);
        assert!(slots.preview(SlotId::Gallery(2)).is_none());
        assert!(slots.remove(SlotId::Gallery(2)).is_none());
    }

    #[test]
    fn open_reads_size_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pic.png");
        std::fs::write(&path, vec![0u8; 4096]).unwrap();
        let file = MediaFile::open(&path).unwrap();
        assert_eq!(file.kind, MediaKind::Image);
        assert_eq!(file.size, 4096);
    }

    #[test]
    fn open_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hi").unwrap();
        assert!(MediaFile::open(&path).is_err());
    }
}
