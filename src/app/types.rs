// src/app/types.rs
use image::{DynamicImage, RgbaImage};

use super::error::FetchError;

// ---- candidates handed in by the caller ----
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub source_url: String,
    pub thumbnail_url: String,
    pub native_resolution: Option<Resolution>,
}

impl Candidate {
    pub fn new(source_url: impl Into<String>, thumbnail_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            thumbnail_url: thumbnail_url.into(),
            native_resolution: None,
        }
    }

    /// Candidate whose thumbnail is the original itself.
    pub fn single(url: impl Into<String>) -> Self {
        let url = url.into();
        Self::new(url.clone(), url)
    }

    #[must_use]
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.native_resolution = Some(Resolution::new(width, height));
        self
    }
}

// ---- locally supplied images (file pick, drag & drop) ----
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocalSource {
    Path(std::path::PathBuf),
    Dropped(String),
}

// ---- grid cells ----
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotId {
    pub row: usize,
    pub col: usize,
}

// ---- core row backing each grid cell ----
pub struct DownloadTask {
    pub source_url: String,
    pub thumbnail_url: String,
    pub native_resolution: Option<Resolution>,
    pub fetched: bool,
    pub raw_image: Option<DynamicImage>,
    pub display_image: Option<RgbaImage>,
    pub render_slot: Option<SlotId>,
}

impl DownloadTask {
    pub fn from_candidate(c: Candidate) -> Self {
        Self {
            source_url: c.source_url,
            thumbnail_url: c.thumbnail_url,
            native_resolution: c.native_resolution,
            fetched: false,
            raw_image: None,
            display_image: None,
            render_slot: None,
        }
    }

    /// Resolution shown under the thumbnail: the advertised one, else the decoded size.
    pub fn shown_resolution(&self) -> Option<Resolution> {
        self.native_resolution.or_else(|| {
            self.raw_image
                .as_ref()
                .map(|img| Resolution::new(img.width(), img.height()))
        })
    }
}

impl std::fmt::Debug for DownloadTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadTask")
            .field("source_url", &self.source_url)
            .field("thumbnail_url", &self.thumbnail_url)
            .field("fetched", &self.fetched)
            .field("has_raw", &self.raw_image.is_some())
            .field("display_width", &self.display_image.as_ref().map(|i| i.width()))
            .field("render_slot", &self.render_slot)
            .finish()
    }
}

// ---- cross-thread messages ----
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

#[derive(Debug)]
pub struct FetchCompletion {
    pub id: RequestId,
    pub result: Result<Vec<u8>, FetchError>,
}

/// Notifications for whoever presents the picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineEvent {
    ThumbnailReady(usize),
    QueueDrained,
    LoadingChanged(bool),
    Selected(String),
    Closed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Open,
    Accepted(String),
    Rejected,
}

// ---- context identifier for persisted scale ----
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageCategory {
    Poster,
    Backdrop,
    Banner,
    Thumb,
    Logo,
    ClearArt,
    DiscArt,
    SeasonPoster,
    SeasonBackdrop,
    SeasonBanner,
    SeasonThumb,
}

impl ImageCategory {
    pub const ALL: [Self; 11] = [
        Self::Poster,
        Self::Backdrop,
        Self::Banner,
        Self::Thumb,
        Self::Logo,
        Self::ClearArt,
        Self::DiscArt,
        Self::SeasonPoster,
        Self::SeasonBackdrop,
        Self::SeasonBanner,
        Self::SeasonThumb,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Poster => "poster",
            Self::Backdrop => "backdrop",
            Self::Banner => "banner",
            Self::Thumb => "thumb",
            Self::Logo => "logo",
            Self::ClearArt => "clearart",
            Self::DiscArt => "discart",
            Self::SeasonPoster => "season_poster",
            Self::SeasonBackdrop => "season_backdrop",
            Self::SeasonBanner => "season_banner",
            Self::SeasonThumb => "season_thumb",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl Default for ImageCategory {
    fn default() -> Self {
        Self::Poster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_parse_back() {
        for c in ImageCategory::ALL {
            assert_eq!(ImageCategory::from_str(c.as_str()), Some(c));
        }
        assert_eq!(ImageCategory::from_str(" Backdrop "), Some(ImageCategory::Backdrop));
        assert_eq!(ImageCategory::from_str("fanart"), None);
    }

    #[test]
    fn shown_resolution_prefers_advertised_size() {
        let mut task =
            DownloadTask::from_candidate(Candidate::single("a").with_resolution(1000, 1500));
        task.raw_image = Some(DynamicImage::new_rgba8(10, 15));
        assert_eq!(task.shown_resolution(), Some(Resolution::new(1000, 1500)));

        task.native_resolution = None;
        assert_eq!(task.shown_resolution(), Some(Resolution::new(10, 15)));
    }
}
