//! Configuration types for every operation that takes options.
//!
//! Plain option values ([`CompressionLevel`], [`SplitOptions`]) are simple
//! enums/structs. Anything with more than a couple of knobs
//! ([`WatermarkOptions`], [`PdfToWordConfig`], [`CloudConvertConfig`]) comes
//! with a builder whose setters clamp out-of-range values and whose `build()`
//! validates the rest.

use crate::error::ConverterError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Compression ──────────────────────────────────────────────────────────

/// How hard [`crate::pdf::compress_pdf`] works on the object graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Less quality, high compression: compress, drop empty streams, prune
    /// unreachable objects and renumber.
    Extreme,
    /// Good quality, good compression: Flate-compress streams, drop empty ones. (default)
    #[default]
    Recommended,
    /// High quality, less compression: re-save as is.
    Low,
}

// ── Page selection / splitting ───────────────────────────────────────────

/// A 1-based, inclusive page range as entered by a user.
///
/// Values are not validated against the document; out-of-range bounds are
/// clamped when the range is applied and an inverted range is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub from: u32,
    pub to: u32,
}

impl PageRange {
    pub fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }

    /// Clamp the range to a `total`-page document and return 0-based indices.
    ///
    /// Returns `None` when nothing of the range survives clamping.
    pub fn to_indices(&self, total_pages: usize) -> Option<std::ops::RangeInclusive<usize>> {
        if total_pages == 0 {
            return None;
        }
        let start = (self.from as usize).saturating_sub(1);
        let end = (self.to as usize).saturating_sub(1).min(total_pages - 1);
        // `to = 0` parses as "before the first page"
        if self.to == 0 || start > end {
            return None;
        }
        Some(start..=end)
    }
}

/// Specifies a set of pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageSelection {
    /// All pages (default).
    #[default]
    All,
    /// A single page (1-indexed).
    Single(usize),
    /// A contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

/// How [`crate::pdf::split_pdf_with`] cuts the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SplitMode {
    /// User-entered custom ranges, applied in the given order.
    Ranges(Vec<PageRange>),
    /// Consecutive chunks of `n` pages; the last chunk may be shorter.
    FixedRanges(u32),
    /// Pull the selected pages into one range.
    Extract(PageSelection),
}

/// Options for range-based splitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitOptions {
    pub mode: SplitMode,
    /// Put every range into one output PDF instead of one PDF per range.
    pub merge_ranges: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            mode: SplitMode::Ranges(vec![PageRange::new(1, 1)]),
            merge_ranges: false,
        }
    }
}

impl SplitOptions {
    pub fn ranges(ranges: Vec<PageRange>, merge_ranges: bool) -> Self {
        Self {
            mode: SplitMode::Ranges(ranges),
            merge_ranges,
        }
    }

    /// Resolve the mode into clamped 0-based ranges for a `total`-page document.
    pub fn resolve(&self, total_pages: usize) -> Vec<std::ops::RangeInclusive<usize>> {
        match &self.mode {
            SplitMode::Ranges(ranges) => ranges
                .iter()
                .filter_map(|r| r.to_indices(total_pages))
                .collect(),
            SplitMode::FixedRanges(n) => {
                let n = (*n).max(1) as usize;
                (0..total_pages)
                    .step_by(n)
                    .map(|start| start..=(start + n - 1).min(total_pages - 1))
                    .collect()
            }
            SplitMode::Extract(selection) => selection
                .to_indices(total_pages)
                .into_iter()
                .map(|i| i..=i)
                .collect(),
        }
    }
}

// ── Watermark ────────────────────────────────────────────────────────────

/// Appearance of the text stamped by [`crate::pdf::watermark_pdf`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkOptions {
    /// Watermark text. Default: `LOVING CONVERTER`.
    pub text: String,
    /// Font size in points. Default: 50.
    pub font_size: f32,
    /// Fill colour as RGB components in `0.0..=1.0`. Default: pink (1, 0.4, 0.7).
    pub color: [f32; 3],
    /// Fill opacity in `0.0..=1.0`. Default: 0.3.
    pub opacity: f32,
    /// Counter-clockwise rotation of the baseline in degrees. Default: 45.
    pub angle_degrees: f32,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            text: "LOVING CONVERTER".to_string(),
            font_size: 50.0,
            color: [1.0, 0.4, 0.7],
            opacity: 0.3,
            angle_degrees: 45.0,
        }
    }
}

impl WatermarkOptions {
    pub fn builder() -> WatermarkOptionsBuilder {
        WatermarkOptionsBuilder {
            options: Self::default(),
        }
    }
}

/// Builder for [`WatermarkOptions`].
#[derive(Debug)]
pub struct WatermarkOptionsBuilder {
    options: WatermarkOptions,
}

impl WatermarkOptionsBuilder {
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.options.text = text.into();
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.options.font_size = size.clamp(1.0, 500.0);
        self
    }

    pub fn color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.options.color = [r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0)];
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.options.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn angle_degrees(mut self, angle: f32) -> Self {
        self.options.angle_degrees = angle;
        self
    }

    pub fn build(self) -> Result<WatermarkOptions, ConverterError> {
        if self.options.text.trim().is_empty() {
            return Err(ConverterError::InvalidConfig(
                "Watermark text must not be empty".into(),
            ));
        }
        Ok(self.options)
    }
}

// ── PDF → DOCX ───────────────────────────────────────────────────────────

/// Configuration for [`crate::convert::pdf_to_word`].
///
/// # Example
/// ```rust
/// use loving_converter::PdfToWordConfig;
///
/// let config = PdfToWordConfig::builder()
///     .render_scale(2.0)
///     .jpeg_quality(85)
///     .paragraph_gap_ratio(Some(1.5))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct PdfToWordConfig {
    /// Scale factor applied to the page size when rendering the image
    /// fallback. Range: 0.5–4.0. Default: 2.0.
    pub render_scale: f32,

    /// JPEG quality of rendered pages. Range: 1–100. Default: 92.
    pub jpeg_quality: u8,

    /// Vertical gap, as a multiple of the page's median line gap, above
    /// which two consecutive lines start a new paragraph. `None` joins all
    /// lines of a page with single newlines. Default: `None`.
    pub paragraph_gap_ratio: Option<f32>,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PdfToWordConfig {
    fn default() -> Self {
        Self {
            render_scale: 2.0,
            jpeg_quality: 92,
            paragraph_gap_ratio: None,
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PdfToWordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfToWordConfig")
            .field("render_scale", &self.render_scale)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("paragraph_gap_ratio", &self.paragraph_gap_ratio)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl PdfToWordConfig {
    pub fn builder() -> PdfToWordConfigBuilder {
        PdfToWordConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`PdfToWordConfig`].
#[derive(Debug)]
pub struct PdfToWordConfigBuilder {
    config: PdfToWordConfig,
}

impl PdfToWordConfigBuilder {
    pub fn render_scale(mut self, scale: f32) -> Self {
        self.config.render_scale = scale.clamp(0.5, 4.0);
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn paragraph_gap_ratio(mut self, ratio: Option<f32>) -> Self {
        self.config.paragraph_gap_ratio = ratio;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PdfToWordConfig, ConverterError> {
        if let Some(ratio) = self.config.paragraph_gap_ratio {
            if !ratio.is_finite() || ratio <= 1.0 {
                return Err(ConverterError::InvalidConfig(format!(
                    "Paragraph gap ratio must be > 1.0, got {ratio}"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── CloudConvert ─────────────────────────────────────────────────────────

/// Default API root of the CloudConvert v2 REST API.
pub const CLOUDCONVERT_API: &str = "https://api.cloudconvert.com/v2";

/// Environment variable holding the CloudConvert API key.
pub const CLOUDCONVERT_API_KEY_ENV: &str = "CLOUDCONVERT_API_KEY";

/// Connection settings for [`crate::cloudconvert::CloudConvertClient`].
#[derive(Clone)]
pub struct CloudConvertConfig {
    /// Bearer token for the API.
    pub api_key: String,
    /// API root, without a trailing slash. Default: [`CLOUDCONVERT_API`].
    pub base_url: String,
    /// Pause between two job-status requests. Default: 2000 ms.
    pub poll_interval_ms: u64,
    /// Number of job-status requests before giving up. Default: 120 (≈ 4 min).
    pub max_polls: u32,
    /// Timeout applied to each individual HTTP request. Default: 60 s.
    pub request_timeout_secs: u64,
}

impl fmt::Debug for CloudConvertConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudConvertConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("max_polls", &self.max_polls)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl CloudConvertConfig {
    pub fn builder(api_key: impl Into<String>) -> CloudConvertConfigBuilder {
        CloudConvertConfigBuilder {
            config: Self {
                api_key: api_key.into(),
                base_url: CLOUDCONVERT_API.to_string(),
                poll_interval_ms: 2000,
                max_polls: 120,
                request_timeout_secs: 60,
            },
        }
    }

    /// Read the API key from the environment (`.env.local` is loaded first
    /// when present). A missing or empty key is a fatal configuration error.
    pub fn from_env() -> Result<Self, ConverterError> {
        dotenvy::from_filename(".env.local").ok();
        let key = std::env::var(CLOUDCONVERT_API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConverterError::MissingApiKey)?;
        Self::builder(key).build()
    }
}

/// Builder for [`CloudConvertConfig`].
#[derive(Debug)]
pub struct CloudConvertConfigBuilder {
    config: CloudConvertConfig,
}

impl CloudConvertConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms;
        self
    }

    pub fn max_polls(mut self, n: u32) -> Self {
        self.config.max_polls = n.max(1);
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs.max(1);
        self
    }

    pub fn build(self) -> Result<CloudConvertConfig, ConverterError> {
        if self.config.api_key.trim().is_empty() {
            return Err(ConverterError::MissingApiKey);
        }
        if !self.config.base_url.starts_with("http://") && !self.config.base_url.starts_with("https://") {
            return Err(ConverterError::InvalidConfig(format!(
                "CloudConvert base URL must be http(s), got '{}'",
                self.config.base_url
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_range_clamps_to_document() {
        assert_eq!(PageRange::new(2, 10).to_indices(4), Some(1..=3));
        assert_eq!(PageRange::new(0, 2).to_indices(4), Some(0..=1));
        assert_eq!(PageRange::new(3, 2).to_indices(4), None);
        assert_eq!(PageRange::new(6, 9).to_indices(4), None);
        assert_eq!(PageRange::new(1, 1).to_indices(0), None);
    }

    #[test]
    fn fixed_ranges_chunk_the_document() {
        let opts = SplitOptions {
            mode: SplitMode::FixedRanges(2),
            merge_ranges: false,
        };
        assert_eq!(opts.resolve(5), vec![0..=1, 2..=3, 4..=4]);
        assert!(opts.resolve(0).is_empty());
    }

    #[test]
    fn extract_mode_uses_page_selection() {
        let opts = SplitOptions {
            mode: SplitMode::Extract(PageSelection::Set(vec![3, 1, 3, 9])),
            merge_ranges: true,
        };
        assert_eq!(opts.resolve(4), vec![0..=0, 2..=2]);
    }

    #[test]
    fn test_page_selection_to_indices() {
        assert_eq!(PageSelection::All.to_indices(5), vec![0, 1, 2, 3, 4]);
        assert_eq!(PageSelection::Single(3).to_indices(5), vec![2]);
        assert_eq!(PageSelection::Single(6).to_indices(5), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 4).to_indices(5), vec![1, 2, 3]);
        assert_eq!(
            PageSelection::Set(vec![3, 1, 3]).to_indices(5),
            vec![0, 2] // deduplicated and sorted
        );
    }

    #[test]
    fn watermark_builder_clamps_and_validates() {
        let wm = WatermarkOptions::builder()
            .opacity(3.0)
            .color(2.0, -1.0, 0.5)
            .build()
            .unwrap();
        assert_eq!(wm.opacity, 1.0);
        assert_eq!(wm.color, [1.0, 0.0, 0.5]);
        assert!(WatermarkOptions::builder().text("  ").build().is_err());
    }

    #[test]
    fn pdf_to_word_builder_rejects_bad_gap_ratio() {
        assert!(PdfToWordConfig::builder()
            .paragraph_gap_ratio(Some(0.5))
            .build()
            .is_err());
        let cfg = PdfToWordConfig::builder().render_scale(10.0).build().unwrap();
        assert_eq!(cfg.render_scale, 4.0);
    }

    #[test]
    fn cloudconvert_builder_requires_key() {
        assert!(matches!(
            CloudConvertConfig::builder("").build(),
            Err(ConverterError::MissingApiKey)
        ));
        let cfg = CloudConvertConfig::builder("k")
            .base_url("http://localhost:1234/v2/")
            .build()
            .unwrap();
        assert_eq!(cfg.base_url, "http://localhost:1234/v2");
        assert_eq!(cfg.max_polls, 120);
    }

    #[test]
    fn cloudconvert_debug_redacts_key() {
        let cfg = CloudConvertConfig::builder("secret-key").build().unwrap();
        assert!(!format!("{cfg:?}").contains("secret-key"));
    }
}
