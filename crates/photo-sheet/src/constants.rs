//! Shared constants for sheet composition
//!
//! This module centralizes the fixed numbers of the print products:
//! resolution, frame aspect ratios, zoom limits, and upload limits.

// =============================================================================
// Resolution
// =============================================================================

/// Output resolution for every sheet (dots per inch)
pub const SHEET_DPI: u32 = 300;

/// Convert inches to pixels at the sheet resolution
#[inline]
pub fn inches_to_px(inches: f64) -> u32 {
    (inches * SHEET_DPI as f64).round() as u32
}

// =============================================================================
// Crop Frames
// =============================================================================

/// Identity photo frame: 3.5cm × 4.5cm (width / height)
pub const PASSPORT_ASPECT_RATIO: f64 = 3.5 / 4.5;

/// Caption print frame: 2.3 × 2.5 (width / height)
pub const POLAROID_ASPECT_RATIO: f64 = 2.3 / 2.5;

/// Share of the container the fixed crop frame may occupy
pub const FIXED_FRAME_FRACTION: f64 = 0.7;

/// Upper bound for the fixed frame width in container pixels
pub const FIXED_FRAME_MAX_WIDTH: f64 = 280.0;

// =============================================================================
// Zoom
// =============================================================================

pub const PASSPORT_ZOOM_MIN: f64 = 0.5;
pub const PASSPORT_ZOOM_MAX: f64 = 3.0;

pub const POLAROID_ZOOM_MIN: f64 = 1.0;
pub const POLAROID_ZOOM_MAX: f64 = 3.0;

/// Increment used by the zoom in/out buttons
pub const ZOOM_STEP: f64 = 0.1;

// =============================================================================
// Upload
// =============================================================================

/// Largest accepted upload (10 MB)
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Declared MIME types accepted when the bytes cannot be sniffed
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

// =============================================================================
// Captions and Enhancement
// =============================================================================

/// Maximum caption length in characters
pub const MAX_CAPTION_CHARS: usize = 50;

/// Default color enhancement strength
pub const DEFAULT_ENHANCE_LEVEL: f32 = 0.40;

/// Tolerance for floating point comparisons on normalized coordinates
pub const NORMALIZED_EPSILON: f64 = 1e-9;
