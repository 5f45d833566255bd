//! Transformation request data model.
//!
//! `Params` is the structured form of a gateway path: one flat value
//! describing everything a single request asks for. It is produced by
//! [`crate::imagepath::parse`], rendered back by
//! [`crate::imagepath::generate`], and serializes to JSON with omit-empty
//! semantics for the metadata endpoint.

use serde::{Deserialize, Serialize};

/// Anchor corner used when auto-trimming uniform borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrimBy {
    #[default]
    TopLeft,
    BottomRight,
}

impl TrimBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrimBy::TopLeft => "top-left",
            TrimBy::BottomRight => "bottom-right",
        }
    }
}

/// Horizontal alignment of the crop window. Center is the unset state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    Left,
    Right,
}

impl HAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            HAlign::Left => "left",
            HAlign::Right => "right",
        }
    }
}

/// Vertical alignment of the crop window. Middle is the unset state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    Top,
    Bottom,
}

impl VAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            VAlign::Top => "top",
            VAlign::Bottom => "bottom",
        }
    }
}

/// A single filter clause: lower-case name plus the raw argument body.
///
/// The body is kept verbatim; commas, colons and slashes inside it are not
/// structural (watermark filters carry whole URLs in there). Only the outer
/// parentheses are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub args: String,
}

/// One image transformation request.
///
/// Created by the parser from an immutable path string, inspected but never
/// mutated by downstream pipeline stages, and dropped with the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Canonical path excluding any signature prefix and `unsafe/` marker.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    /// URL-safe base64 signature; empty when the request is unsigned.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hash: String,
    /// Source image identifier: the path tail, possibly a full URL.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(rename = "unsafe", skip_serializing_if = "is_false")]
    pub is_unsafe: bool,
    /// Metadata output requested instead of the image itself.
    #[serde(skip_serializing_if = "is_false")]
    pub meta: bool,

    // === Trim ===
    #[serde(skip_serializing_if = "is_false")]
    pub trim: bool,
    #[serde(skip_serializing_if = "trim_by_is_default")]
    pub trim_by: TrimBy,
    /// Color-distance tolerance for trimming; 442 is the distance between
    /// opposite RGB corners and the meaningful maximum.
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub trim_tolerance: u32,

    // === Crop, pixel form ===
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub crop_left: f64,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub crop_top: f64,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub crop_right: f64,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub crop_bottom: f64,

    // === Crop, percentage form (fractions of the source dimensions) ===
    // Exactly one of the two crop forms is populated per request.
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub crop_left_percent: f64,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub crop_top_percent: f64,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub crop_right_percent: f64,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub crop_bottom_percent: f64,

    // === Sizing ===
    #[serde(skip_serializing_if = "is_false")]
    pub fit_in: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub stretch: bool,
    /// Target width, stored as magnitude; a flip on the axis lives in
    /// `h_flip` and is re-emitted as a sign by the generator.
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub width: i32,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub height: i32,
    #[serde(skip_serializing_if = "is_false")]
    pub h_flip: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub v_flip: bool,

    // === Padding ===
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub padding_left: u32,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub padding_top: u32,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub padding_right: u32,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub padding_bottom: u32,

    // === Alignment ===
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h_align: Option<HAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_align: Option<VAlign>,
    #[serde(skip_serializing_if = "is_false")]
    pub smart: bool,

    /// Ordered filter chain; order is significant and preserved.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
}

impl Params {
    /// True when any pixel-form crop coordinate is set.
    pub fn has_crop(&self) -> bool {
        self.crop_left != 0.0
            || self.crop_top != 0.0
            || self.crop_right != 0.0
            || self.crop_bottom != 0.0
    }

    /// True when any percentage-form crop coordinate is set.
    pub fn has_percent_crop(&self) -> bool {
        self.crop_left_percent != 0.0
            || self.crop_top_percent != 0.0
            || self.crop_right_percent != 0.0
            || self.crop_bottom_percent != 0.0
    }

    pub fn has_padding(&self) -> bool {
        self.padding_left > 0
            || self.padding_top > 0
            || self.padding_right > 0
            || self.padding_bottom > 0
    }
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

fn is_zero_i32(v: &i32) -> bool {
    *v == 0
}

fn is_zero_f64(v: &f64) -> bool {
    *v == 0.0
}

fn trim_by_is_default(v: &TrimBy) -> bool {
    *v == TrimBy::TopLeft
}
