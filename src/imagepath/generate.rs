//! Canonical path generation: [`Params`] → path string.
//!
//! The generator is the inverse of the parser on canonical inputs: feeding
//! its output back through [`super::parse::parse`] yields the same
//! `Params`. Segment order is fixed; absent fields are omitted; the
//! padding shorthand and default trim corner are collapsed so the output
//! is the unique canonical spelling.

use super::params::{Params, TrimBy};
use super::sign::sign;

/// Build the unsigned, unprefixed canonical path. This exact string is
/// what the signature covers.
pub fn generate_path(params: &Params) -> String {
    let mut segments: Vec<String> = Vec::new();

    if params.meta {
        segments.push("meta".to_string());
    }

    if params.trim {
        let mut seg = String::from("trim");
        if params.trim_by == TrimBy::BottomRight {
            seg.push(':');
            seg.push_str(TrimBy::BottomRight.as_str());
        }
        if params.trim_tolerance > 0 {
            seg.push(':');
            seg.push_str(&params.trim_tolerance.to_string());
        }
        segments.push(seg);
    }

    if params.has_percent_crop() {
        segments.push(format!(
            "{:.6}x{:.6}:{:.6}x{:.6}",
            params.crop_left_percent,
            params.crop_top_percent,
            params.crop_right_percent,
            params.crop_bottom_percent,
        ));
    } else if params.has_crop() {
        segments.push(format!(
            "{}x{}:{}x{}",
            format_coord(params.crop_left),
            format_coord(params.crop_top),
            format_coord(params.crop_right),
            format_coord(params.crop_bottom),
        ));
    }

    if params.fit_in {
        segments.push("fit-in".to_string());
    }

    if params.stretch {
        segments.push("stretch".to_string());
    }

    // Padding alone still needs the dimensions anchor (`0x0`) in front of
    // it, otherwise the short padding form would re-parse as dimensions.
    if params.width != 0
        || params.height != 0
        || params.h_flip
        || params.v_flip
        || params.has_padding()
    {
        let width = if params.h_flip {
            format!("-{}", params.width)
        } else {
            params.width.to_string()
        };
        let height = if params.v_flip {
            format!("-{}", params.height)
        } else {
            params.height.to_string()
        };
        segments.push(format!("{}x{}", width, height));
    }

    if params.has_padding() {
        if params.padding_left == params.padding_right
            && params.padding_top == params.padding_bottom
        {
            segments.push(format!("{}x{}", params.padding_left, params.padding_top));
        } else {
            segments.push(format!(
                "{}x{}:{}x{}",
                params.padding_left,
                params.padding_top,
                params.padding_right,
                params.padding_bottom,
            ));
        }
    }

    if let Some(align) = params.h_align {
        segments.push(align.as_str().to_string());
    }

    if let Some(align) = params.v_align {
        segments.push(align.as_str().to_string());
    }

    if params.smart {
        segments.push("smart".to_string());
    }

    if !params.filters.is_empty() {
        let clauses: Vec<String> = params
            .filters
            .iter()
            .map(|f| format!("{}({})", f.name, f.args))
            .collect();
        segments.push(format!("filters:{}", clauses.join(":")));
    }

    if !params.image.is_empty() {
        segments.push(params.image.clone());
    }

    segments.join("/")
}

/// Signed form: the canonical path prefixed with its signature.
pub fn generate(params: &Params, secret: &str) -> String {
    let path = generate_path(params);
    format!("{}/{}", sign(&path, secret), path)
}

/// Unsigned form with the explicit signature opt-out prefix.
pub fn generate_unsafe(params: &Params) -> String {
    format!("unsafe/{}", generate_path(params))
}

// Pixel crop coordinates are whole numbers in practice; spell them as
// integers so the output re-parses into the pixel form.
fn format_coord(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}
