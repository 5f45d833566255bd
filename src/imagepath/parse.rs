//! Path parser: opaque gateway path → [`Params`].
//!
//! Parsing is total. Segments are walked left to right and handed to a
//! fixed-priority list of classifiers; the first classifier that accepts a
//! segment consumes it. When no classifier accepts, the transform phase
//! ends and everything remaining (slashes included) becomes the source
//! image identifier. Malformed input therefore never fails, it just ends
//! up in `image`.

use regex::Regex;

use super::params::{Filter, HAlign, Params, TrimBy, VAlign};
use crate::constants::SIGNATURE_LEN;

/// Compiled segment classifiers, built once per parse.
struct Classifiers {
    trim: Regex,
    crop: Regex,
    dims: Regex,
    padding: Regex,
}

impl Classifiers {
    fn new() -> Self {
        Self {
            trim: Regex::new(r"^trim(?::(top-left|bottom-right))?(?::(\d+))?$")
                .expect("trim classifier is a compile-time constant"),
            crop: Regex::new(
                r"^(-?\d+(?:\.\d+)?)x(-?\d+(?:\.\d+)?):(-?\d+(?:\.\d+)?)x(-?\d+(?:\.\d+)?)$",
            )
            .expect("crop classifier is a compile-time constant"),
            dims: Regex::new(r"^(-?\d+)x(-?\d+)$")
                .expect("dimensions classifier is a compile-time constant"),
            padding: Regex::new(r"^(\d+)x(\d+)(?::(\d+)x(\d+))?$")
                .expect("padding classifier is a compile-time constant"),
        }
    }
}

/// One-shot guards: each transform segment may appear at most once, and a
/// few classifiers depend on what has already matched. Crop is disabled
/// once dimensions have matched, which is what lets `5x6:7x8` read as pair
/// padding after a dimensions segment but as a crop before one.
#[derive(Default)]
struct Seen {
    crop: bool,
    dims: bool,
    padding: bool,
}

/// Parse a gateway path into [`Params`].
///
/// The optional leading `/` is ignored. A first segment that is either a
/// candidate signature (27 URL-safe base64 characters plus `=`) or the
/// literal `unsafe` is lifted out before segment classification; `path`
/// holds the remainder verbatim, which is also the exact string the
/// signature covers.
pub fn parse(uri: &str) -> Params {
    let mut params = Params::default();
    let mut rest = uri.strip_prefix('/').unwrap_or(uri);

    if let Some((first, tail)) = rest.split_once('/') {
        if is_candidate_hash(first) {
            params.hash = first.to_string();
            rest = tail;
        } else if first == "unsafe" {
            params.is_unsafe = true;
            rest = tail;
        }
    }

    params.path = rest.to_string();

    let classifiers = Classifiers::new();
    let mut seen = Seen::default();
    let mut pos = 0usize;

    while pos < rest.len() {
        let remainder = &rest[pos..];
        let segment = match remainder.find('/') {
            Some(i) => &remainder[..i],
            None => remainder,
        };

        if classify(segment, &mut params, &mut seen, &classifiers) {
            pos += segment.len();
            if pos < rest.len() {
                pos += 1; // the separating '/'
            }
            continue;
        }

        if let Some(region) = remainder.strip_prefix("filters:") {
            let (filters, consumed) = parse_filters(region);
            params.filters = filters;
            let after = &region[consumed..];
            params.image = after.strip_prefix('/').unwrap_or(after).to_string();
            return params;
        }

        // No classifier accepted: the transform phase is over and the
        // remainder, slashes and all, is the source image.
        params.image = remainder.to_string();
        return params;
    }

    params
}

/// Candidate signature test: 27 characters of the URL-safe base64 alphabet
/// followed by `=`. The standard alphabet's `+` and `/` are excluded so
/// ordinary path segments do not false-positive.
fn is_candidate_hash(segment: &str) -> bool {
    segment.len() == SIGNATURE_LEN
        && segment.ends_with('=')
        && segment[..SIGNATURE_LEN - 1]
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn classify(segment: &str, params: &mut Params, seen: &mut Seen, cls: &Classifiers) -> bool {
    if !params.meta && segment == "meta" {
        params.meta = true;
        return true;
    }

    if !params.trim {
        if let Some(caps) = cls.trim.captures(segment) {
            params.trim = true;
            params.trim_by = match caps.get(1).map(|m| m.as_str()) {
                Some("bottom-right") => TrimBy::BottomRight,
                _ => TrimBy::TopLeft,
            };
            if let Some(tolerance) = caps.get(2) {
                params.trim_tolerance = parse_u32(tolerance.as_str());
            }
            return true;
        }
    }

    if !seen.crop && !seen.dims {
        if let Some(caps) = cls.crop.captures(segment) {
            let left = parse_f64(&caps[1]);
            let top = parse_f64(&caps[2]);
            let right = parse_f64(&caps[3]);
            let bottom = parse_f64(&caps[4]);
            // A decimal point anywhere switches the whole segment to
            // fractional semantics.
            if segment.contains('.') {
                params.crop_left_percent = left;
                params.crop_top_percent = top;
                params.crop_right_percent = right;
                params.crop_bottom_percent = bottom;
            } else {
                params.crop_left = left;
                params.crop_top = top;
                params.crop_right = right;
                params.crop_bottom = bottom;
            }
            seen.crop = true;
            return true;
        }
    }

    if !params.fit_in && segment == "fit-in" {
        params.fit_in = true;
        return true;
    }

    if !params.stretch && segment == "stretch" {
        params.stretch = true;
        return true;
    }

    if !seen.dims {
        if let Some(caps) = cls.dims.captures(segment) {
            params.h_flip = caps[1].starts_with('-');
            params.v_flip = caps[2].starts_with('-');
            params.width = parse_i32(&caps[1]).abs();
            params.height = parse_i32(&caps[2]).abs();
            seen.dims = true;
            return true;
        }
    }

    if !seen.padding {
        if let Some(caps) = cls.padding.captures(segment) {
            match (caps.get(3), caps.get(4)) {
                (Some(right), Some(bottom)) => {
                    params.padding_left = parse_u32(&caps[1]);
                    params.padding_top = parse_u32(&caps[2]);
                    params.padding_right = parse_u32(right.as_str());
                    params.padding_bottom = parse_u32(bottom.as_str());
                    seen.padding = true;
                    return true;
                }
                // The short `AxB` form only reads as padding once
                // dimensions have been consumed; before that the
                // dimensions classifier above owns the shape.
                _ if seen.dims => {
                    let left = parse_u32(&caps[1]);
                    let top = parse_u32(&caps[2]);
                    params.padding_left = left;
                    params.padding_top = top;
                    params.padding_right = left;
                    params.padding_bottom = top;
                    seen.padding = true;
                    return true;
                }
                _ => {}
            }
        }
    }

    if params.h_align.is_none() {
        match segment {
            "left" => {
                params.h_align = Some(HAlign::Left);
                return true;
            }
            "right" => {
                params.h_align = Some(HAlign::Right);
                return true;
            }
            _ => {}
        }
    }

    if params.v_align.is_none() {
        match segment {
            "top" => {
                params.v_align = Some(VAlign::Top);
                return true;
            }
            "bottom" => {
                params.v_align = Some(VAlign::Bottom);
                return true;
            }
            _ => {}
        }
    }

    if !params.smart && segment == "smart" {
        params.smart = true;
        return true;
    }

    false
}

/// Scan `name(body)` clauses separated by `:`, starting right after the
/// `filters:` prefix. Bodies are consumed byte-wise with a parenthesis
/// depth count, so slashes and colons inside a body (watermark URLs) are
/// not structural. Returns the parsed clauses and the offset where
/// scanning stopped; the caller sweeps everything past that offset into
/// the image tail.
fn parse_filters(region: &str) -> (Vec<Filter>, usize) {
    let bytes = region.as_bytes();
    let mut filters = Vec::new();
    let mut pos = 0usize;

    loop {
        let clause_start = pos;

        let name_start = pos;
        if matches!(bytes.get(pos).copied(), Some(b'a'..=b'z' | b'_')) {
            pos += 1;
            while matches!(bytes.get(pos).copied(), Some(b'a'..=b'z' | b'0'..=b'9' | b'_')) {
                pos += 1;
            }
        }
        if pos == name_start || bytes.get(pos) != Some(&b'(') {
            return (filters, clause_start);
        }
        let name = &region[name_start..pos];

        pos += 1; // '('
        let body_start = pos;
        let mut depth = 1usize;
        while pos < bytes.len() && depth > 0 {
            match bytes[pos] {
                b'(' => depth += 1,
                b')' => depth -= 1,
                _ => {}
            }
            pos += 1;
        }
        if depth > 0 {
            // Unbalanced body: drop the clause, sweep it into the tail.
            return (filters, clause_start);
        }

        filters.push(Filter {
            name: name.to_string(),
            args: region[body_start..pos - 1].to_string(),
        });

        if bytes.get(pos) == Some(&b':') {
            pos += 1;
            continue;
        }
        return (filters, pos);
    }
}

// Classifier captures are digit runs by construction; a value too large
// for the target type degrades to 0 so parsing stays total.
fn parse_u32(s: &str) -> u32 {
    s.parse().unwrap_or_default()
}

fn parse_i32(s: &str) -> i32 {
    s.parse().unwrap_or_default()
}

fn parse_f64(s: &str) -> f64 {
    s.parse().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let params = parse("");
        assert_eq!(params, Params::default());
    }

    #[test]
    fn test_parse_image_only() {
        let params = parse("some/image/path.jpg");
        assert_eq!(params.image, "some/image/path.jpg");
        assert_eq!(params.path, "some/image/path.jpg");
    }

    #[test]
    fn test_parse_leading_slash_stripped() {
        let params = parse("/fit-in/img");
        assert!(params.fit_in);
        assert_eq!(params.image, "img");
        assert_eq!(params.path, "fit-in/img");
    }

    #[test]
    fn test_parse_unsafe_prefix() {
        let params = parse("unsafe/300x200/img");
        assert!(params.is_unsafe);
        assert_eq!(params.path, "300x200/img");
        assert_eq!(params.width, 300);
        assert_eq!(params.height, 200);
    }

    #[test]
    fn test_parse_hash_prefix() {
        let params = parse("VTAq7YIRbEXgtwAcsTMhAjvBuT8=/300x200/img");
        assert_eq!(params.hash, "VTAq7YIRbEXgtwAcsTMhAjvBuT8=");
        assert!(!params.is_unsafe);
        assert_eq!(params.path, "300x200/img");
    }

    #[test]
    fn test_parse_hash_rejects_standard_base64_alphabet() {
        // '+' is not in the URL-safe alphabet; the segment is not a
        // signature and the whole input reads as an image tail.
        let params = parse("VTAq7YIRbEXgtwAcsTMhAjv+uT8=/img");
        assert!(params.hash.is_empty());
        assert_eq!(params.image, "VTAq7YIRbEXgtwAcsTMhAjv+uT8=/img");
    }

    #[test]
    fn test_parse_hash_rejects_wrong_length() {
        let params = parse("c2hvcnQ=/img");
        assert!(params.hash.is_empty());
        assert_eq!(params.image, "c2hvcnQ=/img");
    }

    #[test]
    fn test_parse_negative_dimensions_set_flips() {
        let params = parse("unsafe/-300x-200/img");
        assert_eq!(params.width, 300);
        assert_eq!(params.height, 200);
        assert!(params.h_flip);
        assert!(params.v_flip);
    }

    #[test]
    fn test_parse_single_axis_flip() {
        let params = parse("unsafe/-300x200/img");
        assert!(params.h_flip);
        assert!(!params.v_flip);
        assert_eq!(params.width, 300);
        assert_eq!(params.height, 200);
    }

    #[test]
    fn test_parse_trim_bare() {
        let params = parse("trim/img");
        assert!(params.trim);
        assert_eq!(params.trim_by, TrimBy::TopLeft);
        assert_eq!(params.trim_tolerance, 0);
    }

    #[test]
    fn test_parse_trim_tolerance() {
        let params = parse("trim:100/img");
        assert!(params.trim);
        assert_eq!(params.trim_by, TrimBy::TopLeft);
        assert_eq!(params.trim_tolerance, 100);
    }

    #[test]
    fn test_parse_trim_tolerance_not_clamped() {
        // Values past MAX_TRIM_TOLERANCE are syntactically valid; range
        // enforcement belongs to the processing stage.
        let params = parse("trim:500/img");
        assert!(params.trim_tolerance > crate::constants::MAX_TRIM_TOLERANCE);
        assert_eq!(params.trim_tolerance, 500);
    }

    #[test]
    fn test_parse_trim_by_corner() {
        let params = parse("trim:bottom-right/img");
        assert!(params.trim);
        assert_eq!(params.trim_by, TrimBy::BottomRight);
    }

    #[test]
    fn test_parse_trim_by_corner_with_tolerance() {
        let params = parse("trim:bottom-right:50/img");
        assert_eq!(params.trim_by, TrimBy::BottomRight);
        assert_eq!(params.trim_tolerance, 50);
    }

    #[test]
    fn test_parse_pixel_crop() {
        let params = parse("10x11:12x13/img");
        assert_eq!(params.crop_left, 10.0);
        assert_eq!(params.crop_top, 11.0);
        assert_eq!(params.crop_right, 12.0);
        assert_eq!(params.crop_bottom, 13.0);
        assert!(!params.has_percent_crop());
    }

    #[test]
    fn test_parse_percentage_crop() {
        let params = parse("0.200000x0.150000:0.450000x0.670000/img");
        assert_eq!(params.crop_left_percent, 0.2);
        assert_eq!(params.crop_top_percent, 0.15);
        assert_eq!(params.crop_right_percent, 0.45);
        assert_eq!(params.crop_bottom_percent, 0.67);
        assert!(!params.has_crop());
    }

    #[test]
    fn test_parse_short_axb_before_dimensions_is_dimensions() {
        let params = parse("fit-in/5x6/img");
        assert_eq!(params.width, 5);
        assert_eq!(params.height, 6);
        assert!(!params.has_padding());
    }

    #[test]
    fn test_parse_short_padding_after_dimensions() {
        let params = parse("300x200/5x6/img");
        assert_eq!(params.width, 300);
        assert_eq!(params.padding_left, 5);
        assert_eq!(params.padding_top, 6);
        assert_eq!(params.padding_right, 5);
        assert_eq!(params.padding_bottom, 6);
    }

    #[test]
    fn test_parse_pair_padding_after_zero_dimensions() {
        let params = parse("fit-in/0x0/5x6:7x8/img");
        assert!(params.fit_in);
        assert_eq!(params.width, 0);
        assert_eq!(params.height, 0);
        assert_eq!(params.padding_left, 5);
        assert_eq!(params.padding_top, 6);
        assert_eq!(params.padding_right, 7);
        assert_eq!(params.padding_bottom, 8);
        assert!(!params.has_crop());
    }

    #[test]
    fn test_parse_crop_then_dimensions() {
        let params = parse("10x11:12x13/300x200/img");
        assert_eq!(params.crop_right, 12.0);
        assert_eq!(params.width, 300);
    }

    #[test]
    fn test_parse_alignment_literals() {
        let params = parse("left/top/img");
        assert_eq!(params.h_align, Some(HAlign::Left));
        assert_eq!(params.v_align, Some(VAlign::Top));

        let params = parse("right/bottom/img");
        assert_eq!(params.h_align, Some(HAlign::Right));
        assert_eq!(params.v_align, Some(VAlign::Bottom));
    }

    #[test]
    fn test_parse_unknown_segment_ends_transform_phase() {
        let params = parse("meta/whatever/fit-in/img");
        assert!(params.meta);
        assert!(!params.fit_in);
        assert_eq!(params.image, "whatever/fit-in/img");
    }

    #[test]
    fn test_parse_filter_without_args() {
        let params = parse("filters:some_filter()/img");
        assert_eq!(
            params.filters,
            vec![Filter {
                name: "some_filter".to_string(),
                args: String::new(),
            }]
        );
        assert_eq!(params.image, "img");
    }

    #[test]
    fn test_parse_filter_with_url_args() {
        let params = parse("filters:watermark(http://host/a/b.png,0,0,0)/img");
        assert_eq!(params.filters.len(), 1);
        assert_eq!(params.filters[0].name, "watermark");
        assert_eq!(params.filters[0].args, "http://host/a/b.png,0,0,0");
        assert_eq!(params.image, "img");
    }

    #[test]
    fn test_parse_multiple_filters() {
        let params = parse("filters:brightness(-50):grayscale()/img");
        assert_eq!(params.filters.len(), 2);
        assert_eq!(params.filters[0].name, "brightness");
        assert_eq!(params.filters[0].args, "-50");
        assert_eq!(params.filters[1].name, "grayscale");
        assert_eq!(params.filters[1].args, "");
    }

    #[test]
    fn test_parse_filters_at_end_of_input() {
        let params = parse("filters:grayscale()");
        assert_eq!(params.filters.len(), 1);
        assert_eq!(params.image, "");
    }

    #[test]
    fn test_parse_unbalanced_filter_body_swept_to_image() {
        let params = parse("filters:bad(oops/img");
        assert!(params.filters.is_empty());
        assert_eq!(params.image, "bad(oops/img");
    }

    #[test]
    fn test_parse_image_with_collapsed_scheme() {
        let params = parse("unsafe/https:/host/a.png");
        assert!(params.is_unsafe);
        assert_eq!(params.image, "https:/host/a.png");
        assert_eq!(params.path, "https:/host/a.png");
    }

    #[test]
    fn test_parse_image_with_intact_scheme() {
        let params = parse("unsafe/https://host/a.png");
        assert_eq!(params.image, "https://host/a.png");
        assert_eq!(params.path, "https://host/a.png");
    }

    #[test]
    fn test_parse_duplicate_flag_falls_to_image() {
        let params = parse("smart/smart/img");
        assert!(params.smart);
        assert_eq!(params.image, "smart/img");
    }
}
