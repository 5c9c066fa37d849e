// SPDX-License-Identifier: MIT OR Apache-2.0
//! Platform-neutral curve resampling.
//!
//! The portable curve form is an x-sorted polyline with no tangent
//! metadata. Generation subdivides adaptively: a segment is split at its
//! midpoint whenever the curve deviates from the straight chord by more
//! than the threshold at either of two probe points, until segments
//! shrink below the threshold width.

use linework_graph::curve::{Curve, CurveKey};

/// Minimum segment width and maximum chord deviation
const THRESHOLD: f32 = 0.05;

/// Generate the universal polyline form of a curve
///
/// The result is the curve's own key points plus any inserted midpoints,
/// sorted by x.
pub fn universal_points(curve: &Curve) -> Vec<[f32; 2]> {
    let existing: Vec<[f32; 2]> = curve.keys().iter().map(|k| [k.time, k.value]).collect();

    let mut inserted = Vec::new();
    for pair in existing.windows(2) {
        subdivide(curve, pair[0], pair[1], &mut inserted);
    }

    let mut points = existing;
    points.extend(inserted);
    points.sort_by(|a, b| a[0].total_cmp(&b[0]));
    points
}

fn subdivide(curve: &Curve, left: [f32; 2], right: [f32; 2], points: &mut Vec<[f32; 2]>) {
    if right[0] - left[0] < THRESHOLD {
        return;
    }

    let probe1 = lerp(left, right, 1.0 / 3.0);
    let probe2 = lerp(left, right, 2.0 / 3.0);
    let actual1 = curve.evaluate(probe1[0]);
    let actual2 = curve.evaluate(probe2[0]);

    if (probe1[1] - actual1).abs() <= THRESHOLD && (probe2[1] - actual2).abs() <= THRESHOLD {
        return;
    }

    let mid_x = (left[0] + right[0]) * 0.5;
    let mid = [mid_x, curve.evaluate(mid_x)];
    points.push(mid);
    subdivide(curve, left, mid, points);
    subdivide(curve, mid, right, points);
}

fn lerp(a: [f32; 2], b: [f32; 2], t: f32) -> [f32; 2] {
    [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t]
}

/// Reconstruct an approximate tangent curve from universal samples
///
/// One keyframe per sample, followed by a neutral smoothing pass over
/// every key.
pub fn curve_from_universal(points: &[[f32; 2]]) -> Curve {
    let mut curve = Curve::from_keys(
        points
            .iter()
            .map(|p| CurveKey::flat(p[0], p[1]))
            .collect(),
    );
    for index in 0..curve.keys().len() {
        curve.smooth_tangents(index);
    }
    curve
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_curve_needs_no_subdivision() {
        let curve = Curve::linear(0.0, 0.0, 1.0, 1.0);
        let points = universal_points(&curve);
        assert_eq!(points, vec![[0.0, 0.0], [1.0, 1.0]]);
    }

    #[test]
    fn test_sharp_bend_inserts_midpoints() {
        // Flat tangents at both ends of a unit rise bow the curve well
        // away from the straight chord
        let curve = Curve::from_keys(vec![CurveKey::flat(0.0, 0.0), CurveKey::flat(1.0, 1.0)]);
        let points = universal_points(&curve);
        assert!(points.len() > 2);
    }

    #[test]
    fn test_final_segments_meet_error_bound() {
        let curve = Curve::from_keys(vec![
            CurveKey::flat(0.0, 0.0),
            CurveKey::new(0.5, 1.0, 8.0, -8.0),
            CurveKey::flat(1.0, 0.0),
        ]);
        let points = universal_points(&curve);

        for pair in points.windows(2) {
            let (left, right) = (pair[0], pair[1]);
            if right[0] - left[0] < THRESHOLD {
                continue;
            }
            for t in [1.0 / 3.0, 2.0 / 3.0] {
                let probe = lerp(left, right, t);
                let error = (probe[1] - curve.evaluate(probe[0])).abs();
                assert!(
                    error <= THRESHOLD,
                    "error {error} between {left:?} and {right:?}"
                );
            }
        }
    }

    #[test]
    fn test_points_stay_sorted() {
        let curve = Curve::from_keys(vec![
            CurveKey::flat(0.0, 0.0),
            CurveKey::flat(0.4, 1.0),
            CurveKey::flat(1.0, 0.2),
        ]);
        let points = universal_points(&curve);
        for pair in points.windows(2) {
            assert!(pair[0][0] <= pair[1][0]);
        }
    }

    #[test]
    fn test_reconstruction_smooths_every_key() {
        let points = vec![[0.0, 0.0], [0.5, 1.0], [1.0, 0.0]];
        let curve = curve_from_universal(&points);
        assert_eq!(curve.keys().len(), 3);
        // The peak key gets the average of the two sample slopes
        let peak = curve.keys()[1];
        assert!((peak.in_tangent - 0.0).abs() < 1e-6);
        assert_eq!(peak.in_tangent, peak.out_tangent);
        // Samples are reproduced exactly
        for p in &points {
            assert!((curve.evaluate(p[0]) - p[1]).abs() < 1e-6);
        }
    }
}
