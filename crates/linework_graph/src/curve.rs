// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tangent keyframe curves and their evaluation.

use serde::{Deserialize, Serialize};

/// A single curve keyframe
///
/// Weights and tangent modes round-trip through the portable form
/// untouched; evaluation uses plain Hermite interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    /// Key time (x)
    #[serde(rename = "Time")]
    pub time: f32,
    /// Key value (y)
    #[serde(rename = "Value")]
    pub value: f32,
    /// Incoming tangent slope
    #[serde(rename = "InTangent")]
    pub in_tangent: f32,
    /// Outgoing tangent slope
    #[serde(rename = "OutTangent")]
    pub out_tangent: f32,
    /// Incoming tangent weight
    #[serde(rename = "InWeight", default)]
    pub in_weight: f32,
    /// Outgoing tangent weight
    #[serde(rename = "OutWeight", default)]
    pub out_weight: f32,
    /// Which tangent weights are active
    #[serde(rename = "WeightedMode", default)]
    pub weighted_mode: i32,
    /// Whether the tangent pair is broken
    #[serde(rename = "KeyBroken", default)]
    pub broken: bool,
    /// Editor tangent mode of the left tangent
    #[serde(rename = "LeftTangentMode", default)]
    pub left_tangent_mode: i32,
    /// Editor tangent mode of the right tangent
    #[serde(rename = "RightTangentMode", default)]
    pub right_tangent_mode: i32,
}

impl CurveKey {
    /// Create a key with the given tangents and neutral metadata
    pub fn new(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
            in_weight: 0.0,
            out_weight: 0.0,
            weighted_mode: 0,
            broken: false,
            left_tangent_mode: 0,
            right_tangent_mode: 0,
        }
    }

    /// Create a key with zero tangents
    pub fn flat(time: f32, value: f32) -> Self {
        Self::new(time, value, 0.0, 0.0)
    }
}

/// A curve as an x-sorted list of tangent keyframes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    keys: Vec<CurveKey>,
}

impl Curve {
    /// Create an empty curve
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Create a curve from keys, sorting them by time
    pub fn from_keys(mut keys: Vec<CurveKey>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Create a straight line between two points
    pub fn linear(t0: f32, v0: f32, t1: f32, v1: f32) -> Self {
        let slope = if t1 == t0 { 0.0 } else { (v1 - v0) / (t1 - t0) };
        Self::from_keys(vec![
            CurveKey::new(t0, v0, slope, slope),
            CurveKey::new(t1, v1, slope, slope),
        ])
    }

    /// The keys in time order
    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Insert a key, keeping the list sorted by time
    pub fn add_key(&mut self, key: CurveKey) {
        let at = self
            .keys
            .partition_point(|k| k.time.total_cmp(&key.time).is_le());
        self.keys.insert(at, key);
    }

    /// Evaluate the curve at `t`
    ///
    /// Extrapolation outside the key range is constant. An empty curve
    /// evaluates to zero.
    pub fn evaluate(&self, t: f32) -> f32 {
        let Some(first) = self.keys.first() else {
            return 0.0;
        };
        let last = self.keys[self.keys.len() - 1];
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        let right = self.keys.partition_point(|k| k.time <= t);
        let k0 = self.keys[right - 1];
        let k1 = self.keys[right];
        let dt = k1.time - k0.time;
        if dt <= f32::EPSILON {
            return k0.value;
        }
        let s = (t - k0.time) / dt;
        hermite(k0.value, k0.out_tangent * dt, k1.value, k1.in_tangent * dt, s)
    }

    /// Replace the tangents at `index` with the average slope toward the
    /// neighboring keys, unbreaking the key
    pub fn smooth_tangents(&mut self, index: usize) {
        let n = self.keys.len();
        if index >= n {
            return;
        }
        let slope_to = |a: CurveKey, b: CurveKey| -> f32 {
            let dt = b.time - a.time;
            if dt.abs() <= f32::EPSILON {
                0.0
            } else {
                (b.value - a.value) / dt
            }
        };
        let left = (index > 0).then(|| slope_to(self.keys[index - 1], self.keys[index]));
        let right = (index + 1 < n).then(|| slope_to(self.keys[index], self.keys[index + 1]));
        let tangent = match (left, right) {
            (Some(l), Some(r)) => (l + r) * 0.5,
            (Some(l), None) => l,
            (None, Some(r)) => r,
            (None, None) => 0.0,
        };
        let key = &mut self.keys[index];
        key.in_tangent = tangent;
        key.out_tangent = tangent;
        key.broken = false;
        key.left_tangent_mode = 0;
        key.right_tangent_mode = 0;
    }
}

impl Default for Curve {
    fn default() -> Self {
        Self::linear(0.0, 0.0, 1.0, 1.0)
    }
}

fn hermite(p0: f32, m0: f32, p1: f32, m1: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    h00 * p0 + h10 * m0 + h01 * p1 + h11 * m1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_curve_evaluates_linearly() {
        let curve = Curve::linear(0.0, 0.0, 1.0, 1.0);
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((curve.evaluate(t) - t).abs() < 1e-5, "at {t}");
        }
    }

    #[test]
    fn test_constant_extrapolation() {
        let curve = Curve::linear(0.0, 2.0, 1.0, 4.0);
        assert_eq!(curve.evaluate(-1.0), 2.0);
        assert_eq!(curve.evaluate(5.0), 4.0);
    }

    #[test]
    fn test_empty_curve_evaluates_to_zero() {
        assert_eq!(Curve::new().evaluate(0.5), 0.0);
    }

    #[test]
    fn test_add_key_keeps_order() {
        let mut curve = Curve::linear(0.0, 0.0, 1.0, 1.0);
        curve.add_key(CurveKey::flat(0.5, 2.0));
        let times: Vec<f32> = curve.keys().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_smooth_tangents_averages_neighbor_slopes() {
        let mut curve = Curve::from_keys(vec![
            CurveKey::flat(0.0, 0.0),
            CurveKey::flat(1.0, 1.0),
            CurveKey::flat(2.0, 1.0),
        ]);
        curve.smooth_tangents(1);
        // Slopes to neighbors are 1 and 0
        let key = curve.keys()[1];
        assert!((key.in_tangent - 0.5).abs() < 1e-6);
        assert_eq!(key.in_tangent, key.out_tangent);
        assert!(!key.broken);
    }

    #[test]
    fn test_flat_keys_give_smooth_step() {
        let curve = Curve::from_keys(vec![CurveKey::flat(0.0, 0.0), CurveKey::flat(1.0, 1.0)]);
        let mid = curve.evaluate(0.5);
        assert!((mid - 0.5).abs() < 1e-5);
        // Flat tangents ease in and out
        assert!(curve.evaluate(0.1) < 0.1);
        assert!(curve.evaluate(0.9) > 0.9);
    }
}
