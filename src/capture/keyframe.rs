//! A single sampled pose of a unit capture.

use serde::ser::{Serialize, SerializeTuple, Serializer};

use crate::util::{lerp, DVec3};

/// Number of scalar components a keyframe flattens to.
pub const KEYFRAME_COMPONENTS: usize = 12;

/// One keyframe: time plus position, orientation and velocity.
///
/// `direction` and `up` together describe orientation the way
/// `BIS_fnc_UnitCapture` records it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyFrame {
    /// 0-based position in the parsed input.
    pub original_index: usize,
    /// Capture time in seconds.
    pub time: f64,
    pub position: DVec3,
    pub direction: DVec3,
    pub up: DVec3,
    pub velocity: DVec3,
}

impl KeyFrame {
    /// Create a keyframe.
    pub fn new(
        original_index: usize,
        time: f64,
        position: DVec3,
        direction: DVec3,
        up: DVec3,
        velocity: DVec3,
    ) -> Self {
        Self { original_index, time, position, direction, up, velocity }
    }

    /// Reconstruct the frame at `time` from a straight line to `end`.
    ///
    /// The interpolation fraction divides by `end.time`, not by the
    /// `end.time - self.time` span. Existing thresholds were tuned against
    /// that fraction, so it is kept as is.
    pub fn lerp(&self, end: &KeyFrame, time: f64) -> KeyFrame {
        let t = (time - self.time) / end.time;

        KeyFrame {
            original_index: usize::MAX,
            time,
            position: lerp(self.position, end.position, t),
            direction: lerp(self.direction, end.direction, t),
            up: lerp(self.up, end.up, t),
            velocity: lerp(self.velocity, end.velocity, t),
        }
    }

    /// Flatten into `[position, direction, up, velocity]`.
    pub fn to_array(&self) -> [f64; KEYFRAME_COMPONENTS] {
        let mut out = [0.0; KEYFRAME_COMPONENTS];
        for (chunk, v) in out
            .chunks_exact_mut(3)
            .zip([self.position, self.direction, self.up, self.velocity])
        {
            chunk.copy_from_slice(&v.to_array());
        }
        out
    }
}

/// Every integer up to this magnitude has an exact `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A capture number. Whole values are written without a fraction (`1`, not
/// `1.0`); `-0.0` stays a float so its sign survives.
#[derive(Clone, Copy, Debug)]
struct Number(f64);

impl Number {
    fn vector(v: DVec3) -> [Number; 3] {
        [Number(v.x), Number(v.y), Number(v.z)]
    }

    fn as_integer(self) -> Option<i64> {
        let v = self.0;
        let whole = v.fract() == 0.0 && v.abs() <= MAX_EXACT_INTEGER;
        let negative_zero = v == 0.0 && v.is_sign_negative();
        (whole && !negative_zero).then_some(v as i64)
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_integer() {
            Some(i) => serializer.serialize_i64(i),
            None => serializer.serialize_f64(self.0),
        }
    }
}

/// Serializes as the capture row `[time,[x,y,z],[x,y,z],[x,y,z],[x,y,z]]`.
impl Serialize for KeyFrame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_tuple(5)?;
        row.serialize_element(&Number(self.time))?;
        row.serialize_element(&Number::vector(self.position))?;
        row.serialize_element(&Number::vector(self.direction))?;
        row.serialize_element(&Number::vector(self.up))?;
        row.serialize_element(&Number::vector(self.velocity))?;
        row.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: usize, time: f64, p: [f64; 3]) -> KeyFrame {
        KeyFrame::new(
            index,
            time,
            DVec3::from_array(p),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::ZERO,
        )
    }

    #[test]
    fn test_lerp_uses_end_time_denominator() {
        let start = frame(0, 1.0, [0.0, 0.0, 0.0]);
        let end = frame(2, 4.0, [8.0, 0.0, 0.0]);

        // t = (3 - 1) / 4 = 0.5, not (3 - 1) / (4 - 1)
        let mid = start.lerp(&end, 3.0);
        assert_eq!(mid.time, 3.0);
        assert_eq!(mid.position, DVec3::new(4.0, 0.0, 0.0));
        assert_eq!(mid.direction, DVec3::new(0.0, 1.0, 0.0));
        assert_eq!(mid.original_index, usize::MAX);
    }

    #[test]
    fn test_to_array_order() {
        let f = KeyFrame::new(
            0,
            0.0,
            DVec3::new(1.0, 2.0, 3.0),
            DVec3::new(4.0, 5.0, 6.0),
            DVec3::new(7.0, 8.0, 9.0),
            DVec3::new(10.0, 11.0, 12.0),
        );
        let expected: Vec<f64> = (1..=12).map(f64::from).collect();
        assert_eq!(f.to_array().to_vec(), expected);
    }

    #[test]
    fn test_serialize_row() {
        let f = frame(0, 0.5, [1.25, -2.0, 3.0]);
        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(json, "[0.5,[1.25,-2,3],[0,1,0],[0,0,1],[0,0,0]]");
    }

    #[test]
    fn test_number_integer_form() {
        assert_eq!(Number(3.0).as_integer(), Some(3));
        assert_eq!(Number(-7.0).as_integer(), Some(-7));
        assert_eq!(Number(0.0).as_integer(), Some(0));
        assert_eq!(Number(MAX_EXACT_INTEGER).as_integer(), Some(9_007_199_254_740_992));
        assert_eq!(Number(-0.0).as_integer(), None);
        assert_eq!(Number(0.5).as_integer(), None);
        assert_eq!(Number(1e300).as_integer(), None);
        assert_eq!(Number(f64::INFINITY).as_integer(), None);
        assert_eq!(Number(f64::NAN).as_integer(), None);
    }
}
