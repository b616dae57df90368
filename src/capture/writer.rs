//! Capture text output.
//!
//! Rows are written through `serde_json`, the same number grammar the
//! parser reads, so every value round-trips exactly. Whole numbers are
//! printed as integers, everything else in shortest round-trip form.

use std::io::Write;

use serde::ser::{Serialize, Serializer};

use super::CaptureSequence;
use crate::util::Result;

impl Serialize for CaptureSequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Render the sequence as `[[time,[x,y,z],[x,y,z],[x,y,z],[x,y,z]],...]`.
pub fn serialize(seq: &CaptureSequence) -> String {
    // Keyframes only hold f64s, which serde_json always accepts.
    serde_json::to_string(seq).unwrap_or_default()
}

/// Stream the sequence to a writer in capture format.
pub fn write_capture<W: Write>(writer: W, seq: &CaptureSequence) -> Result<()> {
    serde_json::to_writer(writer, seq).map_err(std::io::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{parse_capture, KeyFrame};
    use crate::util::DVec3;

    #[test]
    fn test_serialize_layout() {
        let seq: CaptureSequence = vec![
            KeyFrame::new(0, 0.0, DVec3::new(1.0, 2.0, 3.0), DVec3::Y, DVec3::Z, DVec3::ZERO),
            KeyFrame::new(1, 0.25, DVec3::new(-1.5, 0.0, 1e-7), DVec3::Y, DVec3::Z, DVec3::X),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            serialize(&seq),
            "[[0,[1,2,3],[0,1,0],[0,0,1],[0,0,0]],\
             [0.25,[-1.5,0,1e-7],[0,1,0],[0,0,1],[1,0,0]]]"
        );
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(serialize(&CaptureSequence::new()), "[]");
    }

    #[test]
    fn test_values_round_trip() {
        let raw = "[[0.1,[1234.5678901234,-0.000123,3.14159265358979],[0.7071067811865476,0.7071067811865475,0],[0,0,1],[1e-300,2.5e10,-7]],\
                   [0.30000000000000004,[1,2,3],[0,1,0],[0,0,1],[0,0,0]]]";
        let seq = parse_capture(raw).unwrap();
        let again = parse_capture(&serialize(&seq)).unwrap();

        let a: Vec<KeyFrame> = seq.iter().copied().collect();
        let b: Vec<KeyFrame> = again.iter().copied().collect();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.time.to_bits(), y.time.to_bits());
            assert_eq!(x.to_array().map(f64::to_bits), y.to_array().map(f64::to_bits));
        }
    }

    #[test]
    fn test_integral_capture_text_unchanged() {
        let raw = "[[0,[1500,3200,45],[0,1,0],[0,0,1],[0,0,0]],[1,[1520,3200,45],[0,1,0],[0,0,1],[20,0,0]]]";
        let seq = parse_capture(raw).unwrap();
        assert_eq!(serialize(&seq), raw);
    }

    #[test]
    fn test_negative_zero_keeps_sign() {
        let raw = "[[-0.0,[-0.0,0,1],[0,1,0],[0,0,1],[0,0,0]]]";
        let seq = parse_capture(raw).unwrap();
        let text = serialize(&seq);
        assert_eq!(text, raw);

        let again = parse_capture(&text).unwrap();
        let frame = again.iter().next().unwrap();
        assert!(frame.time.is_sign_negative());
        assert!(frame.position.x.is_sign_negative());
        assert!(!frame.position.y.is_sign_negative());
    }

    #[test]
    fn test_write_capture_to_writer() {
        let seq: CaptureSequence = vec![KeyFrame::new(0, 1.0, DVec3::ONE, DVec3::Y, DVec3::Z, DVec3::ZERO)]
            .into_iter()
            .collect();
        let mut out = Vec::new();
        write_capture(&mut out, &seq).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), serialize(&seq));
    }
}
