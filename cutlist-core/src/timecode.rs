//! Timecode and frame arithmetic.
//!
//! Every placement decision in the timeline compiler is made on integer frame
//! counts produced here. Timecodes are treated linearly: four-field timecodes
//! at 29.97/59.94 get no drop-frame skip correction.

use crate::error::TimecodeError;

use std::fmt;
use std::str::FromStr;

/// A frame rate kept as a reduced fraction so that rates such as `30000/1001`
/// survive until the moment they are used in arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRate {
    num: u32,
    den: u32,
}

impl FrameRate {
    /// 25 fps, the timeline rate used when nothing else is known.
    pub const FPS_25: FrameRate = FrameRate { num: 25, den: 1 };

    /// Creates a frame rate from a fraction. Returns `None` for zero numerator or denominator.
    #[must_use]
    pub fn new(num: u32, den: u32) -> Option<Self> {
        if num == 0 || den == 0 {
            return None;
        }
        let divisor = gcd(num, den);
        Some(Self {
            num: num / divisor,
            den: den / divisor,
        })
    }

    /// Parses a rational rate string such as ffprobe's `r_frame_rate` (`"30000/1001"`).
    #[must_use]
    pub fn parse_ratio(text: &str) -> Option<Self> {
        let (num, den) = text.trim().split_once('/')?;
        match (num.trim().parse::<u32>(), den.trim().parse::<u32>()) {
            (Ok(num), Ok(den)) => Self::new(num, den),
            _ => {
                let num = num.trim().parse::<f64>().ok()?;
                let den = den.trim().parse::<f64>().ok()?;
                if den == 0.0 {
                    return None;
                }
                Self::from_fps(num / den)
            }
        }
    }

    /// Builds a rate from a decimal value, keeping three decimals (`29.97` -> `2997/100`).
    #[must_use]
    pub fn from_fps(fps: f64) -> Option<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return None;
        }
        let millis = (fps * 1000.0).round();
        if millis < 1.0 || millis > f64::from(u32::MAX) {
            return None;
        }
        Self::new(millis as u32, 1000)
    }

    #[must_use]
    pub fn numerator(self) -> u32 {
        self.num
    }

    #[must_use]
    pub fn denominator(self) -> u32 {
        self.den
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// The same rate truncated to the three-decimal precision used in the shot list.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self::from_fps(self.as_f64()).unwrap_or(self)
    }

    /// Integer timebase written to the interchange document.
    #[must_use]
    pub fn timebase(self) -> u32 {
        self.as_f64().round_ties_even() as u32
    }

    /// True for the NTSC family rates (29.97 and 59.94) that are flagged drop-frame.
    #[must_use]
    pub fn is_ntsc(self) -> bool {
        let hundredths = (self.as_f64() * 100.0).round() as i64;
        hundredths == 2997 || hundredths == 5994
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.as_f64())
    }
}

impl FromStr for FrameRate {
    type Err = TimecodeError;

    /// Accepts either a fraction (`"24000/1001"`) or a decimal (`"23.976"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = if s.contains('/') {
            Self::parse_ratio(s)
        } else {
            s.trim().parse::<f64>().ok().and_then(Self::from_fps)
        };
        parsed.ok_or_else(|| TimecodeError::MalformedTimecode(s.to_string()))
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Largest frame count a timecode may produce. Beyond this an `f64` no longer
/// holds every integer, so the count would not be exact.
pub const MAX_FRAME_COUNT: i64 = 1 << 53;

/// Converts a timecode string to a frame count at `fps`.
///
/// Accepted shapes:
/// * `H:M:S:F` → `(H*3600 + M*60 + S) * fps + F`, truncated
/// * `H:M:S;F` → same as above; the drop-frame separator gets no skip correction
/// * `M:S[.frac]` → `round((M*60 + S) * fps)`
/// * `H:M:S[.frac]` → `round((H*3600 + M*60 + S) * fps)`
/// * empty or blank → `0`
///
/// Rounding is half-to-even. Counts above [`MAX_FRAME_COUNT`] are malformed.
pub fn frames(text: &str, fps: f64) -> Result<i64, TimecodeError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }

    let malformed = || TimecodeError::MalformedTimecode(text.to_string());
    let fields: Vec<&str> = text.split([':', ';']).collect();
    if fields.len() != 4 && text.contains(';') {
        return Err(malformed());
    }

    let count = match fields.len() {
        4 => {
            let mut parts = [0i64; 4];
            for (slot, field) in parts.iter_mut().zip(&fields) {
                *slot = field.trim().parse::<i64>().map_err(|_| malformed())?;
            }
            let [hours, minutes, seconds, frame] = parts;
            let whole_seconds = hours
                .checked_mul(3600)
                .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
                .and_then(|hm| hm.checked_add(seconds))
                .ok_or_else(malformed)?;
            (whole_seconds as f64 * fps + frame as f64).trunc()
        }
        2 | 3 => {
            let values = fields
                .iter()
                .map(|field| field.trim().parse::<f64>())
                .collect::<Result<Vec<f64>, _>>()
                .map_err(|_| malformed())?;
            let seconds = values.iter().fold(0.0, |acc, value| acc * 60.0 + value);
            (seconds * fps).round_ties_even()
        }
        _ => return Err(malformed()),
    };

    if !count.is_finite() || count.abs() > MAX_FRAME_COUNT as f64 {
        return Err(malformed());
    }
    Ok(count as i64)
}

/// Parses an `"<in> - <out>"` range into `(in_frame, out_frame)` at `fps`.
///
/// When no `-` is present the text is split at its last `:`. That fallback
/// exists for sheets that used `:` as the separator; it misreads a bare
/// four-field timecode and is kept as is.
pub fn parse_range(text: &str, fps: f64) -> Result<(i64, i64), TimecodeError> {
    let text = text.trim();
    let malformed = || TimecodeError::MalformedRange(text.to_string());

    let (in_text, out_text) = match text.split_once('-') {
        Some((_, rest)) if rest.contains('-') => return Err(malformed()),
        Some(sides) => sides,
        None => {
            let split_at = text.rfind(':').ok_or_else(malformed)?;
            (&text[..split_at], &text[split_at + 1..])
        }
    };

    Ok((frames(in_text, fps)?, frames(out_text, fps)?))
}

/// Renders a frame count as `HH:MM:SS:FF` at `fps`.
///
/// Feeding the result back through [`frames`] yields `frame_count` again.
#[must_use]
pub fn to_timecode(frame_count: u64, fps: f64) -> String {
    if !fps.is_finite() || fps <= 0.0 {
        return "00:00:00:00".to_string();
    }
    let total_seconds = (frame_count as f64 / fps).floor() as u64;
    let base_frames = (total_seconds as f64 * fps).trunc() as u64;
    let frame = frame_count.saturating_sub(base_frames);

    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}:{frame:02}")
}
