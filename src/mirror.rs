//! Symmetric painting across the grid's center lines.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which axes a paint operation is reflected across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorMode {
    #[default]
    None,
    /// Reflect left/right: `(size-1-x, y)`.
    Horizontal,
    /// Reflect top/bottom: `(x, size-1-y)`.
    Vertical,
    /// Both reflections plus the diagonal `(size-1-x, size-1-y)`.
    Both,
}

impl MirrorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MirrorMode::None => "none",
            MirrorMode::Horizontal => "horizontal",
            MirrorMode::Vertical => "vertical",
            MirrorMode::Both => "both",
        }
    }
}

impl fmt::Display for MirrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MirrorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(MirrorMode::None),
            "horizontal" => Ok(MirrorMode::Horizontal),
            "vertical" => Ok(MirrorMode::Vertical),
            "both" => Ok(MirrorMode::Both),
            _ => Err(format!("unknown mirror mode '{}' (none, horizontal, vertical, both)", s)),
        }
    }
}

/// The extra coordinates to paint alongside `(x, y)`.
///
/// Results are not bounds-checked and may coincide with `(x, y)` on a center
/// line; grid writes handle both cases. A reflection that does not fit in
/// `i32` is left out, since it could never land on the grid.
///
/// ```
/// use pixelsprite::mirror::{mirror_points, MirrorMode};
///
/// assert_eq!(mirror_points(MirrorMode::Both, 1, 1, 8), vec![(6, 1), (1, 6), (6, 6)]);
/// assert!(mirror_points(MirrorMode::None, 1, 1, 8).is_empty());
/// ```
pub fn mirror_points(mode: MirrorMode, x: i32, y: i32, size: usize) -> Vec<(i32, i32)> {
    let last = i32::try_from(size).unwrap_or(i32::MAX) - 1;
    let mx = last.checked_sub(x);
    let my = last.checked_sub(y);
    let candidates = match mode {
        MirrorMode::None => return Vec::new(),
        MirrorMode::Horizontal => [mx.map(|mx| (mx, y)), None, None],
        MirrorMode::Vertical => [my.map(|my| (x, my)), None, None],
        MirrorMode::Both => [
            mx.map(|mx| (mx, y)),
            my.map(|my| (x, my)),
            mx.zip(my),
        ],
    };
    candidates.into_iter().flatten().collect()
}
