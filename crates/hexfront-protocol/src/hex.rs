use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Axial hex coordinate (q, r). The cube coordinate is `s = -q - r`.
///
/// Ordering is lexicographic on `(q, r)` so maps keyed by `Hex` iterate deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid hex key {0:?}, expected \"q,r\"")]
pub struct HexParseError(pub String);

impl Hex {
    pub const ORIGIN: Hex = Hex { q: 0, r: 0 };

    pub const DIRECTIONS: [Hex; 6] = [
        Hex { q: 1, r: 0 },
        Hex { q: 1, r: -1 },
        Hex { q: 0, r: -1 },
        Hex { q: -1, r: 0 },
        Hex { q: -1, r: 1 },
        Hex { q: 0, r: 1 },
    ];

    #[inline]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    #[inline]
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    pub fn neighbors(self) -> impl Iterator<Item = Hex> {
        Self::DIRECTIONS.into_iter().map(move |d| self + d)
    }

    #[inline]
    pub fn distance(self, other: Hex) -> i32 {
        ((self.q - other.q).abs() + (self.r - other.r).abs() + (self.s() - other.s()).abs()) / 2
    }

    #[inline]
    pub fn is_adjacent(self, other: Hex) -> bool {
        self.distance(other) == 1
    }

    /// Every hex within `radius` of `self`, center first, then by ascending `(q, r)`.
    pub fn within(self, radius: i32) -> Vec<Hex> {
        let radius = radius.max(0);
        let mut out = Vec::with_capacity((1 + 3 * radius * (radius + 1)) as usize);
        out.push(self);
        for dq in -radius..=radius {
            let lo = (-radius).max(-dq - radius);
            let hi = radius.min(-dq + radius);
            for dr in lo..=hi {
                if dq == 0 && dr == 0 {
                    continue;
                }
                out.push(Hex::new(self.q + dq, self.r + dr));
            }
        }
        out
    }

    /// Map key used by tile snapshots: `"q,r"`.
    pub fn key(self) -> String {
        self.to_string()
    }
}

impl std::ops::Add for Hex {
    type Output = Hex;

    fn add(self, other: Hex) -> Hex {
        Hex::new(self.q + other.q, self.r + other.r)
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.q, self.r)
    }
}

impl FromStr for Hex {
    type Err = HexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || HexParseError(s.to_string());
        let (q, r) = s.split_once(',').ok_or_else(err)?;
        let q = q.trim().parse().map_err(|_| err())?;
        let r = r.trim().parse().map_err(|_| err())?;
        Ok(Hex::new(q, r))
    }
}
