//! cyrb64-style content hash.

use std::fmt;

const LANE_1_INIT: u32 = 0xdead_beef;
const LANE_2_INIT: u32 = 0x41c6_ce57;
const LANE_1_MUL: u32 = 2_654_435_761;
const LANE_2_MUL: u32 = 1_597_334_677;
const FINAL_MUL_A: u32 = 2_246_822_507;
const FINAL_MUL_B: u32 = 3_266_489_909;

/// Width of one rendered lane (`u32::MAX` is 7 digits in base 36).
const LANE_WIDTH: usize = 7;

/// Deterministic 64-bit content hash made of two 32-bit mixing lanes.
///
/// Rendered as base 36 of the second lane followed by the first lane,
/// each left-padded to seven characters. Lanes render as unsigned, so tags
/// produced by signed-integer implementations of cyrb64 only match when both
/// lanes are below `2^31`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    high: u32,
    low: u32,
}

impl Fingerprint {
    /// Hash `input` with the given seed.
    ///
    /// Mixing runs over UTF-16 code units so the result is stable for any
    /// string regardless of how it is stored.
    pub fn compute(input: &str, seed: u32) -> Self {
        let mut h1 = LANE_1_INIT ^ seed;
        let mut h2 = LANE_2_INIT ^ seed;

        for unit in input.encode_utf16() {
            let unit = u32::from(unit);
            h1 = (h1 ^ unit).wrapping_mul(LANE_1_MUL);
            h2 = (h2 ^ unit).wrapping_mul(LANE_2_MUL);
        }

        h1 = (h1 ^ (h1 >> 16)).wrapping_mul(FINAL_MUL_A);
        h1 ^= (h2 ^ (h2 >> 13)).wrapping_mul(FINAL_MUL_B);
        h2 = (h2 ^ (h2 >> 16)).wrapping_mul(FINAL_MUL_A);
        h2 ^= (h1 ^ (h1 >> 13)).wrapping_mul(FINAL_MUL_B);

        Self { high: h2, low: h1 }
    }

    /// Both lanes packed into one integer, high lane first.
    pub fn as_u64(&self) -> u64 {
        (u64::from(self.high) << 32) | u64::from(self.low)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:0>width$}{:0>width$}",
            to_base36(self.high),
            to_base36(self.low),
            width = LANE_WIDTH
        )
    }
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::with_capacity(LANE_WIDTH);
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}
