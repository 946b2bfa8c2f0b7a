//! JSON inputs accepted by the tool.

use std::path::Path;

use anyhow::{bail, Context};
use argentum_core::{BlockHeader, MemoryChain};
use serde::Deserialize;

/// Compact bits written either as a JSON number or as a hex string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BitsField {
    Number(u32),
    Hex(String),
}

impl BitsField {
    fn value(&self) -> anyhow::Result<u32> {
        match self {
            BitsField::Number(n) => Ok(*n),
            BitsField::Hex(s) => parse_u32(s),
        }
    }
}

/// One block of a chain fixture, oldest first.
#[derive(Debug, Deserialize)]
struct FixtureBlock {
    version: i32,
    time: u32,
    bits: BitsField,
}

/// Load a chain fixture (a JSON array of `{version, time, bits}`).
pub fn load_chain(path: &Path) -> anyhow::Result<MemoryChain> {
    let json =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let blocks: Vec<FixtureBlock> =
        serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?;
    if blocks.is_empty() {
        bail!("{} contains no blocks", path.display());
    }

    let mut chain = MemoryChain::new();
    for (height, b) in blocks.iter().enumerate() {
        let bits = b
            .bits
            .value()
            .with_context(|| format!("bits of block {height}"))?;
        chain.push(b.version, b.time, bits);
    }
    Ok(chain)
}

pub fn load_header(path: &Path) -> anyhow::Result<BlockHeader> {
    let json =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
}

/// Parse `0x`-prefixed hex, or plain hex when the value has letters,
/// otherwise decimal.
pub fn parse_u32(s: &str) -> anyhow::Result<u32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16).with_context(|| format!("invalid hex {s:?}"));
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return u32::from_str_radix(s, 16).with_context(|| format!("invalid hex {s:?}"));
    }
    s.parse().with_context(|| format!("invalid number {s:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_decimal() {
        assert_eq!(parse_u32("0x1e0ffff0").unwrap(), 0x1e0f_fff0);
        assert_eq!(parse_u32("1e0ffff0").unwrap(), 0x1e0f_fff0);
        assert_eq!(parse_u32("536870914").unwrap(), 0x2000_0002);
        assert!(parse_u32("0xzz").is_err());
    }

    #[test]
    fn fixture_bits_accept_both_forms() {
        let blocks: Vec<FixtureBlock> = serde_json::from_str(
            r#"[{"version": 2, "time": 1, "bits": "0x1e0ffff0"},
                {"version": 2, "time": 2, "bits": 504365040}]"#,
        )
        .unwrap();
        assert_eq!(blocks[0].bits.value().unwrap(), 0x1e0f_fff0);
        assert_eq!(blocks[1].bits.value().unwrap(), 0x1e0f_fff0);
    }

    #[test]
    fn bundled_fixtures_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
        let chain = load_chain(&dir.join("chain.json")).unwrap();
        assert_eq!(chain.len(), 72);
        let header = load_header(&dir.join("header.json")).unwrap();
        assert_eq!(header.bits, 0x207f_ffff);
    }
}
