//! Trait identity
//!
//! A trait's primary identifier is a CRC-32 of its transformer's source
//! text, so two declarations with textually identical transformers share an
//! identifier and deduplicate against each other. Collisions between
//! different transformers are possible and go undetected.
//!
//! The secondary symbol is unique per declaration within the process and is
//! only used as the key of the private marker on stamped classes.

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ComposeError, Result};
use crate::runtime::class::Class;

/// CRC-32 lookup table (reflected polynomial 0xEDB88320)
const CRC32_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let polynomial: u32 = 0xEDB88320;
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ polynomial;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// CRC-32 of `text`'s UTF-8 bytes
pub fn crc32(text: &str) -> u32 {
    let mut crc = !0u32;
    for &byte in text.as_bytes() {
        let index = ((crc ^ byte as u32) & 0xFF) as usize;
        crc = (crc >> 8) ^ CRC32_TABLE[index];
    }
    !crc
}

/// Primary trait identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TraitId(pub u32);

impl TraitId {
    /// Identifier read from a class that carries no stamp
    pub const NONE: TraitId = TraitId(0);
}

impl fmt::Display for TraitId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

/// Secondary, process-unique trait tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TraitSymbol(u64);

static NEXT_SYMBOL: AtomicU64 = AtomicU64::new(1);

impl TraitSymbol {
    /// Allocate a fresh symbol
    pub fn next() -> Self {
        TraitSymbol(NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed))
    }
}

/// How a declaration obtains its primary identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityStrategy {
    /// CRC-32 of the transformer source text
    #[default]
    SourceText,
    /// Fresh identifier per declaration; separate declarations never dedup
    PerDeclaration,
}

// Counter ids start in the upper half of the u32 range.
static NEXT_DECLARATION_ID: AtomicU32 = AtomicU32::new(0x8000_0000);

impl IdentityStrategy {
    /// Identifier for a trait whose transformer reads as `source`
    pub fn assign(
        &self,
        source: &str,
    ) -> TraitId {
        match self {
            IdentityStrategy::SourceText => tag(source),
            IdentityStrategy::PerDeclaration => {
                TraitId(NEXT_DECLARATION_ID.fetch_add(1, Ordering::Relaxed))
            }
        }
    }
}

/// Identifier for transformer source text
pub fn tag(source: &str) -> TraitId {
    TraitId(crc32(source))
}

/// Identity record attached to a class produced by a trait
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stamp {
    pub id: TraitId,
    pub symbol: TraitSymbol,
}

/// Attach `record` to a freshly produced class
///
/// Fails if the class was stamped before, which means the transformer
/// handed back a class that is not its own fresh output.
pub fn stamp(
    class: &Class,
    record: Stamp,
) -> Result<()> {
    class
        .set_stamp(record)
        .map_err(|existing| ComposeError::AlreadyStamped {
            class: class.name().to_string(),
            existing: existing.id,
        })?;
    trace!(class = class.name(), id = %record.id, "stamped");
    Ok(())
}
