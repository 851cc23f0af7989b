use crate::{
    MAX_INDEX_FIELDS,
    db::index::ordering::Ordering,
    key::Key,
};
use canic_cdk::structures::storable::{Bound, Storable};
use std::borrow::Cow;
use thiserror::Error as ThisError;

/// Fixed-size fingerprint of one indexed field value.
pub type ComponentFingerprint = [u8; 16];

const COMPONENT_SIZE: usize = 16;
const COMPONENTS_AT: usize = 2;
const PK_AT: usize = COMPONENTS_AT + MAX_INDEX_FIELDS * COMPONENT_SIZE;

const TAG_MIN: u8 = 0x00;
const TAG_ENTRY: u8 = 0x7F;
const TAG_MAX: u8 = 0xFF;

///
/// IndexKey
///
/// A point in an index's key space: the Min sentinel, the Max sentinel, or
/// an entry key built from component fingerprints plus the primary key.
///
/// Sentinels bound every entry key in index order. The entry encoding can
/// never produce a sentinel tag, so the two spaces are disjoint.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IndexKey {
    Min,
    Max,
    Entry(IndexEntryKey),
}

impl IndexKey {
    pub const MIN: Self = Self::Min;
    pub const MAX: Self = Self::Max;

    /// Raw encoded size: tag + component count + components + primary key.
    pub const STORED_SIZE: usize = PK_AT + Key::STORED_SIZE;

    /// Build an entry key from component fingerprints and a primary key.
    ///
    /// Returns `None` when the component count is zero or exceeds
    /// `MAX_INDEX_FIELDS`.
    #[must_use]
    pub fn new(components: &[ComponentFingerprint], pk: Key) -> Option<Self> {
        if components.is_empty() || components.len() > MAX_INDEX_FIELDS {
            return None;
        }

        let mut padded = [[0u8; COMPONENT_SIZE]; MAX_INDEX_FIELDS];
        padded[..components.len()].copy_from_slice(components);

        #[allow(clippy::cast_possible_truncation)]
        let len = components.len() as u8;

        Some(Self::Entry(IndexEntryKey {
            len,
            components: padded,
            pk,
        }))
    }

    /// Entry key for a primary-key index: one component, the key itself.
    #[must_use]
    pub fn for_primary(pk: Key) -> Self {
        let mut padded = [[0u8; COMPONENT_SIZE]; MAX_INDEX_FIELDS];
        padded[0] = pk.fingerprint();

        Self::Entry(IndexEntryKey {
            len: 1,
            components: padded,
            pk,
        })
    }

    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        matches!(self, Self::Min | Self::Max)
    }

    /// Primary key carried by an entry key; `None` for sentinels.
    #[must_use]
    pub const fn pk(&self) -> Option<Key> {
        match self {
            Self::Min | Self::Max => None,
            Self::Entry(entry) => Some(entry.pk),
        }
    }

    /// Encode to the raw, order-preserving store representation.
    ///
    /// The encoding is ordering-aware: component bytes of descending fields
    /// are inverted, and the tag byte is inverted when the first field is
    /// descending, so raw byte order equals index order. Sentinels keep
    /// saturated bodies (all zero for Min, all ones for Max); only their tag
    /// participates in inversion.
    #[must_use]
    pub fn to_raw(&self, ordering: &Ordering) -> RawIndexKey {
        let mut buf = [0u8; Self::STORED_SIZE];

        match self {
            Self::Min => {}
            Self::Max => buf.fill(0xFF),
            Self::Entry(entry) => {
                buf[0] = TAG_ENTRY;
                buf[1] = entry.len;
                for i in 0..usize::from(entry.len) {
                    let at = COMPONENTS_AT + i * COMPONENT_SIZE;
                    buf[at..at + COMPONENT_SIZE].copy_from_slice(&entry.components[i]);
                    if ordering.descending(i) {
                        for b in &mut buf[at..at + COMPONENT_SIZE] {
                            *b ^= 0xFF;
                        }
                    }
                }
                buf[PK_AT..].copy_from_slice(&entry.pk.to_bytes());
            }
        }

        if ordering.first_field_descending() {
            buf[0] ^= 0xFF;
        }

        RawIndexKey(buf)
    }

    /// Decode from the raw representation, validating canonicality.
    pub fn try_from_raw(
        raw: &RawIndexKey,
        ordering: &Ordering,
    ) -> Result<Self, IndexKeyCorruption> {
        let mut bytes = raw.0;
        if ordering.first_field_descending() {
            bytes[0] ^= 0xFF;
        }

        match bytes[0] {
            TAG_MIN => {
                if bytes[1..].iter().any(|b| *b != 0x00) {
                    return Err(IndexKeyCorruption::SentinelPadding);
                }
                Ok(Self::Min)
            }
            TAG_MAX => {
                if bytes[1..].iter().any(|b| *b != 0xFF) {
                    return Err(IndexKeyCorruption::SentinelPadding);
                }
                Ok(Self::Max)
            }
            TAG_ENTRY => {
                let len = bytes[1];
                if len == 0 || usize::from(len) > MAX_INDEX_FIELDS {
                    return Err(IndexKeyCorruption::InvalidComponentCount { len });
                }

                let mut components = [[0u8; COMPONENT_SIZE]; MAX_INDEX_FIELDS];
                for (i, component) in components.iter_mut().enumerate().take(usize::from(len)) {
                    let at = COMPONENTS_AT + i * COMPONENT_SIZE;
                    component.copy_from_slice(&bytes[at..at + COMPONENT_SIZE]);
                    if ordering.descending(i) {
                        for b in component.iter_mut() {
                            *b ^= 0xFF;
                        }
                    }
                }

                let padding_at = COMPONENTS_AT + usize::from(len) * COMPONENT_SIZE;
                if bytes[padding_at..PK_AT].iter().any(|b| *b != 0x00) {
                    return Err(IndexKeyCorruption::ComponentPadding);
                }

                let pk = Key::try_from_bytes(&bytes[PK_AT..])
                    .map_err(|err| IndexKeyCorruption::InvalidPrimaryKey(err.to_string()))?;

                Ok(Self::Entry(IndexEntryKey {
                    len,
                    components,
                    pk,
                }))
            }
            tag => Err(IndexKeyCorruption::InvalidTag { tag }),
        }
    }
}

///
/// IndexEntryKey
///
/// Component fingerprints plus the owning row's primary key. The primary
/// key is the final tiebreaker, always ascending.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IndexEntryKey {
    len: u8,
    components: [ComponentFingerprint; MAX_INDEX_FIELDS],
    pk: Key,
}

impl IndexEntryKey {
    #[must_use]
    pub fn components(&self) -> &[ComponentFingerprint] {
        &self.components[..usize::from(self.len)]
    }

    #[must_use]
    pub const fn pk(&self) -> Key {
        self.pk
    }
}

///
/// RawIndexKey
///
/// Fixed-size raw encoding of an `IndexKey`, already ordering-adjusted.
/// Plain byte order of raws equals index order.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RawIndexKey(pub(crate) [u8; IndexKey::STORED_SIZE]);

impl RawIndexKey {
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; IndexKey::STORED_SIZE] {
        &self.0
    }
}

impl Storable for RawIndexKey {
    fn to_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.0)
    }

    fn into_bytes(self) -> Vec<u8> {
        self.0.to_vec()
    }

    fn from_bytes(bytes: Cow<'_, [u8]>) -> Self {
        let mut buf = [0u8; IndexKey::STORED_SIZE];
        assert_eq!(
            bytes.len(),
            IndexKey::STORED_SIZE,
            "stored index key has an invalid size"
        );
        buf.copy_from_slice(&bytes);

        Self(buf)
    }

    const BOUND: Bound = Bound::Bounded {
        max_size: IndexKey::STORED_SIZE as u32,
        is_fixed_size: true,
    };
}

///
/// IndexKeyCorruption
///

#[derive(Debug, ThisError)]
pub enum IndexKeyCorruption {
    #[error("invalid index key tag: {tag:#04x}")]
    InvalidTag { tag: u8 },

    #[error("invalid component count: {len}")]
    InvalidComponentCount { len: u8 },

    #[error("sentinel key has a non-saturated body")]
    SentinelPadding,

    #[error("entry key has non-zero padding past its components")]
    ComponentPadding,

    #[error("invalid primary key suffix: {0}")]
    InvalidPrimaryKey(String),
}

///
/// Fingerprint helpers
///
/// Components are opaque 16-byte values whose byte order matches the source
/// value's order. Text fingerprints truncate to the first 16 bytes, which
/// keeps prefix order but can collide; the primary-key suffix disambiguates.
///

#[must_use]
pub fn fingerprint_uint(v: u64) -> ComponentFingerprint {
    Key::Uint(v).fingerprint()
}

#[must_use]
pub fn fingerprint_int(v: i64) -> ComponentFingerprint {
    Key::Int(v).fingerprint()
}

#[must_use]
pub fn fingerprint_text(s: &str) -> ComponentFingerprint {
    let mut buf = [0u8; COMPONENT_SIZE];
    let take = s.len().min(COMPONENT_SIZE);
    buf[..take].copy_from_slice(&s.as_bytes()[..take]);

    buf
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::index::IndexField;

    fn lcg_next(state: &mut u64) -> u64 {
        *state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1);
        *state
    }

    fn asc_ordering() -> Ordering {
        Ordering::new(&[IndexField::asc("a"), IndexField::asc("b")])
    }

    fn desc_ordering() -> Ordering {
        Ordering::new(&[IndexField::desc("a"), IndexField::asc("b")])
    }

    fn entry(a: u64, pk: u64) -> IndexKey {
        IndexKey::new(&[fingerprint_uint(a)], Key::Uint(pk)).unwrap()
    }

    #[test]
    fn roundtrip_is_lossless() {
        for ordering in [asc_ordering(), desc_ordering()] {
            for key in [
                IndexKey::MIN,
                IndexKey::MAX,
                entry(0, 0),
                entry(u64::MAX, 3),
                IndexKey::for_primary(Key::Int(-40)),
                IndexKey::new(
                    &[fingerprint_text("polar"), fingerprint_int(-7)],
                    Key::Uint(9),
                )
                .unwrap(),
            ] {
                let raw = key.to_raw(&ordering);
                let back = IndexKey::try_from_raw(&raw, &ordering).unwrap();
                assert_eq!(back, key);
            }
        }
    }

    #[test]
    fn sentinels_bound_entries_in_index_order() {
        // Min sorts before every entry in a fully ascending index and after
        // every entry when the first field is descending; Max mirrors that.
        let asc = asc_ordering();
        let desc = desc_ordering();
        let e = entry(42, 1);

        assert!(asc.compare(&IndexKey::MIN, &e).is_lt());
        assert!(asc.compare(&e, &IndexKey::MAX).is_lt());

        assert!(desc.compare(&IndexKey::MIN, &e).is_gt());
        assert!(desc.compare(&e, &IndexKey::MAX).is_gt());
    }

    #[test]
    fn descending_field_reverses_component_order() {
        let asc = asc_ordering();
        let desc = desc_ordering();
        let low = entry(1, 1);
        let high = entry(2, 1);

        assert!(asc.compare(&low, &high).is_lt());
        assert!(desc.compare(&low, &high).is_gt());
    }

    #[test]
    fn primary_key_breaks_ties_ascending() {
        for ordering in [asc_ordering(), desc_ordering()] {
            let a = entry(7, 1);
            let b = entry(7, 2);
            assert!(ordering.compare(&a, &b).is_lt());
        }
    }

    #[test]
    fn raw_byte_order_equals_index_order() {
        let mut state = 0xF10E_u64;
        for ordering in [asc_ordering(), desc_ordering()] {
            let mut keys = vec![IndexKey::MIN, IndexKey::MAX];
            for _ in 0..64 {
                keys.push(entry(lcg_next(&mut state), lcg_next(&mut state)));
            }

            for a in &keys {
                for b in &keys {
                    assert_eq!(
                        a.to_raw(&ordering).cmp(&b.to_raw(&ordering)),
                        ordering.compare(a, b),
                    );
                }
            }
        }
    }

    #[test]
    fn new_rejects_bad_component_counts() {
        assert!(IndexKey::new(&[], Key::Uint(1)).is_none());
        let too_many = [fingerprint_uint(0); MAX_INDEX_FIELDS + 1];
        assert!(IndexKey::new(&too_many, Key::Uint(1)).is_none());
    }

    #[test]
    fn decode_rejects_unknown_tag() {
        let ordering = asc_ordering();
        let mut raw = entry(1, 1).to_raw(&ordering);
        raw.0[0] = 0x33;
        let err = IndexKey::try_from_raw(&raw, &ordering).unwrap_err();
        assert!(matches!(err, IndexKeyCorruption::InvalidTag { tag: 0x33 }));
    }

    #[test]
    fn decode_rejects_dirty_sentinel() {
        let ordering = asc_ordering();
        let mut raw = IndexKey::MIN.to_raw(&ordering);
        raw.0[10] = 0x01;
        let err = IndexKey::try_from_raw(&raw, &ordering).unwrap_err();
        assert!(matches!(err, IndexKeyCorruption::SentinelPadding));
    }

    #[test]
    fn decode_rejects_component_overflow() {
        let ordering = asc_ordering();
        let mut raw = entry(1, 1).to_raw(&ordering);
        raw.0[1] = (MAX_INDEX_FIELDS + 1) as u8;
        let err = IndexKey::try_from_raw(&raw, &ordering).unwrap_err();
        assert!(matches!(
            err,
            IndexKeyCorruption::InvalidComponentCount { .. }
        ));
    }

    #[test]
    fn decode_rejects_dirty_padding() {
        let ordering = asc_ordering();
        let mut raw = entry(1, 1).to_raw(&ordering);
        raw.0[COMPONENTS_AT + COMPONENT_SIZE] = 0x01;
        let err = IndexKey::try_from_raw(&raw, &ordering).unwrap_err();
        assert!(matches!(err, IndexKeyCorruption::ComponentPadding));
    }

    #[test]
    fn decode_fuzz_roundtrip_is_canonical() {
        // any raw that decodes must re-encode to the same bytes
        let mut state = 0xC0FF_EE_u64;
        for ordering in [asc_ordering(), desc_ordering()] {
            for _ in 0..4096 {
                let mut raw = RawIndexKey([0u8; IndexKey::STORED_SIZE]);
                for chunk in raw.0.chunks_mut(8) {
                    let bytes = lcg_next(&mut state).to_be_bytes();
                    chunk.copy_from_slice(&bytes[..chunk.len()]);
                }

                if let Ok(key) = IndexKey::try_from_raw(&raw, &ordering) {
                    assert_eq!(key.to_raw(&ordering), raw);
                }
            }
        }
    }
}
