//! Core ECS identifier types and bit-level layouts.
//!
//! This module defines the fundamental types shared across all engine
//! subsystems: entity identifier layout, component identifiers, and the
//! fixed-size signature bitset used for signature matching.
//!
//! ## Entity representation
//!
//! Entities are encoded as a packed 64-bit integer:
//!
//! ```text
//! | generation | index |
//! ```
//!
//! - **Index** names a storage slot; slots are recycled after despawn.
//! - **Generation** increments on reuse so stale handles referencing a
//!   recycled slot are detected instead of silently aliasing a new entity.
//!
//! The exact bit widths are compile-time constants validated with static
//! assertions.
//!
//! ## Signatures
//!
//! The set of component types attached to an entity is represented as a
//! fixed-size array of `u64` words. Signatures support fast bitwise
//! subset/disjointness tests and iteration over set bits, and are used for
//! both entity bookkeeping and query matching.

/// Bit-width type used for compile-time layout calculations.
pub type Bits = u8;

/// Packed 64-bit entity identifier value.
pub type EntityID = u64;
/// Index of an entity slot within the registry.
pub type EntityIndex = u32;
/// Generation counter used to detect stale entity handles.
pub type Generation = u32;

/// Compact identifier for a registered component type.
pub type ComponentID = u16;
/// Simulation tick counter.
pub type Tick = u64;

/// Total number of bits in an [`EntityID`].
pub const ENTITY_BITS: Bits = 64;
/// Number of bits reserved for the slot index.
pub const INDEX_BITS: Bits = 32;
/// Number of bits reserved for the generation counter.
pub const GENERATION_BITS: Bits = ENTITY_BITS - INDEX_BITS;

const _: [(); 1] = [(); (INDEX_BITS > 0) as usize];
const _: [(); 1] = [(); (GENERATION_BITS > 0) as usize];
const _: [(); 1] = [(); (INDEX_BITS + GENERATION_BITS == ENTITY_BITS) as usize];

const fn mask(bits: Bits) -> EntityID {
    if bits == 0 { 0 } else { ((1 as EntityID) << bits) - 1 }
}

/// Mask selecting the index portion of an [`EntityID`].
pub const INDEX_MASK: EntityID = mask(INDEX_BITS);
/// Maximum usable slot index.
pub const INDEX_CAP: EntityIndex = INDEX_MASK as EntityIndex;

/// Maximum number of component types registrable per world.
pub const COMPONENT_CAP: usize = 256;
/// Number of `u64` words required to represent a full component signature.
pub const SIGNATURE_WORDS: usize = (COMPONENT_CAP + 63) / 64;

/// Bitset over registered component types.
///
/// One bit per [`ComponentID`]. A signature describes which component types
/// an entity currently has, or which types a query requires or excludes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Signature {
    /// Packed component bitset.
    pub words: [u64; SIGNATURE_WORDS],
}

impl Signature {
    /// The empty signature.
    pub const EMPTY: Signature = Signature { words: [0u64; SIGNATURE_WORDS] };

    /// Sets the bit corresponding to `component_id`.
    #[inline]
    pub fn set(&mut self, component_id: ComponentID) {
        let word = (component_id as usize) / 64;
        let bit = (component_id as usize) % 64;
        self.words[word] |= 1u64 << bit;
    }

    /// Clears the bit corresponding to `component_id`.
    #[inline]
    pub fn clear(&mut self, component_id: ComponentID) {
        let word = (component_id as usize) / 64;
        let bit = (component_id as usize) % 64;
        self.words[word] &= !(1u64 << bit);
    }

    /// Returns `true` if `component_id` is present in this signature.
    #[inline]
    pub fn has(&self, component_id: ComponentID) -> bool {
        let word = (component_id as usize) / 64;
        let bit = (component_id as usize) % 64;
        (self.words[word] >> bit) & 1 == 1
    }

    /// Returns `true` if every component in `other` is present in `self`.
    #[inline]
    pub fn contains_all(&self, other: &Signature) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(mine, theirs)| (mine & theirs) == *theirs)
    }

    /// Returns `true` if `self` and `other` share no component.
    #[inline]
    pub fn disjoint_from(&self, other: &Signature) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(mine, theirs)| (mine & theirs) == 0)
    }

    /// Returns `true` if no component bit is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Number of component bits set.
    #[inline]
    pub fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Iterates over all component IDs set in this signature, ascending.
    pub fn iter_ids(&self) -> impl Iterator<Item = ComponentID> + '_ {
        self.words.iter().enumerate().flat_map(|(word_index, &word)| {
            let base = word_index * 64;
            let mut bits = word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let tz = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some((base + tz) as ComponentID)
            })
        })
    }
}

/// Builds a signature from a list of component IDs.
pub fn build_signature(component_ids: &[ComponentID]) -> Signature {
    let mut signature = Signature::default();
    for &component_id in component_ids {
        signature.set(component_id);
    }
    signature
}
