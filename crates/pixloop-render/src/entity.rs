//! Seeded entity population.
//!
//! Every scene draws its animated elements once, at build time, from an
//! explicitly owned [`SeedSource`]. The resulting [`EntitySet`]s are never
//! mutated afterwards; all motion is derived from `(record, frame)` by the
//! animator.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use pixloop_core::{PixloopError, PixloopResult, Rgb};

/// A named, seeded random stream.
///
/// ChaCha8 is used because its output is stable across platforms and
/// `rand` releases, which the reproducibility guarantees depend on.
#[derive(Debug, Clone)]
pub struct SeedSource {
    name: &'static str,
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeedSource {
    /// Name of the stream that populates per-scene entity sets.
    pub const ENTITY: &'static str = "entity-seed";
    /// Name of the stream used for secondary fixed layouts.
    pub const LAYOUT: &'static str = "layout-seed";

    pub fn new(name: &'static str, seed: u64) -> Self {
        Self {
            name,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn entity(seed: u64) -> Self {
        Self::new(Self::ENTITY, seed)
    }

    pub fn layout(seed: u64) -> Self {
        Self::new(Self::LAYOUT, seed)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform integer in the inclusive range `[lo, hi]`.
    pub fn int_in(&mut self, lo: i32, hi: i32) -> i32 {
        if lo >= hi {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Uniform float in `[lo, hi)`. Reversed bounds are allowed.
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.rng.gen::<f64>()
    }

    /// Either `1` or `-1` with equal probability.
    pub fn sign(&mut self) -> i32 {
        if self.rng.gen_bool(0.5) {
            1
        } else {
            -1
        }
    }

    /// A color whose channels are drawn independently from inclusive ranges.
    pub fn color_in(&mut self, r: (u8, u8), g: (u8, u8), b: (u8, u8)) -> Rgb {
        let mut channel = |(lo, hi): (u8, u8)| self.int_in(lo as i32, hi as i32) as u8;
        let r = channel(r);
        let g = channel(g);
        let b = channel(b);
        Rgb::new(r, g, b)
    }
}

/// An immutable, named collection of entity records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySet<T> {
    name: &'static str,
    records: Vec<T>,
}

impl<T> EntitySet<T> {
    /// Draw `count` records from `source`, in order.
    ///
    /// `make` receives the record index and the source. A scene never
    /// declares an empty category, so `count == 0` is a build error.
    pub fn generate<F>(
        name: &'static str,
        count: usize,
        source: &mut SeedSource,
        mut make: F,
    ) -> PixloopResult<Self>
    where
        F: FnMut(usize, &mut SeedSource) -> T,
    {
        if count == 0 {
            return Err(PixloopError::EmptyEntitySet(name));
        }
        let records = (0..count).map(|i| make(i, source)).collect();
        tracing::debug!(set = name, count, source = source.name(), "generated entity set");
        Ok(Self { name, records })
    }

    /// Wrap a fixed, hand-authored list of records.
    pub fn from_records(name: &'static str, records: Vec<T>) -> PixloopResult<Self> {
        if records.is_empty() {
            return Err(PixloopError::EmptyEntitySet(name));
        }
        Ok(Self { name, records })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.records
    }
}

impl<'a, T> IntoIterator for &'a EntitySet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
