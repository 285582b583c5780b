//! Text measurement hooks for layout.
//!
//! Layout only needs advance widths. Callers plug in a shaping backend
//! ([`crate::TextShaper`]) or use [`HeuristicMeasurer`] when no fonts are available.

use std::collections::HashMap;

use crate::foundation::error::TitlecardResult;

/// The three weights of the template's single font family.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum FontWeight {
    /// 400, subtitle 2.
    Regular,
    /// 700, top title and subtitle 1.
    Bold,
    /// 800, main title.
    ExtraBold,
}

impl FontWeight {
    pub const ALL: [FontWeight; 3] = [Self::Regular, Self::Bold, Self::ExtraBold];

    pub fn value(self) -> u16 {
        match self {
            Self::Regular => 400,
            Self::Bold => 700,
            Self::ExtraBold => 800,
        }
    }

    /// Conventional font file suffix (`Family-Bold.ttf`).
    pub fn file_suffix(self) -> &'static str {
        match self {
            Self::Regular => "Regular",
            Self::Bold => "Bold",
            Self::ExtraBold => "ExtraBold",
        }
    }
}

/// Measures rendered advance width of a single line.
///
/// Implementations must be deterministic for a fixed `(text, weight, size)` within a session.
/// Return [`crate::TitlecardError::MeasurementUnavailable`] while the font is not ready.
pub trait TextMeasurer {
    fn measure_width(
        &mut self,
        text: &str,
        weight: FontWeight,
        size_px: f64,
    ) -> TitlecardResult<f64>;
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &mut M {
    fn measure_width(
        &mut self,
        text: &str,
        weight: FontWeight,
        size_px: f64,
    ) -> TitlecardResult<f64> {
        (**self).measure_width(text, weight, size_px)
    }
}

/// Average-advance measurer: `width = em * size * chars`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeuristicMeasurer {
    pub regular_em: f64,
    pub bold_em: f64,
    pub extra_bold_em: f64,
}

impl Default for HeuristicMeasurer {
    fn default() -> Self {
        Self {
            regular_em: 0.55,
            bold_em: 0.6,
            extra_bold_em: 0.64,
        }
    }
}

impl TextMeasurer for HeuristicMeasurer {
    fn measure_width(
        &mut self,
        text: &str,
        weight: FontWeight,
        size_px: f64,
    ) -> TitlecardResult<f64> {
        let em = match weight {
            FontWeight::Regular => self.regular_em,
            FontWeight::Bold => self.bold_em,
            FontWeight::ExtraBold => self.extra_bold_em,
        };
        Ok(em * size_px * text.chars().count() as f64)
    }
}

/// Memoizes an inner measurer. Only successful measurements are cached.
///
/// The cache holds at most `capacity` widths. Inserting into a full cache drops every entry
/// first, so a long editing session keeps memory flat while one layout pass still hits.
#[derive(Debug)]
pub struct CachedMeasurer<M> {
    inner: M,
    cache: HashMap<(String, FontWeight, u64), f64>,
    capacity: usize,
    hits: u64,
}

impl<M: TextMeasurer> CachedMeasurer<M> {
    /// Entries kept before the cache starts over.
    pub const DEFAULT_CAPACITY: usize = 4096;

    pub fn new(inner: M) -> Self {
        Self::with_capacity(inner, Self::DEFAULT_CAPACITY)
    }

    /// A `capacity` of zero is treated as one.
    pub fn with_capacity(inner: M, capacity: usize) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
            capacity: capacity.max(1),
            hits: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut M {
        &mut self.inner
    }

    pub fn into_inner(self) -> M {
        self.inner
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Drop all cached widths (call after swapping fonts).
    pub fn clear(&mut self) {
        self.cache.clear();
        self.hits = 0;
    }
}

impl<M: TextMeasurer> TextMeasurer for CachedMeasurer<M> {
    fn measure_width(
        &mut self,
        text: &str,
        weight: FontWeight,
        size_px: f64,
    ) -> TitlecardResult<f64> {
        let key = (text.to_owned(), weight, size_px.to_bits());
        if let Some(&w) = self.cache.get(&key) {
            self.hits += 1;
            return Ok(w);
        }
        let w = self.inner.measure_width(text, weight, size_px)?;
        if self.cache.len() >= self.capacity {
            tracing::trace!(capacity = self.capacity, "measure cache full, starting over");
            self.cache.clear();
        }
        self.cache.insert(key, w);
        Ok(w)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/measure.rs"]
mod tests;
