//! Uniform reply selection with an injected random source.

use super::catalog::{Category, ResponseCatalog};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Picks one candidate reply uniformly at random.
///
/// The generator is owned by the selector so tests can seed it; nothing reads a
/// process-wide RNG.
#[derive(Debug, Clone)]
pub struct ResponseSelector<R = StdRng> {
    rng: R,
}

impl ResponseSelector<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> ResponseSelector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn select<'c>(&mut self, catalog: &'c ResponseCatalog, category: Category) -> &'c str {
        catalog
            .responses(category)
            .choose(&mut self.rng)
            .or_else(|| catalog.responses(Category::Default).first())
            .map(String::as_str)
            .unwrap_or_default()
    }
}
