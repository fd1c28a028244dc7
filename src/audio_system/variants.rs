/// Variant resolver
///
/// Maps a group name ("victoria", "error") to one of its registered
/// members, chosen uniformly at random on every call.
use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};

use super::registry::ResourceRegistry;
use crate::catalog::VARIANT_GROUPS;

pub struct VariantResolver {
    groups: HashMap<&'static str, &'static [&'static str]>,
    rng: Box<dyn RngCore>,
}

impl VariantResolver {
    /// Resolver over the compiled-in variant table with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(Box::new(StdRng::from_entropy()))
    }

    /// Resolver with a caller-supplied random source.
    pub fn with_rng(rng: Box<dyn RngCore>) -> Self {
        Self::with_groups(VARIANT_GROUPS, rng)
    }

    pub fn with_groups(
        groups: &'static [(&'static str, &'static [&'static str])],
        rng: Box<dyn RngCore>,
    ) -> Self {
        Self {
            groups: groups.iter().copied().collect(),
            rng,
        }
    }

    pub fn is_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Pick a registered member of group `name`.
    ///
    /// `None` when `name` is not a group or none of its members are
    /// registered; the caller then treats `name` as a direct resource.
    pub fn resolve(&mut self, name: &str, registry: &ResourceRegistry) -> Option<&'static str> {
        let members = self.groups.get(name)?;

        let available: Vec<&'static str> = members
            .iter()
            .copied()
            .filter(|member| registry.contains(member))
            .collect();

        let chosen = available.choose(&mut *self.rng).copied();
        match chosen {
            Some(member) => tracing::debug!("Variant '{}' resolved to '{}'", name, member),
            None => tracing::debug!("Variant '{}' has no registered members", name),
        }
        chosen
    }
}

impl Default for VariantResolver {
    fn default() -> Self {
        Self::new()
    }
}
