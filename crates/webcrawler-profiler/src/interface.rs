//! Static description of profiled capability traits.

/// One method declared on a capability trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSpec {
    /// Method name.
    pub name: &'static str,
    /// Declared signature, used as the aggregation key.
    pub signature: &'static str,
    /// Whether the method carries the `#[profiled]` marker.
    pub profiled: bool,
}

/// A capability trait that can be wrapped by a [`Profiler`](crate::Profiler).
///
/// Implemented for `dyn Trait` by [`profiled_trait!`](crate::profiled_trait);
/// the method table is fixed when the trait is declared.
pub trait Interface {
    /// Trait name.
    const NAME: &'static str;

    /// Every method declared on the trait, in declaration order.
    const METHODS: &'static [MethodSpec];

    /// Methods carrying the marker.
    fn profiled_methods() -> impl Iterator<Item = &'static MethodSpec> {
        Self::METHODS.iter().filter(|method| method.profiled)
    }

    /// Check if at least one method carries the marker.
    #[must_use]
    fn has_profiled_methods() -> bool {
        Self::profiled_methods().next().is_some()
    }
}
