use cad_host::{CadHost, HostIntrospect};

/// Combined trait for operations that issue host mutations and query host
/// state through the same handle.
///
/// Lets an op hold one `&mut dyn HostBundle` and still hand a shared
/// `&dyn HostIntrospect` to selection helpers.
pub trait HostBundle: CadHost + HostIntrospect {
    fn as_introspect(&self) -> &dyn HostIntrospect;
}

// Blanket implementation for any type that implements both traits
impl<T: CadHost + HostIntrospect> HostBundle for T {
    fn as_introspect(&self) -> &dyn HostIntrospect {
        self
    }
}
