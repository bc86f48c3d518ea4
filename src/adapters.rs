//! String type adapters.
//!
//! A [TypeAdapter] lets a type round-trip through JSON as a quoted string rather than as a
//! structural value (dates and times being the usual suspects). Adapters are registered in
//! [TypeAdapters] against the type they convert, and are consulted by the writer whenever it
//! meets an opaque value, and by root hooks during binding.
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Conversion between a type and its string form
pub trait TypeAdapter<T> {
    fn serialize(&self, value: &T) -> String;
    fn deserialize(&self, s: &str) -> Result<T, String>;
}

/// A registered adapter, along with a type-erased serialization entry point
struct Registration {
    /// A `Box<dyn TypeAdapter<T>>`, boxed again so it can be stored untyped
    adapter: Box<dyn Any>,
    /// Monomorphised serializer for the registered type
    serialize: fn(&dyn Any, &dyn Any) -> Option<String>,
}

fn serialize_erased<T: 'static>(adapter: &dyn Any, value: &dyn Any) -> Option<String> {
    let adapter = adapter.downcast_ref::<Box<dyn TypeAdapter<T>>>()?;
    let value = value.downcast_ref::<T>()?;
    Some(adapter.serialize(value))
}

/// Registry of [TypeAdapter]s keyed by the type they convert
#[derive(Default)]
pub struct TypeAdapters {
    adapters: HashMap<TypeId, Registration>,
}

impl TypeAdapters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter for `T`, replacing any previous registration for the same type
    pub fn register<T: 'static, A: TypeAdapter<T> + 'static>(&mut self, adapter: A) -> &mut Self {
        let adapter: Box<dyn TypeAdapter<T>> = Box::new(adapter);
        self.adapters.insert(
            TypeId::of::<T>(),
            Registration {
                adapter: Box::new(adapter),
                serialize: serialize_erased::<T>,
            },
        );
        self
    }

    /// Look up the adapter for `T`
    pub fn get<T: 'static>(&self) -> Option<&dyn TypeAdapter<T>> {
        self.adapters
            .get(&TypeId::of::<T>())
            .and_then(|r| r.adapter.downcast_ref::<Box<dyn TypeAdapter<T>>>())
            .map(|adapter| &**adapter)
    }

    /// Serialize a value of unknown type, if an adapter is registered for its concrete type
    pub fn serialize_any(&self, value: &dyn Any) -> Option<String> {
        self.adapters
            .get(&value.type_id())
            .and_then(|r| (r.serialize)(&*r.adapter, value))
    }

    /// Deserialize a string into `T`. Yields `None` if no adapter is registered for `T`.
    pub fn deserialize<T: 'static>(&self, s: &str) -> Option<Result<T, String>> {
        self.get::<T>().map(|adapter| adapter.deserialize(s))
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
