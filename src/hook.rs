//! Root value hooks, used to turn a freshly parsed document into some target type.
//!
//! The hook is only ever called once per parse, after the whole document has been consumed.
//! If the root of the document is an object, the completed object is handed to
//! [RootHook::to_target], and any descent into nested values is the hook's business. Any other
//! root value goes through [RootHook::from_value], which by default rejects it.
use crate::adapters::TypeAdapters;
use crate::binding_error;
use crate::errors::{Details, ParserResult};
use crate::factory::{ContainerFactory, DomFactory};

pub trait RootHook<F: ContainerFactory = DomFactory> {
    /// The type the hook produces
    type Target;

    /// Convert the root object. `path` is the short name of the target type.
    fn to_target(
        &self,
        path: &str,
        object: F::Object,
        adapters: &TypeAdapters,
    ) -> ParserResult<Self::Target>;

    /// Convert a root value that isn't an object
    fn from_value(&self, _value: F::Value) -> ParserResult<Self::Target> {
        binding_error!(Details::TypeMismatch {
            expected: std::any::type_name::<Self::Target>(),
            found: "non-object value",
        })
    }
}

/// The last path segment of a type name, e.g. `Bean` for `my_crate::beans::Bean`
pub(crate) fn short_type_name<T>() -> &'static str {
    let name = std::any::type_name::<T>();
    let base = name.split('<').next().unwrap_or(name);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use crate::hook::short_type_name;

    struct Bean;

    #[test]
    fn should_shorten_type_names() {
        assert_eq!(short_type_name::<Bean>(), "Bean");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
        assert_eq!(short_type_name::<i64>(), "i64");
    }
}
