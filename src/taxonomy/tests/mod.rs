mod rest_tests;

use crate::taxonomy::register;
use crate::taxonomy::registry::ExtensionRegistry;

pub(crate) fn registry() -> ExtensionRegistry {
    let mut registry = ExtensionRegistry::new();
    register(&mut registry);
    registry
}
