pub mod method_def_parentheses;

use super::registry::CopRegistry;

pub fn register_all(registry: &mut CopRegistry) {
    registry.register(Box::new(method_def_parentheses::MethodDefParentheses));
}
