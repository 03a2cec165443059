//! Per-request category context
//!
//! The registry is consulted on every extraction; there is deliberately no
//! process-wide cache. A stale vocabulary would make the prompt and the
//! reconciler disagree with what reviewers actually see.

use purser_domain::{CategoryAllowlist, CategoryRegistry};
use std::fmt::Display;
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::types::CategoryContext;

/// Fetch the active vocabulary, falling back to the seed set when the
/// registry has nothing
///
/// An unreachable registry is an error; an empty one is not.
pub async fn build_category_context<C>(registry: &C) -> Result<CategoryContext, ExtractError>
where
    C: CategoryRegistry,
    C::Error: Display,
{
    let names = registry
        .active_names()
        .await
        .map_err(|e| ExtractError::Registry(format!("category registry: {}", e)))?;

    let allowlist = CategoryAllowlist::from_names(names);
    if allowlist.is_empty() {
        warn!("Category registry has no active names, using seed vocabulary");
        return Ok(CategoryContext {
            allowlist: CategoryAllowlist::default_vocabulary(),
            from_seed: true,
        });
    }

    debug!("Category context: {} active categories", allowlist.len());
    Ok(CategoryContext {
        allowlist,
        from_seed: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use purser_registry::MemoryCategoryRegistry;

    #[tokio::test]
    async fn test_active_names_become_the_allowlist() {
        let registry = MemoryCategoryRegistry::with_names(["Travel", "Meals"]);
        let context = build_category_context(&registry).await.unwrap();

        assert_eq!(context.allowlist.names(), ["Travel", "Meals"]);
        assert!(!context.from_seed);
    }

    #[tokio::test]
    async fn test_empty_registry_falls_back_to_seed() {
        let registry = MemoryCategoryRegistry::new();
        let context = build_category_context(&registry).await.unwrap();

        assert!(context.from_seed);
        assert_eq!(
            context.allowlist.names(),
            CategoryAllowlist::default_vocabulary().names()
        );
    }

    #[tokio::test]
    async fn test_blank_names_alone_also_fall_back() {
        let registry = MemoryCategoryRegistry::with_names(["  ", ""]);
        let context = build_category_context(&registry).await.unwrap();

        assert!(context.from_seed);
    }

    #[tokio::test]
    async fn test_unreachable_registry_is_an_error() {
        let registry = MemoryCategoryRegistry::new();
        registry.set_unavailable(true);

        let result = build_category_context(&registry).await;
        assert!(matches!(result, Err(ExtractError::Registry(_))));
    }
}
