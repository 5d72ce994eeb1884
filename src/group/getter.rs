//! Loader capability for cache misses.

use async_trait::async_trait;

/// Loads the authoritative value for a key, e.g. from a database.
///
/// Called concurrently, including for the same key.
#[async_trait]
pub trait Getter: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

/// Adapts a synchronous closure into a [`Getter`].
#[derive(Debug, Clone)]
pub struct GetterFn<F>(pub F);

#[async_trait]
impl<F> Getter for GetterFn<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (self.0)(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_getter_fn() {
        let getter = GetterFn(|key: &str| -> anyhow::Result<Vec<u8>> {
            Ok(key.as_bytes().to_vec())
        });
        assert_eq!(getter.get("key").await.unwrap(), b"key".to_vec());
    }

    #[tokio::test]
    async fn test_getter_fn_as_trait_object() {
        let getter: Box<dyn Getter> = Box::new(GetterFn(|key: &str| -> anyhow::Result<Vec<u8>> {
            anyhow::bail!("{} not exist", key)
        }));
        let err = getter.get("kkk").await.unwrap_err();
        assert_eq!(err.to_string(), "kkk not exist");
    }
}
