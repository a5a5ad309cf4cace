use hcp_api::HcpOpenShiftCluster;
use hcp_arm::{RegistrationState, Subscription};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Outcome of storing a subscription record
#[derive(Debug)]
pub struct SubscriptionUpdate {
    pub previous: Option<Subscription>,
    pub clusters_removed: usize,
}

#[derive(Default)]
struct Inner {
    subscriptions: HashMap<String, Subscription>,
    clusters: HashMap<String, HcpOpenShiftCluster>,
}

/// Process-local store of subscriptions and cluster resources.
///
/// Keys are lowercased on every access. One lock guards both maps.
#[derive(Default)]
pub struct Cache {
    inner: RwLock<Inner>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_subscription(&self, id: &str) -> Option<Subscription> {
        self.inner.read().await.subscriptions.get(&key(id)).cloned()
    }

    /// Stores the subscription. A subscription moving to `Deleted` loses
    /// every cluster under it in the same write.
    pub async fn set_subscription(&self, id: &str, subscription: Subscription) -> SubscriptionUpdate {
        let id = key(id);
        let mut inner = self.inner.write().await;

        let mut clusters_removed = 0;
        if subscription.state == RegistrationState::Deleted {
            let prefix = format!("/subscriptions/{}/", id);
            let before = inner.clusters.len();
            inner.clusters.retain(|k, _| !k.starts_with(&prefix));
            clusters_removed = before - inner.clusters.len();
        }

        let previous = inner.subscriptions.insert(id, subscription);
        SubscriptionUpdate {
            previous,
            clusters_removed,
        }
    }

    pub async fn get_cluster(&self, id: &str) -> Option<HcpOpenShiftCluster> {
        self.inner.read().await.clusters.get(&key(id)).cloned()
    }

    pub async fn set_cluster(&self, id: &str, cluster: HcpOpenShiftCluster) {
        self.inner.write().await.clusters.insert(key(id), cluster);
    }

    pub async fn delete_cluster(&self, id: &str) -> Option<HcpOpenShiftCluster> {
        self.inner.write().await.clusters.remove(&key(id))
    }

    /// Reads the current cluster, lets `update` produce its replacement, and
    /// stores it, all under one write lock. Nothing is written on error.
    pub async fn upsert_cluster<F, E>(&self, id: &str, update: F) -> Result<HcpOpenShiftCluster, E>
    where
        F: FnOnce(Option<&HcpOpenShiftCluster>) -> Result<HcpOpenShiftCluster, E>,
    {
        let key = key(id);
        let mut inner = self.inner.write().await;
        let cluster = update(inner.clusters.get(&key))?;
        inner.clusters.insert(key, cluster.clone());
        Ok(cluster)
    }

    /// Clusters whose key starts with `prefix`, ordered by key.
    pub async fn list_clusters(&self, prefix: &str) -> Vec<HcpOpenShiftCluster> {
        let prefix = key(prefix);
        let inner = self.inner.read().await;
        let mut matches: Vec<(&String, &HcpOpenShiftCluster)> = inner
            .clusters
            .iter()
            .filter(|(k, _)| k.starts_with(&prefix))
            .collect();
        matches.sort_by(|a, b| a.0.cmp(b.0));
        matches.into_iter().map(|(_, c)| c.clone()).collect()
    }
}

fn key(id: &str) -> String {
    id.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(name: &str) -> HcpOpenShiftCluster {
        HcpOpenShiftCluster {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_subscription_crud() {
        let cache = Cache::new();
        assert!(cache.get_subscription("ABC").await.is_none());

        let update = cache
            .set_subscription("ABC", Subscription::new(RegistrationState::Registered))
            .await;
        assert!(update.previous.is_none());
        assert_eq!(
            cache.get_subscription("abc").await.map(|s| s.state),
            Some(RegistrationState::Registered)
        );

        let update = cache
            .set_subscription("abc", Subscription::new(RegistrationState::Warned))
            .await;
        assert_eq!(update.previous.map(|s| s.state), Some(RegistrationState::Registered));
        assert_eq!(update.clusters_removed, 0);
    }

    #[tokio::test]
    async fn test_deleted_subscription_drops_its_clusters() {
        let cache = Cache::new();
        cache.set_cluster("/subscriptions/s1/resourcegroups/rg/x/a", cluster("a")).await;
        cache.set_cluster("/subscriptions/s1/resourcegroups/rg/x/b", cluster("b")).await;
        cache.set_cluster("/subscriptions/s10/resourcegroups/rg/x/c", cluster("c")).await;

        let update = cache
            .set_subscription("S1", Subscription::new(RegistrationState::Deleted))
            .await;
        assert_eq!(update.clusters_removed, 2);
        assert!(cache.list_clusters("/subscriptions/s1/").await.is_empty());
        assert_eq!(cache.list_clusters("/subscriptions/s10/").await.len(), 1);
        assert_eq!(
            cache.get_subscription("s1").await.map(|s| s.state),
            Some(RegistrationState::Deleted)
        );
    }

    #[tokio::test]
    async fn test_upsert_error_leaves_cache_untouched() {
        let cache = Cache::new();
        let result: Result<_, &str> = cache.upsert_cluster("/a", |_| Err("invalid")).await;
        assert!(result.is_err());
        assert!(cache.get_cluster("/a").await.is_none());

        cache
            .upsert_cluster::<_, ()>("/a", |current| {
                assert!(current.is_none());
                Ok(cluster("one"))
            })
            .await
            .unwrap();
        cache
            .upsert_cluster::<_, ()>("/A", |current| {
                assert_eq!(current.map(|c| c.name.as_str()), Some("one"));
                Ok(cluster("two"))
            })
            .await
            .unwrap();
        assert_eq!(cache.get_cluster("/a").await.unwrap().name, "two");
    }

    #[tokio::test]
    async fn test_list_by_prefix() {
        let cache = Cache::new();
        cache.set_cluster("/subscriptions/s/resourcegroups/rg1/x/b", cluster("b")).await;
        cache.set_cluster("/subscriptions/s/resourcegroups/rg1/x/a", cluster("a")).await;
        cache.set_cluster("/subscriptions/s/resourcegroups/rg2/x/c", cluster("c")).await;

        let names: Vec<String> = cache
            .list_clusters("/subscriptions/S/resourceGroups/rg1/")
            .await
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(cache.list_clusters("/subscriptions/s/").await.len(), 3);

        assert!(cache.delete_cluster("/subscriptions/s/resourcegroups/rg2/x/c").await.is_some());
        assert!(cache.delete_cluster("/subscriptions/s/resourcegroups/rg2/x/c").await.is_none());
    }
}
