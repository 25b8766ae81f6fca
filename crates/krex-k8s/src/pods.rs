//! Pod lookup used by the local transfer path.

use tracing::debug;

use crate::{K8sError, client::JobClient};

/// First pod whose name starts with `prefix`, in list order.
///
/// First-match-wins is the documented selection policy; callers needing a
/// different strategy (most-recently-started, label-selector-based)
/// substitute this function.
pub fn select_by_prefix<'a>(names: &'a [String], prefix: &str) -> Option<&'a str> {
    names
        .iter()
        .find(|n| n.starts_with(prefix))
        .map(String::as_str)
}

/// Find a pod by name prefix in the namespace.
///
/// Fails with [`K8sError::PodNotFound`] when no pod matches.
pub async fn find_pod_by_prefix(
    client: &dyn JobClient,
    namespace: &str,
    prefix: &str,
) -> Result<String, K8sError> {
    let names = client.list_pod_names(namespace).await?;
    debug!(namespace, prefix, candidates = names.len(), "selecting pod");

    select_by_prefix(&names, prefix)
        .map(str::to_string)
        .ok_or_else(|| K8sError::PodNotFound {
            prefix: prefix.to_string(),
            namespace: namespace.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::{find_pod_by_prefix, select_by_prefix};
    use crate::{K8sError, testing::MockJobClient};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn first_match_wins() {
        let pods = names(&["grafana-0", "prometheus-0", "prometheus-1"]);
        assert_eq!(select_by_prefix(&pods, "prometheus"), Some("prometheus-0"));
    }

    #[test]
    fn no_match_returns_none() {
        let pods = names(&["grafana-0", "alertmanager-0"]);
        assert_eq!(select_by_prefix(&pods, "prometheus"), None);
    }

    #[tokio::test]
    async fn find_fails_with_pod_not_found() {
        let client = MockJobClient::new().with_pods(names(&["grafana-0"]));

        let err = find_pod_by_prefix(&client, "monitoring", "prometheus")
            .await
            .unwrap_err();
        match err {
            K8sError::PodNotFound { prefix, namespace } => {
                assert_eq!(prefix, "prometheus");
                assert_eq!(namespace, "monitoring");
            }
            other => panic!("expected PodNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn find_returns_first_matching_pod() {
        let client =
            MockJobClient::new().with_pods(names(&["prometheus-server-0", "prometheus-1"]));

        let pod = find_pod_by_prefix(&client, "monitoring", "prometheus")
            .await
            .unwrap();
        assert_eq!(pod, "prometheus-server-0");
    }
}
