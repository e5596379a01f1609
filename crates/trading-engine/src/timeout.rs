//! Deadlines for adapter calls.

use std::future::Future;
use std::time::Duration;
use trading_core::error::BrokerError;

/// Await `call`, failing with `BrokerError::Timeout` once `limit` elapses.
pub async fn with_timeout<T, F>(operation: &str, limit: Duration, call: F) -> Result<T, BrokerError>
where
    F: Future<Output = Result<T, BrokerError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(BrokerError::Timeout {
            operation: operation.to_string(),
            secs: limit.as_secs(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passes_result_through() {
        let value = with_timeout("noop", Duration::from_secs(1), async { Ok::<_, BrokerError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_times_out() {
        let result = with_timeout("get_account", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, BrokerError>(())
        })
        .await;

        assert!(matches!(
            result,
            Err(BrokerError::Timeout { operation, .. }) if operation == "get_account"
        ));
    }
}
