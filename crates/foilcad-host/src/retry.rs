//! 宿主调用重试
//!
//! 宿主忙于处理其他请求时会直接拒绝新的调用。对这类调用以固定间隔
//! 原样重试，直到成功或超过总超时时间；超时后把最后一次的繁忙错误
//! 交给调用方。其他错误不重试。
//!
//! 重试只发生在显式经过 [`RetryingHost::call`] 的调用点上。

use crate::host::{CadHost, HostError};
use std::time::{Duration, Instant};

/// 默认重试间隔
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// 默认总超时
pub const DEFAULT_RETRY_TIMEOUT: Duration = Duration::from_secs(10);

/// 重试策略：固定间隔，固定总超时
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: DEFAULT_RETRY_DELAY,
            timeout: DEFAULT_RETRY_TIMEOUT,
        }
    }
}

/// 带重试的宿主客户端
pub struct RetryingHost<H> {
    host: H,
    policy: RetryPolicy,
}

impl<H: CadHost> RetryingHost<H> {
    pub fn new(host: H) -> Self {
        Self::with_policy(host, RetryPolicy::default())
    }

    pub fn with_policy(host: H, policy: RetryPolicy) -> Self {
        Self { host, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn get_ref(&self) -> &H {
        &self.host
    }

    pub fn get_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_inner(self) -> H {
        self.host
    }

    /// 执行一次宿主调用，宿主繁忙时重试
    ///
    /// `label` 仅用于日志。
    pub fn call<T>(
        &mut self,
        label: &str,
        mut f: impl FnMut(&mut H) -> Result<T, HostError>,
    ) -> Result<T, HostError> {
        let started = Instant::now();
        let mut attempt = 1u32;

        loop {
            match f(&mut self.host) {
                Err(err) if err.is_transient() => {
                    if started.elapsed() >= self.policy.timeout {
                        tracing::warn!(
                            "{} still rejected after {} attempts in {:?}, giving up",
                            label,
                            attempt,
                            started.elapsed()
                        );
                        return Err(err);
                    }
                    tracing::debug!(
                        "{} rejected (attempt {}): {}, retrying in {:?}",
                        label,
                        attempt,
                        err,
                        self.policy.delay
                    );
                    std::thread::sleep(self.policy.delay);
                    attempt += 1;
                }
                result => {
                    if attempt > 1 && result.is_ok() {
                        tracing::debug!("{} succeeded after {} attempts", label, attempt);
                    }
                    return result;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemoryHost;

    fn fast_policy(timeout_ms: u64) -> RetryPolicy {
        RetryPolicy {
            delay: Duration::from_millis(1),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay, Duration::from_millis(100));
        assert_eq!(policy.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_retries_until_host_is_free() {
        let mut host =
            RetryingHost::with_policy(MemoryHost::part().busy_for(3), fast_policy(5_000));

        let doc = host.call("active_document", |h| h.active_document()).unwrap();

        assert!(doc.is_some());
        assert_eq!(host.get_ref().calls, 4);
    }

    #[test]
    fn test_gives_up_after_timeout() {
        let mut host = RetryingHost::with_policy(
            MemoryHost::part().busy_for(usize::MAX),
            fast_policy(20),
        );

        let err = host
            .call("active_document", |h| h.active_document())
            .unwrap_err();

        assert!(matches!(err, HostError::Busy(_)));
        assert!(host.get_ref().calls > 1);
    }

    #[test]
    fn test_other_errors_not_retried() {
        let mut host = RetryingHost::with_policy(MemoryHost::part(), fast_policy(5_000));

        let err = host
            .call("delete_sketch", |h| h.delete_sketch(crate::host::SketchId(99)))
            .unwrap_err();

        assert!(matches!(err, HostError::NotFound { .. }));
        assert_eq!(host.get_ref().calls, 1);
    }
}
