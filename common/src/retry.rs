//! 固定間隔の再試行

use std::future::Future;
use std::time::Duration;

/// 再試行ポリシー（初回 + max_retries 回）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

/// 再試行の結果
#[derive(Debug, Clone, PartialEq)]
pub struct RetryOutcome<T> {
    /// 最後の試行の値
    pub value: T,
    pub attempts: u32,
    pub succeeded: bool,
}

/// `is_success` が真になるまで `operation` を繰り返す
///
/// 試行の間は `sleep(policy.delay)` で待つ。呼び出し対象にもランタイムにも依存しない。
/// `operation` には1始まりの試行番号が渡される。
pub async fn retry_with_delay<T, Op, OpFut, Sl, SlFut, P>(
    policy: &RetryPolicy,
    mut operation: Op,
    is_success: P,
    mut sleep: Sl,
) -> RetryOutcome<T>
where
    Op: FnMut(u32) -> OpFut,
    OpFut: Future<Output = T>,
    Sl: FnMut(Duration) -> SlFut,
    SlFut: Future<Output = ()>,
    P: Fn(&T) -> bool,
{
    let mut attempt = 1;
    loop {
        let value = operation(attempt).await;
        if is_success(&value) {
            return RetryOutcome { value, attempts: attempt, succeeded: true };
        }
        if attempt >= policy.max_attempts() {
            return RetryOutcome { value, attempts: attempt, succeeded: false };
        }

        tracing::debug!(
            attempt,
            max_attempts = policy.max_attempts(),
            delay_ms = policy.delay.as_millis() as u64,
            "attempt failed, retrying"
        );
        sleep(policy.delay).await;
        attempt += 1;
    }
}
