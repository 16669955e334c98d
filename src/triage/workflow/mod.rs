//! 数据聚合流程
//!
//! 每个流程是一个状态机：idle -> running -> succeeded / failed。
//! 新一轮运行（以及 reset）都会先清空上一轮的数据，并领取新的代号；
//! 写回结果时代号已过期的直接丢弃，旧请求晚到也不会覆盖新一轮的状态；
//! `run` 返回的始终是该轮自己的结果。

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::debug;

pub mod changesets;
pub mod loan;
pub mod lock_requests;

pub use changesets::{ChangesetsState, ChangesetsWorkflow};
pub use loan::{LoanState, LoanWorkflow};
pub use lock_requests::{LockRequestsState, LockRequestsWorkflow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

struct Slot<S> {
    generation: u64,
    state: S,
}

/// 带代号的状态槽
pub(crate) struct RunSlot<S> {
    inner: Mutex<Slot<S>>,
}

impl<S: Default + Clone> RunSlot<S> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Slot {
                generation: 0,
                state: S::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 开始新一轮：清空状态后执行 `init`，返回本轮的句柄
    pub(crate) fn begin(&self, init: impl FnOnce(&mut S)) -> RunHandle<'_, S> {
        let mut state = S::default();
        init(&mut state);

        let mut slot = self.lock();
        slot.generation += 1;
        slot.state = state.clone();
        RunHandle {
            slot: self,
            generation: slot.generation,
            state,
        }
    }

    /// 回到 idle，进行中的运行随之作废
    pub(crate) fn reset(&self) {
        let mut slot = self.lock();
        slot.generation += 1;
        slot.state = S::default();
    }

    /// 仅当 `generation` 仍是当前代号时写入，返回是否写入
    fn publish(&self, generation: u64, state: &S) -> bool {
        let mut slot = self.lock();
        if slot.generation != generation {
            debug!(
                "丢弃过期结果: run={}, current={}",
                generation, slot.generation
            );
            return false;
        }
        slot.state = state.clone();
        true
    }

    pub(crate) fn snapshot(&self) -> S {
        self.lock().state.clone()
    }
}

/// 单轮运行
///
/// 本轮的数据始终保存在句柄里；只有代号仍然有效时才同步到共享状态。
pub(crate) struct RunHandle<'a, S> {
    slot: &'a RunSlot<S>,
    generation: u64,
    state: S,
}

impl<S: Default + Clone> RunHandle<'_, S> {
    pub(crate) fn update(&mut self, apply: impl FnOnce(&mut S)) -> bool {
        apply(&mut self.state);
        self.slot.publish(self.generation, &self.state)
    }

    /// 本轮自己的结果（不受之后的运行影响）
    pub(crate) fn finish(self) -> S {
        self.state
    }
}
