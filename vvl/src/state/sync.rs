use ash::vk;
use parking_lot::Mutex;
use smallvec::SmallVec;
use std::{
    collections::VecDeque,
    sync::atomic::{AtomicU64, Ordering},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FenceState {
    Unsignaled,
    /// Submitted with the given queue submission and not yet observed as signaled.
    Inflight {
        queue: vk::Queue,
        seq: u64,
    },
    Signaled,
}

#[derive(Debug)]
pub struct Fence {
    pub handle: vk::Fence,
    state: Mutex<FenceState>,
}

impl Fence {
    pub fn new(handle: vk::Fence, create_info: &vk::FenceCreateInfo<'_>) -> Self {
        let state = if create_info.flags.contains(vk::FenceCreateFlags::SIGNALED) {
            FenceState::Signaled
        } else {
            FenceState::Unsignaled
        };

        Fence {
            handle,
            state: Mutex::new(state),
        }
    }

    #[inline]
    pub fn state(&self) -> FenceState {
        *self.state.lock()
    }

    #[inline]
    pub fn set_state(&self, state: FenceState) {
        *self.state.lock() = state;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SemaphoreState {
    Unsignaled,
    Signaled,
}

#[derive(Debug)]
pub struct Semaphore {
    pub handle: vk::Semaphore,
    pub semaphore_type: vk::SemaphoreType,
    state: Mutex<SemaphoreState>,
}

impl Semaphore {
    /// # Safety
    ///
    /// - The `pNext` chain of `create_info` must be valid.
    pub unsafe fn new(handle: vk::Semaphore, create_info: &vk::SemaphoreCreateInfo<'_>) -> Self {
        let semaphore_type = unsafe {
            crate::ffi::chain_find::<vk::SemaphoreTypeCreateInfo<'_>>(
                create_info.p_next,
                vk::StructureType::SEMAPHORE_TYPE_CREATE_INFO,
            )
        }
        .map_or(vk::SemaphoreType::BINARY, |info| info.semaphore_type);

        Semaphore {
            handle,
            semaphore_type,
            state: Mutex::new(SemaphoreState::Unsignaled),
        }
    }

    #[inline]
    pub fn is_binary(&self) -> bool {
        self.semaphore_type == vk::SemaphoreType::BINARY
    }

    #[inline]
    pub fn state(&self) -> SemaphoreState {
        *self.state.lock()
    }

    #[inline]
    pub fn set_state(&self, state: SemaphoreState) {
        *self.state.lock() = state;
    }
}

/// One batch of work handed to a queue, kept until it is known to have completed.
#[derive(Clone, Debug, Default)]
pub struct Submission {
    pub seq: u64,
    pub command_buffers: SmallVec<[vk::CommandBuffer; 4]>,
    pub wait_semaphores: SmallVec<[vk::Semaphore; 4]>,
    pub signal_semaphores: SmallVec<[vk::Semaphore; 4]>,
    pub fence: vk::Fence,
}

#[derive(Debug)]
pub struct Queue {
    pub handle: vk::Queue,
    pub family_index: u32,
    pub queue_index: u32,
    next_seq: AtomicU64,
    submissions: Mutex<VecDeque<Submission>>,
}

impl Queue {
    pub fn new(handle: vk::Queue, family_index: u32, queue_index: u32) -> Self {
        Queue {
            handle,
            family_index,
            queue_index,
            next_seq: AtomicU64::new(1),
            submissions: Mutex::new(VecDeque::new()),
        }
    }

    /// Assigns the next sequence number to `submission` and queues it. Returns the number.
    pub fn push_submission(&self, mut submission: Submission) -> u64 {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        submission.seq = seq;
        self.submissions.lock().push_back(submission);

        seq
    }

    /// Removes and returns every submission up to and including `seq`, oldest first.
    pub fn retire_through(&self, seq: u64) -> Vec<Submission> {
        let mut submissions = self.submissions.lock();
        let count = submissions.iter().take_while(|s| s.seq <= seq).count();

        submissions.drain(..count).collect()
    }

    /// Removes and returns every queued submission, oldest first.
    pub fn retire_all(&self) -> Vec<Submission> {
        self.submissions.lock().drain(..).collect()
    }

    /// Whether any queued submission satisfies `f`.
    pub fn any_submission(&self, f: impl FnMut(&Submission) -> bool) -> bool {
        self.submissions.lock().iter().any(f)
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.submissions.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::{Fence, FenceState, Queue, Submission};
    use ash::vk::{self, Handle};

    #[test]
    fn fence_initial_state() {
        let signaled = Fence::new(
            vk::Fence::from_raw(1),
            &vk::FenceCreateInfo {
                flags: vk::FenceCreateFlags::SIGNALED,
                ..Default::default()
            },
        );
        assert_eq!(signaled.state(), FenceState::Signaled);

        let unsignaled = Fence::new(vk::Fence::from_raw(2), &vk::FenceCreateInfo::default());
        assert_eq!(unsignaled.state(), FenceState::Unsignaled);
    }

    #[test]
    fn queue_retirement_order() {
        let queue = Queue::new(vk::Queue::from_raw(1), 0, 0);
        let first = queue.push_submission(Submission::default());
        let second = queue.push_submission(Submission::default());
        let third = queue.push_submission(Submission::default());
        assert!(first < second && second < third);

        let retired = queue.retire_through(second);
        assert_eq!(
            retired.iter().map(|s| s.seq).collect::<Vec<_>>(),
            [first, second],
        );
        assert_eq!(queue.pending_count(), 1);
        assert!(queue.any_submission(|s| s.seq == third));
        assert!(!queue.any_submission(|s| s.seq == first));

        assert_eq!(queue.retire_all().len(), 1);
        assert_eq!(queue.pending_count(), 0);
    }
}
