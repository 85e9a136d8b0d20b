/// Single-slot scheduling for per-frame recomputation
///
/// Resize and scroll events arrive in bursts. Each burst only needs the last
/// event handled, once, on the next frame. Scheduling a task replaces any
/// task still waiting; nothing is queued.

#[derive(Debug, Clone)]
pub struct FrameSlot<T> {
    pending: Option<T>,
}

impl<T> FrameSlot<T> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Put `task` in the slot, returning the unfired task it replaced
    pub fn schedule(&mut self, task: T) -> Option<T> {
        self.pending.replace(task)
    }

    /// Hand the pending task to the frame callback
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Drop the pending task without running it
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Default for FrameSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
