//! Reactive collection owned by a processing task.

use std::future::Future;
use std::sync::Arc;
use zoon::{MutableVec, SignalVec, Task, TaskHandle};

/// Collection whose mutations all happen inside one processor task, usually
/// a `select!` loop over relay streams. The UI binds through [`signal_vec`].
///
/// ```rust
/// let (flash_added_relay, mut flash_added_stream) = relay();
/// let messages = ActorVec::new(vec![], async move |messages| {
///     while let Some(message) = flash_added_stream.next().await {
///         messages.lock_mut().push_cloned(message);
///     }
/// });
/// ```
///
/// [`signal_vec`]: ActorVec::signal_vec
#[derive(Clone, Debug)]
pub struct ActorVec<T>
where
    T: Clone + 'static,
{
    vec: MutableVec<T>,
    #[allow(dead_code)]
    task_handle: Arc<TaskHandle>,
}

impl<T> ActorVec<T>
where
    T: Clone + 'static,
{
    pub fn new<F, Fut>(initial_items: Vec<T>, processor: F) -> Self
    where
        F: FnOnce(MutableVec<T>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let vec = MutableVec::new_with_values(initial_items);
        let task_handle = Arc::new(Task::start_droppable(processor(vec.clone())));
        Self { vec, task_handle }
    }

    pub fn signal_vec(&self) -> impl SignalVec<Item = T> + use<T> {
        self.vec.signal_vec_cloned()
    }
}
