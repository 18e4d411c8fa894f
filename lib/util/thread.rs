use std::thread::{Builder, JoinHandle, Scope, ScopedJoinHandle};
use std::{io, panic::resume_unwind};

/// The stack size for spawned threads.
const STACK_SIZE: usize = 2 << 20;

#[derive(Debug)]
pub struct Handle<T>(JoinHandle<T>);

impl<T> Handle<T> {
    /// Waits for the thread to finish, propagating its panic if it had one.
    #[track_caller]
    #[inline(always)]
    pub fn join(self) -> T {
        self.0.join().unwrap_or_else(|e| resume_unwind(e))
    }
}

#[derive(Debug)]
pub struct ScopedHandle<'s, T>(ScopedJoinHandle<'s, T>);

impl<T> ScopedHandle<'_, T> {
    /// Waits for the thread to finish, propagating its panic if it had one.
    #[track_caller]
    #[inline(always)]
    pub fn join(self) -> T {
        self.0.join().unwrap_or_else(|e| resume_unwind(e))
    }
}

#[track_caller]
#[inline(always)]
pub fn spawn<F, T>(name: &str, f: F) -> io::Result<Handle<T>>
where
    F: Send + 'static + FnOnce() -> T,
    T: Send + 'static,
{
    let builder = Builder::new().name(name.to_owned()).stack_size(STACK_SIZE);
    Ok(Handle(builder.spawn(f)?))
}

#[track_caller]
#[inline(always)]
pub fn spawn_scoped<'s, 'e, F, T>(
    scope: &'s Scope<'s, 'e>,
    name: &str,
    f: F,
) -> io::Result<ScopedHandle<'s, T>>
where
    F: Send + 's + FnOnce() -> T,
    T: Send + 's,
{
    let builder = Builder::new().name(name.to_owned()).stack_size(STACK_SIZE);
    Ok(ScopedHandle(builder.spawn_scoped(scope, f)?))
}
