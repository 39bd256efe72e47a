//! Stack growth for the recursive parser and evaluator.
//!
//! Deeply nested source or deep (but still legal) recursion in a program can
//! need more stack than the host thread has. Recursive entry points wrap their
//! body in [`ensure_sufficient_stack`], which switches to a freshly allocated
//! segment once the remaining stack drops below the red zone.

/// Grow once less than this much stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
