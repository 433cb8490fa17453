//! Silencing and capturing the standard streams of the global context.
//!
//! Every operation installs its sinks on [`OutputContext::global`], runs the
//! body, and pops the sinks once the body is finished. For plain bodies that
//! is one [`settle`](crate::completion::settle) after they return; for the
//! `_async` variants it is when the returned future resolves. The body's
//! result is handed back unchanged.
//!
//! Scopes overlapping in time must nest. Releasing an outer scope while an
//! inner one is still installed panics.

use std::future::Future;

use crate::capture::CaptureChannel;
use crate::context::OutputContext;
use crate::ports::sink::StreamSelector;
use crate::scope::Captured;

/// Runs `body` with stdout discarded.
pub async fn silence_stdout<T>(body: impl FnOnce() -> T) -> T {
    OutputContext::global().silenced(StreamSelector::Stdout, body).await
}

/// Runs `body` with stderr discarded.
pub async fn silence_stderr<T>(body: impl FnOnce() -> T) -> T {
    OutputContext::global().silenced(StreamSelector::Stderr, body).await
}

/// Runs `body` with both streams discarded.
pub async fn silence_output<T>(body: impl FnOnce() -> T) -> T {
    OutputContext::global().silenced(StreamSelector::Both, body).await
}

/// Runs `body` with stdout discarded until its future resolves.
pub async fn silence_stdout_async<F: Future>(body: impl FnOnce() -> F) -> F::Output {
    OutputContext::global().silenced_async(StreamSelector::Stdout, body).await
}

/// Runs `body` with stderr discarded until its future resolves.
pub async fn silence_stderr_async<F: Future>(body: impl FnOnce() -> F) -> F::Output {
    OutputContext::global().silenced_async(StreamSelector::Stderr, body).await
}

/// Runs `body` with both streams discarded until its future resolves.
pub async fn silence_output_async<F: Future>(body: impl FnOnce() -> F) -> F::Output {
    OutputContext::global().silenced_async(StreamSelector::Both, body).await
}

/// Runs `body` with stdout captured.
pub async fn capture_stdout<T>(body: impl FnOnce() -> T) -> (T, CaptureChannel) {
    let (value, captured) = OutputContext::global().captured(StreamSelector::Stdout, body).await;
    (value, only(captured.stdout))
}

/// Runs `body` with stderr captured.
pub async fn capture_stderr<T>(body: impl FnOnce() -> T) -> (T, CaptureChannel) {
    let (value, captured) = OutputContext::global().captured(StreamSelector::Stderr, body).await;
    (value, only(captured.stderr))
}

/// Runs `body` with both streams captured.
pub async fn capture_output<T>(body: impl FnOnce() -> T) -> (T, Captured) {
    OutputContext::global().captured(StreamSelector::Both, body).await
}

/// Runs `body` with stdout captured until its future resolves.
pub async fn capture_stdout_async<F: Future>(body: impl FnOnce() -> F) -> (F::Output, CaptureChannel) {
    let (value, captured) =
        OutputContext::global().captured_async(StreamSelector::Stdout, body).await;
    (value, only(captured.stdout))
}

/// Runs `body` with stderr captured until its future resolves.
pub async fn capture_stderr_async<F: Future>(body: impl FnOnce() -> F) -> (F::Output, CaptureChannel) {
    let (value, captured) =
        OutputContext::global().captured_async(StreamSelector::Stderr, body).await;
    (value, only(captured.stderr))
}

/// Runs `body` with both streams captured until its future resolves.
pub async fn capture_output_async<F: Future>(body: impl FnOnce() -> F) -> (F::Output, Captured) {
    OutputContext::global().captured_async(StreamSelector::Both, body).await
}

fn only(channel: Option<CaptureChannel>) -> CaptureChannel {
    match channel {
        Some(channel) => channel,
        None => unreachable!("single-stream capture always yields its channel"),
    }
}
