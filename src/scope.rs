//! Redirection scopes: push/pop transactions whose lifetime follows a body.

use std::future::Future;
use std::sync::Arc;

use crate::adapters::capturing::CaptureSink;
use crate::adapters::null::NullSink;
use crate::capture::CaptureChannel;
use crate::completion::{Completion, Release};
use crate::context::{OutputContext, SinkToken};
use crate::error::OutputError;
use crate::ports::sink::{OutputSink, Stream, StreamSelector};

/// Sinks installed by one redirection, popped when the guard is released.
///
/// Releasing pops in reverse install order and signals done on each sink.
/// Dropping an unreleased guard releases it too, which covers early returns,
/// panics inside the body, and cancelled futures. A release that finds
/// another redirection still on top panics, since continuing would leave the
/// ambient stacks corrupted.
#[must_use = "dropping the guard ends the redirection immediately"]
pub struct RedirectGuard<'a> {
    ctx: &'a OutputContext,
    installed: Vec<(SinkToken, Arc<dyn OutputSink>)>,
}

impl<'a> RedirectGuard<'a> {
    pub(crate) fn install(
        ctx: &'a OutputContext,
        selector: StreamSelector,
        mut make_sink: impl FnMut(Stream) -> Arc<dyn OutputSink>,
    ) -> Self {
        let installed = selector
            .streams()
            .iter()
            .map(|&stream| {
                let sink = make_sink(stream);
                (ctx.push(stream, Arc::clone(&sink)), sink)
            })
            .collect();
        Self { ctx, installed }
    }

    /// Returns `true` once every installed sink has been popped.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.installed.is_empty()
    }

    fn close(&mut self) -> Result<(), OutputError> {
        while let Some((token, sink)) = self.installed.pop() {
            let stream = token.stream();
            if let Err(err) = self.ctx.pop(token) {
                // Leave the remaining sinks in place; the stacks no longer
                // match this guard.
                self.installed.clear();
                return Err(err);
            }
            sink.signal_done();
            tracing::debug!(%stream, kind = sink.kind(), "released redirection");
        }
        Ok(())
    }

    fn close_or_panic(&mut self) {
        if let Err(err) = self.close() {
            if std::thread::panicking() {
                tracing::error!(error = %err, "redirection released out of order during unwind");
            } else {
                panic!("{err}");
            }
        }
    }
}

impl Release for RedirectGuard<'_> {
    type Error = OutputError;

    fn release(&mut self) -> Result<(), OutputError> {
        self.close()
    }
}

impl Drop for RedirectGuard<'_> {
    fn drop(&mut self) {
        self.close_or_panic();
    }
}

/// Capture channels produced by a capture over one or both streams.
#[derive(Debug)]
pub struct Captured {
    /// Output diverted from stdout, if stdout was captured.
    pub stdout: Option<CaptureChannel>,
    /// Output diverted from stderr, if stderr was captured.
    pub stderr: Option<CaptureChannel>,
}

impl Captured {
    /// Both streams interleaved by arrival order.
    ///
    /// Ordering within a stream is exact; ordering between the two streams is
    /// best effort.
    #[must_use]
    pub fn combined(self) -> Option<CaptureChannel> {
        match (self.stdout, self.stderr) {
            (Some(out), Some(err)) => Some(out.merge(err)),
            (out, err) => out.or(err),
        }
    }
}

impl OutputContext {
    /// Installs one sink per selected stream until the guard is released.
    pub fn redirect(
        &self,
        selector: StreamSelector,
        make_sink: impl FnMut(Stream) -> Arc<dyn OutputSink>,
    ) -> RedirectGuard<'_> {
        RedirectGuard::install(self, selector, make_sink)
    }

    /// Discards output on the selected streams until the guard is released.
    pub fn silence(&self, selector: StreamSelector) -> RedirectGuard<'_> {
        self.redirect(selector, |_| Arc::new(NullSink))
    }

    /// Captures output on the selected streams until the guard is released.
    ///
    /// The returned channels close once the guard is released and no writer
    /// holds the capturing sinks any more.
    pub fn capture(&self, selector: StreamSelector) -> (RedirectGuard<'_>, Captured) {
        let mut captured = Captured { stdout: None, stderr: None };
        let guard = self.redirect(selector, |stream| {
            let (sink, channel) = CaptureSink::channel(stream);
            match stream {
                Stream::Stdout => captured.stdout = Some(channel),
                Stream::Stderr => captured.stderr = Some(channel),
            }
            sink
        });
        (guard, captured)
    }

    /// Runs `body` with the selected streams silenced.
    ///
    /// The silence outlives `body` by one [`settle`](crate::completion::settle),
    /// so tasks it spawned on its way out are silenced as well.
    pub async fn silenced<T>(&self, selector: StreamSelector, body: impl FnOnce() -> T) -> T {
        let guard = self.silence(selector);
        let value = body();
        finish(guard, Completion::ready(value)).await
    }

    /// Runs `body` with the selected streams silenced until its future resolves.
    pub async fn silenced_async<F: Future>(
        &self,
        selector: StreamSelector,
        body: impl FnOnce() -> F,
    ) -> F::Output {
        let guard = self.silence(selector);
        let future = body();
        finish(guard, Completion::pending(future)).await
    }

    /// Runs `body` with the selected streams captured.
    ///
    /// Capture lasts one [`settle`](crate::completion::settle) past `body`.
    pub async fn captured<T>(
        &self,
        selector: StreamSelector,
        body: impl FnOnce() -> T,
    ) -> (T, Captured) {
        let (guard, captured) = self.capture(selector);
        let value = body();
        (finish(guard, Completion::ready(value)).await, captured)
    }

    /// Runs `body` with the selected streams captured until its future resolves.
    pub async fn captured_async<F: Future>(
        &self,
        selector: StreamSelector,
        body: impl FnOnce() -> F,
    ) -> (F::Output, Captured) {
        let (guard, captured) = self.capture(selector);
        let future = body();
        (finish(guard, Completion::pending(future)).await, captured)
    }
}

async fn finish<F: Future>(mut guard: RedirectGuard<'_>, body: Completion<F>) -> F::Output {
    let (output, released) = body.finish(&mut guard).await;
    if let Err(err) = released {
        panic!("{err}");
    }
    output
}
