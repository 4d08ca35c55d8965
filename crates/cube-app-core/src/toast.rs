// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Toast queue with TTL + dedupe, and the fire-and-forget notification port
//! the session core reports user-facing failures through.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default lifetime of a toast raised through [`NotifyPort`].
pub const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(4);

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Informational note.
    Info,
    /// Warning that may need attention.
    Warn,
    /// Error requiring user awareness.
    Error,
}

/// Fire-and-forget, auto-dismissing user notification.
///
/// Callers never inspect notification state after raising one.
pub trait NotifyPort {
    /// Raise a notification.
    fn notify(&mut self, kind: ToastKind, message: &str);
}

/// Identifier for a toast entry.
pub type ToastId = u64;

/// Toast data stored in the service.
#[derive(Debug, Clone)]
pub struct Toast {
    /// Stable identifier.
    pub id: ToastId,
    /// Severity.
    pub kind: ToastKind,
    /// Message line.
    pub message: String,
    /// Time-to-live duration.
    pub ttl: Duration,
    /// Creation time.
    pub created: Instant,
}

/// Rendering-friendly view of a toast.
#[derive(Debug, Clone)]
pub struct ToastRender {
    /// Stable identifier.
    pub id: ToastId,
    /// Severity.
    pub kind: ToastKind,
    /// Message line.
    pub message: String,
    /// 1.0 -> just created, 0.0 -> expired.
    pub progress: f32,
}

/// In-memory toast queue with TTL and dedupe window.
pub struct ToastService {
    queue: VecDeque<Toast>,
    max: usize,
    dedupe_window: Duration,
    next_id: ToastId,
}

impl ToastService {
    /// Create a new queue with a maximum length.
    pub fn new(max: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            max,
            dedupe_window: Duration::from_millis(500),
            next_id: 1,
        }
    }

    /// Push a toast, deduping identical recent entries (same kind/message within `dedupe_window`).
    pub fn push<S>(&mut self, kind: ToastKind, message: S, ttl: Duration, now: Instant) -> ToastId
    where
        S: Into<String>,
    {
        let message = message.into();

        if let Some(existing) = self.queue.iter_mut().find(|t| {
            t.kind == kind
                && t.message == message
                && now.duration_since(t.created) <= self.dedupe_window
        }) {
            existing.created = now;
            existing.ttl = ttl;
            return existing.id;
        }

        let id = self.next_id;
        self.next_id += 1;
        if self.queue.len() == self.max {
            self.queue.pop_front();
        }
        self.queue.push_back(Toast {
            id,
            kind,
            message,
            ttl,
            created: now,
        });
        id
    }

    /// Drop expired toasts (call once per loop turn).
    pub fn retain_visible(&mut self, now: Instant) {
        self.queue.retain(|t| now.duration_since(t.created) < t.ttl);
    }

    /// Return render-ready toasts with progress ratios.
    pub fn visible(&self, now: Instant) -> Vec<ToastRender> {
        self.queue
            .iter()
            .filter(|t| now.duration_since(t.created) < t.ttl)
            .map(|t| ToastRender {
                id: t.id,
                kind: t.kind,
                message: t.message.clone(),
                progress: 1.0 - (now.duration_since(t.created).as_secs_f32() / t.ttl.as_secs_f32()),
            })
            .collect()
    }
}

impl NotifyPort for ToastService {
    fn notify(&mut self, kind: ToastKind, message: &str) {
        self.push(kind, message, DEFAULT_TOAST_TTL, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_toasts_within_window_are_merged() {
        let mut svc = ToastService::new(8);
        let t0 = Instant::now();
        let a = svc.push(ToastKind::Warn, "camera denied", DEFAULT_TOAST_TTL, t0);
        let b = svc.push(
            ToastKind::Warn,
            "camera denied",
            DEFAULT_TOAST_TTL,
            t0 + Duration::from_millis(100),
        );
        assert_eq!(a, b);
        assert_eq!(svc.visible(t0 + Duration::from_millis(200)).len(), 1);
    }

    #[test]
    fn expired_toasts_are_dropped() {
        let mut svc = ToastService::new(8);
        let t0 = Instant::now();
        svc.push(ToastKind::Info, "init sent", Duration::from_secs(1), t0);
        svc.push(ToastKind::Error, "channel down", Duration::from_secs(5), t0);
        let later = t0 + Duration::from_secs(2);
        svc.retain_visible(later);
        let shown = svc.visible(later);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].kind, ToastKind::Error);
        assert!(shown[0].progress > 0.0 && shown[0].progress < 1.0);
    }

    #[test]
    fn queue_is_bounded() {
        let mut svc = ToastService::new(2);
        let t0 = Instant::now();
        for i in 0..3 {
            svc.push(ToastKind::Info, format!("n{i}"), DEFAULT_TOAST_TTL, t0);
        }
        let shown: Vec<_> = svc.visible(t0).into_iter().map(|t| t.message).collect();
        assert_eq!(shown, vec!["n1".to_string(), "n2".to_string()]);
    }

    #[test]
    fn notify_port_enqueues() {
        let mut svc = ToastService::new(4);
        svc.notify(ToastKind::Warn, "not ready");
        assert_eq!(svc.visible(Instant::now()).len(), 1);
    }
}
