//! # Label Scheduler
//!
//! Every box/face pair is an independent asynchronous label request. Each
//! request awaits the shared font metrics once, fits the text, and reports
//! back over a channel. Requests complete in any order; one that never
//! resolves simply never reports.

use crate::label::{place_label, FaceLabel, FaceSelector, TEXT_SIZE};
use crate::layout::PlacedBox;
use crate::metrics::{MetricsLoader, SharedMetrics, TextMetrics, TextOutline};
use packview_core::LayoutError;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// Inputs of a single label request
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRequest {
    pub text: String,
    pub face: FaceSelector,
    pub box_length: f64,
    pub box_width: f64,
}

impl LabelRequest {
    pub fn for_box(placed: &PlacedBox, face: FaceSelector) -> Self {
        Self {
            text: placed.spec.name.clone(),
            face,
            box_length: placed.spec.length,
            box_width: placed.spec.width,
        }
    }
}

/// A fitted label with the glyph outlines to draw
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLabel {
    pub label: FaceLabel,
    pub outline: TextOutline,
}

/// How one label request ended
#[derive(Debug, Clone, PartialEq)]
pub enum LabelOutcome {
    Attached(ResolvedLabel),
    /// Text wider than its face; silently skipped
    Omitted {
        face: FaceSelector,
        measured_width: f64,
        face_extent: f64,
    },
    /// The font resource resolved to nothing
    MetricsUnavailable { face: FaceSelector },
    /// The request itself was malformed
    Invalid {
        face: FaceSelector,
        error: LayoutError,
    },
}

impl LabelOutcome {
    pub fn face(&self) -> FaceSelector {
        match self {
            Self::Attached(resolved) => resolved.label.face,
            Self::Omitted { face, .. }
            | Self::MetricsUnavailable { face }
            | Self::Invalid { face, .. } => *face,
        }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self, Self::Attached(_))
    }
}

/// Fit a label with metrics that are already available.
pub fn label_with_metrics<M: TextMetrics + ?Sized>(
    metrics: &M,
    request: &LabelRequest,
) -> LabelOutcome {
    let measured = metrics.measure(&request.text, TEXT_SIZE);
    match place_label(
        &request.text,
        request.face,
        request.box_length,
        request.box_width,
        measured,
    ) {
        Ok(Some(label)) => LabelOutcome::Attached(ResolvedLabel {
            outline: metrics.outline(&request.text, TEXT_SIZE),
            label,
        }),
        Ok(None) => {
            let face_extent = request
                .face
                .face_extent(request.box_length, request.box_width);
            debug!(
                text = %request.text,
                face = %request.face,
                measured,
                face_extent,
                "label omitted"
            );
            LabelOutcome::Omitted {
                face: request.face,
                measured_width: measured,
                face_extent,
            }
        }
        Err(error) => LabelOutcome::Invalid {
            face: request.face,
            error,
        },
    }
}

/// Await the shared metrics, then fit the label.
pub async fn resolve_label<L: MetricsLoader>(
    metrics: &SharedMetrics<L>,
    request: &LabelRequest,
) -> LabelOutcome {
    match metrics.resolve().await {
        Some(m) => label_with_metrics(m.as_ref(), request),
        None => LabelOutcome::MetricsUnavailable { face: request.face },
    }
}

/// Spawns label requests and collects their outcomes.
///
/// Must be used from within a tokio runtime.
pub struct LabelScheduler<K, L: MetricsLoader> {
    metrics: SharedMetrics<L>,
    tx: UnboundedSender<(K, LabelOutcome)>,
    rx: UnboundedReceiver<(K, LabelOutcome)>,
    pending: usize,
}

impl<K: Send + 'static, L: MetricsLoader> LabelScheduler<K, L> {
    pub fn new(metrics: SharedMetrics<L>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            metrics,
            tx,
            rx,
            pending: 0,
        }
    }

    pub fn metrics(&self) -> &SharedMetrics<L> {
        &self.metrics
    }

    /// Requests issued but not yet collected
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn request(&mut self, key: K, request: LabelRequest) {
        let metrics = self.metrics.clone();
        let tx = self.tx.clone();
        self.pending += 1;
        tokio::spawn(async move {
            let outcome = resolve_label(&metrics, &request).await;
            // Receiver gone means the session ended; nothing to attach to
            let _ = tx.send((key, outcome));
        });
    }

    /// Outcomes that are ready now, without waiting
    pub fn drain_ready(&mut self) -> Vec<(K, LabelOutcome)> {
        let mut ready = Vec::new();
        while let Ok(item) = self.rx.try_recv() {
            ready.push(item);
        }
        self.pending = self.pending.saturating_sub(ready.len());
        ready
    }

    /// Wait for every outstanding request.
    ///
    /// Never returns while a request is still waiting on metrics that do
    /// not resolve.
    pub async fn wait_all(&mut self) -> Vec<(K, LabelOutcome)> {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(std::mem::replace(&mut self.tx, tx));
        let mut previous = std::mem::replace(&mut self.rx, rx);

        let mut done = Vec::with_capacity(self.pending);
        while let Some(item) = previous.recv().await {
            done.push(item);
        }
        self.pending = 0;
        done
    }
}
