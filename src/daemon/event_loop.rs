use std::future::Future;

use tokio::sync::mpsc;

use super::classifier::Classifier;
use super::error::DaemonError;
use crate::notify::Dispatcher;
use crate::pulse::{AudioServer, ChangeEvent};

/// Single consumer of change events: classifies each one and dispatches the
/// resulting notification before taking the next.
pub struct Daemon {
    server: Box<dyn AudioServer>,
    dispatcher: Dispatcher,
    classifier: Classifier,
    events: mpsc::Receiver<ChangeEvent>,
}

impl Daemon {
    pub fn new(
        server: Box<dyn AudioServer>,
        dispatcher: Dispatcher,
        classifier: Classifier,
        events: mpsc::Receiver<ChangeEvent>,
    ) -> Self {
        Self { server, dispatcher, classifier, events }
    }

    /// Listens until `shutdown` resolves.
    ///
    /// Per-event failures are logged and skipped. Only a closed event channel
    /// ends the loop with an error.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<(), DaemonError>
    where
        F: Future<Output = ()>,
    {
        tracing::info!("Listening for PulseAudio events");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Quitting");
                    return Ok(());
                }
                event = self.events.recv() => match event {
                    Some(event) => self.handle(event).await,
                    None => return Err(DaemonError::EventsClosed),
                },
            }
        }
    }

    pub async fn handle(&mut self, event: ChangeEvent) {
        let Some(request) = self.classifier.classify(self.server.as_ref(), &event).await else {
            return;
        };

        if let Err(e) = self.dispatcher.dispatch(&request).await {
            tracing::error!("Failed to notify for {} '{}': {}", request.kind, request.label, e);
        }
    }

    /// Releases the audio server and notification transport connections.
    pub async fn shutdown(self) -> Result<(), DaemonError> {
        let audio = self.server.disconnect().await;
        let notify = self.dispatcher.close().await;
        audio?;
        notify?;
        Ok(())
    }
}
