use std::borrow::Cow;
use std::sync::mpsc as std_mpsc;

use async_trait::async_trait;
use libpulse_binding::callbacks::ListResult;
use libpulse_binding::context::subscribe::{
    Facility, InterestMaskSet, Operation as SubscribeOperation,
};
use libpulse_binding::context::{Context, FlagSet as ContextFlagSet, State as ContextState};
use libpulse_binding::error::PAErr;
use libpulse_binding::mainloop::threaded::Mainloop;
use libpulse_binding::proplist::{properties, Proplist};
use libpulse_binding::volume::{ChannelVolumes, Volume};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

use super::error::AudioError;
use super::types::{AudioServer, ChangeEvent, ChangeKind, DeviceKind, DeviceReading};
use crate::config::PulseConfig;

/// Raw volume the server treats as 100%.
pub const VOLUME_NORM: u32 = Volume::NORMAL.0;

const WORKER_THREAD_NAME: &str = "volume-notify-pulse";

enum Command {
    Query {
        kind: DeviceKind,
        index: u32,
        reply: oneshot::Sender<Result<DeviceReading, AudioError>>,
    },
    /// Sent by the context state callback once the connection is up.
    CheckState,
    Disconnect {
        done: oneshot::Sender<()>,
    },
}

/// Handle to a PulseAudio connection.
///
/// libpulse objects are not `Send`, so the mainloop and context live on a
/// dedicated thread that serves queries sent over a channel. Subscription
/// events are pushed into the `events` channel given to [`PulseServer::connect`].
#[derive(Debug)]
pub struct PulseServer {
    commands: mpsc::UnboundedSender<Command>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Query { kind, index, .. } => write!(f, "Query({} #{})", kind, index),
            Command::CheckState => f.write_str("CheckState"),
            Command::Disconnect { .. } => f.write_str("Disconnect"),
        }
    }
}

impl PulseServer {
    /// Connects, registers the client name and subscribes to every facility.
    ///
    /// Must be called from within a tokio runtime; the runtime handle is used to
    /// hand events off without blocking libpulse's callback thread.
    pub async fn connect(
        config: &PulseConfig,
        events: mpsc::Sender<ChangeEvent>,
    ) -> Result<Self, AudioError> {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel();
        let worker = Worker {
            client_name: config.client_name.clone(),
            server: config.server.clone(),
            events,
            runtime: Handle::current(),
            state_watch: commands.downgrade(),
        };

        std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || worker.run(command_rx, ready_tx))
            .map_err(|e| AudioError::Connection(e.to_string()))?;

        ready_rx.await.map_err(|_| {
            AudioError::Connection("PulseAudio worker exited during startup".to_string())
        })??;

        Ok(Self { commands })
    }

    async fn query(&self, kind: DeviceKind, index: u32) -> Result<DeviceReading, AudioError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Query { kind, index, reply })
            .map_err(|_| AudioError::Disconnected)?;
        response.await.map_err(|_| AudioError::Disconnected)?
    }
}

#[async_trait]
impl AudioServer for PulseServer {
    async fn sink_info(&self, index: u32) -> Result<DeviceReading, AudioError> {
        self.query(DeviceKind::Sink, index).await
    }

    async fn source_info(&self, index: u32) -> Result<DeviceReading, AudioError> {
        self.query(DeviceKind::Source, index).await
    }

    async fn disconnect(&self) -> Result<(), AudioError> {
        let (done, finished) = oneshot::channel();
        if self.commands.send(Command::Disconnect { done }).is_err() {
            return Ok(());
        }
        let _ = finished.await;
        tracing::debug!("PulseAudio connection released");
        Ok(())
    }
}

struct Worker {
    client_name: String,
    server: Option<String>,
    events: mpsc::Sender<ChangeEvent>,
    runtime: Handle,
    // Weak so that dropping `PulseServer` still closes the command channel.
    state_watch: mpsc::WeakUnboundedSender<Command>,
}

impl Worker {
    fn run(
        self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        ready: oneshot::Sender<Result<(), AudioError>>,
    ) {
        let Worker { client_name, server, events, runtime, state_watch } = self;

        let opened = Connection::open(&client_name, server.as_deref()).and_then(|mut connection| {
            connection.subscribe(events, runtime)?;
            connection.watch_state(state_watch);
            Ok(connection)
        });

        let mut connection = match opened {
            Ok(connection) => {
                let _ = ready.send(Ok(()));
                connection
            }
            Err(e) => {
                let _ = ready.send(Err(e));
                return;
            }
        };

        tracing::info!("Connected to PulseAudio as '{}'", client_name);

        // Returning drops the connection, and with it the subscription callback
        // holding the event sender, which closes the event queue.
        while let Some(command) = commands.blocking_recv() {
            tracing::trace!("PulseAudio worker handling {:?}", command);
            match command {
                Command::Query { kind, index, reply } => connection.query(kind, index, reply),
                Command::CheckState => {
                    if let Err(e) = connection.check_state() {
                        tracing::error!("Lost PulseAudio connection: {}", e);
                        return;
                    }
                }
                Command::Disconnect { done } => {
                    drop(connection);
                    let _ = done.send(());
                    return;
                }
            }
        }
    }
}

struct Connection {
    // Dropped before the mainloop it was created on.
    context: Context,
    mainloop: Mainloop,
}

impl Connection {
    fn open(client_name: &str, server: Option<&str>) -> Result<Self, AudioError> {
        let mut proplist = Proplist::new().ok_or_else(|| {
            AudioError::Connection("failed to allocate property list".to_string())
        })?;
        proplist
            .set_str(properties::APPLICATION_NAME, client_name)
            .map_err(|_| AudioError::Connection("failed to set client name".to_string()))?;

        let mainloop = Mainloop::new()
            .ok_or_else(|| AudioError::Connection("failed to create mainloop".to_string()))?;
        let mut context = Context::new_with_proplist(&mainloop, client_name, &proplist)
            .ok_or_else(|| AudioError::Connection("failed to create context".to_string()))?;

        let (state_tx, state_rx) = std_mpsc::channel();
        context.set_state_callback(Some(Box::new(move || {
            let _ = state_tx.send(());
        })));
        context
            .connect(server, ContextFlagSet::NOFLAGS, None)
            .map_err(|e| AudioError::Connection(describe(e)))?;

        let mut connection = Self { context, mainloop };
        connection
            .mainloop
            .start()
            .map_err(|e| AudioError::Connection(describe(e)))?;
        connection.wait_ready(&state_rx)?;

        Ok(connection)
    }

    fn wait_ready(&mut self, state_changes: &std_mpsc::Receiver<()>) -> Result<(), AudioError> {
        loop {
            if matches!(self.check_state()?, ContextState::Ready) {
                break;
            }

            if state_changes.recv().is_err() {
                return Err(AudioError::Connection("context state callback dropped".to_string()));
            }
        }

        Ok(())
    }

    /// Current context state, or an error once the connection has failed.
    fn check_state(&mut self) -> Result<ContextState, AudioError> {
        self.mainloop.lock();
        let state = self.context.get_state();
        let errno = self.context.errno();
        self.mainloop.unlock();

        if is_terminal(state) {
            return Err(AudioError::Connection(describe(errno)));
        }
        Ok(state)
    }

    /// Replaces the startup state callback with one that asks the worker to
    /// re-check the context whenever its state changes.
    fn watch_state(&mut self, commands: mpsc::WeakUnboundedSender<Command>) {
        self.mainloop.lock();
        self.context.set_state_callback(Some(Box::new(move || {
            if let Some(commands) = commands.upgrade() {
                let _ = commands.send(Command::CheckState);
            }
        })));
        self.mainloop.unlock();
    }

    fn subscribe(
        &mut self,
        events: mpsc::Sender<ChangeEvent>,
        runtime: Handle,
    ) -> Result<(), AudioError> {
        let (done_tx, done_rx) = std_mpsc::channel();

        self.mainloop.lock();
        self.context.set_subscribe_callback(Some(Box::new(
            move |facility: Option<Facility>, operation: Option<SubscribeOperation>, index: u32| {
                if let Some(event) = change_event(facility, operation, index) {
                    hand_off(&events, &runtime, event);
                }
            },
        )));
        let _operation = self.context.subscribe(InterestMaskSet::ALL, move |success: bool| {
            let _ = done_tx.send(success);
        });
        self.mainloop.unlock();

        match done_rx.recv() {
            Ok(true) => Ok(()),
            Ok(false) => {
                self.mainloop.lock();
                let errno = self.context.errno();
                self.mainloop.unlock();
                Err(AudioError::Subscription(describe(errno)))
            }
            Err(_) => Err(AudioError::Subscription("no reply from server".to_string())),
        }
    }

    fn query(
        &mut self,
        kind: DeviceKind,
        index: u32,
        reply: oneshot::Sender<Result<DeviceReading, AudioError>>,
    ) {
        let mut reply = Some(reply);
        let mut respond = move |outcome: Result<DeviceReading, AudioError>| {
            if let Some(reply) = reply.take() {
                let _ = reply.send(outcome);
            }
        };

        self.mainloop.lock();
        let introspector = self.context.introspect();
        match kind {
            DeviceKind::Sink => {
                let _operation = introspector.get_sink_info_by_index(index, move |result| {
                    match result {
                        ListResult::Item(info) => respond(Ok(reading(
                            kind,
                            &info.name,
                            &info.description,
                            &info.volume,
                            info.mute,
                        ))),
                        ListResult::End => respond(Err(AudioError::NotFound { kind, index })),
                        ListResult::Error => respond(Err(query_failed(kind, index))),
                    }
                });
            }
            DeviceKind::Source => {
                let _operation = introspector.get_source_info_by_index(index, move |result| {
                    match result {
                        ListResult::Item(info) => respond(Ok(reading(
                            kind,
                            &info.name,
                            &info.description,
                            &info.volume,
                            info.mute,
                        ))),
                        ListResult::End => respond(Err(AudioError::NotFound { kind, index })),
                        ListResult::Error => respond(Err(query_failed(kind, index))),
                    }
                });
            }
        }
        self.mainloop.unlock();
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.mainloop.lock();
        self.context.disconnect();
        self.mainloop.unlock();
        self.mainloop.stop();
    }
}

/// Queues `event` without blocking the caller; a full queue is waited on by a
/// detached task.
fn hand_off(events: &mpsc::Sender<ChangeEvent>, runtime: &Handle, event: ChangeEvent) {
    let events = events.clone();
    runtime.spawn(async move {
        if events.send(event).await.is_err() {
            tracing::trace!("Event queue closed, dropping {:?}", event);
        }
    });
}

fn is_terminal(state: ContextState) -> bool {
    matches!(state, ContextState::Failed | ContextState::Terminated)
}

fn describe(err: PAErr) -> String {
    format!("{}", err)
}

fn query_failed(kind: DeviceKind, index: u32) -> AudioError {
    AudioError::Query {
        kind,
        index,
        reason: "server returned an error".to_string(),
    }
}

fn reading(
    kind: DeviceKind,
    name: &Option<Cow<'_, str>>,
    description: &Option<Cow<'_, str>>,
    volume: &ChannelVolumes,
    muted: bool,
) -> DeviceReading {
    DeviceReading::new(
        kind,
        name.as_deref().unwrap_or_default().to_string(),
        description.as_deref().unwrap_or_default().to_string(),
        volume.get().iter().map(|level| level.0).collect(),
        muted,
    )
}

/// Maps a raw subscription callback onto a [`ChangeEvent`]; facilities other
/// than sinks and sources are dropped.
fn change_event(
    facility: Option<Facility>,
    operation: Option<SubscribeOperation>,
    index: u32,
) -> Option<ChangeEvent> {
    let facility = match facility? {
        Facility::Sink => DeviceKind::Sink,
        Facility::Source => DeviceKind::Source,
        _ => return None,
    };
    let kind = match operation? {
        SubscribeOperation::New => ChangeKind::New,
        SubscribeOperation::Changed => ChangeKind::Change,
        SubscribeOperation::Removed => ChangeKind::Remove,
    };
    Some(ChangeEvent::new(facility, index, kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_norm() {
        assert_eq!(VOLUME_NORM, 0x10000);
    }

    #[test]
    fn test_terminal_states() {
        assert!(is_terminal(ContextState::Failed));
        assert!(is_terminal(ContextState::Terminated));
        assert!(!is_terminal(ContextState::Ready));
        assert!(!is_terminal(ContextState::Connecting));
        assert!(!is_terminal(ContextState::Unconnected));
    }

    #[tokio::test]
    async fn test_hand_off_does_not_block_on_full_queue() {
        let (events, mut queue) = mpsc::channel(1);
        let runtime = Handle::current();
        events.try_send(ChangeEvent::new(DeviceKind::Sink, 0, ChangeKind::Change)).unwrap();

        // Both return while the queue is still full.
        hand_off(&events, &runtime, ChangeEvent::new(DeviceKind::Sink, 1, ChangeKind::Change));
        hand_off(&events, &runtime, ChangeEvent::new(DeviceKind::Source, 2, ChangeKind::Change));
        assert_eq!(events.capacity(), 0);

        let mut indices = Vec::new();
        for _ in 0..3 {
            indices.push(queue.recv().await.unwrap().index);
        }
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_hand_off_after_queue_closed() {
        let (events, queue) = mpsc::channel(1);
        drop(queue);

        let event = ChangeEvent::new(DeviceKind::Sink, 0, ChangeKind::New);
        hand_off(&events, &Handle::current(), event);
        tokio::task::yield_now().await;
        assert!(events.is_closed());
    }

    #[test]
    fn test_change_event_sink_changed() {
        let event = change_event(Some(Facility::Sink), Some(SubscribeOperation::Changed), 4);
        assert_eq!(event, Some(ChangeEvent::new(DeviceKind::Sink, 4, ChangeKind::Change)));
    }

    #[test]
    fn test_change_event_source_new_and_removed() {
        let added = change_event(Some(Facility::Source), Some(SubscribeOperation::New), 1);
        assert_eq!(added, Some(ChangeEvent::new(DeviceKind::Source, 1, ChangeKind::New)));

        let removed = change_event(Some(Facility::Source), Some(SubscribeOperation::Removed), 1);
        assert_eq!(removed, Some(ChangeEvent::new(DeviceKind::Source, 1, ChangeKind::Remove)));
    }

    #[test]
    fn test_change_event_other_facility_dropped() {
        let changed = Some(SubscribeOperation::Changed);
        assert_eq!(change_event(Some(Facility::SinkInput), changed, 2), None);
        assert_eq!(change_event(Some(Facility::Client), Some(SubscribeOperation::New), 2), None);
        assert_eq!(change_event(None, Some(SubscribeOperation::Changed), 2), None);
        assert_eq!(change_event(Some(Facility::Sink), None, 2), None);
    }
}
