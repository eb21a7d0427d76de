//! The interactive session: a periodic background pull task next to a
//! foreground loop that reads stdin and feeds the send path.
//!
//! The two tasks share nothing but the client (whose directory and cursors
//! have a single writer each), and are coordinated only through a watch
//! channel used as the shutdown signal.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parley_chat_client::{ChatClient, ClientError, JoinOutcome, MessageSink, Transport};
use parley_chat_core::{SessionEvent, SessionState};
use parley_chat_types::{ChatMessage, RoomId};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// The literal input line that ends the session.
const EXIT_SENTINEL: &str = "exit";

/// Settings for an interactive session.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Room to join, created if it does not exist.
    pub room: String,
    /// Delay between background pulls.
    pub pull_interval: Duration,
    /// Upper bound on a single pull; `None` lets a pull wait indefinitely.
    pub pull_timeout: Option<Duration>,
}

/// A line read from interactive input, classified.
#[derive(Debug, PartialEq, Eq)]
enum LineAction<'a> {
    /// Forward to the send path.
    Send(&'a str),
    /// Ignore (blank line).
    Skip,
    /// Terminate the session.
    Exit,
}

/// Classify one input line. The exit sentinel is intercepted here and
/// never reaches the send path.
fn classify(line: &str) -> LineAction<'_> {
    if line == EXIT_SENTINEL {
        LineAction::Exit
    } else if line.is_empty() {
        LineAction::Skip
    } else {
        LineAction::Send(line)
    }
}

/// Run a full interactive session: join the room, sync in the background,
/// forward typed lines, and leave on exit.
pub async fn run<T: Transport + 'static>(client: ChatClient<T>, settings: Settings) -> Result<()> {
    let client = Arc::new(client);
    let state = SessionState::new();

    let outcome = client
        .create_or_join(&settings.room)
        .await
        .context("could not join or create the room")?;
    match &outcome {
        JoinOutcome::Created(room) => println!("Created room ({})", room.name),
        JoinOutcome::Joined(room) => println!("Joined room ({})", room.name),
    }
    let room_id = outcome.room().id;
    let (state, _actions) = state.on_event(SessionEvent::RoomResolved { room: room_id });

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sync = tokio::spawn(sync_loop(
        Arc::clone(&client),
        room_id,
        settings.pull_interval,
        settings.pull_timeout,
        shutdown_rx,
        |message: &ChatMessage| println!("{}: {}", message.user.name, message.text),
    ));
    let (state, _actions) = state.on_event(SessionEvent::SyncStarted);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match classify(&line) {
                LineAction::Exit => break,
                LineAction::Skip => {}
                LineAction::Send(text) => {
                    if let Err(err) = client.send(room_id, text).await {
                        println!("Send failed: {err}");
                    }
                }
            },
            // End of input counts as an exit request.
            Ok(None) => break,
            Err(err) => {
                println!("Input error: {err}");
                break;
            }
        }
    }

    let (state, _actions) = state.on_event(SessionEvent::ExitRequested);
    shutdown_tx.send(true).ok();
    sync.await.ok();

    if let Err(err) = client.leave(room_id).await {
        println!("Leave failed: {err}");
    } else {
        println!("Left room ({})", settings.room);
    }
    let (state, _actions) = state.on_event(SessionEvent::RoomLeft);
    debug_assert!(state.is_stopped());

    Ok(())
}

/// The periodic pull loop.
///
/// One pull per tick, run to completion before the next tick is due; a
/// tick that fails is reported and the schedule continues. Shutdown takes
/// effect between ticks, or cancels an in-flight pull by dropping it - the
/// cursor already reflects every message received, so nothing is lost or
/// re-delivered.
async fn sync_loop<T, S>(
    client: Arc<ChatClient<T>>,
    room_id: RoomId,
    interval: Duration,
    pull_timeout: Option<Duration>,
    mut shutdown: watch::Receiver<bool>,
    mut sink: S,
) where
    T: Transport + 'static,
    S: MessageSink,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }

        tokio::select! {
            _ = shutdown.changed() => break,
            result = pull_once(&client, room_id, pull_timeout, &mut sink) => {
                if let Err(err) = result {
                    println!("Pull failed: {err}");
                }
            }
        }
    }
}

/// Run a single pull, bounded by the per-tick timeout when one is set.
///
/// A timed-out pull is not a failure: the cursor kept whatever arrived, and
/// the next tick resumes from there.
async fn pull_once<T: Transport>(
    client: &ChatClient<T>,
    room_id: RoomId,
    pull_timeout: Option<Duration>,
    sink: &mut dyn MessageSink,
) -> Result<(), ClientError> {
    let pull = client.pull(room_id, sink);
    let delivered = match pull_timeout {
        Some(limit) => match tokio::time::timeout(limit, pull).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::debug!(room = %room_id, "pull timed out, resuming next tick");
                return Ok(());
            }
        },
        None => pull.await?,
    };

    if delivered > 0 {
        tracing::debug!(room = %room_id, delivered, "pulled new messages");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parley_chat_client::{Call, MockTransport, TransportError};
    use parley_chat_types::{Message, MessageIndex, Room, RoomJoined, RoomList, User};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // ===========================================
    // Input line classification
    // ===========================================

    #[test]
    fn exit_sentinel_never_reaches_the_send_path() {
        assert_eq!(classify("exit"), LineAction::Exit);
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(classify(""), LineAction::Skip);
    }

    #[test]
    fn chat_lines_are_sent_verbatim() {
        assert_eq!(classify("hello there"), LineAction::Send("hello there"));
        // Only the exact sentinel exits.
        assert_eq!(classify("exit now"), LineAction::Send("exit now"));
        assert_eq!(classify(" exit"), LineAction::Send(" exit"));
    }

    // ===========================================
    // Pull loop scheduling
    // ===========================================

    fn room(id: u32, name: &str) -> Room {
        Room {
            id: RoomId::new(id),
            name: name.to_string(),
        }
    }

    fn frame(message: Message) -> Vec<u8> {
        message.to_bytes().unwrap()
    }

    fn chat_frame(index: u64, author: &str, text: &str) -> Vec<u8> {
        frame(Message::Chat(ChatMessage {
            user: User::new(author),
            room_id: RoomId::new(1),
            index: MessageIndex::new(index),
            text: text.to_string(),
        }))
    }

    async fn joined_client(transport: &MockTransport) -> Arc<ChatClient<MockTransport>> {
        transport.queue_call(vec![frame(Message::RoomList(RoomList { rooms: vec![] }))]);
        transport.queue_call(vec![frame(Message::RoomJoined(RoomJoined {
            room: room(1, "main"),
        }))]);
        let client = ChatClient::new(User::new("tester"), transport.clone());
        client.create_or_join("main").await.unwrap();
        Arc::new(client)
    }

    #[tokio::test(start_paused = true)]
    async fn failed_tick_does_not_stop_the_schedule() {
        let transport = MockTransport::new();
        let client = joined_client(&transport).await;

        // First tick fails outright; the second delivers a message.
        transport.fail_next_open("service unreachable");
        transport.queue_call(vec![chat_frame(1, "Alice", "hi"), frame(Message::EndOfMessages)]);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(sync_loop(
            Arc::clone(&client),
            RoomId::new(1),
            Duration::from_secs(1),
            None,
            shutdown_rx,
            move |m: &ChatMessage| {
                sink_seen
                    .lock()
                    .unwrap()
                    .push(format!("{}: {}", m.user.name, m.text))
            },
        ));

        // Paused time auto-advances; wait until the second tick has
        // delivered.
        for _ in 0..1000 {
            if !seen.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        shutdown_tx.send(true).ok();
        task.await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["Alice: hi"]);
        // The create/join calls plus at least the two scripted pull ticks.
        assert!(transport.calls_opened() >= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_the_loop() {
        let transport = MockTransport::new();
        let client = joined_client(&transport).await;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(sync_loop(
            Arc::clone(&client),
            RoomId::new(1),
            Duration::from_secs(1),
            None,
            shutdown_rx,
            |_: &ChatMessage| {},
        ));

        shutdown_tx.send(true).ok();
        // Completion is the assertion: the loop must notice the signal.
        task.await.unwrap();
    }

    // Serves the create/join handshake, then hangs every later stream.
    struct ScriptThenHang {
        opened: AtomicUsize,
    }

    impl ScriptThenHang {
        fn new() -> Self {
            Self {
                opened: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Transport for ScriptThenHang {
        async fn open(&self) -> Result<Box<dyn Call>, TransportError> {
            let n = self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(ScriptThenHangCall { n, replied: false }))
        }
    }

    struct ScriptThenHangCall {
        n: usize,
        replied: bool,
    }

    #[async_trait]
    impl Call for ScriptThenHangCall {
        async fn send(&mut self, _data: &[u8]) -> Result<(), TransportError> {
            Ok(())
        }

        async fn recv(&mut self) -> Result<Vec<u8>, TransportError> {
            if !self.replied {
                self.replied = true;
                match self.n {
                    0 => return Ok(frame(Message::RoomList(RoomList { rooms: vec![] }))),
                    1 => {
                        return Ok(frame(Message::RoomJoined(RoomJoined {
                            room: room(1, "main"),
                        })))
                    }
                    _ => {}
                }
            }
            std::future::pending().await
        }

        async fn close(&mut self) -> Result<(), TransportError> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stuck_pull_is_abandoned_at_the_timeout() {
        let client = ChatClient::new(User::new("tester"), ScriptThenHang::new());
        client.create_or_join("main").await.unwrap();

        let mut sink = |_: &ChatMessage| {};
        let result = pull_once(
            &client,
            RoomId::new(1),
            Some(Duration::from_secs(5)),
            &mut sink,
        )
        .await;

        // A timeout is "caught up for now", not an error, and the cursor
        // is untouched.
        assert!(result.is_ok());
        assert_eq!(
            client
                .cursor(RoomId::new(1))
                .await
                .unwrap(),
            MessageIndex::zero()
        );
    }
}
