mod common;

use common::{GatedChannel, ScriptedChannel, Step};
use eventus::{
    Event, EventContext, EventError, EventManager, RuntimeBuilder, SharedChannel, read_full,
};

use std::io;
use std::thread;
use std::time::Duration;

fn manager() -> EventManager {
    EventManager::builder().worker_threads(2).build()
}

#[eventus::test]
async fn test_read_full_fills_buffer_in_order() {
    let manager = manager();
    let channel = ScriptedChannel::with_source([Step::Transfer(3); 4], 0..10u8);

    let (read, content) = read_full(
        &manager,
        &channel.shared(),
        vec![0; 10],
        0,
        &EventContext::new(()),
    )
    .await;

    assert_eq!(read.unwrap(), 10);
    assert_eq!(content, (0..10u8).collect::<Vec<_>>());
    assert_eq!(channel.requested(), vec![10, 7, 4, 1]);
}

#[eventus::test]
async fn test_read_full_starts_at_offset() {
    let manager = manager();
    let channel = ScriptedChannel::with_source([], *b"world");

    let mut content = vec![0; 11];
    content[..6].copy_from_slice(b"hello ");

    let (read, content) = read_full(
        &manager,
        &channel.shared(),
        content,
        6,
        &EventContext::new(()),
    )
    .await;

    assert_eq!(read.unwrap(), 11);
    assert_eq!(content, b"hello world");
}

#[eventus::test]
async fn test_read_full_short_read_at_end_of_stream() {
    let manager = manager();
    let channel = ScriptedChannel::with_source([Step::Transfer(4), Step::Eof], *b"abcd");

    let (read, content) = read_full(
        &manager,
        &channel.shared(),
        vec![0; 10],
        0,
        &EventContext::new(()),
    )
    .await;

    assert_eq!(read.unwrap(), 4);
    assert_eq!(&content[..4], b"abcd");
    assert_eq!(channel.attempts(), 2);
}

#[eventus::test]
async fn test_read_full_stops_when_last_chunk_reports_end() {
    let manager = manager();
    let channel = ScriptedChannel::with_source([Step::Last(4)], *b"abcd");

    let (read, _) = read_full(
        &manager,
        &channel.shared(),
        vec![0; 10],
        0,
        &EventContext::new(()),
    )
    .await;

    assert_eq!(read.unwrap(), 4);
    assert_eq!(channel.attempts(), 1);
}

#[eventus::test]
async fn test_read_full_at_end_of_stream_issues_no_event() {
    let manager = manager();
    let channel = ScriptedChannel::with_source([Step::Eof], []);

    let (first, content) = read_full(
        &manager,
        &channel.shared(),
        vec![0; 4],
        0,
        &EventContext::new(()),
    )
    .await;
    assert_eq!(first.unwrap(), 0);
    assert_eq!(channel.attempts(), 1);

    let (second, _) = read_full(
        &manager,
        &channel.shared(),
        content,
        0,
        &EventContext::new(()),
    )
    .await;
    assert_eq!(second.unwrap(), 0);
    assert_eq!(channel.attempts(), 1);
}

#[eventus::test]
async fn test_read_full_full_buffer_issues_no_event() {
    let manager = manager();
    let channel = ScriptedChannel::with_source([], *b"abcd");

    let (read, _) = read_full(
        &manager,
        &channel.shared(),
        vec![0; 4],
        4,
        &EventContext::new(()),
    )
    .await;

    assert_eq!(read.unwrap(), 4);
    assert_eq!(channel.attempts(), 0);
}

#[eventus::test]
async fn test_read_full_reports_failing_attempt() {
    let manager = manager();
    let channel = ScriptedChannel::with_source(
        [
            Step::Transfer(2),
            Step::Fail(io::ErrorKind::ConnectionReset),
        ],
        *b"abcdef",
    );

    let (read, content) = read_full(
        &manager,
        &channel.shared(),
        vec![0; 6],
        0,
        &EventContext::new(()),
    )
    .await;

    let failure = read.unwrap_err();
    assert_eq!(failure.attempt(), 2);
    assert!(failure.cause().is_transport());
    assert_eq!(&content[..2], b"ab");

    let err: io::Error = failure.into();
    assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
}

#[eventus::test]
async fn test_read_full_rejects_offset_beyond_buffer() {
    let manager = manager();
    let channel = ScriptedChannel::with_source([], *b"abcd");

    let (read, _) = read_full(
        &manager,
        &channel.shared(),
        vec![0; 4],
        5,
        &EventContext::new(()),
    )
    .await;

    let failure = read.unwrap_err();
    assert_eq!(failure.attempt(), 0);
    assert!(matches!(failure.cause(), EventError::Bounds { .. }));
    assert_eq!(channel.attempts(), 0);
}

#[eventus::test]
async fn test_read_full_overreporting_channel_is_a_transport_error() {
    let manager = manager();
    let channel = ScriptedChannel::with_source([Step::Overreport(64)], *b"abcd");

    let (read, _) = read_full(
        &manager,
        &channel.shared(),
        vec![0; 4],
        0,
        &EventContext::new(()),
    )
    .await;

    let failure = read.unwrap_err();
    assert!(
        matches!(failure.cause(), EventError::Transport(err) if err.kind() == io::ErrorKind::InvalidData)
    );
}

#[eventus::test]
async fn test_read_full_stalls_without_data() {
    let manager = EventManager::builder()
        .worker_threads(1)
        .idle_attempt_limit(Some(5))
        .build();
    let channel = ScriptedChannel::with_source([Step::Nothing; 16], []);

    let (read, _) = read_full(
        &manager,
        &channel.shared(),
        vec![0; 4],
        0,
        &EventContext::new(()),
    )
    .await;

    let failure = read.unwrap_err();
    assert!(matches!(failure.cause(), EventError::Stalled { attempts: 5 }));
    assert_eq!(channel.attempts(), 5);
}

#[eventus::test]
async fn test_read_full_shares_context_with_every_event() {
    let manager = manager();
    let channel = ScriptedChannel::with_source([Step::Transfer(1); 3], *b"abc");
    let context = EventContext::new(String::from("request-42"));

    let (read, _) = read_full(&manager, &channel.shared(), vec![0; 3], 0, &context).await;

    assert_eq!(read.unwrap(), 3);
    assert_eq!(context.get(), "request-42");
}

#[test]
fn test_read_full_interrupted_by_shutdown_mid_transfer() {
    let rt = RuntimeBuilder::new().worker_threads(1).build();
    let mut manager = EventManager::builder().worker_threads(1).build();

    let first = GatedChannel::with_chunk(2);
    let blocker = GatedChannel::new();
    let channel: SharedChannel = first.clone();

    let transfer = rt.spawn({
        let handle = manager.handle();
        async move { read_full(&handle, &channel, vec![9; 6], 0, &EventContext::new(())).await }
    });

    // Attempt 1 runs on the only dispatch worker; queue a blocker behind it
    // so attempt 2 is still queued when the manager shuts down.
    first.wait_entered();
    let blocker_shared: SharedChannel = blocker.clone();
    let _blocked = manager.submit(Event::write(
        blocker_shared,
        vec![0; 1],
        0,
        1,
        EventContext::new(()),
    ));
    first.open_gate();

    blocker.wait_entered();
    while manager.pending_events() == 0 {
        thread::yield_now();
    }

    let opener = {
        let blocker = blocker.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            blocker.open_gate();
        })
    };

    manager.shutdown();
    opener.join().unwrap();

    let (outcome, content) = rt.block_on(transfer);

    let failure = outcome.unwrap_err();
    assert_eq!(failure.attempt(), 2);
    assert!(failure.cause().is_interrupted());
    assert_eq!(content, vec![9; 6]);
    assert_eq!(first.entered(), 1);
}
