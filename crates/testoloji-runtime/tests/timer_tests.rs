use std::time::Duration;
use testoloji_runtime::*;
use tokio::sync::mpsc;

#[tokio::test(start_paused = true)]
async fn test_debouncer_sends_only_latest() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut debouncer = Debouncer::new(Duration::from_millis(250), tx);

    debouncer.schedule(1.0_f32);
    tokio::time::sleep(Duration::from_millis(100)).await;
    debouncer.schedule(1.5);
    tokio::time::sleep(Duration::from_millis(100)).await;
    debouncer.schedule(2.0);
    assert!(debouncer.is_pending());

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(rx.recv().await, Some(2.0));
    assert!(rx.try_recv().is_err());
    assert!(!debouncer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn test_debouncer_waits_for_quiet_period() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut debouncer = Debouncer::new(Duration::from_millis(250), tx);

    debouncer.schedule("zoom");
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(rx.try_recv().is_err());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(rx.recv().await, Some("zoom"));
}

#[tokio::test(start_paused = true)]
async fn test_debouncer_cancel_and_drop() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut debouncer = Debouncer::new(Duration::from_millis(50), tx.clone());

    debouncer.schedule(1);
    assert!(debouncer.cancel());
    assert!(!debouncer.cancel());

    let mut other = Debouncer::new(Duration::from_millis(50), tx);
    other.schedule(2);
    drop(other);
    drop(debouncer);

    tokio::time::sleep(Duration::from_millis(200)).await;
    // Both senders are gone and nothing was delivered
    assert_eq!(rx.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_ticks_then_expires_once() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let countdown = ExamCountdown::start(Duration::from_secs(3), tx);
    assert!(countdown.is_running());

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert_eq!(
        events,
        vec![
            CountdownEvent::Tick {
                remaining: Duration::from_secs(2)
            },
            CountdownEvent::Tick {
                remaining: Duration::from_secs(1)
            },
            CountdownEvent::Expired,
        ]
    );
    assert!(!countdown.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_countdown_stops_when_dropped() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let countdown = ExamCountdown::start(Duration::from_secs(60), tx);

    tokio::time::sleep(Duration::from_millis(2500)).await;
    countdown.stop();

    let mut ticks = 0;
    while let Some(event) = rx.recv().await {
        assert_ne!(event, CountdownEvent::Expired);
        ticks += 1;
    }
    assert_eq!(ticks, 2);
}

#[tokio::test(start_paused = true)]
async fn test_zero_duration_countdown_finishes_silently() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _countdown = ExamCountdown::start(Duration::ZERO, tx);
    assert_eq!(rx.recv().await, None);
}
