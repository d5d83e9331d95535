use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::sleep;
use typeahead_engine::{Debouncer, EngineError};

const DELAY: Duration = Duration::from_millis(400);

fn recorder<T: Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(T) + Send + Sync + 'static) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    (calls, move |arg| sink.lock().unwrap().push(arg))
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[tokio::test(start_paused = true)]
async fn burst_runs_once_with_last_argument() {
    let (calls, action) = recorder();
    let debouncer = Debouncer::new(DELAY, action).unwrap();

    for n in 1..=5 {
        debouncer.trigger(n);
        sleep(ms(100)).await;
    }
    assert!(calls.lock().unwrap().is_empty());
    assert!(debouncer.is_pending());

    sleep(ms(400)).await;
    assert_eq!(*calls.lock().unwrap(), vec![5]);
    assert!(!debouncer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn never_triggered_never_runs() {
    let (calls, action) = recorder::<u32>();
    let debouncer = Debouncer::new(DELAY, action).unwrap();

    sleep(ms(10_000)).await;
    assert!(calls.lock().unwrap().is_empty());
    assert!(!debouncer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn cancel_before_deadline_suppresses_run() {
    let (calls, action) = recorder();
    let debouncer = Debouncer::new(DELAY, action).unwrap();

    debouncer.trigger("a");
    sleep(ms(399)).await;
    assert!(debouncer.cancel());

    sleep(ms(1_000)).await;
    assert!(calls.lock().unwrap().is_empty());
    assert!(!debouncer.cancel(), "second cancel has nothing to cancel");
}

#[tokio::test(start_paused = true)]
async fn separate_bursts_each_run() {
    let (calls, action) = recorder();
    let debouncer = Debouncer::new(DELAY, action).unwrap();

    debouncer.trigger(1);
    sleep(ms(500)).await;
    debouncer.trigger(2);
    sleep(ms(500)).await;

    assert_eq!(*calls.lock().unwrap(), vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn cancel_handle_shares_the_timer_slot() {
    let (calls, action) = recorder();
    let debouncer = Debouncer::new(DELAY, action).unwrap();
    let cancel = debouncer.cancel_handle();

    debouncer.trigger("first");
    sleep(ms(200)).await;
    assert!(cancel.cancel());
    assert!(!debouncer.is_pending());

    debouncer.trigger("second");
    sleep(ms(500)).await;
    assert_eq!(*calls.lock().unwrap(), vec!["second"]);
}

#[tokio::test(start_paused = true)]
async fn dropping_debouncer_cancels_pending_run() {
    let (calls, action) = recorder();
    let debouncer = Debouncer::new(DELAY, action).unwrap();

    debouncer.trigger(7);
    sleep(ms(100)).await;
    drop(debouncer);

    sleep(ms(1_000)).await;
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn requires_a_runtime() {
    let result = Debouncer::new(DELAY, |_: u8| {});
    assert!(matches!(result, Err(EngineError::NoRuntime)));
}
