use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::time::sleep;
use typeahead_engine::{
    ControllerSettings, Dropdown, EngineError, QueryController, QueryError, QuerySource,
    ResultItem, StaticQuerySource, SOURCE_PANICKED,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(typeahead_logging::initialize_for_tests);
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

type Calls = Arc<Mutex<Vec<String>>>;

/// Source that records every query and answers after a per-query latency.
fn fruit_source(calls: Calls) -> impl QuerySource {
    move |query: String| {
        let calls = Arc::clone(&calls);
        async move {
            calls.lock().unwrap().push(query.clone());
            let (latency, items) = match query.as_str() {
                "ap" => (ms(50), vec![ResultItem::new(1, "Apple")]),
                "apr" => (ms(10), vec![ResultItem::new(2, "Apricot")]),
                "slow" => (ms(1_000), vec![ResultItem::new(3, "Sloe")]),
                _ => (ms(10), Vec::new()),
            };
            sleep(latency).await;
            Ok::<_, QueryError>(items)
        }
    }
}

fn failing_source() -> impl QuerySource {
    |_query: String| async { Err::<Vec<ResultItem>, _>(QueryError::rejected("network down")) }
}

fn calls() -> Calls {
    Arc::new(Mutex::new(Vec::new()))
}

#[tokio::test(start_paused = true)]
async fn typing_burst_fetches_only_the_last_query() {
    init_logging();
    let calls = calls();
    let controller =
        QueryController::new(fruit_source(calls.clone()), ControllerSettings::default()).unwrap();
    controller.set_focused(true);

    controller.set_query("a");
    sleep(ms(100)).await;
    controller.set_query("ap");

    sleep(ms(399)).await;
    assert!(calls.lock().unwrap().is_empty());
    assert!(!controller.snapshot().loading);
    assert!(controller.snapshot().pending);

    sleep(ms(2)).await;
    assert_eq!(*calls.lock().unwrap(), vec!["ap".to_string()]);
    assert!(controller.snapshot().loading);

    sleep(ms(100)).await;
    let view = controller.snapshot();
    assert_eq!(view.data, Some(vec![ResultItem::new(1, "Apple")]));
    assert!(!view.loading);
    assert!(view.loaded);
    assert_eq!(view.error, None);
    assert_eq!(*calls.lock().unwrap(), vec!["ap".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn rejected_query_is_stored_as_error() {
    init_logging();
    let controller = QueryController::new(failing_source(), ControllerSettings::default()).unwrap();

    controller.set_query("ap");
    let view = controller.wait_settled().await;

    assert_eq!(view.data, None);
    assert_eq!(view.error, Some(QueryError::rejected("network down")));
    assert!(!view.loading);
    assert!(view.loaded);
}

fn panicking_source() -> impl QuerySource {
    |query: String| async move {
        if query == "boom" {
            panic!("source blew up on {query}");
        }
        Ok::<_, QueryError>(vec![ResultItem::new(4, "Boysenberry")])
    }
}

#[tokio::test(start_paused = true)]
async fn panicking_source_settles_with_error() {
    init_logging();
    let controller =
        QueryController::new(panicking_source(), ControllerSettings::default()).unwrap();

    controller.set_query("boom");
    let view = controller.wait_settled().await;

    assert!(!view.loading);
    assert!(view.loaded);
    assert_eq!(view.data, None);
    assert_eq!(view.error, Some(QueryError::rejected(SOURCE_PANICKED)));

    controller.set_query("b");
    let view = controller.wait_settled().await;
    assert_eq!(view.error, None);
    assert_eq!(view.data, Some(vec![ResultItem::new(4, "Boysenberry")]));
}

#[tokio::test(start_paused = true)]
async fn empty_query_resets_without_calling_source() {
    init_logging();
    let calls = calls();
    let controller =
        QueryController::new(fruit_source(calls.clone()), ControllerSettings::default()).unwrap();

    controller.set_query("ap");
    let view = controller.wait_settled().await;
    assert!(view.loaded);

    controller.set_query("");
    let view = controller.wait_settled().await;
    assert_eq!(view.data, None);
    assert!(!view.loading);
    assert!(!view.loaded);
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_superseded_fetch_does_not_overwrite_newer_result() {
    init_logging();
    let calls = calls();
    let controller =
        QueryController::new(fruit_source(calls.clone()), ControllerSettings::default()).unwrap();

    controller.set_query("slow");
    sleep(ms(450)).await;
    assert!(controller.snapshot().loading);

    controller.set_query("apr");
    sleep(ms(2_000)).await;

    let view = controller.snapshot();
    assert_eq!(view.data, Some(vec![ResultItem::new(2, "Apricot")]));
    assert_eq!(
        *calls.lock().unwrap(),
        vec!["slow".to_string(), "apr".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn subscribers_observe_loading_then_loaded() {
    init_logging();
    let calls = calls();
    let controller =
        QueryController::new(fruit_source(calls), ControllerSettings::default()).unwrap();
    let mut rx = controller.subscribe();

    controller.set_query("ap");
    rx.wait_for(|view| view.loading).await.unwrap();
    let view = rx.wait_for(|view| view.loaded).await.unwrap().clone();

    assert!(!view.loading);
    assert_eq!(view.data, Some(vec![ResultItem::new(1, "Apple")]));
}

#[tokio::test(start_paused = true)]
async fn custom_delay_and_initial_query_are_honored() {
    init_logging();
    let calls = calls();
    let settings = ControllerSettings {
        delay: ms(100),
        initial_query: "ap".to_string(),
    };
    let controller = QueryController::new(fruit_source(calls.clone()), settings).unwrap();

    sleep(ms(101)).await;
    assert_eq!(*calls.lock().unwrap(), vec!["ap".to_string()]);
    assert_eq!(controller.snapshot().query, "ap");
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_fetch() {
    init_logging();
    let calls = calls();
    let controller =
        QueryController::new(fruit_source(calls.clone()), ControllerSettings::default()).unwrap();

    controller.set_query("ap");
    sleep(ms(100)).await;
    controller.shutdown();
    sleep(ms(1_000)).await;

    assert!(calls.lock().unwrap().is_empty());
    assert!(!controller.snapshot().pending);
}

#[tokio::test(start_paused = true)]
async fn dropping_controller_cancels_pending_fetch() {
    init_logging();
    let calls = calls();
    let controller =
        QueryController::new(fruit_source(calls.clone()), ControllerSettings::default()).unwrap();

    controller.set_query("ap");
    sleep(ms(100)).await;
    drop(controller);
    sleep(ms(1_000)).await;

    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn static_source_results_render_highlighted() {
    init_logging();
    let source = StaticQuerySource::new(vec![
        ResultItem::new(1, "Apple"),
        ResultItem::new(2, "Banana"),
        ResultItem::new(3, "Mango"),
    ])
    .with_latency(ms(30));
    let controller = QueryController::new(source, ControllerSettings::default()).unwrap();
    controller.set_focused(true);

    controller.set_query("AN");
    let view = controller.wait_settled().await;

    let Dropdown::Results(rows) = view.dropdown() else {
        panic!("expected results, got {:?}", view.dropdown());
    };
    let names: Vec<String> = rows.iter().map(|row| row.name.to_string()).collect();
    assert_eq!(names, vec!["B[an]ana", "M[an]go"]);
}

#[test]
fn controller_requires_a_runtime() {
    let result = QueryController::new(StaticQuerySource::default(), ControllerSettings::default());
    assert!(matches!(result, Err(EngineError::NoRuntime)));
}
