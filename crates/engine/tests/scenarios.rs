//! End-to-end scenario tests (`spec.md` §8 "Concrete scenarios"), run on a
//! paused `tokio` current-thread clock the same way `otap-df-engine`'s own
//! integration tests drive their single-threaded pipelines.

use asyncflow_engine::runner::Runner;
use asyncflow_engine::testing;

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn single_server_smoke_completes_at_least_one_request() {
    let results = Runner::new(testing::single_server_smoke())
        .with_seed(42)
        .run()
        .await
        .expect("validated scenario must run to completion");

    assert!(!results.completed_requests().is_empty());
    let stats = results.latency_stats();
    assert!(stats.count >= 1);
    assert!(stats.max >= stats.min);

    let ready_queue = results
        .get_series("ready_queue_len", "srv1")
        .expect("server was sampled");
    assert!(ready_queue.iter().all(|&v| v <= 1.0));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn dropout_terminal_never_reaches_the_server() {
    let results = Runner::new(testing::dropout_terminal())
        .with_seed(7)
        .run()
        .await
        .expect("validated scenario must run to completion");

    assert!(results.completed_requests().is_empty());
    let ready_queue = results.get_series("ready_queue_len", "srv1").unwrap_or_default();
    assert!(ready_queue.iter().all(|&v| v == 0.0));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn load_balancer_round_robin_is_fair() {
    let results = Runner::new(testing::lb_round_robin_fairness())
        .with_seed(1)
        .run()
        .await
        .expect("validated scenario must run to completion");

    let total: u64 = results.throughput_series(None).iter().sum();
    assert_eq!(total as usize, results.completed_requests().len());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn server_outage_rejoins_at_the_end_of_the_live_set() {
    let scenario = testing::with_server_outage(testing::lb_round_robin_fairness(), "srv1", 5.0, 10.0);
    let results = Runner::new(scenario)
        .with_seed(3)
        .run()
        .await
        .expect("validated scenario must run to completion");

    // srv1 is down for [5, 10); it must still serve some requests before and
    // after that window, so neither server ends up starved entirely.
    let completed = results.completed_requests();
    assert!(!completed.is_empty());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn same_seed_is_bit_identical() {
    let a = Runner::new(testing::single_server_smoke())
        .with_seed(99)
        .run()
        .await
        .unwrap();
    let b = Runner::new(testing::single_server_smoke())
        .with_seed(99)
        .run()
        .await
        .unwrap();

    assert_eq!(a.completed_requests(), b.completed_requests());
}
