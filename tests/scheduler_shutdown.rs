//! Scheduler wiring: the interval job drives real cycles, and both
//! background loops exit when the shutdown signal fires.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use url::Url;

use statuswatch::config::{
    AlertConfig, CheckSettings, ResolvedConfig, RetentionConfig, ServiceDescriptor, ServiceKind,
    StorageConfig,
};
use statuswatch::lifecycle::Shutdown;
use statuswatch::scheduler::{CheckCycle, Scheduler};
use statuswatch::store::{CheckStore, MemoryStore};

fn config(services: Vec<ServiceDescriptor>) -> ResolvedConfig {
    ResolvedConfig {
        services,
        checks: CheckSettings {
            interval_secs: 60,
            max_retries: 1,
            retry_delay_secs: 0,
        },
        alerting: AlertConfig::default(),
        retention: RetentionConfig::default(),
        storage: StorageConfig::default(),
    }
}

fn service(name: &str, url: &str) -> ServiceDescriptor {
    ServiceDescriptor {
        name: name.to_string(),
        url: Url::parse(url).unwrap(),
        method: Method::GET,
        expected_status: 200,
        timeout: Duration::from_secs(5),
        follow_redirects: false,
        request_body: None,
        kind: ServiceKind::Standard,
    }
}

#[tokio::test]
async fn scheduler_runs_cycles_and_stops_on_shutdown() {
    let (backend, hits) = common::start_counting_backend(200, "ok").await;

    let store: Arc<dyn CheckStore> = Arc::new(MemoryStore::new());
    let config = config(vec![service("web", &format!("http://{backend}/healthz"))]);
    let shutdown = Shutdown::new();

    let cycle = CheckCycle::new(&config, Arc::clone(&store));
    let scheduler = Scheduler::start(
        cycle,
        Arc::clone(&store),
        Duration::from_millis(50),
        RetentionConfig::default(),
        &shutdown,
    );

    // Let the interval job run a few cycles.
    tokio::time::sleep(Duration::from_millis(300)).await;
    shutdown.trigger();

    tokio::time::timeout(Duration::from_secs(5), scheduler.join())
        .await
        .expect("scheduler loops did not exit after shutdown");

    // At least one cycle probed the backend and persisted its result.
    assert!(hits.load(Ordering::SeqCst) >= 1);
    let latest = store.latest("web").unwrap().unwrap();
    assert!(latest.is_up());

    // No further cycles fire once the loops have joined.
    let hits_at_join = hits.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(hits.load(Ordering::SeqCst), hits_at_join);
}

#[tokio::test]
async fn shutdown_before_first_tick_joins_cleanly() {
    let backend = common::start_mock_backend(200, "ok").await;

    let store: Arc<dyn CheckStore> = Arc::new(MemoryStore::new());
    let config = config(vec![service("web", &format!("http://{backend}/healthz"))]);
    let shutdown = Shutdown::new();

    let cycle = CheckCycle::new(&config, Arc::clone(&store));
    let scheduler = Scheduler::start(
        cycle,
        Arc::clone(&store),
        Duration::from_secs(3600),
        RetentionConfig::default(),
        &shutdown,
    );

    shutdown.trigger();

    tokio::time::timeout(Duration::from_secs(5), scheduler.join())
        .await
        .expect("scheduler loops did not exit after shutdown");
}
