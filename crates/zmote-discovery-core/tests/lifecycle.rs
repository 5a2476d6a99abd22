//! Service lifecycle tests against real sockets.
//!
//! Hosts without a multicast-capable interface cannot join the group; those
//! tests report the reason and return early.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use zmote_discovery_core::discovery::{announce, DatagramOutcome};
use zmote_discovery_core::{DiscoveryConfig, DiscoveryError, DiscoveryService, Zmote};

fn test_config() -> DiscoveryConfig {
    DiscoveryConfig {
        // Ephemeral response port keeps parallel tests apart
        response_port: 0,
        startup_delay_ms: 10,
        ..DiscoveryConfig::default()
    }
}

async fn start_or_skip(service: &mut DiscoveryService) -> bool {
    match service.start().await {
        Ok(()) => true,
        Err(DiscoveryError::Socket { context, source }) => {
            eprintln!("skipping: multicast unavailable ({}: {})", context, source);
            false
        }
        Err(e) => panic!("unexpected start error: {}", e),
    }
}

fn zmote(uuid: &str, model: &str) -> Zmote {
    Zmote {
        uuid: uuid.to_string(),
        kind: "IR".to_string(),
        make: "Acme".to_string(),
        model: model.to_string(),
        revision: "2".to_string(),
        config_url: "http://127.0.0.1:80".to_string(),
        ip: "127.0.0.1:80".to_string(),
    }
}

#[tokio::test]
async fn test_stop_returns_well_before_beacon_interval() {
    let mut service = DiscoveryService::new(test_config());
    if !start_or_skip(&mut service).await {
        return;
    }
    assert!(service.is_running());

    tokio::time::sleep(Duration::from_millis(200)).await;

    let started = Instant::now();
    service.stop().await;

    assert!(!service.is_running());
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "stop took {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_second_start_is_rejected() {
    let mut service = DiscoveryService::new(test_config());
    if !start_or_skip(&mut service).await {
        return;
    }

    assert!(matches!(
        service.start().await,
        Err(DiscoveryError::AlreadyRunning)
    ));

    service.stop().await;
}

#[tokio::test]
async fn test_restart_after_stop() {
    let mut service = DiscoveryService::new(test_config());
    if !start_or_skip(&mut service).await {
        return;
    }
    service.stop().await;

    service.start().await.unwrap();
    assert!(service.is_running());
    service.stop().await;
}

#[tokio::test]
async fn test_injection_while_running() {
    let mut service = DiscoveryService::new(test_config());
    if !start_or_skip(&mut service).await {
        return;
    }

    let source: SocketAddr = "10.0.0.5:9131".parse().unwrap();
    let outcome = service.inject(
        b"AMXB<-UUID=abc123><-Type=IR><-Make=Acme><-Model=X1><-Revision=2><-Config-URL=http://10.0.0.5:80/...",
        source,
    );
    assert_eq!(outcome, DatagramOutcome::Discovered("abc123".to_string()));

    // Malformed beacons are dropped and the service keeps running
    let outcome = service.inject(b"AMXB<-UUID><-Type=IR", source);
    assert!(matches!(outcome, DatagramOutcome::Malformed(_)));
    assert!(service.is_running());

    service.stop().await;

    let zmotes = service.zmotes();
    assert_eq!(zmotes.len(), 1);
    assert_eq!(zmotes["abc123"].ip, "10.0.0.5:80/...");
    assert_eq!(service.stats().malformed, 1);
}

#[tokio::test]
async fn test_multicast_loopback_round_trip() {
    let mut service = DiscoveryService::new(test_config());
    if !start_or_skip(&mut service).await {
        return;
    }

    let port = service.response_addr().unwrap().port();
    let announce_config = DiscoveryConfig {
        response_port: port,
        ..DiscoveryConfig::default()
    };

    let spacing = Duration::from_millis(50);
    for model in ["X1", "X2"] {
        if let Err(e) = announce(&announce_config, &zmote("loop-1", model), 3, spacing).await {
            eprintln!("skipping: cannot send to multicast group: {}", e);
            service.stop().await;
            return;
        }
    }

    let deadline = Instant::now() + Duration::from_secs(3);
    while Instant::now() < deadline {
        if service.zmotes().get("loop-1").map(|z| z.model.as_str()) == Some("X2") {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    service.stop().await;

    let zmotes = service.zmotes();
    if zmotes.is_empty() {
        eprintln!("skipping: multicast loopback did not deliver any datagram");
        return;
    }

    assert_eq!(zmotes.len(), 1);
    assert_eq!(zmotes["loop-1"].model, "X2");
    assert_eq!(zmotes["loop-1"].ip, "127.0.0.1:80");
}

#[tokio::test]
async fn test_discover_once_with_no_devices() {
    // Nobody announces to the ephemeral response port
    match DiscoveryService::discover_once(test_config(), Duration::from_millis(300)).await {
        Ok(report) => {
            assert!(report.zmotes.is_empty());
            assert_eq!(report.stats.accepted, 0);
        }
        Err(DiscoveryError::Socket { context, source }) => {
            eprintln!("skipping: multicast unavailable ({}: {})", context, source);
        }
        Err(e) => panic!("unexpected discovery error: {}", e),
    }
}

#[tokio::test]
async fn test_start_dropped_during_startup_delay_stops_transmitter() {
    let metrics = tokio::runtime::Handle::current().metrics();
    let baseline = metrics.num_alive_tasks();

    let mut service = DiscoveryService::new(DiscoveryConfig {
        startup_delay_ms: 500,
        ..test_config()
    });

    match tokio::time::timeout(Duration::from_millis(50), service.start()).await {
        Err(_) => {}
        Ok(Ok(())) => panic!("start returned before its startup delay elapsed"),
        Ok(Err(DiscoveryError::Socket { context, source })) => {
            eprintln!("skipping: multicast unavailable ({}: {})", context, source);
            return;
        }
        Ok(Err(e)) => panic!("unexpected start error: {}", e),
    }

    assert!(!service.is_running());
    service.stop().await;

    // The transmitter exits once it observes the cancelled token
    let deadline = Instant::now() + Duration::from_secs(2);
    while metrics.num_alive_tasks() > baseline && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(metrics.num_alive_tasks(), baseline);
}
