//! End-to-end dispatch through the bridge server.

use std::sync::Arc;
use std::time::Duration;

use http_feature_bridge::config::parse_config;
use http_feature_bridge::features::{Feature, FeatureKind, FeatureSet};
use http_feature_bridge::legacy::{LegacyResponse, MemoryResponse};
use http_feature_bridge::{BridgeError, BridgeServer};

mod common;

use common::{sample_request, Script, Scripted};

#[tokio::test]
async fn test_lifecycle_order_on_success() {
    let server = BridgeServer::new(parse_config(r#"routes = ["/the"]"#).unwrap());
    let dispatcher = server.dispatcher(Scripted::new(Script::Succeed));

    dispatcher
        .process(&sample_request(), Arc::new(MemoryResponse::new()))
        .await
        .unwrap();

    assert_eq!(
        dispatcher.application().events(),
        vec!["create", "process", "starting", "completed", "dispose"]
    );
}

#[tokio::test]
async fn test_failure_skips_start_but_completes() {
    let server = BridgeServer::new(parse_config("").unwrap());
    let dispatcher = server.dispatcher(Scripted::new(Script::Fail));

    let err = dispatcher
        .process(&sample_request(), common::sample_response())
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::Pipeline(_)));
    assert_eq!(err.to_string(), "Request processing failed: scripted failure");
    assert_eq!(
        dispatcher.application().events(),
        vec![
            "create",
            "process",
            "completed",
            "dispose:Request processing failed: scripted failure"
        ]
    );
}

#[tokio::test]
async fn test_aborted_dispatch_still_completes() {
    let server = BridgeServer::new(Default::default());
    let dispatcher = server.dispatcher(Scripted::new(Script::Hang));
    let request = sample_request();

    let aborted = tokio::time::timeout(
        Duration::from_millis(20),
        dispatcher.process(&request, Arc::new(MemoryResponse::new())),
    )
    .await;
    assert!(aborted.is_err());

    let application = dispatcher.application().clone();
    tokio::time::timeout(Duration::from_secs(1), async move {
        while !application.events().iter().any(|e| e == "completed") {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("completed callback never ran");

    assert_eq!(
        dispatcher.application().events(),
        vec!["create", "process", "completed"]
    );
}

#[tokio::test]
async fn test_each_request_gets_its_own_set() {
    let server = BridgeServer::new(Default::default());
    let dispatcher = server.dispatcher(Scripted::new(Script::Succeed));

    for _ in 0..3 {
        dispatcher
            .process(&sample_request(), Arc::new(MemoryResponse::new()))
            .await
            .unwrap();
    }

    let events = dispatcher.application().events();
    assert_eq!(events.iter().filter(|e| *e == "create").count(), 3);
    assert_eq!(events.iter().filter(|e| *e == "dispose").count(), 3);
}

#[tokio::test]
async fn test_server_defaults_visible_to_requests() {
    let server = BridgeServer::new(parse_config("[features]\nread_only = true").unwrap());
    let marker: Arc<dyn std::any::Any + Send + Sync> = Arc::new(7u8);
    server
        .defaults()
        .insert(FeatureKind::Custom("server"), Some(Feature::Other(marker)))
        .unwrap();

    let request = sample_request();
    let features = http_feature_bridge::RequestFeatures::from_legacy(
        &request,
        Arc::new(MemoryResponse::new()),
        Some(server.defaults().clone()),
        server.config().features.read_only,
    );

    let set: &Arc<FeatureSet> = features.features();
    assert!(set.is_read_only());
    assert_eq!(set.len(), 3);
    assert!(set.get_by_kind(FeatureKind::Custom("server")).is_some());
}

#[tokio::test]
async fn test_status_flows_back_to_legacy() {
    use http_feature_bridge::HttpResponseFeature;

    let response = Arc::new(MemoryResponse::new());
    let request = sample_request();
    let features = http_feature_bridge::RequestFeatures::from_legacy(
        &request,
        response.clone(),
        None,
        false,
    );

    let typed: Arc<dyn HttpResponseFeature> = features.features().get().unwrap();
    typed.set_status_code(418);
    typed.set_reason_phrase("I'm a teapot".to_string());

    assert_eq!(response.status_code(), 418);
    assert_eq!(response.status_description(), "I'm a teapot");
}
