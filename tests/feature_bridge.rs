//! Feature set and header adaptors built over the in-memory legacy host.

use std::sync::Arc;

use http_feature_bridge::features::{FeatureKind, HttpRequestFeature, HttpRequestIdentifierFeature};
use http_feature_bridge::headers::names::{LOCATION, SET_COOKIE};
use http_feature_bridge::legacy::{LegacyRequest, LegacyResponse};
use http_feature_bridge::{HeaderDictionary, HeaderValues, HttpResponseFeature, RequestFeatures};

mod common;

use common::{sample_request, sample_response};

#[test]
fn test_request_snapshot_through_typed_lookup() {
    let legacy = sample_request();
    let features = RequestFeatures::from_legacy(&legacy, sample_response(), None, false);

    let request: Arc<dyn HttpRequestFeature> = features.features().get().unwrap();
    assert_eq!(request.method(), "THE METHOD");
    assert_eq!(request.path(), "/the/path");
    assert_eq!(request.path_base(), "The application path");
    assert_eq!(request.protocol(), "The server protocol");
    assert_eq!(request.query_string(), "?a=1");
    assert_eq!(request.scheme(), "special");
    assert!(request.body().ptr_eq(&legacy.input_stream()));

    let headers = request.headers();
    assert_eq!(headers.len(), 2);
    headers.set("Header#3", "Value #3".into()).unwrap();
    assert_eq!(legacy.headers().len(), 2);
}

#[test]
fn test_identifier_and_request_are_one_object() {
    let features = RequestFeatures::from_legacy(&sample_request(), sample_response(), None, false);
    let set = features.features();

    let identifier: Arc<dyn HttpRequestIdentifierFeature> = set.get().unwrap();
    identifier.set_trace_identifier("trace-1".to_string());
    assert_eq!(features.request().trace_identifier(), "trace-1");

    let request = set.get_by_kind(FeatureKind::Request).unwrap();
    let ident = set.get_by_kind(FeatureKind::RequestIdentifier).unwrap();
    assert!(request.same_instance(&ident));
}

#[test]
fn test_response_headers_are_live_both_ways() {
    let legacy = sample_response();
    let features = RequestFeatures::from_legacy(&sample_request(), legacy.clone(), None, false);
    let response: Arc<dyn HttpResponseFeature> = features.features().get().unwrap();
    let headers = response.headers();

    assert_eq!(headers.len(), 2);
    assert_eq!(headers.get("Header#1"), HeaderValues::from("Value #1"));

    headers.set("Header#3", "Value #3".into()).unwrap();
    assert_eq!(legacy.headers().get("Header#3").as_deref(), Some("Value #3"));

    legacy.headers().remove("Header#1");
    assert!(!headers.contains_key("Header#1"));
}

#[test]
fn test_set_cookie_reflects_collection() {
    let legacy = sample_response();
    let features = RequestFeatures::from_legacy(&sample_request(), legacy.clone(), None, false);
    let headers = features.response().headers();

    let values = headers.get(SET_COOKIE);
    assert_eq!(values.len(), 2);
    assert_eq!(values.first(), Some("Cookie1=Value1; path=/"));
    assert_eq!(
        values.as_slice()[1],
        "Cookie2=Value2; secure; httponly"
    );

    headers
        .set(SET_COOKIE, "Cookie1=Changed; path=/other".into())
        .unwrap();
    let cookies = legacy.cookies();
    assert_eq!(cookies.len(), 2);
    assert_eq!(cookies.get(0).unwrap().value, "Changed");

    assert!(headers.set(SET_COOKIE, "=broken".into()).is_err());
    assert_eq!(cookies.get(0).unwrap().value, "Changed");
}

#[test]
fn test_location_maps_to_redirect() {
    let legacy = sample_response();
    let features = RequestFeatures::from_legacy(&sample_request(), legacy.clone(), None, false);
    let headers = features.response().headers();

    assert!(headers.get(LOCATION).is_empty());
    headers.set(LOCATION, "/elsewhere".into()).unwrap();
    assert_eq!(legacy.redirect_location().as_deref(), Some("/elsewhere"));
    assert_eq!(headers.get(LOCATION), HeaderValues::from("/elsewhere"));
}
