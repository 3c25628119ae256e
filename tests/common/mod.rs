//! Shared utilities for integration tests: in-memory legacy hosts and a
//! scriptable application.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use futures_util::future::{BoxFuture, FutureExt};
use url::Url;

use http_feature_bridge::features::{Callback, RequestFeatures};
use http_feature_bridge::legacy::{
    Cookie, HeaderStore, LegacyResponse, MemoryRequest, MemoryResponse, SERVER_PROTOCOL,
};
use http_feature_bridge::HttpResponseFeature;
use http_feature_bridge::{BoxError, BridgeError, HttpApplication};

/// Request carrying the values the bridge tests look for.
pub fn sample_request() -> MemoryRequest {
    MemoryRequest::new(
        "THE METHOD",
        Url::parse("special://the_uri/the/path?a=1").unwrap(),
    )
    .with_application_path("The application path")
    .with_server_variable(SERVER_PROTOCOL, "The server protocol")
    .with_header("Header#1", "Value #1")
    .with_header("Header#2", "Value #2")
    .with_body("request body")
}

/// Response over a store with two headers and a collection with two cookies.
pub fn sample_response() -> Arc<MemoryResponse> {
    let headers: HeaderStore = [("Header#1", "Value #1"), ("Header#2", "Value #2")]
        .into_iter()
        .collect();
    let response = MemoryResponse::with_headers(headers);

    let cookies = response.cookies();
    cookies.push(Cookie::new("Cookie1", "Value1").path("/"));
    cookies.push(Cookie::new("Cookie2", "Value2").secure(true).http_only(true));

    Arc::new(response)
}

/// What a [`Scripted`] application should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Succeed,
    Fail,
    /// Register the callbacks, then never finish.
    Hang,
}

fn recorder(events: &Arc<Mutex<Vec<String>>>, label: &'static str) -> Callback {
    let events = events.clone();
    Callback::new(
        move |label: &'static str| async move {
            events.lock().unwrap().push(label.to_string());
            Ok::<(), BoxError>(())
        },
        label,
    )
}

/// Application that records every call the dispatcher makes, including the
/// starting and completed callbacks it registers while processing.
pub struct Scripted {
    pub script: Script,
    pub events: Arc<Mutex<Vec<String>>>,
}

impl Scripted {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            events: Arc::default(),
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl HttpApplication for Scripted {
    type Context = RequestFeatures;

    fn create_context(&self, features: &RequestFeatures) -> Self::Context {
        self.events.lock().unwrap().push("create".to_string());
        features.clone()
    }

    fn process_request<'a>(
        &'a self,
        context: &'a mut Self::Context,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        async move {
            self.events.lock().unwrap().push("process".to_string());
            let response = context.response();
            response.on_starting(recorder(&self.events, "starting"));
            response.on_completed(recorder(&self.events, "completed"));
            match self.script {
                Script::Succeed => Ok::<(), BoxError>(()),
                Script::Fail => Err("scripted failure".into()),
                Script::Hang => {
                    futures_util::future::pending::<()>().await;
                    Ok(())
                }
            }
        }
        .boxed()
    }

    fn dispose_context(&self, _context: Self::Context, error: Option<&BridgeError>) {
        let event = match error {
            Some(e) => format!("dispose:{}", e),
            None => "dispose".to_string(),
        };
        self.events.lock().unwrap().push(event);
    }
}
