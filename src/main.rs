//! `feature-bridge`: run one request through the bridge against the
//! in-process legacy host and print the resulting legacy response.
//!
//! ```text
//! CLI args ──▶ MemoryRequest ──┐
//!                              ├──▶ BridgeServer::dispatcher(Echo).process
//!              MemoryResponse ─┘                 │
//!                    │                           ▼
//!                    └──────── JSON on stdout ◀── status, headers, cookies, body
//! ```
//!
//! The bundled `Echo` application writes the request body back, tags the
//! response with the trace identifier from a starting callback, and sets a
//! cookie through the `Set-Cookie` header.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use futures_util::future::{BoxFuture, FutureExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use url::Url;

use http_feature_bridge::config::{self, BridgeConfig};
use http_feature_bridge::cookies;
use http_feature_bridge::features::{
    Callback, HttpRequestFeature, HttpRequestIdentifierFeature, HttpResponseFeature,
    RequestFeatures,
};
use http_feature_bridge::headers::names::{CONTENT_TYPE, SET_COOKIE};
use http_feature_bridge::legacy::{LegacyResponse, MemoryRequest, MemoryResponse};
use http_feature_bridge::observability::logging;
use http_feature_bridge::{BoxError, BridgeError, BridgeServer, HeaderDictionary, HttpApplication};

#[derive(Parser)]
#[command(name = "feature-bridge")]
#[command(about = "Run a request through the HTTP feature bridge", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, default_value = "GET")]
    method: String,

    #[arg(short, long, default_value = "http://localhost/")]
    url: Url,

    /// Request header as `Name: value`; repeatable.
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Request body.
    #[arg(short, long)]
    body: Option<String>,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected 'Name: value', got '{}'", raw))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

/// Echoes the request body and method back through the bridge.
struct Echo;

impl HttpApplication for Echo {
    type Context = RequestFeatures;

    fn create_context(&self, features: &RequestFeatures) -> Self::Context {
        features.clone()
    }

    fn process_request<'a>(
        &'a self,
        context: &'a mut Self::Context,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        async move {
            let request = context.request().clone();
            let response = context.response().clone();

            let mut input = Vec::new();
            request.body().read_to_end(&mut input).await?;

            let tagged = response.clone();
            response.on_starting(Callback::new(
                move |trace_identifier: String| async move {
                    tagged
                        .headers()
                        .set("X-Trace-Identifier", trace_identifier.into())?;
                    Ok::<(), BoxError>(())
                },
                request.trace_identifier(),
            ));

            let headers = response.headers();
            headers.set(CONTENT_TYPE, "text/plain".into())?;
            headers.set(SET_COOKIE, "bridge=1; path=/; httponly".into())?;

            let mut output = response.body();
            output
                .write_all(format!("{} {}\n", request.method(), request.path()).as_bytes())
                .await?;
            output.write_all(&input).await?;

            Ok::<(), BoxError>(())
        }
        .boxed()
    }

    fn dispose_context(&self, context: Self::Context, error: Option<&BridgeError>) {
        tracing::debug!(
            trace_identifier = %context.request().trace_identifier(),
            failed = error.is_some(),
            "Context disposed"
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => BridgeConfig {
            routes: vec!["/".to_string()],
            ..BridgeConfig::default()
        },
    };
    logging::init(&config.observability);

    tracing::info!(
        routes = ?config.routes,
        read_only = config.features.read_only,
        "Configuration loaded"
    );

    let server = BridgeServer::new(config);
    let mut request = MemoryRequest::new(cli.method, cli.url.clone());
    for (name, value) in &cli.headers {
        request = request.with_header(name, value.as_str());
    }
    if let Some(body) = cli.body {
        request = request.with_body(body);
    }

    let response = Arc::new(MemoryResponse::new());
    if server.matches(cli.url.path()) {
        server.dispatcher(Echo).process(&request, response.clone()).await?;
    } else {
        tracing::warn!(path = %cli.url.path(), "Path not routed to the bridge");
        response.set_status_code(404);
        response.set_status_description("Not Found".to_string());
    }

    let report = serde_json::json!({
        "status": response.status_code(),
        "description": response.status_description(),
        "content_type": response.content_type(),
        "redirect": response.redirect_location(),
        "headers": response
            .headers()
            .entries()
            .into_iter()
            .collect::<std::collections::BTreeMap<_, _>>(),
        "cookies": response
            .cookies()
            .to_vec()
            .iter()
            .map(cookies::serialize)
            .collect::<Vec<_>>(),
        "body": String::from_utf8_lossy(&response.output_stream().contents()),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("Accept: text/plain").unwrap(),
            ("Accept".to_string(), "text/plain".to_string())
        );
        assert!(parse_header("no-colon").is_err());
    }

    #[tokio::test]
    async fn test_echo_round_trip() {
        let server = BridgeServer::new(BridgeConfig {
            routes: vec!["/".to_string()],
            ..BridgeConfig::default()
        });
        let request = MemoryRequest::new("POST", Url::parse("http://localhost/echo").unwrap())
            .with_body("hello");
        let response = Arc::new(MemoryResponse::new());

        server
            .dispatcher(Echo)
            .process(&request, response.clone())
            .await
            .unwrap();

        assert_eq!(response.content_type(), "text/plain");
        assert_eq!(response.cookies().len(), 1);
        assert!(response.headers().contains("X-Trace-Identifier"));
        assert_eq!(
            response.output_stream().contents(),
            b"POST /echo\nhello".to_vec()
        );
    }
}
