use std::net::SocketAddr;

use crate::{
    foundation::error::{PlaceholdError, PlaceholdResult},
    service::{handler::Service, response::Response},
};

/// Blocking HTTP/1.1 front end for a [`Service`].
///
/// Requests are accepted on the calling thread and handled as tasks on the given runtime.
pub struct HttpServer {
    server: tiny_http::Server,
    service: Service,
}

impl HttpServer {
    pub fn bind(addr: &str, service: Service) -> PlaceholdResult<Self> {
        let server = tiny_http::Server::http(addr)
            .map_err(|e| PlaceholdError::config(format!("bind '{addr}': {e}")))?;
        Ok(Self { server, service })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Accept requests until the listener is closed.
    pub fn run(self, runtime: &tokio::runtime::Handle) {
        if let Some(addr) = self.local_addr() {
            tracing::info!(%addr, "listening");
        }
        for request in self.server.incoming_requests() {
            let service = self.service.clone();
            let method = request.method().clone();
            let url = request.url().to_string();
            runtime.spawn(async move {
                let resp = match method {
                    tiny_http::Method::Get | tiny_http::Method::Head => service.handle(&url).await,
                    _ => Response::method_not_allowed(),
                };
                tracing::info!(%method, %url, status = resp.status, "request");
                // tiny_http drops the body itself for HEAD; writing is blocking socket IO.
                await_writer(tokio::task::spawn_blocking(move || respond(request, resp))).await;
            });
        }
    }
}

/// Wait for a response writer; `false` if it panicked or was cancelled.
async fn await_writer(task: tokio::task::JoinHandle<()>) -> bool {
    match task.await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "response writer failed");
            false
        }
    }
}

fn respond(request: tiny_http::Request, resp: Response) {
    let headers = resp.headers;
    let mut out =
        tiny_http::Response::from_data(resp.body.into_bytes()).with_status_code(resp.status);
    for (name, value) in &headers {
        match tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            Ok(header) => out.add_header(header),
            Err(()) => tracing::warn!(name, "dropping invalid header"),
        }
    }
    if let Err(e) = request.respond(out) {
        tracing::debug!(error = %e, "client went away");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/service/http.rs"]
mod tests;
