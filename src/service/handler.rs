use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::{
    config::Config,
    foundation::error::{PlaceholdError, PlaceholdResult},
    params::parse,
    render::Renderer,
    service::response::Response,
};

/// One year minus a day, in seconds.
pub const DEFAULT_CACHE_MAX_AGE: u64 = 364 * 24 * 60 * 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceOpts {
    /// Renders allowed to run at once; later requests wait for a slot.
    pub concurrency: usize,
    /// Bound on slot wait, font fetch and rendering together.
    pub timeout: Duration,
    /// `max-age` advertised on successful responses.
    pub cache_max_age: u64,
}

impl Default for ServiceOpts {
    fn default() -> Self {
        Self {
            concurrency: num_cpus::get().max(1),
            timeout: Duration::from_secs(10),
            cache_max_age: DEFAULT_CACHE_MAX_AGE,
        }
    }
}

/// Request path in, [`Response`] out. Cheap to clone and share across tasks.
#[derive(Clone)]
pub struct Service {
    config: Arc<Config>,
    renderer: Renderer,
    permits: Arc<Semaphore>,
    opts: ServiceOpts,
}

impl Service {
    pub fn new(config: Config, renderer: Renderer, opts: ServiceOpts) -> PlaceholdResult<Self> {
        config.validate()?;
        if opts.concurrency == 0 {
            return Err(PlaceholdError::config("concurrency must be >= 1"));
        }
        if opts.timeout.is_zero() {
            return Err(PlaceholdError::config("timeout must be > 0"));
        }
        Ok(Self {
            config: Arc::new(config),
            renderer,
            permits: Arc::new(Semaphore::new(opts.concurrency)),
            opts,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn opts(&self) -> &ServiceOpts {
        &self.opts
    }

    /// Serve `GET <path>`. Never fails; errors become 4xx/5xx responses.
    pub async fn handle(&self, path: &str) -> Response {
        let token = token_from_path(path);
        match self.try_handle(token).await {
            Ok(resp) => resp,
            Err(err) => {
                if err.is_user_error() {
                    tracing::debug!(token, error = %err, "rejected token");
                } else {
                    tracing::warn!(token, error = %err, "request failed");
                }
                Response::from_error(err)
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn try_handle(&self, token: &str) -> PlaceholdResult<Response> {
        let params = parse(token, &self.config)?;

        let work = async {
            let permit = Arc::clone(&self.permits)
                .acquire_owned()
                .await
                .map_err(|e| PlaceholdError::Other(anyhow::Error::new(e)))?;
            self.renderer.render_holding(&params, permit).await
        };
        let artifact = tokio::time::timeout(self.opts.timeout, work)
            .await
            .map_err(|_| PlaceholdError::Timeout(self.opts.timeout.as_millis() as u64))??;

        Ok(Response::rendered(&params, artifact, self.opts.cache_max_age))
    }
}

/// Strip the leading `/` and any query string.
pub fn token_from_path(path: &str) -> &str {
    let path = path.split_once('?').map_or(path, |(p, _)| p);
    path.strip_prefix('/').unwrap_or(path)
}

#[cfg(test)]
#[path = "../../tests/unit/service/handler.rs"]
mod tests;
