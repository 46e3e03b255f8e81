//! Asynchronous panorama loading
//!
//! The network or disk read and the HDR decode are blocking, so they run on a
//! short-lived worker thread. The caller gets a future that resolves through a
//! oneshot channel once the worker is done.

use std::{future::Future, thread, time::Duration};

use futures::channel::oneshot;
use log::{debug, error, info};

use crate::{
    error::EnvironmentError,
    gfx::rendering::RenderTarget,
};

use super::{EnvironmentMap, EnvironmentSource, HdrImage};

/// Fetches, decodes and prefilters environment panoramas
#[derive(Debug, Clone)]
pub struct EnvironmentLoader {
    timeout: Duration,
}

impl Default for EnvironmentLoader {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

impl EnvironmentLoader {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new() -> Self {
        Self::default()
    }

    /// Upper bound for the whole HTTP exchange
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Reads and decodes `source` off the calling thread
    ///
    /// The returned future never outlives the worker: if the thread dies
    /// without answering, it resolves to [`EnvironmentError::WorkerLost`].
    pub fn fetch(
        &self,
        source: &EnvironmentSource,
    ) -> impl Future<Output = Result<HdrImage, EnvironmentError>> + Send + 'static {
        let (sender, receiver) = oneshot::channel();
        let worker_source = source.clone();
        let timeout = self.timeout;

        let spawned = thread::Builder::new()
            .name("environment-fetch".to_string())
            .spawn(move || {
                let result = read_source(&worker_source, timeout)
                    .and_then(|bytes| HdrImage::decode(&bytes));
                // The receiver may be gone if the caller gave up
                let _ = sender.send(result);
            });

        if let Err(err) = spawned {
            error!("Could not start environment fetch worker: {}", err);
        }

        async move {
            receiver
                .await
                .unwrap_or(Err(EnvironmentError::WorkerLost))
        }
    }

    /// Fetches `source` and prefilters it on `renderer`
    ///
    /// Panoramas larger than the renderer can hold are downsampled first. The
    /// decoded image is released as soon as the prefiltered map exists.
    pub async fn load(
        &self,
        source: &EnvironmentSource,
        renderer: &mut dyn RenderTarget,
    ) -> Result<EnvironmentMap, EnvironmentError> {
        info!("Loading environment from {}", source);

        let image = self.fetch(source).await?;
        debug!(
            "Decoded {}x{} panorama from {}",
            image.width(),
            image.height(),
            source
        );

        let image = image.fit_within(renderer.max_texture_dimension());
        let map = renderer.prefilter_environment(&image)?;
        drop(image);

        info!(
            "Environment ready: {}x{} with {} mip levels",
            map.width(),
            map.height(),
            map.mip_levels()
        );
        Ok(map)
    }
}

fn read_source(source: &EnvironmentSource, timeout: Duration) -> Result<Vec<u8>, EnvironmentError> {
    match source {
        EnvironmentSource::Url(url) => {
            let http_error = |source| EnvironmentError::Http {
                url: url.clone(),
                source,
            };

            let client = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(http_error)?;
            let response = client.get(url).send().map_err(http_error)?;

            let status = response.status();
            if !status.is_success() {
                return Err(EnvironmentError::Status {
                    url: url.clone(),
                    status,
                });
            }

            Ok(response.bytes().map_err(http_error)?.to_vec())
        }
        EnvironmentSource::File(path) => {
            std::fs::read(path).map_err(|source| EnvironmentError::Io {
                path: path.clone(),
                source,
            })
        }
    }
}
