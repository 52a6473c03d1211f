use image_service::config::{ImageConfig, UpstreamConfig};
use image_service::startup::Application;
use service_core::config::Config as CoreConfig;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the service on a random port, pointed at the given upstream.
    pub async fn spawn(upstream_base_url: &str) -> Self {
        Self::spawn_with(|_| {}, upstream_base_url).await
    }

    /// Like `spawn`, but lets a test adjust the upstream settings first.
    pub async fn spawn_with<F>(tweak: F, upstream_base_url: &str) -> Self
    where
        F: FnOnce(&mut UpstreamConfig),
    {
        let mut upstream = UpstreamConfig {
            base_url: upstream_base_url.to_string(),
            timeout_secs: 10,
            min_image_bytes: 1000,
            max_part_numbers: 6,
        };
        tweak(&mut upstream);

        let config = ImageConfig {
            common: CoreConfig { port: 0 },
            upstream,
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();

        // Wait for the server to be ready by polling the health endpoint
        let health_url = format!("http://127.0.0.1:{}/health", port);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            client,
        }
    }

    pub async fn post_fetch_images(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/fetch-images", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
