use anyhow::{anyhow, bail, Context};
use bzcore::builder::RequestForm;
use bzcore::render::{self, Camera, ExportFormat, RenderGuard, RenderView};
use bzcore::view::{Effect, HealthStatus, SessionStats};
use bzcore::{ApiClient, PlotResponse, ViewController};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const FIGURE_FILE: &str = "figure.json";

#[derive(Debug)]
pub struct RunReport {
    pub health: HealthStatus,
    pub figure_path: Option<PathBuf>,
    pub exports: Vec<PathBuf>,
    pub stats: SessionStats,
}

/// Headless pass through the same controller the visualizer drives.
#[derive(Clone)]
pub struct Runner {
    client: ApiClient,
    out_dir: PathBuf,
    exports: Vec<ExportFormat>,
}

impl Runner {
    pub fn new(client: ApiClient, out_dir: impl Into<PathBuf>, exports: Vec<ExportFormat>) -> Self {
        Self {
            client,
            out_dir: out_dir.into(),
            exports,
        }
    }

    pub async fn check_health(&self) -> HealthStatus {
        let mut controller = ViewController::new();
        self.settle_health(&mut controller).await;
        controller.state().health()
    }

    /// Health check (optional), build, generate, save, export.
    pub async fn execute(
        &self,
        form: &RequestForm,
        check_health: bool,
    ) -> anyhow::Result<RunReport> {
        let mut controller = ViewController::new();
        if check_health {
            self.settle_health(&mut controller).await;
            log::info!("plot service is {}", controller.state().health().label());
        }

        let request = match controller.submit(form) {
            Effect::Dispatch(request) => request,
            Effect::Alert(text) => bail!(text),
            other => bail!("unexpected controller effect {other:?}"),
        };
        let outcome = self
            .client
            .generate_plot(&request)
            .await
            .map_err(|err| err.user_message());
        controller.receive(outcome);

        if let Some(message) = controller.state().error() {
            bail!("plot generation failed: {message}");
        }
        let figure = controller
            .state()
            .plot()
            .cloned()
            .ok_or_else(|| anyhow!("controller settled without a plot"))?;

        let figure_path = self.save_figure(figure.as_value())?;
        let exports = self.export_figure(figure.as_value())?;
        Ok(RunReport {
            health: controller.state().health(),
            figure_path: Some(figure_path),
            exports,
            stats: controller.stats(),
        })
    }

    /// Renders a figure that was saved earlier; the service is not contacted.
    pub fn export_saved<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<Vec<PathBuf>> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading figure {}", path_ref.display()))?;
        let raw: Value = serde_json::from_str(&contents)
            .with_context(|| format!("parsing figure {}", path_ref.display()))?;
        self.export_figure(&raw)
    }

    pub fn export_figure(&self, raw: &Value) -> anyhow::Result<Vec<PathBuf>> {
        let figure =
            PlotResponse::from_value(raw.clone()).map_err(|err| anyhow!(err.user_message()))?;
        let camera = Camera::from_layout(figure.layout());
        let mut guard = RenderGuard::new();
        let scene = match render::prepare(Some(raw), &camera, &mut guard) {
            RenderView::Ready(scene) => scene,
            RenderView::Empty => bail!("no figure to render"),
            RenderView::Invalid(reason) | RenderView::Faulted(reason) => {
                bail!("figure could not be rendered: {reason}")
            }
        };

        let mut written = Vec::with_capacity(self.exports.len());
        for format in &self.exports {
            let path = render::export_scene(&scene, *format, &self.out_dir)
                .with_context(|| format!("exporting {}", format.extension()))?;
            written.push(path);
        }
        Ok(written)
    }

    async fn settle_health(&self, controller: &mut ViewController) {
        if controller.mount() == Effect::CheckHealth {
            let outcome = self
                .client
                .check_health()
                .await
                .map_err(|err| err.user_message());
            controller.resolve_health(outcome);
        }
    }

    fn save_figure(&self, raw: &Value) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("creating {}", self.out_dir.display()))?;
        let path = self.out_dir.join(FIGURE_FILE);
        let text = serde_json::to_string_pretty(raw).context("serializing figure")?;
        fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::server::routes;
    use bzcore::ClientConfig;
    use std::net::SocketAddr;

    fn runner_for(addr: SocketAddr, out_dir: &Path, exports: Vec<ExportFormat>) -> Runner {
        let client = ApiClient::new(ClientConfig::new(format!("http://{addr}")));
        Runner::new(client, out_dir, exports)
    }

    fn offline_runner(out_dir: &Path, exports: Vec<ExportFormat>) -> Runner {
        runner_for(SocketAddr::from(([127, 0, 0, 1], 9)), out_dir, exports)
    }

    fn start_stub() -> SocketAddr {
        let (addr, server) = warp::serve(routes()).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        addr
    }

    #[tokio::test]
    async fn runner_saves_and_exports_figure() {
        let addr = start_stub();
        let dir = tempfile::tempdir().unwrap();
        let runner = runner_for(addr, dir.path(), vec![ExportFormat::Svg]);

        let report = runner.execute(&RequestForm::default(), true).await.unwrap();
        assert_eq!(report.health, HealthStatus::Online);
        assert!(format!("{report:?}").contains("Online"));
        assert_eq!(report.stats.succeeded, 1);
        let saved = report.figure_path.unwrap();
        let raw: Value = serde_json::from_str(&fs::read_to_string(saved).unwrap()).unwrap();
        assert!(raw["layout"].is_object());
        assert_eq!(report.exports.len(), 1);
        assert!(report.exports[0].exists());
    }

    #[tokio::test]
    async fn invalid_form_is_reported_before_dispatch() {
        let addr = start_stub();
        let dir = tempfile::tempdir().unwrap();
        let runner = runner_for(addr, dir.path(), Vec::new());
        let mut form = RequestForm::default();
        form.kpoints = "{not json".into();

        let err = runner.execute(&form, false).await.unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON format"));
        assert!(!dir.path().join(FIGURE_FILE).exists());
    }

    #[tokio::test]
    async fn server_rejection_surfaces_detail() {
        let addr = start_stub();
        let dir = tempfile::tempdir().unwrap();
        let runner = runner_for(addr, dir.path(), Vec::new());
        let mut form = RequestForm::default();
        form.path = r#"["GAMMA", "Z"]"#.into();

        let err = runner.execute(&form, false).await.unwrap_err();
        assert!(err.to_string().contains("Unknown k-point label 'Z'"));
    }

    #[tokio::test]
    async fn health_only_reports_offline() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let dir = tempfile::tempdir().unwrap();
        let runner = runner_for(SocketAddr::from(([127, 0, 0, 1], port)), dir.path(), Vec::new());
        assert_eq!(runner.check_health().await, HealthStatus::Offline);
    }

    #[test]
    fn saved_figure_exports_without_service() {
        let dir = tempfile::tempdir().unwrap();
        let figure = serde_json::json!({
            "data": [{"type": "scatter3d", "mode": "lines", "x": [0, 1], "y": [0, 1], "z": [0, 0]}],
            "layout": {"scene": {"camera": {"projection": {"type": "orthographic"}}}},
        });
        let figure_path = dir.path().join("saved.json");
        fs::write(&figure_path, figure.to_string()).unwrap();

        let runner = offline_runner(dir.path(), vec![ExportFormat::Svg]);
        let written = runner.export_saved(&figure_path).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].extension().and_then(|e| e.to_str()), Some("svg"));
    }

    #[test]
    fn figure_without_layout_is_not_exported() {
        let dir = tempfile::tempdir().unwrap();
        let runner = offline_runner(dir.path(), vec![ExportFormat::Svg]);
        let err = runner
            .export_figure(&serde_json::json!({"data": []}))
            .unwrap_err();
        assert!(err.to_string().contains("invalid plot data structure"));
    }
}
