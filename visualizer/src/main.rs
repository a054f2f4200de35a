use bzcore::model::PlotRequest;
use bzcore::render::{self, Camera, ExportFormat, RenderGuard, RenderView};
use bzcore::view::{Effect, HealthStatus, Phase};
use bzcore::{ApiClient, ClientConfig, ViewController};
use form::{FormMessage, FormPanel};
use iced::{
    widget::{button, canvas::Canvas, column, row, scrollable, slider, text, Column, Container},
    Alignment, Color, Element, Length, Task, Theme,
};
use plot::PlotCanvas;
use serde_json::Value;
use std::path::PathBuf;

mod form;
mod plot;

const EXPORT_DIR: &str = "tools/data";

fn main() -> iced::Result {
    env_logger::init();
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Brillouin Zone Visualizer".into()
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Light
}

struct Visualizer {
    client: ApiClient,
    controller: ViewController,
    panel: FormPanel,
    camera: Camera,
    guard: RenderGuard,
    render: RenderView,
    alert: Option<String>,
    hint: Option<String>,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    HealthChecked(Result<(), String>),
    Form(FormMessage),
    Submit,
    PlotGenerated(Result<Value, String>),
    DismissAlert,
    AzimuthChanged(f64),
    ElevationChanged(f64),
    ZoomChanged(f64),
    ResetCamera,
    RetryRender,
    Export(ExportFormat),
    Exported(Result<PathBuf, String>),
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        let config = ClientConfig::resolve(None);
        log::info!("plot service at {}", config.base_url);
        let client = ApiClient::new(config);
        let mut state = Visualizer {
            client,
            controller: ViewController::new(),
            panel: FormPanel::default(),
            camera: Camera::default(),
            guard: RenderGuard::new(),
            render: RenderView::Empty,
            alert: None,
            hint: None,
            status: "Fill in the form and press Generate.".into(),
            history: Vec::new(),
        };
        let effect = state.controller.mount();
        let task = state.perform(effect);
        (state, task)
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::HealthChecked(outcome) => {
                let effect = state.controller.resolve_health(outcome);
                state.perform(effect)
            }
            Message::Form(message) => {
                state.panel.update(message);
                Task::none()
            }
            Message::Submit => {
                if !state.controller.can_submit() {
                    return Task::none();
                }
                let effect = state.controller.submit(&state.panel.form);
                state.perform(effect)
            }
            Message::PlotGenerated(outcome) => {
                let effect = state.controller.receive(outcome);
                match state.controller.state().phase().clone() {
                    Phase::Success => {
                        if let Some(plot) = state.controller.state().plot() {
                            state.camera = Camera::from_layout(plot.layout());
                        }
                        state.status = "Plot generated.".into();
                        state.push_history("Plot generated".into());
                    }
                    Phase::Error(message) => {
                        state.status = format!("Error: {message}");
                        state.push_history(format!("Failed: {message}"));
                    }
                    _ => {}
                }
                state.refresh();
                state.perform(effect)
            }
            Message::DismissAlert => {
                state.alert = None;
                Task::none()
            }
            Message::AzimuthChanged(degrees) => {
                state.camera.azimuth = degrees.to_radians();
                state.refresh();
                Task::none()
            }
            Message::ElevationChanged(degrees) => {
                state.camera.elevation = degrees.to_radians();
                state.refresh();
                Task::none()
            }
            Message::ZoomChanged(zoom) => {
                state.camera.set_zoom(zoom);
                state.refresh();
                Task::none()
            }
            Message::ResetCamera => {
                state.camera = state
                    .controller
                    .state()
                    .plot()
                    .map(|plot| Camera::from_layout(plot.layout()))
                    .unwrap_or_default();
                state.refresh();
                Task::none()
            }
            Message::RetryRender => {
                state.guard.reset();
                state.refresh();
                state.push_history("Render retried".into());
                Task::none()
            }
            Message::Export(format) => {
                let RenderView::Ready(scene) = &state.render else {
                    state.status = "Nothing to export yet.".into();
                    return Task::none();
                };
                let scene = scene.clone();
                Task::perform(
                    async move {
                        tokio::task::spawn_blocking(move || {
                            render::export_scene(&scene, format, &PathBuf::from(EXPORT_DIR))
                                .map_err(|err| err.to_string())
                        })
                        .await
                        .unwrap_or_else(|err| Err(err.to_string()))
                    },
                    Message::Exported,
                )
            }
            Message::Exported(Ok(path)) => {
                state.status = format!("Saved {}", path.display());
                state.push_history(format!("Exported {}", path.display()));
                Task::none()
            }
            Message::Exported(Err(err)) => {
                log::error!("export failed: {err}");
                state.status = format!("Export error: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        if let Some(alert) = &state.alert {
            let dialog = column![
                text("Invalid input").size(22),
                text(alert.as_str()).size(15),
                button("OK").on_press(Message::DismissAlert).padding(8),
            ]
            .spacing(12)
            .padding(24)
            .max_width(520);
            return Container::new(dialog)
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into();
        }

        let view_state = state.controller.state();
        let health = view_state.health();
        let badge_color = match health {
            HealthStatus::Online => Color::from_rgb(0.1, 0.6, 0.2),
            HealthStatus::Offline => Color::from_rgb(0.8, 0.1, 0.1),
            HealthStatus::Checking => Color::from_rgb(0.5, 0.5, 0.5),
        };
        let header = row![
            text("Brillouin Zone Visualizer").size(26),
            text(format!("API: {}", health.label())).size(14).color(badge_color),
        ]
        .spacing(20)
        .align_y(Alignment::Center);

        let generate_label = if view_state.is_loading() {
            "Generating..."
        } else {
            "Generate"
        };
        let mut form_column = column![
            state.panel.view().map(Message::Form),
            button(generate_label)
                .on_press_maybe(state.controller.can_submit().then_some(Message::Submit))
                .padding(10),
        ]
        .spacing(10);
        if let Some(hint) = &state.hint {
            form_column = form_column.push(
                text(hint.as_str())
                    .size(12)
                    .color(Color::from_rgb(0.7, 0.45, 0.0)),
            );
        }
        let form_column = Container::new(scrollable(form_column.padding(16)))
            .width(Length::Fixed(420.0))
            .height(Length::Fill);

        let stats = state.controller.stats();
        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.as_str()).size(12))
                })
        };

        let plot_column = column![
            state.plot_pane(),
            state.camera_controls(),
            row![
                button("Export PNG").on_press(Message::Export(ExportFormat::Png)),
                button("Export SVG").on_press(Message::Export(ExportFormat::Svg)),
            ]
            .spacing(8),
            text(state.status.as_str()).size(14),
            text(format!(
                "Requests: {} sent / {} ok / {} failed",
                stats.dispatched, stats.succeeded, stats.failed
            ))
            .size(12),
            Container::new(scrollable(history_list).height(Length::Fixed(90.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        Container::new(
            column![header, row![form_column, plot_column].spacing(20)]
                .spacing(12)
                .padding(20),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    fn plot_pane(&self) -> Element<'_, Message> {
        let view_state = self.controller.state();
        let pane: Element<'_, Message> = match &self.render {
            RenderView::Ready(scene) => Canvas::new(PlotCanvas::new(scene))
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            RenderView::Faulted(reason) => column![
                text("The plot could not be drawn.").size(18),
                text(reason.as_str()).size(12),
                button("Retry").on_press(Message::RetryRender),
            ]
            .spacing(8)
            .into(),
            RenderView::Invalid(reason) => text(reason.as_str()).size(16).into(),
            RenderView::Empty if view_state.is_loading() => {
                text("Generating plot...").size(18).into()
            }
            RenderView::Empty => text("No plot yet.").size(18).into(),
        };

        let mut pane_column = Column::new().spacing(6);
        if let Some(error) = view_state.error() {
            pane_column =
                pane_column.push(text(error).size(14).color(Color::from_rgb(0.8, 0.1, 0.1)));
        }
        if view_state.is_loading() && matches!(self.render, RenderView::Ready(_)) {
            pane_column = pane_column.push(text("Generating plot...").size(14));
        }
        Container::new(pane_column.push(pane))
            .width(Length::Fill)
            .height(Length::Fixed(520.0))
            .into()
    }

    fn camera_controls(&self) -> Element<'_, Message> {
        let azimuth = self.camera.azimuth.to_degrees().rem_euclid(360.0);
        let elevation = self.camera.elevation.to_degrees();
        row![
            text(format!("Azimuth {azimuth:.0}")).size(12),
            slider(0.0..=359.0, azimuth, Message::AzimuthChanged).step(1.0),
            text(format!("Elevation {elevation:.0}")).size(12),
            slider(-89.0..=89.0, elevation.clamp(-89.0, 89.0), Message::ElevationChanged).step(1.0),
            text(format!("Zoom {:.1}", self.camera.zoom)).size(12),
            slider(0.2..=5.0, self.camera.zoom, Message::ZoomChanged).step(0.1),
            button("Reset").on_press(Message::ResetCamera),
        ]
        .spacing(8)
        .align_y(Alignment::Center)
        .into()
    }

    /// Hands a controller effect to the runtime.
    fn perform(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::None => Task::none(),
            Effect::CheckHealth => {
                Task::perform(check_health(self.client.clone()), Message::HealthChecked)
            }
            Effect::Dispatch(request) => {
                self.hint = unresolved_hint(&request);
                self.status = "Generating plot...".into();
                Task::perform(
                    generate_plot(self.client.clone(), request),
                    Message::PlotGenerated,
                )
            }
            Effect::Alert(text) => {
                self.alert = Some(text);
                Task::none()
            }
        }
    }

    fn refresh(&mut self) {
        let figure = self.controller.state().plot().map(|plot| plot.as_value());
        self.render = render::prepare(figure, &self.camera, &mut self.guard);
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

fn unresolved_hint(request: &PlotRequest) -> Option<String> {
    let missing = request.unresolved_labels();
    if missing.is_empty() {
        None
    } else {
        Some(format!(
            "Path labels without k-points: {}. The server may reject them.",
            missing.join(", ")
        ))
    }
}

async fn check_health(client: ApiClient) -> Result<(), String> {
    client.check_health().await.map_err(|err| err.user_message())
}

async fn generate_plot(client: ApiClient, request: PlotRequest) -> Result<Value, String> {
    client
        .generate_plot(&request)
        .await
        .map_err(|err| err.user_message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn figure() -> Value {
        json!({
            "data": [{"type": "scatter3d", "mode": "lines", "x": [0, 1], "y": [0, 1], "z": [0, 1]}],
            "layout": {"scene": {"camera": {"projection": {"type": "orthographic"}}}},
        })
    }

    #[test]
    fn invalid_form_raises_alert_without_loading() {
        let (mut state, _) = Visualizer::boot();
        state.panel.form.path = "[\"GAMMA\"".into();
        let _ = Visualizer::update(&mut state, Message::Submit);
        assert!(state.alert.as_deref().unwrap().starts_with("Invalid JSON format"));
        assert!(!state.controller.state().is_loading());
        let _ = Visualizer::update(&mut state, Message::DismissAlert);
        assert!(state.alert.is_none());
    }

    #[test]
    fn submit_is_ignored_while_loading() {
        let (mut state, _) = Visualizer::boot();
        let _ = Visualizer::update(&mut state, Message::Submit);
        assert!(state.controller.state().is_loading());
        let _ = Visualizer::update(&mut state, Message::Submit);
        assert_eq!(state.controller.stats().dispatched, 1);
    }

    #[test]
    fn received_plot_is_rendered_with_layout_camera() {
        let (mut state, _) = Visualizer::boot();
        let _ = Visualizer::update(&mut state, Message::Submit);
        let _ = Visualizer::update(&mut state, Message::PlotGenerated(Ok(figure())));
        assert!(matches!(state.render, RenderView::Ready(_)));
        assert_eq!(state.camera.projection, render::ProjectionKind::Orthographic);
    }

    #[test]
    fn failure_keeps_previous_drawing() {
        let (mut state, _) = Visualizer::boot();
        let _ = Visualizer::update(&mut state, Message::Submit);
        let _ = Visualizer::update(&mut state, Message::PlotGenerated(Ok(figure())));
        let _ = Visualizer::update(&mut state, Message::Submit);
        let _ = Visualizer::update(&mut state, Message::PlotGenerated(Err("boom".into())));
        assert_eq!(state.controller.state().error(), Some("boom"));
        assert!(matches!(state.render, RenderView::Ready(_)));
    }

    #[test]
    fn unresolved_labels_produce_hint() {
        let (mut state, _) = Visualizer::boot();
        state.panel.form.path = r#"["GAMMA", "Q"]"#.into();
        let _ = Visualizer::update(&mut state, Message::Submit);
        assert!(state.hint.as_deref().unwrap().contains("Q"));
        assert!(state.controller.state().is_loading());
    }
}
