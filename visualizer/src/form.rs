use bzcore::builder::{LatticeMode, RequestForm};
use bzcore::model::VisualizationConfig;
use iced::{
    widget::{button, column, row, slider, text, text_input, Column, Row},
    Alignment, Element, Length,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Surfaces,
    Features,
    Scene,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Surfaces, Tab::Features, Tab::Scene];

    fn title(&self) -> &'static str {
        match self {
            Tab::Surfaces => "Surfaces",
            Tab::Features => "Features",
            Tab::Scene => "Scene",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Faces,
    Path,
    Points,
    Text,
    Axes,
    Orthographic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amount {
    FaceOpacity,
    EdgeWidth,
    PathWidth,
    PointSize,
    TextSize,
    TextOffset,
    AxesFactor,
}

impl Amount {
    fn range(&self) -> (f64, f64, f64) {
        match self {
            Amount::FaceOpacity => (0.0, 1.0, 0.05),
            Amount::EdgeWidth | Amount::PathWidth => (0.5, 10.0, 0.5),
            Amount::PointSize => (1.0, 20.0, 1.0),
            Amount::TextSize => (8.0, 40.0, 1.0),
            Amount::TextOffset => (0.0, 3.0, 0.1),
            Amount::AxesFactor => (0.1, 2.0, 0.1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Face,
    Edge,
    Path,
    Point,
}

#[derive(Debug, Clone)]
pub enum FormMessage {
    LatticeTextChanged(String),
    LatticeCellChanged(usize, usize, String),
    LatticeModeSelected(LatticeMode),
    KPointsChanged(String),
    PathChanged(String),
    TabSelected(Tab),
    Toggled(Toggle),
    AmountChanged(Amount, f64),
    ShadeChanged(Shade, String),
}

/// The editable form plus which config tab is open.
#[derive(Debug, Clone, Default)]
pub struct FormPanel {
    pub form: RequestForm,
    pub tab: Tab,
}

impl FormPanel {
    pub fn update(&mut self, message: FormMessage) {
        match message {
            FormMessage::LatticeTextChanged(value) => self.form.lattice.text = value,
            FormMessage::LatticeCellChanged(r, c, value) => self.form.lattice.set_cell(r, c, value),
            FormMessage::LatticeModeSelected(mode) => self.form.lattice.switch_mode(mode),
            FormMessage::KPointsChanged(value) => self.form.kpoints = value,
            FormMessage::PathChanged(value) => self.form.path = value,
            FormMessage::TabSelected(tab) => self.tab = tab,
            FormMessage::Toggled(toggle) => {
                let slot = toggle_slot(&mut self.form.config, toggle);
                *slot = Some(!slot.unwrap_or(false));
            }
            FormMessage::AmountChanged(amount, value) => {
                let (min, max, _) = amount.range();
                *amount_slot(&mut self.form.config, amount) = Some(value.clamp(min, max));
            }
            FormMessage::ShadeChanged(shade, value) => {
                *shade_slot(&mut self.form.config, shade) = Some(value);
            }
        }
    }

    pub fn view(&self) -> Element<'_, FormMessage> {
        let lattice_mode = row![
            mode_button("Text", LatticeMode::Text, self.form.lattice.mode),
            mode_button("Grid", LatticeMode::Grid, self.form.lattice.mode),
        ]
        .spacing(6);

        let lattice_input: Element<'_, FormMessage> = match self.form.lattice.mode {
            LatticeMode::Text => text_input("[[a1], [a2], [a3]]", &self.form.lattice.text)
                .on_input(FormMessage::LatticeTextChanged)
                .padding(6)
                .into(),
            LatticeMode::Grid => self
                .form
                .lattice
                .grid
                .iter()
                .enumerate()
                .fold(Column::new().spacing(4), |col, (r, cells)| {
                    col.push(cells.iter().enumerate().fold(
                        Row::new().spacing(4),
                        |line, (c, cell)| {
                            line.push(
                                text_input("0", cell)
                                    .on_input(move |value| {
                                        FormMessage::LatticeCellChanged(r, c, value)
                                    })
                                    .padding(4)
                                    .width(Length::Fixed(80.0)),
                            )
                        },
                    ))
                })
                .into(),
        };

        let tabs = Tab::ALL.iter().fold(Row::new().spacing(6), |tabs, tab| {
            let label = if *tab == self.tab {
                format!("[{}]", tab.title())
            } else {
                tab.title().to_string()
            };
            tabs.push(button(text(label).size(14)).on_press(FormMessage::TabSelected(*tab)))
        });

        column![
            text("Lattice vectors").size(16),
            lattice_mode,
            lattice_input,
            text("K-points").size(16),
            text_input("{\"GAMMA\": [0, 0, 0]}", &self.form.kpoints)
                .on_input(FormMessage::KPointsChanged)
                .padding(6),
            text("Path").size(16),
            text_input("[\"GAMMA\", \"X\"]", &self.form.path)
                .on_input(FormMessage::PathChanged)
                .padding(6),
            tabs,
            self.tab_view(),
        ]
        .spacing(8)
        .into()
    }

    fn tab_view(&self) -> Element<'_, FormMessage> {
        let config = &self.form.config;
        let content = match self.tab {
            Tab::Surfaces => column![
                toggle_button("Show faces", Toggle::Faces, config.show_faces),
                shade_input("Face color", Shade::Face, config.face_color.as_deref()),
                amount_slider("Face opacity", Amount::FaceOpacity, config.face_opacity),
                shade_input("Edge color", Shade::Edge, config.edge_color.as_deref()),
                amount_slider("Edge width", Amount::EdgeWidth, config.edge_width),
            ],
            Tab::Features => column![
                toggle_button("Show path", Toggle::Path, config.show_path),
                shade_input("Path color", Shade::Path, config.path_color.as_deref()),
                amount_slider("Path width", Amount::PathWidth, config.path_width),
                toggle_button("Show points", Toggle::Points, config.show_points),
                shade_input("Point color", Shade::Point, config.point_color.as_deref()),
                amount_slider("Point size", Amount::PointSize, config.point_size),
                toggle_button("Show labels", Toggle::Text, config.show_text),
                amount_slider("Label size", Amount::TextSize, config.text_size),
                amount_slider("Label offset", Amount::TextOffset, config.text_offset_factor),
            ],
            Tab::Scene => column![
                toggle_button("Show axes", Toggle::Axes, config.show_axes),
                amount_slider("Axes length", Amount::AxesFactor, config.axes_factor),
                toggle_button("Orthographic", Toggle::Orthographic, config.orthographic),
            ],
        };
        content.spacing(6).padding(6).into()
    }
}

fn mode_button(label: &str, mode: LatticeMode, current: LatticeMode) -> Element<'_, FormMessage> {
    let label = if mode == current {
        format!("[{label}]")
    } else {
        label.to_string()
    };
    button(text(label).size(13))
        .on_press(FormMessage::LatticeModeSelected(mode))
        .into()
}

fn toggle_button(label: &str, toggle: Toggle, value: Option<bool>) -> Element<'_, FormMessage> {
    let mark = if value.unwrap_or(false) { "[x]" } else { "[ ]" };
    button(text(format!("{mark} {label}")).size(13))
        .on_press(FormMessage::Toggled(toggle))
        .into()
}

fn amount_slider(label: &str, amount: Amount, value: Option<f64>) -> Element<'_, FormMessage> {
    let (min, max, step) = amount.range();
    let current = value.unwrap_or(min).clamp(min, max);
    row![
        text(format!("{label}: {current:.2}")).size(13).width(Length::Fixed(150.0)),
        slider(min..=max, current, move |v| FormMessage::AmountChanged(amount, v)).step(step),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}

fn shade_input<'a>(
    label: &'a str,
    shade: Shade,
    value: Option<&'a str>,
) -> Element<'a, FormMessage> {
    row![
        text(label).size(13).width(Length::Fixed(150.0)),
        text_input("#rrggbb", value.unwrap_or_default())
            .on_input(move |v| FormMessage::ShadeChanged(shade, v))
            .padding(4),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}

fn toggle_slot(config: &mut VisualizationConfig, toggle: Toggle) -> &mut Option<bool> {
    match toggle {
        Toggle::Faces => &mut config.show_faces,
        Toggle::Path => &mut config.show_path,
        Toggle::Points => &mut config.show_points,
        Toggle::Text => &mut config.show_text,
        Toggle::Axes => &mut config.show_axes,
        Toggle::Orthographic => &mut config.orthographic,
    }
}

fn amount_slot(config: &mut VisualizationConfig, amount: Amount) -> &mut Option<f64> {
    match amount {
        Amount::FaceOpacity => &mut config.face_opacity,
        Amount::EdgeWidth => &mut config.edge_width,
        Amount::PathWidth => &mut config.path_width,
        Amount::PointSize => &mut config.point_size,
        Amount::TextSize => &mut config.text_size,
        Amount::TextOffset => &mut config.text_offset_factor,
        Amount::AxesFactor => &mut config.axes_factor,
    }
}

fn shade_slot(config: &mut VisualizationConfig, shade: Shade) -> &mut Option<String> {
    match shade {
        Shade::Face => &mut config.face_color,
        Shade::Edge => &mut config.edge_color,
        Shade::Path => &mut config.path_color,
        Shade::Point => &mut config.point_color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_flip_the_config_flag() {
        let mut panel = FormPanel::default();
        assert_eq!(panel.form.config.show_axes, Some(true));
        panel.update(FormMessage::Toggled(Toggle::Axes));
        assert_eq!(panel.form.config.show_axes, Some(false));
        panel.update(FormMessage::Toggled(Toggle::Axes));
        assert_eq!(panel.form.config.show_axes, Some(true));
    }

    #[test]
    fn amounts_are_clamped_to_slider_range() {
        let mut panel = FormPanel::default();
        panel.update(FormMessage::AmountChanged(Amount::FaceOpacity, 1.7));
        assert_eq!(panel.form.config.face_opacity, Some(1.0));
        panel.update(FormMessage::AmountChanged(Amount::EdgeWidth, 2.5));
        assert_eq!(panel.form.config.edge_width, Some(2.5));
    }

    #[test]
    fn grid_edits_survive_switch_back_to_text() {
        let mut panel = FormPanel::default();
        panel.update(FormMessage::LatticeModeSelected(LatticeMode::Grid));
        panel.update(FormMessage::LatticeCellChanged(0, 0, "2".into()));
        panel.update(FormMessage::LatticeModeSelected(LatticeMode::Text));
        assert_eq!(panel.form.lattice.mode, LatticeMode::Text);
        assert!(panel.form.lattice.text.starts_with("[[2.0,"));
    }

    #[test]
    fn shade_and_tab_updates_apply() {
        let mut panel = FormPanel::default();
        panel.update(FormMessage::ShadeChanged(Shade::Path, "#00ff00".into()));
        panel.update(FormMessage::TabSelected(Tab::Scene));
        assert_eq!(panel.form.config.path_color.as_deref(), Some("#00ff00"));
        assert_eq!(panel.tab, Tab::Scene);
    }
}
