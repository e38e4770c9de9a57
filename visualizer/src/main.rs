use chaoscore::catalog::CircuitIdentity;
use chaoscore::decode::ResponseDecoder;
use chaoscore::gateway::{GatewayConfig, GeminiGateway};
use chaoscore::model::{CircuitAnalysis, ComparisonData};
use chaoscore::orchestrator::{execute, Completion, Orchestrator, PendingRequest, ViewMode};
use chaoscore::prelude::{GatewayError, ModelGateway, RequestError};
use chaoscore::view::{
    comparison_rows, filter_catalog, format_metric, is_hot, radar_axes, ranked_entries,
    score_label,
};
use charts::{
    safety_car_series, trend_series, ComparisonChart, DeploymentBars, RadarChart, TrendChart,
    ACCENT,
};
use iced::{
    widget::{button, canvas::Canvas, column, row, scrollable, text, text_input, Column, Container},
    Alignment, Color, Element, Length, Task, Theme,
};
use log::{error, info};
use std::sync::Arc;

mod charts;

const MUTED: Color = Color::from_rgb(0.6, 0.6, 0.65);

fn main() -> iced::Result {
    env_logger::init();
    iced::application(Dashboard::boot, Dashboard::update, Dashboard::view)
        .title(application_title)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Dashboard) -> String {
    "Circuit Chaos: F1 Unpredictability Index".into()
}

fn application_theme(_: &Dashboard) -> Theme {
    Theme::Dark
}

struct Dashboard {
    orchestrator: Orchestrator,
    /// Construction failure is kept so every request can fail through the normal path.
    gateway: Result<Arc<dyn ModelGateway>, String>,
    decoder: ResponseDecoder,
    search: String,
}

#[derive(Debug, Clone)]
pub enum Message {
    SearchChanged(String),
    SelectCircuit(&'static str),
    CompareAll,
    ShowMode(ViewMode),
    Resolved(Completion),
}

impl Dashboard {
    fn boot() -> (Self, Task<Message>) {
        let gateway = GeminiGateway::new(GatewayConfig::from_env())
            .map(|gateway| {
                info!("dashboard using model {}", gateway.model_name());
                Arc::new(gateway) as Arc<dyn ModelGateway>
            })
            .map_err(|err| {
                error!("model gateway unavailable: {err}");
                err.to_string()
            });
        let mut dashboard = Dashboard {
            orchestrator: Orchestrator::default(),
            gateway,
            decoder: ResponseDecoder::default(),
            search: String::new(),
        };
        let issued = dashboard.orchestrator.boot();
        let task = dashboard.dispatch(issued);
        (dashboard, task)
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::SearchChanged(query) => {
                state.search = query;
                Task::none()
            }
            Message::SelectCircuit(id) => {
                let issued = state.orchestrator.select(id);
                state.dispatch(issued)
            }
            Message::CompareAll => {
                let issued = state.orchestrator.request_comparison().map(Some);
                state.dispatch(issued)
            }
            Message::ShowMode(mode) => {
                let issued = state.orchestrator.show(mode);
                state.dispatch(issued)
            }
            Message::Resolved(completion) => {
                state.orchestrator.resolve(completion);
                Task::none()
            }
        }
    }

    fn dispatch(&self, issued: Result<Option<PendingRequest>, RequestError>) -> Task<Message> {
        let pending = match issued {
            Ok(Some(pending)) => pending,
            Ok(None) => return Task::none(),
            Err(err) => {
                error!("request not issued: {err}");
                return Task::none();
            }
        };

        match &self.gateway {
            Ok(gateway) => {
                let gateway = gateway.clone();
                let decoder = self.decoder;
                Task::perform(
                    async move { execute(gateway.as_ref(), decoder, pending).await },
                    Message::Resolved,
                )
            }
            Err(reason) => Task::done(Message::Resolved(Completion::failed(
                pending.ticket,
                GatewayError::Client(reason.clone()).into(),
            ))),
        }
    }

    /// Score shown on a catalog card, from whichever view knows the circuit.
    fn card_score(&self, circuit: &CircuitIdentity) -> Option<f64> {
        let single = self
            .orchestrator
            .single()
            .ready()
            .filter(|analysis| circuit.matches_key(&analysis.circuit_id))
            .and_then(CircuitAnalysis::score);
        single.or_else(|| {
            self.orchestrator
                .comparison()
                .ready()?
                .circuits
                .iter()
                .find(|analysis| circuit.matches_key(&analysis.circuit_id))
                .and_then(CircuitAnalysis::score)
        })
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let mut header = row![column![
            text("Circuit Chaos").size(30),
            text("AI-estimated race unpredictability across the calendar")
                .size(14)
                .color(MUTED),
        ]
        .spacing(4)
        .width(Length::Fill)]
        .align_y(Alignment::Center);
        if let Some(analysis) = hero_analysis(&state.orchestrator) {
            header = header.push(
                column![
                    text("Unpredictability Index").size(12).color(MUTED),
                    text(score_label(analysis.score())).size(40).color(ACCENT),
                ]
                .align_x(Alignment::End),
            );
        }

        let sidebar = column![
            text_input("Search circuits or countries", &state.search)
                .on_input(Message::SearchChanged)
                .padding(8),
            scrollable(state.circuit_cards()).height(Length::Fill),
            button("View Ranking")
                .on_press(Message::CompareAll)
                .padding(10)
                .width(Length::Fill),
        ]
        .spacing(10)
        .width(Length::Fixed(320.0));

        let visible = state.orchestrator.visible();
        let toggle = row![
            button("Circuit Analysis")
                .on_press_maybe((visible != ViewMode::Single).then_some(Message::ShowMode(ViewMode::Single)))
                .padding(8),
            button("Ranking")
                .on_press_maybe(
                    (visible != ViewMode::Comparison).then_some(Message::ShowMode(ViewMode::Comparison))
                )
                .padding(8),
        ]
        .spacing(8);

        let mut main = Column::new().spacing(14).push(toggle);
        if state.orchestrator.is_loading() {
            main = main.push(text("Analyzing telemetry...").size(16).color(MUTED));
        }
        if let Some(message) = state.orchestrator.visible_error() {
            main = main.push(
                Container::new(text(message.to_string()).color(ACCENT))
                    .padding(12)
                    .width(Length::Fill),
            );
        }
        match visible {
            ViewMode::Single => {
                if let Some(analysis) = state.orchestrator.single().ready() {
                    main = main.push(state.single_panel(analysis));
                }
            }
            ViewMode::Comparison => {
                if let Some(data) = state.orchestrator.comparison().ready() {
                    main = main.push(state.comparison_panel(data));
                }
            }
        }

        let layout = column![
            header,
            row![sidebar, scrollable(main.width(Length::Fill)).height(Length::Fill)]
                .spacing(20)
                .align_y(Alignment::Start),
        ]
        .spacing(20)
        .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn circuit_cards(&self) -> Column<'_, Message> {
        let selected = self.orchestrator.selected().map(|circuit| circuit.id);
        let circuits = filter_catalog(self.orchestrator.catalog(), &self.search);
        if circuits.is_empty() {
            return Column::new().push(text("No circuits match").size(12).color(MUTED));
        }
        circuits
            .into_iter()
            .fold(Column::new().spacing(6), |col, circuit| {
                let score = self.card_score(circuit);
                let marker = if selected == Some(circuit.id) { "● " } else { "" };
                let score_color = if is_hot(score) { ACCENT } else { MUTED };
                let card = row![
                    column![
                        text(format!("{marker}{}", circuit.name)).size(15),
                        text(format!("{}, {}", circuit.location, circuit.country))
                            .size(12)
                            .color(MUTED),
                        text(format!("{} km | {} corners", circuit.length_km, circuit.corners))
                            .size(11)
                            .color(MUTED),
                    ]
                    .spacing(2)
                    .width(Length::Fill),
                    text(score_label(score)).size(22).color(score_color),
                ]
                .align_y(Alignment::Center);
                col.push(
                    button(card)
                        .on_press(Message::SelectCircuit(circuit.id))
                        .padding(10)
                        .width(Length::Fill),
                )
            })
    }

    fn single_panel<'a>(&self, analysis: &'a CircuitAnalysis) -> Element<'a, Message> {
        let metrics = analysis.metrics.clone().unwrap_or_default();
        let name = self
            .orchestrator
            .catalog()
            .resolve(&analysis.circuit_id)
            .map(|circuit| circuit.name.to_string())
            .unwrap_or_else(|| analysis.circuit_id.clone());

        let tiles = [
            ("Weather", format_metric(metrics.weather_volatility, "%")),
            ("Safety Car / race", format_metric(metrics.safety_car_frequency, "")),
            ("Overtakes / race", format_metric(metrics.overtakes_per_race, "")),
            ("DNF rate", format_metric(metrics.dnf_rate, "%")),
            ("Strategy variance", format_metric(metrics.strategy_variance, "%")),
        ]
        .into_iter()
        .fold(row![].spacing(10), |row, (title, value)| {
            row.push(
                Container::new(column![text(title).size(11).color(MUTED), text(value).size(20)])
                    .padding(10)
                    .width(Length::Fill),
            )
        });

        let factors = analysis
            .top_contributing_factors
            .iter()
            .fold(Column::new().spacing(4), |col, factor| {
                col.push(text(format!("- {factor}")).size(13))
            });
        let triggers = analysis
            .recent_triggers
            .iter()
            .fold(Column::new().spacing(4), |col, trigger| {
                col.push(
                    column![
                        text(trigger.event.clone()).size(13),
                        text(trigger.impact.clone()).size(11).color(MUTED),
                    ]
                    .spacing(2),
                )
            });

        let radar = Canvas::new(RadarChart {
            axes: radar_axes(&metrics),
        })
        .width(Length::Fill)
        .height(Length::Fixed(260.0));
        let trend = Canvas::new(TrendChart {
            points: trend_series(&analysis.historical_trend),
        })
        .width(Length::Fill)
        .height(Length::Fixed(200.0));
        let deployments = Canvas::new(DeploymentBars {
            points: safety_car_series(&analysis.safety_car_trend),
        })
        .width(Length::Fill)
        .height(Length::Fixed(200.0));

        column![
            text(name).size(24),
            text(analysis.historical_context.as_str()).size(14),
            tiles,
            row![
                column![text("Key factors").size(16), factors]
                    .spacing(6)
                    .width(Length::Fill),
                column![text("Recent triggers").size(16), triggers]
                    .spacing(6)
                    .width(Length::Fill),
            ]
            .spacing(20),
            text("Chaos profile").size(16),
            radar,
            text("Volatility trend").size(16),
            trend,
            text("Safety car deployments").size(16),
            deployments,
        ]
        .spacing(12)
        .into()
    }

    fn comparison_panel<'a>(&self, data: &'a ComparisonData) -> Element<'a, Message> {
        let catalog = self.orchestrator.catalog();
        let ranking = ranked_entries(data, catalog).into_iter().fold(
            Column::new().spacing(6),
            |col, entry| {
                let score_color = if is_hot(entry.score()) { ACCENT } else { MUTED };
                col.push(
                    row![
                        text(format!("{:>2}", entry.position)).size(18).color(MUTED),
                        text(entry.display_name().to_string())
                            .size(15)
                            .width(Length::Fill),
                        text(score_label(entry.score())).size(18).color(score_color),
                    ]
                    .spacing(12)
                    .align_y(Alignment::Center),
                )
            },
        );
        let chart = Canvas::new(ComparisonChart {
            rows: comparison_rows(data, catalog),
        })
        .width(Length::Fill)
        .height(Length::Fixed(280.0));

        column![
            text("Unpredictability ranking").size(24),
            text(data.insight.as_str()).size(14),
            ranking,
            chart,
        ]
        .spacing(12)
        .into()
    }
}

/// Analysis behind the hero panel; hidden while the ranking is showing.
fn hero_analysis(orchestrator: &Orchestrator) -> Option<&CircuitAnalysis> {
    if orchestrator.visible() != ViewMode::Single {
        return None;
    }
    orchestrator.single().ready()
}
