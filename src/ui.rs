pub mod charting;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget},
};
use typtea::session::CharState;
use unicode_width::UnicodeWidthStr;

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Typing => render_typing(self, area, buf),
            AppState::Results => render_results(self, area, buf),
        }
    }
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let underlined_dim_bold_style = Style::default()
        .patch(dim_bold_style)
        .add_modifier(Modifier::UNDERLINED);

    let view = session.display_lines();
    let text_lines = view.len() as u16;
    // timer, gap, text
    let block_height = text_lines + 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(area.height.saturating_sub(block_height) / 2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(text_lines),
            Constraint::Min(0),
        ])
        .split(area);

    // +1 leaves room for the end-of-line cursor
    let widest = view.iter().map(|l| l.width()).max().unwrap_or(0) as u16 + 1;
    let [text_area] = Layout::horizontal([Constraint::Length(widest)])
        .flex(Flex::Center)
        .areas(chunks[3]);
    let [timer_area] = Layout::horizontal([Constraint::Length(widest)])
        .flex(Flex::Center)
        .areas(chunks[1]);

    let lines: Vec<Line> = view
        .iter()
        .enumerate()
        .map(|(row, text)| {
            let mut spans: Vec<Span> = text
                .chars()
                .enumerate()
                .map(|(col, c)| match session.char_state(row, col) {
                    CharState::Typed => Span::styled(c.to_string(), green_bold_style),
                    CharState::Mistyped => Span::styled(
                        match c {
                            ' ' => "·".to_owned(),
                            c => c.to_string(),
                        },
                        red_bold_style,
                    ),
                    CharState::Current => Span::styled(c.to_string(), underlined_dim_bold_style),
                    CharState::Pending => Span::styled(c.to_string(), dim_bold_style),
                })
                .collect();

            if row == 0 && session.cursor_pos() == text.chars().count() {
                spans.push(Span::styled(" ", underlined_dim_bold_style));
            }
            Line::from(spans)
        })
        .collect();

    Paragraph::new(lines).render(text_area, buf);

    let remaining = session.remaining_time().as_secs_f64().ceil();
    Paragraph::new(Span::styled(
        format!("{remaining:.0}"),
        Style::default().fg(Color::LightBlue).patch(bold_style),
    ))
    .render(timer_area, buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let stats = &app.final_stats;
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let label_style = Style::default().add_modifier(Modifier::DIM);
    let value_style = Style::default().patch(bold_style).fg(Color::Yellow);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let magenta_style = Style::default().fg(Color::Magenta);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // chart
            Constraint::Length(1), // labels
            Constraint::Length(1), // values
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let series = app.session.wpm_series();
    let (overall_duration, highest_wpm) =
        charting::compute_chart_params(series, app.session.config().duration_secs as f64);
    let tuples = series.as_tuples();
    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(magenta_style)
        .graph_type(GraphType::Line)
        .data(&tuples)];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([1.0, overall_duration])
                .labels(vec![
                    Span::styled("1", bold_style),
                    Span::styled(charting::format_label(overall_duration), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(charting::format_label(highest_wpm), bold_style),
                ]),
        )
        .render(chunks[0], buf);

    let cells = [
        ("acc", format!("{:.0}%", stats.accuracy)),
        ("wpm", format!("{:.0}", stats.wpm)),
        ("time", format!("{:.0}s", stats.elapsed.as_secs_f64())),
        ("lang", app.session.language().to_string()),
    ];
    let columns = Layout::horizontal([Constraint::Length(10); 4])
        .flex(Flex::Center)
        .split(chunks[1]);
    let value_columns = Layout::horizontal([Constraint::Length(10); 4])
        .flex(Flex::Center)
        .split(chunks[2]);

    for (i, (label, value)) in cells.iter().enumerate() {
        Paragraph::new(Span::styled(*label, label_style))
            .alignment(Alignment::Center)
            .render(columns[i], buf);
        Paragraph::new(Span::styled(value.as_str(), value_style))
            .alignment(Alignment::Center)
            .render(value_columns[i], buf);
    }

    Paragraph::new(Span::styled(
        "(enter) restart / (esc)ape",
        italic_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);
}
