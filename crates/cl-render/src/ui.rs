use cl_core::cie::rgb_to_lab;
use cl_core::color::Rgb;
use cl_core::config::MarkerKind;
use cl_core::frame::FrameBuffer;
use cl_geometry::marker::RenderAttributes;
use cl_mixer::Mixer;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::canvas;

/// Width of the parameter sidebar, in cells.
pub const SIDEBAR_WIDTH: u16 = 30;
/// Height of the spectrum panel, in cells.
pub const SPECTRUM_HEIGHT: u16 = 8;
const VALUE_BAR_WIDTH: u16 = 4;

/// Explorer state as far as drawing is concerned.
///
/// # Example
/// ```
/// use cl_render::ui::ExplorerState;
/// assert_eq!(ExplorerState::default(), ExplorerState::Running);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExplorerState {
    #[default]
    Running,
    /// Animations gelées.
    Paused,
    /// Overlay d'aide affiché.
    Help,
}

/// Everything one explorer frame shows.
pub struct ExplorerView<'a> {
    pub attributes: &'a RenderAttributes,
    pub kind: MarkerKind,
    pub mixer: &'a Mixer,
    pub lens: &'a FrameBuffer,
    pub spectrum: &'a FrameBuffer,
    pub fps: f64,
    pub state: ExplorerState,
    /// Last event worth showing (reload, export...).
    pub status: Option<&'a str>,
}

/// Inner rectangles of the panels, for pointer picking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExplorerAreas {
    pub preview: Rect,
    pub value_bar: Rect,
    pub lens: Rect,
    pub spectrum: Rect,
    pub sidebar: Rect,
}

fn term_color(c: Rgb) -> Color {
    let (r, g, b) = c.to_u8();
    Color::Rgb(r, g, b)
}

fn swatch(c: Rgb) -> Span<'static> {
    Span::styled("████", Style::default().fg(term_color(c)))
}

fn header(title: &str) -> Line<'static> {
    Line::from(Span::styled(title.to_string(), Style::default().fg(Color::Yellow)))
}

fn panel(title: &str) -> Block<'_> {
    Block::default().borders(Borders::ALL).title(title)
}

/// Split the terminal: [preview | value bar | lens] over the spectrum, sidebar on the right.
#[must_use]
pub fn layout(area: Rect) -> [Rect; 5] {
    let h = Layout::horizontal([Constraint::Min(20), Constraint::Length(SIDEBAR_WIDTH)]).split(area);
    let v = Layout::vertical([Constraint::Min(6), Constraint::Length(SPECTRUM_HEIGHT)]).split(h[0]);
    let top = Layout::horizontal([
        Constraint::Percentage(50),
        Constraint::Length(VALUE_BAR_WIDTH),
        Constraint::Min(0),
    ])
    .split(v[0]);
    [top[0], top[1], top[2], v[1], h[1]]
}

/// Draw the full explorer and return where each panel landed.
pub fn draw(frame: &mut Frame, view: &ExplorerView<'_>) -> ExplorerAreas {
    let area = frame.area();
    let [preview_outer, bar_outer, lens_outer, spectrum_outer, sidebar] = layout(area);
    let attrs = view.attributes;

    let preview_block = panel(" S × V ");
    let preview = preview_block.inner(preview_outer);
    frame.render_widget(preview_block, preview_outer);
    canvas::render_frame(frame.buffer_mut(), preview, &attrs.preview);
    draw_cursor(frame, preview, view);

    let bar_block = Block::default().borders(Borders::TOP | Borders::BOTTOM).title("V");
    let value_bar = bar_block.inner(bar_outer);
    frame.render_widget(bar_block, bar_outer);
    canvas::render_column(frame.buffer_mut(), value_bar, &attrs.value_bar);

    let lens_block = panel(" Lentille ").title_bottom(format!(" {} ", view.mixer.mode().name()));
    let lens = lens_block.inner(lens_outer);
    frame.render_widget(lens_block, lens_outer);
    canvas::render_frame(frame.buffer_mut(), lens, view.lens);

    let spectrum_block = Block::default().borders(Borders::TOP).title(" Spectre 380–700 nm ");
    let spectrum = spectrum_block.inner(spectrum_outer);
    frame.render_widget(spectrum_block, spectrum_outer);
    canvas::render_frame(frame.buffer_mut(), spectrum, view.spectrum);

    draw_sidebar(frame, sidebar, view);

    if view.state == ExplorerState::Help {
        draw_help_overlay(frame, area);
    }

    ExplorerAreas {
        preview,
        value_bar,
        lens,
        spectrum,
        sidebar,
    }
}

/// Crosshair at the marker's (saturation, value) on the preview.
fn draw_cursor(frame: &mut Frame, preview: Rect, view: &ExplorerView<'_>) {
    let fb = &view.attributes.preview;
    let state = view.attributes.state;
    let x = state.radius_fraction() * f64::from(fb.width.saturating_sub(1));
    let y = (1.0 - state.value()) * f64::from(fb.height.saturating_sub(1));
    if let Some((col, row)) = canvas::pixel_to_cell(preview, fb.width, fb.height, x, y) {
        let ink = if state.value() > 0.5 { Color::Black } else { Color::White };
        if let Some(cell) = frame.buffer_mut().cell_mut((col, row)) {
            cell.set_char('┼').set_fg(ink);
        }
    }
}

fn draw_sidebar(frame: &mut Frame, area: Rect, view: &ExplorerView<'_>) {
    let attrs = view.attributes;
    let state = attrs.state;
    let mix = view.mixer.result();

    let state_str = match view.state {
        ExplorerState::Running => "▶ RUN",
        ExplorerState::Paused => "⏸ PAUSE",
        ExplorerState::Help => "? HELP",
    };

    let mut lines = vec![
        Line::from(Span::styled(state_str, Style::default().fg(Color::Green))),
        Line::from(""),
        header("─ Marqueur ─────"),
        Line::from(format!(" Teinte : {:5.1}°", state.hue_deg())),
        Line::from(format!(" Valeur : {:.2}", state.value())),
        Line::from(format!(" Rayon  : {:.2}", state.radius_fraction())),
        Line::from(format!(" Forme  : {}", view.kind.name())),
        Line::from(vec![Span::raw(" "), swatch(attrs.selected_color), Span::raw(format!(" {}", attrs.selected_color.to_hex()))]),
        Line::from(format!(" {}", attrs.selected_color.css_rgb())),
        Line::from(format!(" {}", rgb_to_lab(attrs.selected_color).notation())),
        Line::from(vec![Span::raw(" "), swatch(attrs.marker_color), Span::raw(" teinte pure")]),
        Line::from(""),
        header("─ Mélange ──────"),
        Line::from(format!(" Mode : {}", mix.mode.name())),
        Line::from(vec![Span::raw(" A "), swatch(view.mixer.color_a()), Span::raw(format!(" {}", mix.color_a))]),
        Line::from(vec![Span::raw(" B "), swatch(view.mixer.color_b()), Span::raw(format!(" {}", mix.color_b))]),
        Line::from(vec![
            Span::raw(" = "),
            swatch(mix.mixed),
            Span::styled(format!(" {}", mix.hex), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(format!(" {}", mix.rgb)),
        Line::from(format!(" {}", mix.cmy)),
        Line::from(format!(" {}", mix.lab)),
        Line::from(""),
        header("─ Info ─────────"),
        Line::from(format!(" {:.0} FPS", view.fps)),
    ];
    if let Some(status) = view.status {
        lines.push(Line::from(Span::styled(format!(" {status}"), Style::default().fg(Color::Cyan))));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" ? = aide", Style::default().fg(Color::DarkGray))));

    let sidebar = Paragraph::new(lines).block(Block::default().borders(Borders::LEFT).title(" chromalab "));
    frame.render_widget(sidebar, area);
}

fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(" chromalab : Commandes ", Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from(" q/Esc    Quitter"),
        Line::from(" Space    Pause"),
        Line::from(" ←/→      Teinte ±"),
        Line::from(" ↑/↓      Valeur ±"),
        Line::from(" [/]      Rayon ±"),
        Line::from(" Clic     Choisir S × V"),
        Line::from(" k        Forme du marqueur"),
        Line::from(" m        Mode de mélange"),
        Line::from(" a/b      Sélection → A/B"),
        Line::from(" s        Échanger A et B"),
        Line::from(" ?        Aide"),
        Line::from(""),
        Line::from(Span::styled(" ? ou Esc pour fermer ", Style::default().fg(Color::DarkGray))),
    ];

    let help_width = 34u16.min(area.width);
    let help_height = (help_text.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(help_width) / 2;
    let y = area.y + area.height.saturating_sub(help_height) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Aide ")
            .style(Style::default().bg(Color::Black).fg(Color::White)),
    );
    frame.render_widget(Clear, help_area);
    frame.render_widget(help, help_area);
}
