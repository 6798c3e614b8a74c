use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use arc_swap::ArcSwap;
use cl_core::config::{LabConfig, MarkerKind};
use cl_core::frame::FrameBuffer;
use cl_core::traits::Animation;
use cl_geometry::marker::{MarkerLayout, MarkerState, RenderAttributes, pick_from_preview, recompute_frame};
use cl_mixer::{Lens, Mixer};
use cl_plot::SpectrumPlot;
use cl_render::canvas::cell_to_pixel;
use cl_render::clock::{FrameClock, frame_budget};
use cl_render::ui::{self, ExplorerAreas, ExplorerState, ExplorerView};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::DefaultTerminal;

/// Explorateur interactif : marqueur HSV, mélangeur et spectre.
pub struct App {
    pub state: ExplorerState,
    quitting: bool,
    /// Config courante (remplacée par le watcher).
    pub config: Arc<ArcSwap<LabConfig>>,
    /// Dernière config appliquée, pour détecter un rechargement.
    applied: Arc<LabConfig>,
    pub marker: MarkerState,
    layout: MarkerLayout,
    pub kind: MarkerKind,
    pub mixer: Mixer,
    lens: Lens,
    lens_fb: FrameBuffer,
    spectrum: SpectrumPlot,
    spectrum_fb: FrameBuffer,
    attributes: RenderAttributes,
    clock: FrameClock,
    areas: ExplorerAreas,
    status: Option<String>,
}

fn build_lens(mixer: &Mixer, cfg: &LabConfig) -> (Lens, FrameBuffer) {
    let m = &cfg.mixer;
    (
        Lens::for_mixer(mixer, m.lens_size, m.molecule_count as usize, m.seed),
        FrameBuffer::new(m.lens_size, m.lens_size),
    )
}

fn build_spectrum(cfg: &LabConfig) -> (SpectrumPlot, FrameBuffer) {
    let plot = SpectrumPlot::from_config(&cfg.spectrum);
    let fb = FrameBuffer::new(plot.layout.width, plot.height);
    (plot, fb)
}

impl App {
    /// Build the explorer from the current config.
    ///
    /// # Errors
    /// Returns an error if a configured mixer color is invalid.
    pub fn new(config: Arc<ArcSwap<LabConfig>>) -> Result<Self> {
        let cfg = config.load_full();
        let marker = MarkerState::from_config(&cfg.marker);
        let layout = MarkerLayout::from_config(&cfg.geometry, &cfg.marker);
        let kind = cfg.marker.kind;
        let mixer = Mixer::from_config(&cfg.mixer)?;
        let (lens, lens_fb) = build_lens(&mixer, &cfg);
        let (spectrum, spectrum_fb) = build_spectrum(&cfg);

        Ok(Self {
            state: ExplorerState::Running,
            quitting: false,
            attributes: recompute_frame(&marker, &layout, kind),
            config,
            applied: cfg,
            marker,
            layout,
            kind,
            mixer,
            lens,
            lens_fb,
            spectrum,
            spectrum_fb,
            clock: FrameClock::new(60),
            areas: ExplorerAreas::default(),
            status: None,
        })
    }

    #[must_use]
    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    /// Main loop: events, animation, drawing, paced to `explorer.target_fps`.
    ///
    /// # Errors
    /// Returns an error if terminal I/O fails.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let mut last_frame = Instant::now();

        loop {
            if self.is_quitting() {
                break;
            }

            let budget = frame_budget(self.config.load().explorer.target_fps);
            let elapsed = last_frame.elapsed();
            if elapsed < budget {
                // Dormir le temps restant, mais rester réactif aux événements
                if event::poll(budget.saturating_sub(elapsed))? {
                    self.handle_event(&event::read()?);
                }
                continue;
            }
            last_frame = Instant::now();

            while event::poll(Duration::ZERO)? {
                self.handle_event(&event::read()?);
            }

            self.apply_config_if_changed();
            let dt = self.clock.tick();
            self.update(dt);
            self.draw(&mut terminal)?;
        }
        Ok(())
    }

    /// Pick up a config swapped in by the watcher. Marker and mixer inputs are kept.
    pub fn apply_config_if_changed(&mut self) {
        let current = self.config.load_full();
        if Arc::ptr_eq(&current, &self.applied) {
            return;
        }
        self.layout = MarkerLayout::from_config(&current.geometry, &current.marker);
        self.mixer = self.mixer.with_tuning(current.mix_tuning());
        (self.lens, self.lens_fb) = build_lens(&self.mixer, &current);
        (self.spectrum, self.spectrum_fb) = build_spectrum(&current);
        self.applied = current;
        self.status = Some("config rechargée".into());
        log::debug!("explorateur : nouvelle config appliquée");
    }

    /// Advance animations by `dt` reference frames and recompute every marker-dependent element.
    pub fn update(&mut self, dt: f64) {
        if self.state == ExplorerState::Running {
            self.lens.step(dt);
            self.spectrum.step(dt);
        }
        self.attributes = recompute_frame(&self.marker, &self.layout, self.kind);
        self.lens.render(&mut self.lens_fb);
        self.spectrum.render(&mut self.spectrum_fb);
    }

    fn draw(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let view = ExplorerView {
            attributes: &self.attributes,
            kind: self.kind,
            mixer: &self.mixer,
            lens: &self.lens_fb,
            spectrum: &self.spectrum_fb,
            fps: self.clock.fps(),
            state: self.state,
            status: self.status.as_deref(),
        };
        let mut areas = self.areas;
        terminal.draw(|frame| {
            areas = ui::draw(frame, &view);
        })?;
        self.areas = areas;
        Ok(())
    }

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) => self.handle_key(*key),
            Event::Mouse(mouse) => self.handle_mouse(*mouse),
            _ => {}
        }
    }

    fn rebuild_lens(&mut self) {
        let cfg = self.config.load();
        (self.lens, self.lens_fb) = build_lens(&self.mixer, &cfg);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.state == ExplorerState::Help {
            match key.code {
                KeyCode::Char('q') => self.quitting = true,
                KeyCode::Char('?') | KeyCode::Esc => self.state = ExplorerState::Running,
                _ => {}
            }
            return;
        }

        let (hue_step, value_step) = {
            let cfg = self.config.load();
            (cfg.explorer.hue_step, cfg.explorer.value_step)
        };
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quitting = true,
            KeyCode::Char('?') => self.state = ExplorerState::Help,
            KeyCode::Char(' ') => {
                self.state = match self.state {
                    ExplorerState::Paused => ExplorerState::Running,
                    _ => ExplorerState::Paused,
                };
            }
            KeyCode::Left => self.marker.nudge_hue(-hue_step),
            KeyCode::Right => self.marker.nudge_hue(hue_step),
            KeyCode::Up => self.marker.nudge_value(value_step),
            KeyCode::Down => self.marker.nudge_value(-value_step),
            KeyCode::Char('[') => self.marker.nudge_radius(-value_step),
            KeyCode::Char(']') => self.marker.nudge_radius(value_step),
            KeyCode::Char('k') => self.kind = self.kind.next(),
            KeyCode::Char('m') => {
                self.mixer.cycle_mode();
                self.rebuild_lens();
                log::debug!("mode de mélange : {}", self.mixer.mode());
            }
            KeyCode::Char('s') => {
                self.mixer.swap();
                self.lens.sync(&self.mixer);
            }
            KeyCode::Char('a') => {
                self.mixer.set_color_a(self.marker.selected_color());
                self.lens.sync(&self.mixer);
            }
            KeyCode::Char('b') => {
                self.mixer.set_color_b(self.marker.selected_color());
                self.lens.sync(&self.mixer);
            }
            _ => {}
        }
    }

    /// Clic ou glisser : choisir saturation × valeur dans l'aperçu, ou la valeur sur la barre.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(
            mouse.kind,
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left)
        ) {
            return;
        }
        let preview = &self.attributes.preview;
        if let Some((x, y)) = cell_to_pixel(self.areas.preview, preview.width, preview.height, mouse.column, mouse.row) {
            let (s, v) = pick_from_preview(x, y, preview.width);
            self.marker.set(self.marker.hue_deg(), v, s);
        } else if let Some((_, y)) = cell_to_pixel(self.areas.value_bar, 1, 1, mouse.column, mouse.row) {
            self.marker.set(self.marker.hue_deg(), 1.0 - y, self.marker.radius_fraction());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cl_core::color::Rgb;
    use cl_core::config::MixMode;
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;

    fn app() -> App {
        App::new(Arc::new(ArcSwap::from_pointee(LabConfig::default()))).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn click(app: &mut App, column: u16, row: u16) {
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    #[test]
    fn arrows_move_the_marker() {
        let mut app = app();
        press(&mut app, KeyCode::Left);
        assert_eq!(app.marker.hue_deg(), 355.0);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert!((app.marker.value() - 0.9).abs() < 1e-9);
        press(&mut app, KeyCode::Char('['));
        assert!((app.marker.radius_fraction() - 0.95).abs() < 1e-9);
        app.update(1.0);
        assert_eq!(app.attributes.state, app.marker);
    }

    #[test]
    fn selection_feeds_the_mixer() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        for _ in 0..23 {
            press(&mut app, KeyCode::Right);
        }
        // 24 × 5° = 120°: pure green.
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mixer.color_a(), Rgb::GREEN);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.mixer.color_b(), Rgb::GREEN);
    }

    #[test]
    fn mode_key_switches_lens() {
        let mut app = app();
        assert_eq!(app.lens.name(), "waves");
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.mixer.mode(), MixMode::Subtractive);
        assert_eq!(app.lens.name(), "molecules");
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.kind, MarkerKind::Plane);
    }

    #[test]
    fn help_and_pause_states() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.state, ExplorerState::Help);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.marker.hue_deg(), 0.0);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, ExplorerState::Running);
        assert!(!app.is_quitting());

        press(&mut app, KeyCode::Char(' '));
        let phase = app.spectrum.phase();
        app.update(10.0);
        assert_eq!(app.spectrum.phase(), phase);
        press(&mut app, KeyCode::Char(' '));
        app.update(10.0);
        assert!(app.spectrum.phase() > phase);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.is_quitting());
    }

    #[test]
    fn click_on_preview_picks_saturation_and_value() {
        let mut app = app();
        app.areas.preview = Rect::new(0, 0, 32, 16);
        app.areas.value_bar = Rect::new(32, 0, 2, 16);
        click(&mut app, 0, 15);
        // Bottom-left cell: almost no saturation, almost no value.
        let radius = app.marker.radius_fraction();
        assert!(radius < 0.05);
        assert!(app.marker.value() < 0.05);

        click(&mut app, 33, 0);
        assert!((app.marker.value() - (1.0 - 0.5 / 16.0)).abs() < 1e-9);
        assert_eq!(app.marker.radius_fraction(), radius);

        click(&mut app, 50, 50);
        assert!((app.marker.value() - (1.0 - 0.5 / 16.0)).abs() < 1e-9);
    }

    #[test]
    fn swapped_config_is_applied_once() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        let mut cfg = LabConfig::default();
        cfg.geometry.radius = 3.0;
        cfg.mixer.lens_size = 64;
        app.config.store(Arc::new(cfg));
        app.apply_config_if_changed();
        assert_eq!(app.layout.radius, 3.0);
        assert_eq!(app.lens_fb.width, 64);
        assert_eq!(app.status.as_deref(), Some("config rechargée"));
        // User state survives the reload.
        assert_eq!(app.marker.hue_deg(), 5.0);

        app.status = None;
        app.apply_config_if_changed();
        assert!(app.status.is_none());
    }
}
