use std::path::{Path, PathBuf};

use anyhow::Context as _;
use ggez::event::{EventHandler, MouseButton};
use ggez::glam::Vec2;
use ggez::graphics::{self, Color, DrawMode, DrawParam, Mesh, Rect, Text, TextAlign, TextLayout};
use ggez::input::keyboard::{KeyCode, KeyInput, KeyMods};
use ggez::{Context, GameResult};
use log::{error, info, warn};

use graph_editor::config::{EditorConfig, Rgb};
use graph_editor::format::{has_graph_extension, with_graph_extension};
use graph_editor::input::{self, InputEvent, Key, Overlay, PointerButton};
use graph_editor::{Editor, Mode};

const BUTTON_SIZE: f32 = 64.0;
const BUTTON_GAP: f32 = 16.0;
const BAR_MARGIN: f32 = 30.0;

fn color(rgb: Rgb) -> Color {
    Color::from_rgb(rgb.r, rgb.g, rgb.b)
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        _ => None,
    }
}

// --- Mode Bar ---

/// Row of mode buttons along the bottom-left corner.
struct ModeBar {
    buttons: Vec<(Mode, Rect)>,
}

impl ModeBar {
    fn new(window_height: f32) -> Self {
        let y = window_height - BAR_MARGIN - BUTTON_SIZE;
        let buttons = Mode::ALL
            .iter()
            .enumerate()
            .map(|(i, &mode)| {
                let x = BAR_MARGIN + i as f32 * (BUTTON_SIZE + BUTTON_GAP);
                (mode, Rect::new(x, y, BUTTON_SIZE, BUTTON_SIZE))
            })
            .collect();
        Self { buttons }
    }

    fn draw(&self, ctx: &mut Context, canvas: &mut graphics::Canvas, active: Mode) -> GameResult {
        for &(mode, rect) in &self.buttons {
            let fill = if mode == active {
                Color::from_rgb(70, 110, 200)
            } else {
                Color::from_rgb(200, 200, 200)
            };
            let mesh = Mesh::new_rectangle(ctx, DrawMode::fill(), rect, fill)?;
            canvas.draw(&mesh, DrawParam::default());

            let mut caption = Text::new(mode.to_string());
            caption.set_scale(14.0);
            caption.set_layout(TextLayout {
                h_align: TextAlign::Middle,
                v_align: TextAlign::Middle,
            });
            canvas.draw(
                &caption,
                DrawParam::default()
                    .dest(Vec2::new(rect.x + rect.w / 2.0, rect.y + rect.h / 2.0))
                    .color(Color::BLACK),
            );
        }
        Ok(())
    }
}

impl Overlay for ModeBar {
    fn process(&mut self, event: &InputEvent, editor: &mut Editor) -> bool {
        let InputEvent::PointerDown {
            pos,
            button: PointerButton::Primary,
        } = *event
        else {
            return false;
        };
        match self.buttons.iter().find(|(_, rect)| rect.contains(pos)) {
            Some(&(mode, _)) => {
                editor.change_state(mode);
                true
            }
            None => false,
        }
    }
}

// --- AppState Struct ---

pub struct AppState {
    config: EditorConfig,
    editor: Editor,
    mode_bar: ModeBar,
}

impl AppState {
    pub fn new(_ctx: &mut Context, config: EditorConfig) -> GameResult<AppState> {
        Ok(AppState {
            editor: Editor::new(&config),
            mode_bar: ModeBar::new(config.window.height),
            config,
        })
    }

    fn dispatch(&mut self, event: InputEvent) {
        input::route(&event, &mut self.mode_bar, &mut self.editor);
    }

    fn diagram_path(&self) -> PathBuf {
        PathBuf::from(&self.config.file.diagram_path)
    }

    fn save_diagram(&self) -> anyhow::Result<PathBuf> {
        let path = with_graph_extension(&self.diagram_path(), &self.config.file.extension);
        self.editor
            .save(&path)
            .with_context(|| format!("saving {}", path.display()))?;
        Ok(path)
    }

    fn load_diagram(&mut self, path: &Path) {
        if !has_graph_extension(path, &self.config.file.extension) {
            warn!(
                "{} does not end in {}; trying to load it anyway",
                path.display(),
                self.config.file.extension
            );
        }
        match self.editor.load(path) {
            Ok(()) => info!("opened {}", path.display()),
            Err(e) => {
                let (title, body) = e.user_message();
                error!("{title} {body}");
            }
        }
    }

    fn draw_graph(&self, ctx: &mut Context, canvas: &mut graphics::Canvas) -> GameResult {
        let theme = &self.config.theme;
        let sizes = self.editor.graph_config();
        let edge_color = color(theme.edge);
        let vertex_color = color(theme.vertex);

        let rubber_band = self.editor.rubber_band();
        for (a, b) in self.editor.graph().edge_segments().chain(rubber_band) {
            // Zero-length lines do not tessellate.
            if a == b {
                continue;
            }
            let line = Mesh::new_line(ctx, &[a, b], sizes.edge_thickness, edge_color)?;
            canvas.draw(&line, DrawParam::default());
        }

        let selected = self.editor.selected();
        for (idx, vertex) in self.editor.graph().vertices().iter().enumerate() {
            let pos = vertex.visual_position();
            let radius = if selected == Some(idx) {
                sizes.selected_radius()
            } else {
                sizes.vertex_radius
            };
            let circle = Mesh::new_circle(ctx, DrawMode::fill(), pos, radius, 0.1, vertex_color)?;
            canvas.draw(&circle, DrawParam::default());

            if !vertex.label().is_empty() {
                let mut label = Text::new(vertex.label());
                label.set_scale(theme.label_size);
                label.set_layout(TextLayout {
                    h_align: TextAlign::Middle,
                    v_align: TextAlign::End,
                });
                canvas.draw(
                    &label,
                    DrawParam::default()
                        .dest(pos - Vec2::new(0.0, sizes.vertex_radius * 1.5))
                        .color(vertex_color),
                );
            }
        }
        Ok(())
    }
}

// --- EventHandler Implementation ---

impl EventHandler<ggez::GameError> for AppState {
    fn update(&mut self, _ctx: &mut Context) -> GameResult {
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult {
        let mut canvas = graphics::Canvas::from_frame(ctx, color(self.config.theme.background));

        self.draw_graph(ctx, &mut canvas)?;
        self.mode_bar.draw(ctx, &mut canvas, self.editor.mode())?;

        canvas.finish(ctx)?;
        Ok(())
    }

    fn mouse_button_down_event(
        &mut self,
        _ctx: &mut Context,
        button: MouseButton,
        x: f32,
        y: f32,
    ) -> GameResult {
        if let Some(button) = pointer_button(button) {
            self.dispatch(InputEvent::PointerDown {
                pos: Vec2::new(x, y),
                button,
            });
        }
        Ok(())
    }

    fn mouse_button_up_event(
        &mut self,
        _ctx: &mut Context,
        button: MouseButton,
        x: f32,
        y: f32,
    ) -> GameResult {
        if let Some(button) = pointer_button(button) {
            self.dispatch(InputEvent::PointerUp {
                pos: Vec2::new(x, y),
                button,
            });
        }
        Ok(())
    }

    fn mouse_motion_event(
        &mut self,
        ctx: &mut Context,
        x: f32,
        y: f32,
        dx: f32,
        dy: f32,
    ) -> GameResult {
        self.dispatch(InputEvent::PointerMove {
            pos: Vec2::new(x, y),
            delta: Vec2::new(dx, dy),
            primary_held: ctx.mouse.button_pressed(MouseButton::Left),
        });
        Ok(())
    }

    fn mouse_wheel_event(&mut self, ctx: &mut Context, _x: f32, y: f32) -> GameResult {
        let pos = ctx.mouse.position();
        self.dispatch(InputEvent::Wheel {
            pos: Vec2::new(pos.x, pos.y),
            delta: y,
            dt: ctx.time.delta().as_secs_f32(),
        });
        Ok(())
    }

    fn key_down_event(&mut self, _ctx: &mut Context, input: KeyInput, _repeated: bool) -> GameResult {
        let Some(keycode) = input.keycode else {
            return Ok(());
        };
        let ctrl = input.mods.contains(KeyMods::CTRL);
        match keycode {
            KeyCode::F1 => self.editor.change_state(Mode::Vertex),
            KeyCode::F2 => self.editor.change_state(Mode::Edge),
            KeyCode::F3 => self.editor.change_state(Mode::Text),
            KeyCode::F4 => self.editor.change_state(Mode::Navigation),
            KeyCode::S if ctrl => match self.save_diagram() {
                Ok(path) => info!("saved {}", path.display()),
                Err(e) => error!("{e:#}"),
            },
            KeyCode::O if ctrl => {
                let path = self.diagram_path();
                self.load_diagram(&path);
            }
            KeyCode::Back => self.dispatch(InputEvent::Key {
                key: Key::Backspace,
                text: None,
            }),
            KeyCode::Return | KeyCode::NumpadEnter => self.dispatch(InputEvent::Key {
                key: Key::Enter,
                text: None,
            }),
            _ => {}
        }
        Ok(())
    }

    fn text_input_event(&mut self, _ctx: &mut Context, character: char) -> GameResult {
        self.dispatch(InputEvent::Key {
            key: Key::Other,
            text: Some(character),
        });
        Ok(())
    }
}
