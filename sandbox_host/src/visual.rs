use ggez::event::{self, EventHandler};
use ggez::glam::Vec2 as GVec2;
use ggez::graphics::{self, Color, DrawMode, DrawParam, Mesh, Rect};
use ggez::input::keyboard::{KeyCode, KeyInput};
use ggez::{Context, GameResult};
use log::debug;
use physics_sandbox::sandbox::{HalfSpacePose, ProjectileColor};
use physics_sandbox::*;

// Held-key adjustment rates, per second
const ANGLE_RATE: f64 = 60.0;
const SPEED_RATE: f64 = 200.0;
const GRAVITY_RATE: f64 = 200.0;
const ROTATION_RATE: f64 = 90.0;
const MASS_RATE: f64 = 5.0;

const HALF_SPACE_DRAW_LENGTH: f64 = 2000.0;
const UI_MARGIN: f32 = 10.0;

fn to_screen(v: Vec2) -> GVec2 {
    GVec2::new(v.x as f32, v.y as f32)
}

fn projectile_color(color: Option<ProjectileColor>) -> Color {
    match color {
        Some(ProjectileColor::Green) => Color::GREEN,
        Some(ProjectileColor::Red) => Color::RED,
        Some(ProjectileColor::Blue) => Color::BLUE,
        Some(ProjectileColor::Yellow) => Color::YELLOW,
        None => Color::WHITE,
    }
}

struct MainState {
    sandbox: Sandbox,
    target_fps: u32,
    /// Key presses since the last tick
    pending: SandboxInput,
}

impl MainState {
    fn new(_ctx: &mut Context, config: &SandboxConfig) -> GameResult<MainState> {
        let sandbox = Sandbox::from_config(config)
            .map_err(|e| ggez::GameError::CustomError(e.to_string()))?;
        Ok(MainState {
            sandbox,
            target_fps: config.target_fps,
            pending: SandboxInput::default(),
        })
    }

    /// Combines queued key presses with the keys currently held.
    fn gather_input(&mut self, ctx: &Context) -> SandboxInput {
        let mut input = std::mem::take(&mut self.pending);
        let dt = self.sandbox.world().dt();
        let held = |key| ctx.keyboard.is_key_pressed(key);
        let axis = |neg, pos| match (held(neg), held(pos)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };

        input.nudge = Vec2::new(axis(KeyCode::A, KeyCode::D), axis(KeyCode::W, KeyCode::S));
        input.clear = held(KeyCode::Back);

        let launch = self.sandbox.launch();
        let angle = axis(KeyCode::Right, KeyCode::Left);
        if angle != 0.0 {
            input.angle_degrees = Some(launch.angle_degrees() + angle * ANGLE_RATE * dt);
        }
        let speed = axis(KeyCode::Down, KeyCode::Up);
        if speed != 0.0 {
            input.speed = Some(launch.speed() + speed * SPEED_RATE * dt);
        }
        let mass = axis(KeyCode::LBracket, KeyCode::RBracket);
        if mass != 0.0 {
            input.spawn_mass = Some(launch.spawn_mass() + mass * MASS_RATE * dt);
        }
        let gravity = axis(KeyCode::PageDown, KeyCode::PageUp);
        if gravity != 0.0 {
            input.gravity_y = Some(self.sandbox.gravity().y + gravity * GRAVITY_RATE * dt);
        }
        let rotation = axis(KeyCode::Q, KeyCode::E);
        if rotation != 0.0 {
            if let Some(pose) = self.sandbox.half_space_pose() {
                input.half_space_pose = Some(HalfSpacePose {
                    position: pose.position,
                    rotation_degrees: pose.rotation_degrees + rotation * ROTATION_RATE * dt,
                });
            }
        }
        input
    }

    fn draw_body(&self, ctx: &mut Context, canvas: &mut graphics::Canvas, view: &BodyView) -> GameResult {
        let center = to_screen(view.position);
        match view.shape {
            ShapeView::Circle { radius } => {
                let mesh = Mesh::new_circle(
                    ctx,
                    DrawMode::fill(),
                    GVec2::new(0.0, 0.0),
                    radius as f32,
                    0.1,
                    projectile_color(view.color),
                )?;
                canvas.draw(&mesh, DrawParam::new().dest(center));
            }
            ShapeView::Block { half_extents } => {
                let rect = Rect::new(
                    (view.position.x - half_extents.x) as f32,
                    (view.position.y - half_extents.y) as f32,
                    (half_extents.x * 2.0) as f32,
                    (half_extents.y * 2.0) as f32,
                );
                let color = if view.is_static {
                    Color::from_rgb(110, 80, 50)
                } else {
                    projectile_color(view.color)
                };
                let mesh = Mesh::new_rectangle(ctx, DrawMode::fill(), rect, color)?;
                canvas.draw(&mesh, DrawParam::default());
            }
            ShapeView::HalfSpace { normal, .. } => {
                let along = normal.rotate_degrees(90.0) * HALF_SPACE_DRAW_LENGTH;
                let surface = Mesh::new_line(
                    ctx,
                    &[to_screen(view.position - along), to_screen(view.position + along)],
                    1.0,
                    Color::RED,
                )?;
                canvas.draw(&surface, DrawParam::default());

                let normal_line = Mesh::new_line(
                    ctx,
                    &[center, to_screen(view.position + normal * 30.0)],
                    1.0,
                    Color::RED,
                )?;
                canvas.draw(&normal_line, DrawParam::default());

                let anchor = Mesh::new_circle(ctx, DrawMode::fill(), center, 8.0, 0.5, Color::RED)?;
                canvas.draw(&anchor, DrawParam::default());
            }
        }

        if view.is_static {
            return Ok(());
        }

        // Force arrows: net force (pink), weight (purple)
        for (force, width, color) in [
            (view.net_force, 3.0, Color::from_rgb(255, 109, 194)),
            (view.gravity_force, 2.0, Color::from_rgb(200, 122, 255)),
        ] {
            if force.length_squared() > 1e-6 {
                let line = Mesh::new_line(ctx, &[center, to_screen(view.position + force)], width, color)?;
                canvas.draw(&line, DrawParam::default());
            }
        }

        if let Some(label) = view.label() {
            let mut text = graphics::Text::new(label);
            text.set_scale(16.0);
            canvas.draw(&text, DrawParam::new().dest(center).color(Color::BLACK));
        }
        Ok(())
    }

    fn draw_hud(&self, ctx: &mut Context, canvas: &mut graphics::Canvas) -> GameResult {
        let launch = self.sandbox.launch();

        // Aim line: launch point plus one second of launch velocity
        let origin = to_screen(launch.position);
        let tip = to_screen(launch.position + launch.launch_velocity());
        if origin != tip {
            let aim = Mesh::new_line(ctx, &[origin, tip], 7.0, Color::RED)?;
            canvas.draw(&aim, DrawParam::default());
        }
        let marker = Mesh::new_circle(ctx, DrawMode::fill(), origin, 10.0, 0.5, Color::RED)?;
        canvas.draw(&marker, DrawParam::default());

        let lines = [
            format!("Launch Position ({:.0}, {:.0})", launch.position.x, launch.position.y),
            format!("Launch Angle ({:.1} Degrees)", launch.angle_degrees()),
            format!("Launch Speed ({:.1})", launch.speed()),
            format!("Gravitational Pull ({:.1})", self.sandbox.gravity().y),
            format!("Projectile: {:?} ({:.1}kg)", launch.projectile, launch.spawn_mass()),
            format!("Projectiles: {}", self.sandbox.dynamic_count()),
            format!("FPS: {:.0}", ctx.time.fps()),
            "Space fire | 1-4 presets | C/B circle/block | WASD move | arrows aim | [ ] mass | PgUp/PgDn gravity | Q/E tilt | Backspace clear".to_string(),
        ];

        let line_height = 20.0;
        let mut current_y = UI_MARGIN;
        for line in lines {
            let mut text = graphics::Text::new(line);
            text.set_scale(18.0);
            canvas.draw(
                &text,
                DrawParam::new().dest(GVec2::new(UI_MARGIN, current_y)).color(Color::WHITE),
            );
            current_y += line_height;
        }
        Ok(())
    }
}

impl EventHandler for MainState {
    fn update(&mut self, ctx: &mut Context) -> GameResult {
        // Fixed-rate ticks regardless of the display refresh rate
        while ctx.time.check_update_time(self.target_fps) {
            let input = self.gather_input(ctx);
            self.sandbox.tick(&input);
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult {
        let mut canvas = graphics::Canvas::from_frame(ctx, Color::from_rgb(102, 191, 255));

        for view in self.sandbox.views() {
            self.draw_body(ctx, &mut canvas, &view)?;
        }
        self.draw_hud(ctx, &mut canvas)?;

        canvas.finish(ctx)
    }

    fn key_down_event(&mut self, ctx: &mut Context, input: KeyInput, repeated: bool) -> GameResult {
        if repeated {
            return Ok(());
        }
        match input.keycode {
            Some(KeyCode::Escape) => ctx.request_quit(),
            Some(KeyCode::Space) => self.pending.spawn = true,
            Some(KeyCode::Key1) => self.pending.preset = Some(ProjectilePreset::LightSlick),
            Some(KeyCode::Key2) => self.pending.preset = Some(ProjectilePreset::LightGrippy),
            Some(KeyCode::Key3) => self.pending.preset = Some(ProjectilePreset::HeavySlick),
            Some(KeyCode::Key4) => self.pending.preset = Some(ProjectilePreset::HeavyGrippy),
            Some(KeyCode::C) => self.pending.select = Some(ProjectileKind::Circle),
            Some(KeyCode::B) => self.pending.select = Some(ProjectileKind::Block),
            Some(key) => debug!("unbound key {:?}", key),
            None => {}
        }
        Ok(())
    }
}

pub fn run_visual(config: SandboxConfig) -> GameResult {
    let cb = ggez::ContextBuilder::new("sandbox_host", "author")
        .window_setup(ggez::conf::WindowSetup::default().title("Physics Sandbox"))
        .window_mode(
            ggez::conf::WindowMode::default()
                .dimensions(config.playfield.width as f32, config.playfield.height as f32),
        );

    let (mut ctx, event_loop) = cb.build()?;
    let state = MainState::new(&mut ctx, &config)?;
    event::run(ctx, event_loop, state)
}
