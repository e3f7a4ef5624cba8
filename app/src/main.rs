use std::time::Instant;

use eframe::{App, Frame, NativeOptions, egui, run_native};
use egui::{Color32, ColorImage, Stroke, TextureHandle, Vec2};
use image::RgbImage;
use log::{error, info};
use starforge_core::{
    FrameScheduler, GeneratorConfig, ManualClock, PlanetConfig, PlanetGenerator, PlanetType,
    ResourceRegistry, SurfaceMaps,
};
use starforge_storage::models::PresetDoc;
use starforge_storage::{PresetStore, export_json, import_json};

const MONGO_URI: &str = "mongodb://localhost:27017";
const DB_NAME: &str = "starforge";
const COLLECTION: &str = "presets";

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
enum Preview {
    #[default]
    Diffuse,
    Normal,
    Height,
    Biomes,
}

struct PlanetViewer {
    // parameters
    planet_type: PlanetType,
    config: PlanetConfig,
    // width = 2^n, height = width / 2
    exp: u32,
    preset_name: String,

    // generated state
    registry: ResourceRegistry,
    generator: PlanetGenerator,
    preview: Preview,
    textures: Vec<(Preview, TextureHandle)>,
    animate: bool,

    // timing & status
    last_duration: Option<f32>,
    status_message: String,
}

impl Default for PlanetViewer {
    fn default() -> Self {
        let planet_type = PlanetType::Terran;
        Self {
            planet_type,
            config: PlanetConfig::preset(planet_type, 2025),
            exp: 8, // 256 x 128
            preset_name: "my-planet".into(),
            registry: ResourceRegistry::new(),
            generator: PlanetGenerator::default(),
            preview: Preview::Diffuse,
            textures: Vec::new(),
            animate: true,
            last_duration: None,
            status_message: String::new(),
        }
    }
}

fn rgb_image(img: &RgbImage) -> ColorImage {
    ColorImage::from_rgb([img.width() as usize, img.height() as usize], img.as_raw())
}

fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

async fn save_preset(preset: &PresetDoc) -> starforge_storage::Result<()> {
    let store = PresetStore::init(MONGO_URI, DB_NAME, COLLECTION).await?;
    store.save(preset).await
}

async fn load_preset(name: &str) -> starforge_storage::Result<Option<PresetDoc>> {
    let store = PresetStore::init(MONGO_URI, DB_NAME, COLLECTION).await?;
    store.read_by_name(name).await
}

impl PlanetViewer {
    fn generate(&mut self, ctx: &egui::Context) {
        let start = Instant::now();
        self.config.width = 1 << self.exp;
        self.config.height = self.config.width / 2;

        match self.generator.regenerate(&self.config, &mut self.registry) {
            Ok((maps, group)) => {
                self.last_duration = Some(start.elapsed().as_secs_f32() * 1000.0);
                self.status_message = format!(
                    "Generated in {:.2} ms (seed {}, {} moons, {} live resources)",
                    self.last_duration.unwrap_or_default(),
                    self.config.seed,
                    group.moons.len(),
                    self.registry.live_count()
                );
                info!("{}", self.status_message);
                self.upload_previews(ctx, &maps);
            }
            Err(e) => {
                error!("generation failed: {e}");
                self.textures.clear();
                self.status_message = format!("Generation failed: {e}");
            }
        }
        ctx.request_repaint();
    }

    // Diffuse and normal come back out of the registry, the group owns them
    fn upload_previews(&mut self, ctx: &egui::Context, maps: &SurfaceMaps) {
        let Some(group) = self.generator.current() else {
            return;
        };
        let mut images = Vec::with_capacity(4);
        for (kind, slot) in [(Preview::Diffuse, "diffuse"), (Preview::Normal, "normal")] {
            if let Some(img) = group.surface_texture(slot, &self.registry) {
                images.push((kind, rgb_image(img)));
            }
        }
        let height = maps.heightmap.to_luma();
        images.extend([
            (
                Preview::Height,
                ColorImage::from_gray(
                    [height.width() as usize, height.height() as usize],
                    height.as_raw(),
                ),
            ),
            (
                Preview::Biomes,
                rgb_image(&maps.biomes.to_preview(&self.config.biomes)),
            ),
        ]);
        self.textures = images
            .into_iter()
            .map(|(kind, img)| {
                let name = format!("planet_{kind:?}").to_lowercase();
                (
                    kind,
                    ctx.load_texture(name, img, egui::TextureOptions::LINEAR),
                )
            })
            .collect();
    }

    // Feed this frame's delta through the scheduler so the group animates
    fn advance(&mut self, dt: f32) {
        let registry = &mut self.registry;
        let Some(group) = self.generator.current_mut() else {
            return;
        };
        let mut clock = ManualClock::default();
        clock.push(dt);
        let mut scheduler = FrameScheduler::new(clock);
        scheduler.subscribe(|dt: f32| group.update(dt, registry));
        scheduler.tick();
    }

    fn apply_preset(&mut self, preset: PresetDoc) {
        match preset.config {
            GeneratorConfig::Planet(config) => {
                self.exp = config.width.max(1).ilog2().clamp(6, 10);
                self.config = config;
                self.preset_name = preset.name;
                self.status_message = format!("Loaded preset `{}`", self.preset_name);
            }
            other => {
                self.status_message = format!(
                    "Preset `{}` is a {} config, the viewer only shows planets",
                    preset.name,
                    other.kind()
                );
            }
        }
    }

    fn current_preset(&self) -> PresetDoc {
        PresetDoc::new(
            self.preset_name.clone(),
            GeneratorConfig::Planet(self.config.clone()),
        )
    }

    fn save_to_db(&mut self) {
        let preset = self.current_preset();
        let result = runtime().map_err(|e| e.to_string()).and_then(|rt| {
            rt.block_on(save_preset(&preset))
                .map_err(|e| e.to_string())
        });
        self.status_message = match result {
            Ok(()) => format!("Saved `{}` to MongoDB", preset.name),
            Err(e) => {
                error!("saving preset `{}` failed: {e}", preset.name);
                format!("DB error: {e}")
            }
        };
    }

    fn load_from_db(&mut self) {
        let name = self.preset_name.clone();
        let result = runtime().map_err(|e| e.to_string()).and_then(|rt| {
            rt.block_on(load_preset(&name))
                .map_err(|e| e.to_string())
        });
        match result {
            Ok(Some(preset)) => self.apply_preset(preset),
            Ok(None) => self.status_message = format!("No preset named `{name}`"),
            Err(e) => self.status_message = format!("DB error: {e}"),
        }
    }

    fn export_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("preset", &["json"])
            .set_file_name(format!("{}.json", self.preset_name))
            .save_file()
        else {
            return;
        };
        let result = export_json(&self.current_preset())
            .map_err(|e| e.to_string())
            .and_then(|text| std::fs::write(&path, text).map_err(|e| e.to_string()));
        self.status_message = match result {
            Ok(()) => format!("Exported {}", path.display()),
            Err(e) => format!("Export failed: {e}"),
        };
    }

    fn import_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("preset", &["json"])
            .pick_file()
        else {
            return;
        };
        let result = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|text| import_json(&text).map_err(|e| e.to_string()));
        match result {
            Ok(preset) => self.apply_preset(preset),
            Err(e) => self.status_message = format!("Import failed: {e}"),
        }
    }

    fn save_png(&mut self) {
        let Some(group) = self.generator.current() else {
            self.status_message = "Nothing generated yet".into();
            return;
        };
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };
        let name = format!("planet_{}", self.config.seed);
        self.status_message = match group.save_surface_png(&self.registry, &dir, &name) {
            Ok((diffuse, _)) => format!("Saved {} (+ normal map)", diffuse.display()),
            Err(e) => format!("Save failed: {e}"),
        };
    }

    fn orbit_diagram(&self, ui: &mut egui::Ui) {
        let Some(group) = self.generator.current() else {
            return;
        };
        let side = ui.available_width().min(260.0);
        let (response, painter) = ui.allocate_painter(Vec2::splat(side), egui::Sense::hover());
        let center = response.rect.center();

        // Fit the outermost orbit (or the ring) into the square
        let reach = group
            .moons
            .iter()
            .map(|m| m.distance + m.size)
            .fold(self.config.radius * 2.5, f32::max);
        let scale = side * 0.45 / reach;

        painter.rect_filled(response.rect, 4.0, Color32::from_gray(12));
        if group.ring.is_some() {
            let r = self.config.radius * scale;
            painter.circle_stroke(center, r * 1.85, Stroke::new(r * 0.9, Color32::from_gray(70)));
        }
        if group.atmosphere.is_some() {
            let c = self.config.atmosphere_color.0;
            painter.circle_filled(
                center,
                self.config.radius * 1.05 * scale,
                Color32::from_rgba_unmultiplied(c[0], c[1], c[2], 60),
            );
        }
        painter.circle_filled(
            center,
            self.config.radius * scale,
            Color32::from_rgb(70, 120, 200),
        );

        for moon in &group.moons {
            painter.circle_stroke(
                center,
                moon.distance * scale,
                Stroke::new(1.0, Color32::DARK_GRAY),
            );
            let p = moon.position();
            let pos = center + Vec2::new(p.x, p.z) * scale;
            painter.circle_filled(pos, (moon.size * scale).max(2.0), Color32::LIGHT_GRAY);
        }
    }
}

impl App for PlanetViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        if self.animate {
            let dt = ctx.input(|i| i.stable_dt).min(0.1);
            self.advance(dt);
            if self.generator.current().is_some() {
                ctx.request_repaint();
            }
        }

        egui::SidePanel::left("controls").show(ctx, |ui| {
            ui.heading("Starforge Planets");
            ui.separator();

            // Planet type resets biomes and climate to the preset
            let before = self.planet_type;
            egui::ComboBox::from_label("Planet Type")
                .selected_text(format!("{:?}", self.planet_type))
                .show_ui(ui, |ui| {
                    for t in PlanetType::ALL {
                        ui.selectable_value(&mut self.planet_type, t, format!("{t:?}"));
                    }
                });
            if before != self.planet_type {
                self.config = PlanetConfig::preset(self.planet_type, self.config.seed);
            }

            ui.label("Seed");
            ui.add(egui::DragValue::new(&mut self.config.seed).speed(1.0));

            let width = 1u32 << self.exp;
            ui.add(
                egui::Slider::new(&mut self.exp, 6..=10)
                    .text(format!("{}×{}", width, width / 2))
                    .step_by(1.0),
            );

            ui.label("Ocean Level");
            ui.add(egui::Slider::new(&mut self.config.ocean_level, -1.0..=1.0));
            ui.label("Terrain Complexity");
            ui.add(egui::Slider::new(&mut self.config.terrain_complexity, 0.25..=3.0));
            ui.label("Cloud Cover");
            ui.add(egui::Slider::new(&mut self.config.cloud_cover, 0.0..=1.0));
            ui.label("Moons");
            ui.add(egui::Slider::new(&mut self.config.moon_count, 0..=6));
            ui.checkbox(&mut self.config.has_rings, "Rings");
            ui.checkbox(&mut self.config.has_atmosphere, "Atmosphere");
            ui.checkbox(&mut self.animate, "Animate");

            ui.separator();

            if ui.button("Generate Planet").clicked() {
                self.generate(ctx);
            }
            if ui.button("Save PNG…").clicked() {
                self.save_png();
            }

            ui.separator();
            ui.label("Preset name");
            ui.text_edit_singleline(&mut self.preset_name);
            ui.horizontal(|ui| {
                if ui.button("Save to DB").clicked() {
                    self.save_to_db();
                }
                if ui.button("Load from DB").clicked() {
                    self.load_from_db();
                }
            });
            ui.horizontal(|ui| {
                if ui.button("Export JSON…").clicked() {
                    self.export_file();
                }
                if ui.button("Import JSON…").clicked() {
                    self.import_file();
                }
            });

            ui.separator();
            ui.label(&self.status_message);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.textures.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label("Click “Generate Planet” to start");
                });
                return;
            }

            ui.horizontal(|ui| {
                for kind in [
                    Preview::Diffuse,
                    Preview::Normal,
                    Preview::Height,
                    Preview::Biomes,
                ] {
                    ui.selectable_value(&mut self.preview, kind, format!("{kind:?}"));
                }
            });

            if let Some((_, tex)) = self.textures.iter().find(|(k, _)| *k == self.preview) {
                let w = ui.available_width();
                ui.image((tex.id(), Vec2::new(w, w / 2.0)));
            }

            ui.separator();
            ui.label(format!(
                "Scene: {} live resources, {} KiB of textures",
                self.registry.live_count(),
                self.registry.texture_bytes() / 1024
            ));
            self.orbit_diagram(ui);
        });
    }
}

fn main() -> eframe::Result {
    env_logger::init();

    let opts = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([500.0, 400.0]),
        ..Default::default()
    };
    run_native(
        "Starforge Planet Viewer",
        opts,
        Box::new(|_cc| Ok(Box::new(PlanetViewer::default()))),
    )
}
