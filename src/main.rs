use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use log::info;

use whitted::colour::Colour;
use whitted::ppm::FrameBuffer;
use whitted::scene;
use whitted::tracer::RayTracer;

const COLS: usize = 400;
const ROWS: usize = 300;
const SAMPLES_PER_AXIS: usize = 2;
const DEPTH: u32 = 3;

fn main() {
    env_logger::init();

    let scene_path = std::env::args().nth(1).unwrap_or_else(|| String::from("scenes/demo.json"));
    if !Path::new(&scene_path).exists() {
        info!("Scene file {} not found, generating the demo scene", scene_path);
        if let Err(why) = scene::write_demo_scene(&scene_path) {
            panic!("Failed to write demo scene {}: {}", scene_path, why);
        }
    }

    let scene = match scene::load_scene(COLS, ROWS, &scene_path) {
        Err(why) => panic!("Failed to load scene {}: {}", scene_path, why),
        Ok(scene) => scene,
    };

    let tracer = RayTracer::new(Colour::new(0.1, 0.1, 0.2));
    let mut framebuffer = FrameBuffer::create(COLS, ROWS);
    tracer.raytrace_scene(&mut framebuffer, DEPTH, &scene, SAMPLES_PER_AXIS, (0, 0), (COLS, ROWS));

    // Output the image to a file
    let path = Path::new("output.ppm");
    write_text_to_file(&framebuffer.get_text(), path);
}

fn write_text_to_file(text: &str, path: &Path) {
    let display = path.display();

    let mut file = match File::create(path) {
        Err(why) => panic!("Failed to create file {}: {}", display, why),
        Ok(file) => file,
    };

    match file.write_all(text.as_bytes()) {
        Err(why) => panic!("Failed to write to file {}: {}", display, why),
        Ok(_) => info!("Wrote to file {}!", display),
    }
}
