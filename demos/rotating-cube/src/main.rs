use scene_ngin::{
    flow::Viewer,
    scenes::cube::{self, CubeFlow},
};

fn main() {
    let viewer: Viewer<()> = Viewer::new(cube::settings(), vec![CubeFlow::constructor()]);
    if let Err(e) = viewer.run() {
        eprintln!("rotating-cube failed: {:#}", e);
        std::process::exit(1);
    }
}
