use scene_ngin::{
    flow::Viewer,
    scenes::molecule::{self, Molecule, MoleculeFlow},
};

fn main() {
    let viewer: Viewer<()> = Viewer::new(
        molecule::settings(),
        vec![MoleculeFlow::constructor(Molecule::water())],
    );
    if let Err(e) = viewer.run() {
        eprintln!("molecule failed: {:#}", e);
        std::process::exit(1);
    }
}
