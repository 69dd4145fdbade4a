//! Ball-and-stick molecule spinning around Y, with orbit controls.
//!
//! Atoms become spheres coloured by element, bonds become thin grey
//! cylinders stretched between the atom centres. Everything hangs below a
//! single group node, which is the node that spins.

use anyhow::{Context as _, bail};
use cgmath::{Deg, InnerSpace, MetricSpace, Point3, Quaternion, Vector3};
use instant::Duration;

use crate::{
    camera::OrbitControls,
    context::{Context, InitContext, Settings},
    data_structures::{
        instance::Instance,
        model::{Colour, Material},
        scene_graph::{GroupNode, MeshNode, SceneNode},
        spin::Spin,
    },
    flow::{FlowConstructor, GraphicsFlow, Out},
    pipelines::light::Light,
    render::Render,
    resources::geometry::Shape,
};

pub const ATOM_RADIUS: f32 = 0.2;
pub const ATOM_SEGMENTS: u32 = 32;
pub const BOND_RADIUS: f32 = 0.05;
pub const BOND_SEGMENTS: u32 = 16;
pub const BOND_COLOUR: u32 = 0x888888;
pub const UNKNOWN_ELEMENT_COLOUR: u32 = 0xaaaaaa;
/// Radians added to the Y angle every frame.
pub const MOLECULE_STEP: f64 = 0.005;

#[derive(Clone, Debug, PartialEq)]
pub struct Atom {
    pub symbol: String,
    pub position: Point3<f32>,
}

impl Atom {
    pub fn new(symbol: impl Into<String>, position: [f32; 3]) -> Self {
        Self {
            symbol: symbol.into(),
            position: position.into(),
        }
    }
}

/// Indices of the two atoms a bond connects.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bond(pub usize, pub usize);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
}

impl Molecule {
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        Self { atoms, bonds }
    }

    /// H2O with the oxygen at the origin.
    pub fn water() -> Self {
        Self::new(
            vec![
                Atom::new("O", [0.0, 0.0, 0.0]),
                Atom::new("H", [0.96, 0.26, 0.0]),
                Atom::new("H", [-0.96, 0.26, 0.0]),
            ],
            vec![Bond(0, 1), Bond(0, 2)],
        )
    }

    /// Both endpoints of `bond`, or an error if an index is out of range.
    pub fn endpoints(&self, bond: Bond) -> anyhow::Result<(Point3<f32>, Point3<f32>)> {
        let Bond(a, b) = bond;
        let count = self.atoms.len();
        let start = self
            .atoms
            .get(a)
            .with_context(|| format!("Bond {:?} refers to atom {} but there are only {} atoms", bond, a, count))?;
        let end = self
            .atoms
            .get(b)
            .with_context(|| format!("Bond {:?} refers to atom {} but there are only {} atoms", bond, b, count))?;
        Ok((start.position, end.position))
    }
}

/// Element colour used for the atom spheres.
pub fn atom_colour(symbol: &str) -> Colour {
    let hex = match symbol {
        "H" => 0xffffff,
        "O" => 0xff0000,
        "C" => 0x222222,
        "N" => 0x0000ff,
        "S" => 0xffff00,
        other => {
            log::debug!("No colour for element {:?}, using grey", other);
            UNKNOWN_ELEMENT_COLOUR
        }
    };
    Colour::from_hex(hex)
}

/// Length and transform of a cylinder spanning `start` to `end`.
///
/// The cylinder's long axis is +Y, so the rotation is the shortest arc from
/// +Y onto the bond direction.
pub fn bond_transform(start: Point3<f32>, end: Point3<f32>) -> anyhow::Result<(f32, Instance)> {
    let length = start.distance(end);
    if length <= f32::EPSILON {
        bail!(
            "Bond between {:?} and {:?} has no length",
            start,
            end
        );
    }
    let direction = (end - start).normalize();
    let midpoint = start + (end - start) * 0.5;
    let instance = Instance {
        position: Vector3::new(midpoint.x, midpoint.y, midpoint.z),
        ..Instance::new()
    }
    .with_rotation(Quaternion::from_arc(Vector3::unit_y(), direction, None));
    Ok((length, instance))
}

/// Builds the ball-and-stick graph of `molecule` below one group node.
pub fn build_molecule(molecule: &Molecule) -> anyhow::Result<GroupNode> {
    let mut group = GroupNode::new("molecule");
    for (i, atom) in molecule.atoms.iter().enumerate() {
        let sphere = MeshNode::new(
            format!("atom {} {}", i, atom.symbol),
            Shape::sphere(ATOM_RADIUS, ATOM_SEGMENTS, ATOM_SEGMENTS),
            Material::phong(atom_colour(&atom.symbol)),
        )
        .with_transform(Instance::from(Vector3::new(
            atom.position.x,
            atom.position.y,
            atom.position.z,
        )));
        group.add_child(Box::new(sphere));
    }
    for &bond in &molecule.bonds {
        let (start, end) = molecule.endpoints(bond)?;
        let (length, transform) =
            bond_transform(start, end).with_context(|| format!("Invalid bond {:?}", bond))?;
        let cylinder = MeshNode::new(
            format!("bond {}-{}", bond.0, bond.1),
            Shape::cylinder(BOND_RADIUS, length, BOND_SEGMENTS),
            Material::phong(BOND_COLOUR),
        )
        .with_transform(transform);
        group.add_child(Box::new(cylinder));
    }
    group.update_world_transform_all();
    log::debug!(
        "Built molecule with {} atoms and {} bonds",
        molecule.atoms.len(),
        molecule.bonds.len()
    );
    Ok(group)
}

pub fn settings() -> Settings {
    Settings::default()
        .with_title("Molecule")
        .with_camera((0.0, 0.0, 5.0), (0.0, 0.0, 0.0))
        .with_perspective(Deg(45.0), 0.1, 100.0)
        .with_antialias(true)
        .with_light(Light::ambient(0x404040, 1.5))
        .with_light(Light::point(0xffffff, 1.0, [5.0, 5.0, 5.0]))
        .with_controls(OrbitControls::new((0.0, 0.0, 0.0)).with_damping(0.05))
}

pub struct MoleculeFlow {
    root: GroupNode,
    spin: Spin,
}

impl MoleculeFlow {
    pub fn new(molecule: &Molecule) -> anyhow::Result<Self> {
        Ok(Self {
            root: build_molecule(molecule)?,
            spin: Spin::around_y(MOLECULE_STEP),
        })
    }

    pub fn root(&self) -> &GroupNode {
        &self.root
    }

    pub fn spin(&self) -> &Spin {
        &self.spin
    }

    /// Advances the rotation by one frame and refreshes the world transforms.
    pub fn step(&mut self) {
        self.spin.advance();
        self.root.get_local_transform_mut().rotation = self.spin.rotation();
        self.root.update_world_transform_all();
    }

    pub fn constructor<S: 'static>(molecule: Molecule) -> FlowConstructor<S> {
        let constructor: FlowConstructor<S> = Box::new(move |_: InitContext| {
            Box::pin(async move {
                log::info!(
                    "Building molecule scene with {} atoms",
                    molecule.atoms.len()
                );
                let flow = MoleculeFlow::new(&molecule)?;
                Ok(Box::new(flow) as Box<dyn GraphicsFlow<S>>)
            })
        });
        constructor
    }
}

impl<S> GraphicsFlow<S> for MoleculeFlow {
    fn on_init(&mut self, ctx: &mut Context, _state: &mut S) -> Out {
        self.root.write_to_buffers(ctx);
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _state: &mut S, _dt: Duration) -> Out {
        self.step();
        self.root.write_to_buffers(ctx);
        Out::Empty
    }

    fn on_render(&self) -> Render<'_> {
        (&self.root as &dyn SceneNode).into()
    }
}
