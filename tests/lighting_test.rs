use scene_ngin::{
    data_structures::model::{Colour, Material},
    pipelines::light::{Light, LightUniform, MAX_LIGHTS},
};

use crate::common::test_utils::{EPSILON, assert_close};

mod common;

#[test]
fn srgb_hex_is_converted_to_linear() {
    let [r, g, b] = Colour::from_hex(0xff0000).to_linear();
    assert_close(r, 1.0, EPSILON);
    assert_eq!((g, b), (0.0, 0.0));
    assert_eq!(Colour::from_hex(0xffffff).to_srgb(), [1.0, 1.0, 1.0]);
    let [r, g, b] = Colour::from_hex(0x808080).to_linear();
    assert_close(r, 0.2158605, 1e-4);
    assert_eq!(r, g);
    assert_eq!(g, b);
}

#[test]
fn hex_ignores_alpha_bits() {
    assert_eq!(Colour::from_hex(0xff00ff00).hex(), 0x00ff00);
    assert_eq!(Colour::from(0x121212).hex(), 0x121212);
}

#[test]
fn clear_colour_is_linear() {
    let colour = Colour::from_hex(0x121212).to_wgpu();
    assert!(colour.r < 0.01);
    assert_eq!(colour.a, 1.0);
}

#[test]
fn phong_material_defaults() {
    let material = Material::phong(0x00ff00);
    assert_eq!(material.specular.hex(), 0x111111);
    assert_eq!(material.shininess, 30.0);
    let cube = material.with_specular(0x111111).with_shininess(100.0);
    assert_eq!(cube.shininess, 100.0);
    assert_eq!(cube.colour.hex(), 0x00ff00);
}

#[test]
fn ambient_lights_add_up() {
    let uniform = LightUniform::from_lights(&[
        Light::ambient(0x404040, 1.0),
        Light::ambient(0x404040, 0.5),
    ]);
    let single = Colour::from_hex(0x404040).to_linear()[0];
    assert_close(uniform.ambient[0], single * 1.5, EPSILON);
    assert_eq!(uniform.count, 0);
}

#[test]
fn point_and_directional_lights_are_tagged() {
    let uniform = LightUniform::from_lights(&[
        Light::ambient(0x404040, 1.5),
        Light::point(0xffffff, 1.0, [5.0, 5.0, 5.0]),
        Light::directional(0xffffff, 2.0, [1.0, 1.0, 1.0]),
    ]);
    assert_eq!(uniform.count, 2);
    assert_eq!(uniform.lights[0].position, [5.0, 5.0, 5.0, 1.0]);
    assert_eq!(uniform.lights[1].position, [1.0, 1.0, 1.0, 0.0]);
    assert_close(uniform.lights[0].colour[0], 1.0, EPSILON);
    assert_close(uniform.lights[1].colour[0], 2.0, EPSILON);
    assert_eq!(uniform.lights[1].colour[3], 1.0);
}

#[test]
fn surplus_lights_are_dropped() {
    let lights: Vec<_> = (0..MAX_LIGHTS + 2)
        .map(|i| Light::point(0xffffff, 1.0, [i as f32, 0.0, 0.0]))
        .collect();
    let uniform = LightUniform::from_lights(&lights);
    assert_eq!(uniform.count as usize, MAX_LIGHTS);
    assert_eq!(uniform.lights[MAX_LIGHTS - 1].position[0], (MAX_LIGHTS - 1) as f32);
}

#[test]
fn uniform_matches_the_shader_layout() {
    // ambient + 4 lights of two vec4 + count padded to 16 bytes
    assert_eq!(std::mem::size_of::<LightUniform>(), 16 + MAX_LIGHTS * 32 + 16);
}
