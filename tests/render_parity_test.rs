//! The raster image cache is a pure optimization: with integral geometry
//! the cached and direct paths must produce identical pixels.

use armillary::{
    draw::Primitive,
    geometry::{Point, Size},
    scene::{Visual, VisualModel},
    surface::SoftwareSurface,
    EngineConfig,
};

fn container_model() -> VisualModel {
    let mut inner = VisualModel::new("inner");
    let mut child = Visual::new("child");
    child.add_primitive(Primitive::rect(Size::new(50.0, 40.0)));
    inner.add_visual(child);

    let mut outer = Visual::new("outer");
    outer.add_primitive(Primitive::rect(Size::new(120.0, 80.0)));
    let mut sub_box = Primitive::sub_model_box(Size::new(100.0, 60.0));
    sub_box.set_position(Point::new(10.0, 10.0));
    outer.add_primitive(sub_box);
    outer.set_nested(Some(inner));

    let mut model = VisualModel::new("m");
    model.add_visual(outer);
    model
}

fn render(config: &EngineConfig) -> Vec<u8> {
    let mut model = container_model();
    let mut surface = SoftwareSurface::new(160, 120, 1.0);
    model.draw(&mut surface, config);
    surface.pixmap().data().to_vec()
}

#[test]
fn test_cache_does_not_change_output() {
    let mut cached = EngineConfig::default();
    cached.set_use_raster_cache(true);
    let mut direct = EngineConfig::default();
    direct.set_use_raster_cache(false);

    assert_eq!(render(&cached), render(&direct));
}

#[test]
fn test_cache_rebuild_keyed_on_scale() {
    let config = EngineConfig::default();
    let mut model = container_model();

    // Draw at scale 1, then at scale 2: the second pass must rebuild the
    // cache at the new pixel size rather than blit the stale image.
    let mut first = SoftwareSurface::new(160, 120, 1.0);
    model.draw(&mut first, &config);

    let mut scaled = SoftwareSurface::new(320, 240, 2.0);
    model.draw(&mut scaled, &config);

    let mut direct_config = EngineConfig::default();
    direct_config.set_use_raster_cache(false);
    let mut reference = SoftwareSurface::new(320, 240, 2.0);
    let mut fresh = container_model();
    fresh.draw(&mut reference, &direct_config);

    assert_eq!(scaled.pixmap().data(), reference.pixmap().data());
}
