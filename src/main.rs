use glam::Vec2;

use meshedit::input::PointerEvent;
use meshedit::render::Camera;
use meshedit::scene::primitives::PrimitiveKind;
use meshedit::settings::Settings;
use meshedit::tools::EditMode;
use meshedit::util::picking::project_to_screen;
use meshedit::Editor;

const SCREEN: Vec2 = Vec2::new(1280.0, 720.0);

fn main() {
    env_logger::init();
    log::info!("Starting meshedit");

    let settings = Settings::load();
    let mut camera = Camera::new(&settings.camera);
    camera.set_aspect(SCREEN.x, SCREEN.y);
    let mut editor = Editor::new(settings);

    // Scripted session: add a cube, select it, grab a corner and pull it up-screen.
    let cube = editor.add_primitive(PrimitiveKind::Cube);
    editor.set_selected_object(Some(cube));
    editor.activate_edit_tool(EditMode::Vertex);

    let Some(handle) = editor.vertex_handles().into_iter().next() else {
        log::error!("Selected object has no vertex handles");
        return;
    };
    let Some(start) = project_to_screen(handle.world_position, camera.view_projection(), SCREEN) else {
        log::error!("Vertex {} is behind the camera", handle.index);
        return;
    };

    editor.handle_pointer(PointerEvent::Down(camera.pointer_input(start, SCREEN)));
    for step in 1..=10 {
        let pos = start - Vec2::new(0.0, 8.0 * step as f32);
        editor.handle_pointer(PointerEvent::Move(camera.pointer_input(pos, SCREEN)));
        if let Some(p) = editor.dragged_vertex_position() {
            log::info!("step {step}: vertex class at {p}");
        }
        for event in editor.drain_events() {
            log::debug!("{event:?}");
        }
    }
    editor.handle_pointer(PointerEvent::Up);

    if let Some(object) = editor.scene().get(cube)
        && let Some(mesh) = object.renderable.as_mesh()
    {
        log::info!(
            "{} vertex {} now at {} (normals revision {})",
            object.name,
            handle.index,
            mesh.positions()[handle.index],
            mesh.normals_revision()
        );
    }
}
